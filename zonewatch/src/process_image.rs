//! Static-image mode: run the detector once over a photo, draw the
//! annotated result next to the input. Zone logic is a live-feed
//! feature and does not apply here.

use std::collections::HashMap;
use std::path::Path;

use zonewatch_common::detection::filter_by_confidence;
use zonewatch_common::overlay::{draw_detections, OverlayStyle};

use crate::detector::Detector;

pub fn process_image(
    path: &Path,
    detector: &mut impl Detector,
    min_confidence: f32,
    style: &OverlayStyle,
) -> anyhow::Result<()> {
    let mut image = image::open(path)?.to_rgb8();

    let raw = detector.detect(&image)?;
    let detections = filter_by_confidence(raw, min_confidence);

    let in_zone = vec![false; detections.len()];
    draw_detections(&mut image, &detections, &in_zone, false, style);

    let output_path = path.with_extension("out.png");
    image.save(&output_path)?;

    // Per-class summary.
    let mut by_class: HashMap<&str, usize> = HashMap::new();
    for det in &detections {
        *by_class.entry(det.class_name.as_str()).or_insert(0) += 1;
    }
    log::info!(
        "Analysis complete. {} objects found in {path:?}",
        detections.len()
    );
    for (class_name, count) in &by_class {
        log::info!("  {class_name}: {count}");
    }
    log::info!("Annotated image saved to {output_path:?}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use zonewatch_common::detection::{BBox, Detection};

    struct FixedDetector(Vec<Detection>);

    impl Detector for FixedDetector {
        fn detect(&mut self, _frame: &RgbImage) -> anyhow::Result<Vec<Detection>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_process_image_writes_annotated_output() {
        let dir = std::env::temp_dir();
        let input = dir.join("zonewatch_test_photo.png");
        RgbImage::new(64, 48).save(&input).unwrap();

        let mut detector = FixedDetector(vec![
            Detection::new("cat", 0.9, BBox::new(5.0, 5.0, 20.0, 20.0)),
            Detection::new("cat", 0.2, BBox::new(30.0, 5.0, 20.0, 20.0)),
        ]);
        process_image(&input, &mut detector, 0.6, &OverlayStyle::new()).unwrap();

        let output = dir.join("zonewatch_test_photo.out.png");
        assert!(output.exists());

        std::fs::remove_file(&input).ok();
        std::fs::remove_file(&output).ok();
    }
}
