//! ROI geometry: mapping the user's on-screen danger-zone rectangle into
//! the video frame's pixel space.
//!
//! The video element fills its container with a "cover" fit: uniform
//! scale, overflow cropped, crop centered. The mapper inverts that
//! transform so the mapped rect lives in the exact same coordinate space
//! as detection bounding boxes.

use serde::{Deserialize, Serialize};

/// Width/height pair, used for both the native frame resolution and the
/// on-screen rendered size of the video container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

impl Dimensions {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The user-manipulated danger-zone rectangle, in layout pixels relative
/// to the video container. Owned by the input layer; read-only here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// The ROI re-expressed in source-frame pixels. Recomputed every frame,
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl VideoRect {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Average half-extent, the proximity scale unit.
    pub fn proximity_radius(&self) -> f32 {
        (self.width + self.height) / 4.0
    }

    /// Boundary-inclusive containment check.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Map the on-screen rect into video-frame pixels under the cover fit.
///
/// Returns `None` when either display dimension is zero; the caller skips
/// mapping for that frame and retries on the next one.
pub fn map_screen_to_video(
    screen: ScreenRect,
    video_dims: Dimensions,
    display_dims: Dimensions,
    mirrored: bool,
) -> Option<VideoRect> {
    if display_dims.width == 0.0 || display_dims.height == 0.0 {
        return None;
    }

    let scale_x = video_dims.width / display_dims.width;
    let scale_y = video_dims.height / display_dims.height;
    // Cover fit: the dominant axis determines the crop.
    let scale_factor = scale_x.max(scale_y);

    // Portion of the video actually visible on screen, and its centering
    // offsets within the container.
    let rendered_width = video_dims.width / scale_factor;
    let rendered_height = video_dims.height / scale_factor;
    let offset_x = (display_dims.width - rendered_width) / 2.0;
    let offset_y = (display_dims.height - rendered_height) / 2.0;

    let mut x = (screen.left - offset_x) * scale_factor;
    let y = (screen.top - offset_y) * scale_factor;
    let width = screen.width * scale_factor;
    let height = screen.height * scale_factor;

    // Front-facing camera renders mirrored; reflect so the rect matches
    // what the user sees.
    if mirrored {
        x = video_dims.width - (x + width);
    }

    Some(VideoRect {
        x,
        y,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_mapping_uniform_scale() {
        // 2x scale on both axes, no crop, no offsets.
        let mapped = map_screen_to_video(
            ScreenRect::new(100.0, 50.0, 80.0, 60.0),
            Dimensions::new(1280.0, 720.0),
            Dimensions::new(640.0, 360.0),
            false,
        )
        .unwrap();
        assert_eq!(mapped.x, 200.0);
        assert_eq!(mapped.y, 100.0);
        assert_eq!(mapped.width, 160.0);
        assert_eq!(mapped.height, 120.0);
    }

    #[test]
    fn test_cover_mapping_with_crop_offsets() {
        // Video 1280x720 shown in a 360x640 portrait container: scale_y
        // dominates (720/640 = 1.125 < 1280/360 = 3.556, so factor is
        // 3.556), the video is cropped horizontally and centered.
        let video = Dimensions::new(1280.0, 720.0);
        let display = Dimensions::new(360.0, 640.0);
        let mapped =
            map_screen_to_video(ScreenRect::new(0.0, 0.0, 360.0, 640.0), video, display, false)
                .unwrap();

        let scale = (1280.0f32 / 360.0).max(720.0 / 640.0);
        let rendered_h = 720.0 / scale;
        let offset_y = (640.0 - rendered_h) / 2.0;
        assert_eq!(mapped.x, 0.0);
        assert_eq!(mapped.y, -offset_y * scale);
        assert_eq!(mapped.width, 1280.0);
    }

    #[test]
    fn test_round_trip_reproduces_screen_rect() {
        // Inverting the mapping (divide by scale, re-add the offsets)
        // must reproduce the screen rect. The scale here (1920/800 = 2.4)
        // is not exactly representable, so compare within a tolerance.
        let screen = ScreenRect::new(37.0, 81.0, 120.0, 95.0);
        let video = Dimensions::new(1920.0, 1080.0);
        let display = Dimensions::new(800.0, 600.0);

        let mapped = map_screen_to_video(screen, video, display, false).unwrap();

        let scale = (video.width / display.width).max(video.height / display.height);
        let offset_x = (display.width - video.width / scale) / 2.0;
        let offset_y = (display.height - video.height / scale) / 2.0;

        assert!((mapped.x / scale + offset_x - screen.left).abs() < 1e-3);
        assert!((mapped.y / scale + offset_y - screen.top).abs() < 1e-3);
        assert!((mapped.width / scale - screen.width).abs() < 1e-3);
        assert!((mapped.height / scale - screen.height).abs() < 1e-3);
    }

    #[test]
    fn test_mirroring_is_an_involution() {
        let screen = ScreenRect::new(100.0, 50.0, 80.0, 60.0);
        let video = Dimensions::new(1280.0, 720.0);
        let display = Dimensions::new(640.0, 360.0);

        let plain = map_screen_to_video(screen, video, display, false).unwrap();
        let mirrored = map_screen_to_video(screen, video, display, true).unwrap();

        // Applying the reflection to the mirrored x recovers the plain x.
        assert_eq!(video.width - (mirrored.x + mirrored.width), plain.x);
        assert_eq!(mirrored.y, plain.y);
        assert_eq!(mirrored.width, plain.width);
    }

    #[test]
    fn test_zero_display_dims_skip_mapping() {
        let screen = ScreenRect::new(0.0, 0.0, 10.0, 10.0);
        let video = Dimensions::new(1280.0, 720.0);
        assert!(map_screen_to_video(screen, video, Dimensions::new(0.0, 360.0), false).is_none());
        assert!(map_screen_to_video(screen, video, Dimensions::new(640.0, 0.0), false).is_none());
    }

    #[test]
    fn test_video_rect_center_and_radius() {
        let rect = VideoRect {
            x: 200.0,
            y: 100.0,
            width: 160.0,
            height: 120.0,
        };
        assert_eq!(rect.center(), (280.0, 160.0));
        assert_eq!(rect.proximity_radius(), 70.0);
    }

    #[test]
    fn test_contains_is_boundary_inclusive() {
        let rect = VideoRect {
            x: 200.0,
            y: 100.0,
            width: 160.0,
            height: 120.0,
        };
        assert!(rect.contains(200.0, 100.0)); // top-left corner
        assert!(rect.contains(360.0, 220.0)); // bottom-right corner
        assert!(!rect.contains(199.9, 100.0));
        assert!(!rect.contains(360.1, 220.0));
    }
}
