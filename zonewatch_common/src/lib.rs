//! Shared core for the zonewatch danger-zone monitor: detection data
//! model, ROI geometry under the cover fit, zone evaluation, alert
//! styling, voice throttling, frame annotation, and the drag/resize
//! interaction for the zone rectangle.

pub mod alert;
pub mod detection;
pub mod geometry;
pub mod overlay;
pub mod palette;
pub mod roi_input;
pub mod voice;
pub mod zone;
