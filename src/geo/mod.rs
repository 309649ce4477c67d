//! Geographic Caching Module
//!
//! Bounding rectangles and the viewport cache used by the console's map
//! screens.

mod bounds;
mod viewport;

pub use bounds::LatLngBounds;
pub use viewport::{ViewportCache, DEFAULT_VIEWPORT_TTL, OVERLAP_THRESHOLD};
