//! Geographic bounding rectangles.
//!
//! A [`LatLngBounds`] is the rectangle visible on the console's map widget,
//! expressed as the four edge coordinates. The viewport cache keys entries by
//! the canonical corner string and accepts nearby rectangles by overlap
//! ratio.

use std::fmt;

/// A geographic bounding rectangle in degrees.
///
/// # Examples
///
/// ```
/// use srto_cache::geo::LatLngBounds;
///
/// let bounds = LatLngBounds::new(10.0, 0.0, 20.0, 0.0);
/// assert_eq!(bounds.cache_key(), "0,0,10,20");
/// assert_eq!(bounds.area(), 200.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngBounds {
    /// Latitude of the north edge
    pub north: f64,
    /// Latitude of the south edge
    pub south: f64,
    /// Longitude of the east edge
    pub east: f64,
    /// Longitude of the west edge
    pub west: f64,
}

impl LatLngBounds {
    /// Creates a rectangle from its four edges.
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Canonical key built from the southwest and northeast corners.
    pub fn cache_key(&self) -> String {
        format!("{},{},{},{}", self.south, self.west, self.north, self.east)
    }

    /// Area in squared degrees.
    pub fn area(&self) -> f64 {
        (self.north - self.south).abs() * (self.east - self.west).abs()
    }

    /// True if the two rectangles share any area.
    pub fn intersects(&self, other: &LatLngBounds) -> bool {
        !(self.north < other.south
            || self.south > other.north
            || self.east < other.west
            || self.west > other.east)
    }

    /// The overlapping rectangle, if the two intersect.
    pub fn intersection(&self, other: &LatLngBounds) -> Option<LatLngBounds> {
        if !self.intersects(other) {
            return None;
        }
        Some(LatLngBounds {
            north: self.north.min(other.north),
            south: self.south.max(other.south),
            east: self.east.min(other.east),
            west: self.west.max(other.west),
        })
    }

    /// Fraction of `requested`'s area covered by this rectangle.
    ///
    /// Returns 0.0 for disjoint rectangles and for a degenerate (zero-area)
    /// request.
    pub fn coverage_of(&self, requested: &LatLngBounds) -> f64 {
        let requested_area = requested.area();
        if requested_area == 0.0 {
            return 0.0;
        }
        match self.intersection(requested) {
            Some(overlap) => overlap.area() / requested_area,
            None => 0.0,
        }
    }
}

impl fmt::Display for LatLngBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{} -> {},{}]", self.south, self.west, self.north, self.east)
    }
}
