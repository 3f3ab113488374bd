use crate::{BBox, Point};

/// Running latitude/longitude extrema over every node of a pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsAccumulator {
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
}

impl Default for BoundsAccumulator {
    fn default() -> Self {
        Self {
            min_lat: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            min_lon: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
        }
    }
}

impl BoundsAccumulator {
    /// Start with no points.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Widen the extrema to include `point`.
    pub fn include(&mut self, point: Point) {
        self.min_lat = self.min_lat.min(point.lat);
        self.max_lat = self.max_lat.max(point.lat);
        self.min_lon = self.min_lon.min(point.lon);
        self.max_lon = self.max_lon.max(point.lon);
    }

    /// The box spanned so far; empty when no point was included.
    ///
    /// # Examples
    /// ```
    /// use osmgraph_core::{BoundsAccumulator, Point};
    ///
    /// let mut bounds = BoundsAccumulator::new();
    /// bounds.include(Point::new(1.0, 2.0));
    /// bounds.include(Point::new(3.0, 4.0));
    /// bounds.include(Point::new(-1.0, 5.0));
    /// let bbox = bounds.finish();
    /// assert_eq!(bbox.lower_left, Point::new(-1.0, 2.0));
    /// assert_eq!(bbox.upper_right, Point::new(3.0, 5.0));
    /// ```
    #[must_use]
    pub const fn finish(&self) -> BBox {
        BBox {
            lower_left: Point::new(self.min_lat, self.min_lon),
            upper_right: Point::new(self.max_lat, self.max_lon),
        }
    }
}
