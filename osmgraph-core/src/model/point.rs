use geo::{Coord, Rect};

/// A WGS84 position.
///
/// # Examples
/// ```
/// use osmgraph_core::Point;
///
/// let point = Point::new(52.5, 13.4);
/// assert_eq!(point.coord().x, 13.4);
/// assert_eq!(point.coord().y, 52.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl Point {
    /// Construct a point from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// The point as a `geo` coordinate with `x = longitude`, `y = latitude`.
    #[must_use]
    pub const fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.lon,
            y: self.lat,
        }
    }
}

impl From<Point> for Coord<f64> {
    fn from(point: Point) -> Self {
        point.coord()
    }
}

/// Minimal rectangle containing every processed node.
///
/// A box built from zero nodes is degenerate (its lower-left corner lies
/// above and to the right of its upper-right corner); [`BBox::is_empty`]
/// reports that case and [`BBox::to_rect`] refuses to convert it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    /// Minimum latitude and longitude.
    pub lower_left: Point,
    /// Maximum latitude and longitude.
    pub upper_right: Point,
}

impl BBox {
    /// The box produced when no nodes were seen.
    pub const EMPTY: Self = Self {
        lower_left: Point::new(f64::INFINITY, f64::INFINITY),
        upper_right: Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
    };

    /// Whether the box holds no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.lower_left.lat <= self.upper_right.lat && self.lower_left.lon <= self.upper_right.lon)
    }

    /// Convert to a `geo` rectangle, or `None` for an empty box.
    ///
    /// # Examples
    /// ```
    /// use osmgraph_core::{BBox, Point};
    ///
    /// let bbox = BBox {
    ///     lower_left: Point::new(-1.0, 2.0),
    ///     upper_right: Point::new(3.0, 5.0),
    /// };
    /// let rect = bbox.to_rect().expect("non-empty box");
    /// assert_eq!(rect.min().x, 2.0);
    /// assert!(BBox::EMPTY.to_rect().is_none());
    /// ```
    #[must_use]
    pub fn to_rect(&self) -> Option<Rect<f64>> {
        (!self.is_empty()).then(|| Rect::new(self.lower_left.coord(), self.upper_right.coord()))
    }
}

impl Default for BBox {
    fn default() -> Self {
        Self::EMPTY
    }
}
