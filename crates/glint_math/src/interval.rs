use crate::EPSILON;

/// A closed range of ray parameters or channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// The valid hit range for a ray limited to `max_distance`.
    ///
    /// The lower bound sits at [`EPSILON`] so a ray starting on a surface
    /// does not report its own head point.
    pub fn ray_hits(max_distance: f32) -> Self {
        Self::new(EPSILON, max_distance)
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Returns true if x is in (min, max]: open at the bottom, closed at the top.
    pub fn admits(&self, x: f32) -> bool {
        self.min < x && x <= self.max
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// The unit interval [0, 1], used for color channels.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };
}
