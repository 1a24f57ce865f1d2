use std::fmt;

/// A closed time interval over numeric timestamps or day counts.
///
/// Intervals may be degenerate (`lo == hi`), which represents a point in
/// time. Callers are responsible for supplying `lo <= hi`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct Interval {
    pub lo: f64,
    pub hi: f64,
}

impl Interval {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// A degenerate interval at a single time.
    pub fn point(at: f64) -> Self {
        Self { lo: at, hi: at }
    }

    pub fn is_point(&self) -> bool {
        self.lo == self.hi
    }

    pub fn length(&self) -> f64 {
        self.hi - self.lo
    }

    /// Whether this interval and `other` share any time, endpoints included.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.lo <= other.hi && other.lo <= self.hi
    }

    pub fn contains(&self, at: f64) -> bool {
        self.lo <= at && at <= self.hi
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}
