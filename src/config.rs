use crate::error::{Error, Result};

/// Tuning for a sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepConfig {
    /// How far the sentinel sweep positions sit above the highest site and
    /// below the lowest site (or lowest circle event).
    pub margin: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig { margin: 1.0 }
    }
}

impl SweepConfig {
    pub fn with_margin(margin: f64) -> SweepConfig {
        SweepConfig { margin }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.margin.is_finite() || self.margin <= 0.0 {
            return Err(Error::InvalidMargin(self.margin));
        }
        Ok(())
    }
}

/// Vertical extent of the sweep: it starts at `upper` and unfinished edges
/// are sealed at `lower`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepBounds {
    pub upper: f64,
    pub lower: f64,
}

impl SweepBounds {
    pub fn around(bottom: f64, top: f64, margin: f64) -> SweepBounds {
        SweepBounds {
            upper: top + margin,
            lower: bottom - margin,
        }
    }
}
