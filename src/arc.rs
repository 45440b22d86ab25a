use slab::Slab;

use crate::eventqueue::EventHandle;
use crate::geometry::{breakpoint_between, equals_with_epsilon, parabola_y, Point, Ray};
use crate::Site;

/// Breakpoints are identified by their slot in this arena, never by their
/// site pair: the same pair can be traced by two different breakpoints at
/// different times.
pub type BreakPoints = Slab<BreakPoint>;
pub type BreakPointId = usize;

/// The meeting point of the arc of `site1` (on the left) and the arc of
/// `site2` (on the right). It traces the edge with index `edge`.
#[derive(Clone, Copy, Debug)]
pub struct BreakPoint {
    pub site1: Site,
    pub site2: Site,
    pub edge: usize,
}

impl BreakPoint {
    pub fn x_at(&self, sweep_y: f64) -> f64 {
        breakpoint_between(self.site1.point(), self.site2.point(), sweep_y)
    }

    pub fn position(&self, sweep_y: f64) -> Point {
        let x = self.x_at(sweep_y);
        // The site farther from the sweep line has the better-conditioned parabola
        let focus = if self.site1.y >= self.site2.y { self.site1 } else { self.site2 };
        let scale = self.site1.point().distance_to(self.site2.point());
        if equals_with_epsilon(focus.y, sweep_y, scale) {
            return Point::new(x, focus.y);
        }
        Point::new(x, parabola_y(focus.point(), sweep_y, x))
    }

    pub fn ray(&self) -> Ray {
        Ray::bisector(self.site1.point(), self.site2.point())
    }
}

/// One parabolic piece of the beach line.
#[derive(Clone, Copy, Debug)]
pub struct Arc {
    pub site: Site,
    pub left: Option<BreakPointId>,
    pub right: Option<BreakPointId>,
    /// The circle event that would remove this arc, if one is pending.
    pub event: Option<EventHandle>,
}

impl Arc {
    pub fn new(site: Site, left: Option<BreakPointId>, right: Option<BreakPointId>) -> Arc {
        Arc {
            site,
            left,
            right,
            event: None,
        }
    }

    pub fn unbounded(site: Site) -> Arc {
        Arc::new(site, None, None)
    }

    /// Horizontal extent of the arc on the sweep line `sweep_y`.
    pub fn extent(&self, breakpoints: &BreakPoints, sweep_y: f64) -> (f64, f64) {
        let left = self
            .left
            .and_then(|bp| breakpoints.get(bp))
            .map_or(f64::NEG_INFINITY, |bp| bp.x_at(sweep_y));
        let right = self
            .right
            .and_then(|bp| breakpoints.get(bp))
            .map_or(f64::INFINITY, |bp| bp.x_at(sweep_y));
        (left, right)
    }
}
