use crate::geometry::Point;
use crate::Site;

/// A finished Voronoi edge: the segment of the bisector between `site1` and
/// `site2` that borders both of their cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub site1: Site,
    pub site2: Site,
    pub start: Point,
    pub end: Point,
}

impl Edge {
    pub fn length(&self) -> f64 {
        self.start.distance_to(self.end)
    }

    /// Whether the edge separates the two given sites, in either order.
    pub fn separates(&self, a: usize, b: usize) -> bool {
        (self.site1.id == a && self.site2.id == b) || (self.site1.id == b && self.site2.id == a)
    }
}

// An edge still being traced. Every breakpoint owning it seals one end; a
// site-event edge is sealed twice, a circle-event edge once after its start
// was placed at the circle center.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OpenEdge {
    pub site1: Site,
    pub site2: Site,
    pub start: Option<Point>,
    pub end: Option<Point>,
}

impl OpenEdge {
    pub fn new(site1: Site, site2: Site) -> OpenEdge {
        OpenEdge {
            site1,
            site2,
            start: None,
            end: None,
        }
    }

    pub fn starting_at(site1: Site, site2: Site, start: Point) -> OpenEdge {
        OpenEdge {
            start: Some(start),
            ..OpenEdge::new(site1, site2)
        }
    }

    /// Fills the first missing endpoint. Returns `false` if both were
    /// already set.
    pub fn seal(&mut self, at: Point) -> bool {
        if self.start.is_none() {
            self.start = Some(at);
        } else if self.end.is_none() {
            self.end = Some(at);
        } else {
            return false;
        }
        true
    }

    pub fn is_sealed(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    // A missing end collapses onto the other one.
    pub fn close(&self) -> Option<Edge> {
        let (start, end) = match (self.start, self.end) {
            (Some(start), Some(end)) => (start, end),
            (Some(p), None) | (None, Some(p)) => (p, p),
            (None, None) => return None,
        };
        Some(Edge {
            site1: self.site1,
            site2: self.site2,
            start,
            end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(id: usize, x: f64, y: f64) -> Site {
        Site { id, x, y }
    }

    #[test]
    fn seals_start_then_end() {
        let mut edge = OpenEdge::new(site(0, 0.0, 0.0), site(1, 2.0, 0.0));
        assert!(edge.close().is_none());
        assert!(edge.seal(Point::new(1.0, 1.0)));
        assert!(!edge.is_sealed());
        assert!(edge.seal(Point::new(1.0, -1.0)));
        assert!(edge.is_sealed());
        assert!(!edge.seal(Point::new(1.0, 5.0)));

        let closed = edge.close().unwrap();
        assert_eq!(closed.start, Point::new(1.0, 1.0));
        assert_eq!(closed.end, Point::new(1.0, -1.0));
        assert_eq!(closed.length(), 2.0);
        assert!(closed.separates(1, 0));
        assert!(!closed.separates(1, 2));
    }

    #[test]
    fn circle_edge_starts_at_center() {
        let center = Point::new(1.0, 0.75);
        let mut edge = OpenEdge::starting_at(site(0, 0.0, 0.0), site(1, 2.0, 0.0), center);
        edge.seal(Point::new(1.0, -3.0));
        let closed = edge.close().unwrap();
        assert_eq!(closed.start, center);
        assert_eq!(closed.end, Point::new(1.0, -3.0));
    }
}
