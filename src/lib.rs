//! Voronoi edges of a planar point set, computed with Fortune's sweep-line
//! algorithm.
//!
//! ```
//! use voronoi::{Point, Voronoi};
//!
//! let sites = [Point::new(0.0, 0.0), Point::new(2.0, 0.0), Point::new(1.0, 2.0)];
//! let diagram = Voronoi::build(&sites).unwrap();
//! assert_eq!(diagram.edges.len(), 3);
//! ```

mod arc;
mod beachline;
mod config;
mod edge;
mod error;
mod eventqueue;
mod geometry;
mod order;

pub use config::{SweepBounds, SweepConfig};
pub use edge::Edge;
pub use error::{Error, Result};
pub use geometry::{breakpoint_between, equals_with_epsilon, orientation, Orientation, Point, Ray};

use arc::{Arc, BreakPoint, BreakPoints};
use beachline::{ArcHandle, BeachLine};
use edge::OpenEdge;
use eventqueue::{CircleEvent, Event, EventQueue};
use order::BeachKey;
use std::fmt;
use tracing::{debug, trace, warn};

// A site corresponds to an input point. They are given a unique index so that
// they can be uniquely referenced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Site {
    pub id: usize,
    pub x: f64,
    pub y: f64,
}

impl Site {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Site,
    Circle,
}

/// Counters collected during a sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub site_events: usize,
    /// Sites skipped because an earlier site had the same coordinates.
    pub duplicate_sites: usize,
    pub circle_events_scheduled: usize,
    pub circle_events: usize,
    pub circle_events_cancelled: usize,
}

#[derive(Clone, Debug)]
pub struct Diagram {
    /// Every edge once, in the order the sweep created them.
    pub edges: Vec<Edge>,
    /// `lower` is the sweep position the unbounded edges were cut at. It is
    /// the lowest site minus the margin, or lower still when a circle event
    /// fired below the lowest site, so that no edge is cut above its start.
    pub bounds: SweepBounds,
    pub stats: SweepStats,
}

pub struct Voronoi {
    config: SweepConfig,
    sites: Vec<Site>,
    events: EventQueue,
    beach: BeachLine<Arc>,
    breakpoints: BreakPoints,
    edges: Vec<OpenEdge>,
    bounds: SweepBounds,
    sweep_y: f64,
    lowest_sweep: f64,
    last_site: Option<Point>,
    stats: SweepStats,
}

impl fmt::Debug for Voronoi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Voronoi")
            .field("sites", &self.sites.len())
            .field("sweep_y", &self.sweep_y)
            .field("pending_events", &self.events.len())
            .field("arcs", &self.beach.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl Voronoi {
    pub fn new(sites: &[Point]) -> Result<Voronoi> {
        Voronoi::with_config(sites, SweepConfig::default())
    }

    pub fn with_config(points: &[Point], config: SweepConfig) -> Result<Voronoi> {
        config.validate()?;
        if let Some((index, p)) = points.iter().enumerate().find(|(_, p)| !p.is_finite()) {
            return Err(Error::NonFiniteSite { index, x: p.x, y: p.y });
        }

        let sites: Vec<Site> = points
            .iter()
            .enumerate()
            .map(|(id, p)| Site { id, x: p.x, y: p.y })
            .collect();
        let bounds = if sites.is_empty() {
            SweepBounds::around(0.0, 0.0, config.margin)
        } else {
            let (bottom, top) = sites
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| (lo.min(s.y), hi.max(s.y)));
            SweepBounds::around(bottom, top, config.margin)
        };

        let mut events = EventQueue::with_capacity(2 * sites.len());
        for site in sites.iter() {
            events.insert(Event::Site(*site));
        }

        Ok(Voronoi {
            config,
            events,
            beach: BeachLine::with_capacity(2 * sites.len()),
            breakpoints: BreakPoints::with_capacity(2 * sites.len()),
            edges: Vec::with_capacity(3 * sites.len()),
            bounds,
            sweep_y: bounds.upper,
            lowest_sweep: bounds.upper,
            last_site: None,
            stats: SweepStats::default(),
            sites,
        })
    }

    pub fn build(sites: &[Point]) -> Result<Diagram> {
        Ok(Voronoi::new(sites)?.finish())
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn sweep_y(&self) -> f64 {
        self.sweep_y
    }

    pub fn bounds(&self) -> SweepBounds {
        self.bounds
    }

    pub fn stats(&self) -> SweepStats {
        self.stats
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    pub fn active_breakpoints(&self) -> usize {
        self.breakpoints.len()
    }

    pub fn is_done(&self) -> bool {
        self.events.is_empty()
    }

    /// Ids of the sites owning the beach line arcs, left to right.
    pub fn beach_sites(&self) -> Vec<usize> {
        self.beach.iter().map(|(_, arc)| arc.site.id).collect()
    }

    /// Processes the next event. Returns `None` once no events are left.
    pub fn step(&mut self) -> Option<EventKind> {
        let event = self.events.pop()?;
        let point = event.point();
        self.sweep_y = point.y;
        self.lowest_sweep = self.lowest_sweep.min(point.y);

        let kind = match event {
            Event::Site(site) => {
                trace!(id = site.id, x = site.x, y = site.y, "site event");
                self.handle_site_event(site);
                EventKind::Site
            }
            Event::Circle(circle) => {
                trace!(x = circle.center.x, y = circle.center.y, sweep = point.y, "circle event");
                self.handle_circle_event(circle);
                EventKind::Circle
            }
        };

        if cfg!(feature = "slow-asserts") {
            if let Err(e) = self.check_invariants() {
                panic!("{}", e);
            }
        }
        Some(kind)
    }

    /// Runs the sweep to completion and cuts the edges that are still being
    /// traced at the lower sweep bound.
    pub fn finish(mut self) -> Diagram {
        while self.step().is_some() {}

        // Below every site and every circle event, so each breakpoint is
        // evaluated past the point where it was created
        let terminal = self.bounds.lower.min(self.lowest_sweep - self.config.margin);
        self.sweep_y = terminal;
        for (_, bp) in self.breakpoints.iter() {
            if !self.edges[bp.edge].seal(bp.position(terminal)) {
                warn!(edge = bp.edge, "edge already sealed at both ends");
            }
        }
        self.breakpoints.clear();

        let edges: Vec<Edge> = self.edges.iter().filter_map(|edge| edge.close()).collect();
        debug!(
            edges = edges.len(),
            site_events = self.stats.site_events,
            circle_events = self.stats.circle_events,
            cancelled = self.stats.circle_events_cancelled,
            "sweep finished"
        );

        Diagram {
            edges,
            bounds: SweepBounds {
                upper: self.bounds.upper,
                lower: terminal,
            },
            stats: self.stats,
        }
    }

    fn handle_site_event(&mut self, site: Site) {
        let point = site.point();
        if self.last_site.replace(point) == Some(point) {
            debug!(id = site.id, "skipping coincident site");
            self.stats.duplicate_sites += 1;
            return;
        }
        self.stats.site_events += 1;

        let first = match self.beach.first() {
            Some(first) => first,
            None => {
                self.beach.init(Arc::unbounded(site));
                return;
            }
        };

        // Find beach segment directly above site.x
        let above = {
            let breakpoints = &self.breakpoints;
            let sweep_y = self.sweep_y;
            self.beach
                .floor(|arc| order::compare(BeachKey::Query(site.x), arc, breakpoints, sweep_y))
                .unwrap_or(first)
        };

        self.cancel_circle_event(above);
        let arc_above = *self.beach.get(above);

        let scale = (arc_above.site.x - site.x).abs();
        if equals_with_epsilon(arc_above.site.y, self.sweep_y, scale) && self.insert_beside(above, site) {
            return;
        }

        let edge = self.push_edge(OpenEdge::new(arc_above.site, site));
        let left_bp = self.breakpoints.insert(BreakPoint {
            site1: arc_above.site,
            site2: site,
            edge,
        });
        let right_bp = self.breakpoints.insert(BreakPoint {
            site1: site,
            site2: arc_above.site,
            edge,
        });

        // The split arc keeps its slot as the left piece
        *self.beach.get_mut(above) = Arc::new(arc_above.site, arc_above.left, Some(left_bp));
        let middle = self.beach.insert_after(above, Arc::new(site, Some(left_bp), Some(right_bp)));
        let right = self.beach.insert_after(middle, Arc::new(arc_above.site, Some(right_bp), arc_above.right));

        self.check_circle_event(above);
        self.check_circle_event(right);
    }

    // The arc above belongs to a site on the sweep line, so it is still a
    // vertical ray of zero width. Splitting it would leave a phantom copy on
    // one side; the new arc goes next to it instead, and the edge between
    // them reaches up to the upper sweep bound.
    fn insert_beside(&mut self, above: ArcHandle, site: Site) -> bool {
        let arc = *self.beach.get(above);
        let to_left = site.x < arc.site.x;
        if (to_left && arc.left.is_some()) || (!to_left && arc.right.is_some()) {
            return false;
        }

        let (site1, site2) = if to_left { (site, arc.site) } else { (arc.site, site) };
        let start = Point::new(
            breakpoint_between(site1.point(), site2.point(), self.sweep_y),
            self.bounds.upper,
        );
        let edge = self.push_edge(OpenEdge::starting_at(site1, site2, start));
        let bp = self.breakpoints.insert(BreakPoint { site1, site2, edge });

        if to_left {
            self.beach.get_mut(above).left = Some(bp);
            self.beach.insert_before(above, Arc::new(site, None, Some(bp)));
        } else {
            self.beach.get_mut(above).right = Some(bp);
            self.beach.insert_after(above, Arc::new(site, Some(bp), None));
        }
        self.check_circle_event(above);
        true
    }

    fn handle_circle_event(&mut self, circle: CircleEvent) {
        let at = circle.arc;
        if !self.beach.contains(at) {
            warn!("circle event for an arc that left the beach line");
            return;
        }
        // This event is being consumed, it must not be cancelled later
        self.beach.get_mut(at).event = None;

        let arc = *self.beach.get(at);
        let (left_bp, right_bp) = match (arc.left, arc.right) {
            (Some(l), Some(r)) if self.breakpoints.contains(l) && self.breakpoints.contains(r) => (l, r),
            _ => {
                warn!(site = arc.site.id, "circle event for an arc without two breakpoints");
                return;
            }
        };
        self.stats.circle_events += 1;

        let left = self.beach.predecessor(at);
        let right = self.beach.successor(at);
        for neighbour in [left, right].into_iter().flatten() {
            self.cancel_circle_event(neighbour);
        }

        self.beach.delete(at);
        let left_bp = self.breakpoints.remove(left_bp);
        let right_bp = self.breakpoints.remove(right_bp);
        self.seal_edge(left_bp.edge, circle.center);
        self.seal_edge(right_bp.edge, circle.center);

        let (site1, site2) = (left_bp.site1, right_bp.site2);
        let edge = self.push_edge(OpenEdge::starting_at(site1, site2, circle.center));

        let (left, right) = match (left, right) {
            (Some(left), Some(right)) => (left, right),
            _ => return,
        };

        let bp = self.breakpoints.insert(BreakPoint { site1, site2, edge });
        self.beach.get_mut(left).right = Some(bp);
        self.beach.get_mut(right).left = Some(bp);

        self.check_circle_event(left);
        self.check_circle_event(right);
    }

    fn check_circle_event(&mut self, at: ArcHandle) {
        self.cancel_circle_event(at);

        let arc = *self.beach.get(at);
        let bp = |id: Option<usize>| id.and_then(|id| self.breakpoints.get(id)).copied();
        let (left, right) = match (bp(arc.left), bp(arc.right)) {
            (Some(left), Some(right)) => (left, right),
            _ => return,
        };

        // Only a clockwise triple squeezes the middle arc out
        if orientation(left.site1.point(), arc.site.point(), right.site2.point()) != Orientation::Clockwise {
            return;
        }

        let center = match left.ray().intersection(&right.ray()) {
            Some(center) => center,
            None => return,
        };
        let radius = arc.site.point().distance_to(center);
        let sweep = Point::new(center.x, center.y - radius);

        let handle = self.events.insert(Event::Circle(CircleEvent { arc: at, center, sweep }));
        self.beach.get_mut(at).event = Some(handle);
        self.stats.circle_events_scheduled += 1;
        trace!(site = arc.site.id, x = center.x, y = center.y, sweep = sweep.y, "scheduled circle event");
    }

    fn cancel_circle_event(&mut self, at: ArcHandle) {
        if let Some(handle) = self.beach.get_mut(at).event.take() {
            if self.events.remove(handle).is_some() {
                self.stats.circle_events_cancelled += 1;
                debug!(site = self.beach.get(at).site.id, "cancelled false circle event");
            }
        }
    }

    fn push_edge(&mut self, edge: OpenEdge) -> usize {
        self.edges.push(edge);
        self.edges.len() - 1
    }

    fn seal_edge(&mut self, edge: usize, at: Point) {
        if !self.edges[edge].seal(at) {
            warn!(edge, "edge already sealed at both ends");
        }
    }

    /// Verifies the beach line against the breakpoints and pending events.
    pub fn check_invariants(&self) -> Result<()> {
        let broken = |msg: String| Err(Error::BrokenInvariant(msg));

        if let Err(msg) = self.beach.validate() {
            return broken(msg);
        }

        let arcs: Vec<(ArcHandle, &Arc)> = self.beach.iter().collect();
        if let Some((_, first)) = arcs.first() {
            if first.left.is_some() {
                return broken(format!("leftmost arc of site {} has a left breakpoint", first.site.id));
            }
        }
        if let Some((_, last)) = arcs.last() {
            if last.right.is_some() {
                return broken(format!("rightmost arc of site {} has a right breakpoint", last.site.id));
            }
        }
        if arcs.len() != self.beach.len() {
            return broken(format!("iterated {} of {} arcs", arcs.len(), self.beach.len()));
        }
        let expected = if self.beach.is_empty() { 0 } else { arcs.len() - 1 };
        if self.breakpoints.len() != expected {
            return broken(format!("{} breakpoints for {} arcs", self.breakpoints.len(), arcs.len()));
        }

        for pair in arcs.windows(2) {
            let (left, right) = (pair[0].1, pair[1].1);
            let id = match (left.right, right.left) {
                (Some(a), Some(b)) if a == b => a,
                _ => return broken(format!("arcs of sites {} and {} do not share a breakpoint", left.site.id, right.site.id)),
            };
            let bp = match self.breakpoints.get(id) {
                Some(bp) => bp,
                None => return broken(format!("breakpoint {} is not active", id)),
            };
            if bp.site1.id != left.site.id || bp.site2.id != right.site.id {
                return broken(format!("breakpoint {} separates the wrong sites", id));
            }
            if self.edges[bp.edge].is_sealed() {
                return broken(format!("breakpoint {} traces a finished edge", id));
            }
            if !order::in_order(left, right, &self.breakpoints, self.sweep_y) {
                return broken(format!("arcs of sites {} and {} are out of order", left.site.id, right.site.id));
            }
        }

        for (at, arc) in arcs.iter() {
            if let Some(handle) = arc.event {
                match self.events.get(handle) {
                    Some(Event::Circle(circle)) if circle.arc == *at => {}
                    _ => return broken(format!("arc of site {} holds a stale circle event", arc.site.id)),
                }
            }
        }
        Ok(())
    }
}
