// Left-to-right order of the beach line. Every comparison takes the sweep
// position explicitly, since arc extents only make sense for a given sweep.

use std::cmp::Ordering;

use crate::arc::{Arc, BreakPoints};
use crate::geometry::EPSILON;

#[derive(Clone, Copy, Debug)]
pub enum BeachKey<'a> {
    Arc(&'a Arc),
    /// A bare x coordinate, used to find the arc above an incoming site.
    Query(f64),
}

/// Where `key` lies relative to `arc` on the sweep line `sweep_y`.
///
/// Arcs are ordered by the x of their left boundary (an arc without a left
/// breakpoint sits at negative infinity), then by their right boundary. A
/// query is `Equal` to the arc whose extent contains it.
pub fn compare(key: BeachKey<'_>, arc: &Arc, breakpoints: &BreakPoints, sweep_y: f64) -> Ordering {
    let (left, right) = arc.extent(breakpoints, sweep_y);
    match key {
        BeachKey::Query(x) => {
            if x < left {
                Ordering::Less
            } else if x > right {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        }
        BeachKey::Arc(other) => {
            let (other_left, other_right) = other.extent(breakpoints, sweep_y);
            other_left
                .total_cmp(&left)
                .then_with(|| other_right.total_cmp(&right))
        }
    }
}

// Arcs may only touch, not overlap. An arc about to vanish can have a
// slightly negative width, so extents are allowed to disagree by a rounding
// error relative to their magnitude.
pub fn in_order(a: &Arc, b: &Arc, breakpoints: &BreakPoints, sweep_y: f64) -> bool {
    if compare(BeachKey::Arc(a), b, breakpoints, sweep_y) == Ordering::Less {
        return true;
    }
    let (a_left, a_right) = a.extent(breakpoints, sweep_y);
    let (b_left, b_right) = b.extent(breakpoints, sweep_y);
    let slack = |x: f64, y: f64| EPSILON.sqrt() * (1.0 + x.abs().max(y.abs()));
    let left_ok = !(a_left.is_finite() && b_left.is_finite()) || a_left <= b_left + slack(a_left, b_left);
    let right_ok = !(a_right.is_finite() && b_right.is_finite()) || a_right <= b_right + slack(a_right, b_right);
    left_ok && right_ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arc::BreakPoint;
    use crate::Site;

    fn site(id: usize, x: f64, y: f64) -> Site {
        Site { id, x, y }
    }

    // C|A|C|B|C with C above A and B, as after two site events under C
    fn sample() -> (BreakPoints, Vec<Arc>) {
        let a = site(0, 0.0, 0.0);
        let b = site(1, 2.0, 0.0);
        let c = site(2, 1.0, 2.0);
        let mut bps = BreakPoints::new();
        let ca = bps.insert(BreakPoint { site1: c, site2: a, edge: 0 });
        let ac = bps.insert(BreakPoint { site1: a, site2: c, edge: 0 });
        let cb = bps.insert(BreakPoint { site1: c, site2: b, edge: 1 });
        let bc = bps.insert(BreakPoint { site1: b, site2: c, edge: 1 });
        let arcs = vec![
            Arc::new(c, None, Some(ca)),
            Arc::new(a, Some(ca), Some(ac)),
            Arc::new(c, Some(ac), Some(cb)),
            Arc::new(b, Some(cb), Some(bc)),
            Arc::new(c, Some(bc), None),
        ];
        (bps, arcs)
    }

    #[test]
    fn query_finds_containing_arc() {
        let (bps, arcs) = sample();
        let sweep = -0.25;
        let found: Vec<usize> = [-5.0, 0.0, 1.0, 2.0, 5.0]
            .iter()
            .map(|&x| {
                arcs.iter()
                    .position(|arc| compare(BeachKey::Query(x), arc, &bps, sweep) == Ordering::Equal)
                    .unwrap()
            })
            .collect();
        assert_eq!(found, vec![0, 1, 2, 3, 4]);
        assert_eq!(compare(BeachKey::Query(-5.0), &arcs[2], &bps, sweep), Ordering::Less);
        assert_eq!(compare(BeachKey::Query(5.0), &arcs[2], &bps, sweep), Ordering::Greater);
    }

    #[test]
    fn arcs_are_strictly_ordered() {
        let (bps, arcs) = sample();
        // The middle arc vanishes at -0.5
        for sweep in [-0.1, -0.25, -0.45] {
            for (i, a) in arcs.iter().enumerate() {
                for (j, b) in arcs.iter().enumerate() {
                    assert_eq!(compare(BeachKey::Arc(a), b, &bps, sweep), i.cmp(&j));
                }
            }
            for pair in arcs.windows(2) {
                assert!(in_order(&pair[0], &pair[1], &bps, sweep));
                assert!(!in_order(&pair[1], &pair[0], &bps, sweep));
            }
        }
    }
}
