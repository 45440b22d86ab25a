use std::ops::{Add, Mul, Sub};

pub const EPSILON: f64 = 1.0e-9;

/// Whether `a` and `b` agree up to `EPSILON` relative to `scale`, the size
/// of the geometry the two values come from.
pub fn equals_with_epsilon(a: f64, b: f64, scale: f64) -> bool {
    (a - b).abs() <= EPSILON * scale
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (*self - other).length()
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn cross(&self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Point {
        Point::new(x, y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
    Collinear,
}

/// Which way the path `a -> b -> c` turns. The cross product is compared
/// against the lengths of the two legs, so the answer does not depend on the
/// scale of the input.
pub fn orientation(a: Point, b: Point, c: Point) -> Orientation {
    let (ab, ac) = (b - a, c - a);
    let cross = ab.cross(ac);
    if cross.abs() <= EPSILON * ab.length() * ac.length() {
        Orientation::Collinear
    } else if cross < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// The perpendicular bisector of two sites, as a point and a direction.
///
/// The direction is the way the breakpoint with `left` on its left side
/// and `right` on its right side travels while the sweep line descends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point,
    pub direction: Point,
}

impl Ray {
    pub fn bisector(left: Point, right: Point) -> Ray {
        Ray {
            origin: left.midpoint(right),
            direction: Point::new(right.y - left.y, left.x - right.x),
        }
    }

    pub fn at(&self, t: f64) -> Point {
        self.origin + self.direction * t
    }

    // Intersects the supporting lines; `None` when they are parallel.
    pub fn intersection(&self, other: &Ray) -> Option<Point> {
        let denom = self.direction.cross(other.direction);
        let scale = self.direction.length() * other.direction.length();
        if denom.abs() <= EPSILON * scale {
            return None;
        }
        let t = (other.origin - self.origin).cross(other.direction) / denom;
        let p = self.at(t);
        if p.is_finite() { Some(p) } else { None }
    }
}

/// Height of the parabola with the given focus and directrix at `x`.
pub fn parabola_y(focus: Point, directrix: f64, x: f64) -> f64 {
    let dx = x - focus.x;
    let h = focus.y - directrix;
    directrix + (dx * dx + h * h) / (2.0 * h)
}

// Returns the x coordinate of the intersection of two beach segments
//
//                                 *                .
//                                 f2             ..
//    .                                        ...
//     .       f1        .*..             .....
//      ..      *      .. |  .............
//        ....     ....   |
//            .....       |
//                        |
// -----------------------X--------------------------- directrix
//
// `left` is the site whose arc lies left of the breakpoint.
pub fn breakpoint_between(left: Point, right: Point, directrix: f64) -> f64 {
    // Coordinates relative to `left` and the directrix
    let dx = right.x - left.x;
    let h1 = left.y - directrix;
    let h2 = right.y - directrix;
    let scale = dx.abs().max(h1.abs()).max(h2.abs());

    if equals_with_epsilon(h1, h2, dx.abs()) {
        // Parabolas are horizontal translates of each other
        return left.x + dx / 2.0;
    }
    if equals_with_epsilon(h1, 0.0, scale) {
        return left.x;
    }
    if equals_with_epsilon(h2, 0.0, scale) {
        return right.x;
    }

    // 2 h1 h2 (f_left(u) - f_right(u)) = a u^2 + b u + c with u = x - left.x,
    // and the breakpoint is the root where the difference turns from
    // negative to positive.
    let a = h2 - h1;
    let b = 2.0 * dx * h1;
    let c = h1 * h2 * (h1 - h2) - dx * dx * h1;
    let sqrt = (b * b - 4.0 * a * c).max(0.0).sqrt();

    let u = if b > 0.0 {
        2.0 * c / (-b - sqrt)
    } else {
        (-b + sqrt) / (2.0 * a)
    };
    left.x + u
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn orientation_of_triangle() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 2.0);
        let c = Point::new(2.0, 0.0);
        assert_eq!(orientation(a, b, c), Orientation::Clockwise);
        assert_eq!(orientation(c, b, a), Orientation::CounterClockwise);
        assert_eq!(
            orientation(a, Point::new(1.0, 1.0), Point::new(3.0, 3.0)),
            Orientation::Collinear
        );
    }

    #[test]
    fn bisectors_meet_at_circumcenter() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(2.0, 0.0);
        let c = Point::new(1.0, 2.0);
        let center = Ray::bisector(c, a).intersection(&Ray::bisector(c, b)).unwrap();
        assert!(close(center.x, 1.0));
        assert!(close(center.y, 0.75));
    }

    #[test]
    fn parallel_bisectors_do_not_meet() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        let c = Point::new(2.0, 0.0);
        assert_eq!(Ray::bisector(a, b).intersection(&Ray::bisector(b, c)), None);
    }

    #[test]
    fn breakpoint_is_equidistant() {
        let left = Point::new(0.0, 1.0);
        let right = Point::new(2.0, 0.0);
        let directrix = -1.0;
        let x = breakpoint_between(left, right, directrix);
        let y = parabola_y(left, directrix, x);
        let p = Point::new(x, y);
        assert!(close(p.distance_to(left), p.distance_to(right)));
        assert!(close(p.distance_to(left), y - directrix));

        // Swapping the sides picks the other intersection
        let other = breakpoint_between(right, left, directrix);
        assert!(other > x);
        let q = Point::new(other, parabola_y(left, directrix, other));
        assert!((q.distance_to(left) - q.distance_to(right)).abs() < 1e-6);
    }

    #[test]
    fn degenerate_breakpoints() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(2.0, 0.0);
        assert!(close(breakpoint_between(a, b, -3.0), 1.0));
        let high = Point::new(0.0, 5.0);
        assert!(close(breakpoint_between(high, b, 0.0), 2.0));
        assert!(close(breakpoint_between(b, high, 0.0), 2.0));
    }

    #[test]
    fn orientation_ignores_scale() {
        for scale in [1e-8, 1e-5, 1.0, 1e6] {
            let a = Point::new(0.0, 0.0);
            let b = Point::new(scale, 2.0 * scale);
            let c = Point::new(2.0 * scale, 0.0);
            assert_eq!(orientation(a, b, c), Orientation::Clockwise, "scale {}", scale);
            assert_eq!(orientation(c, b, a), Orientation::CounterClockwise, "scale {}", scale);

            let center = Ray::bisector(b, a).intersection(&Ray::bisector(b, c)).unwrap();
            assert!((center.x - scale).abs() <= 1e-12 * scale);
            assert!((center.y - 0.75 * scale).abs() <= 1e-12 * scale);
        }
    }

    #[test]
    fn breakpoint_far_from_origin() {
        let offset = Point::new(1e7, 1e7);
        let left = Point::new(0.0, 1.0);
        let right = Point::new(2.0, 0.0);
        let near = breakpoint_between(left, right, -1.0);
        let far = breakpoint_between(left + offset, right + offset, -1.0 + offset.y);
        assert!((near - (4.0 - 10f64.sqrt())).abs() < 1e-12);
        assert!((far - offset.x - near).abs() < 1e-8);

        let y = parabola_y(left + offset, -1.0 + offset.y, far);
        assert!((y - offset.y - parabola_y(left, -1.0, near)).abs() < 1e-8);
    }

    #[test]
    fn ray_direction_follows_descending_sweep() {
        let ray = Ray::bisector(Point::new(0.0, 0.0), Point::new(2.0, 0.0));
        assert!(ray.direction.y < 0.0);
        assert_eq!(ray.at(0.0), Point::new(1.0, 0.0));
    }
}
