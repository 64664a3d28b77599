//! Small polygon helpers for tilted-box strips
//!
//! Polygons are ordered vertex lists in grid space. Strips produced by the
//! tilted cache are convex, which the 2D containment test relies on.
//!
//! The `*_2d` operations work on the projection onto two axes of a face
//! plane. `inverse` flips which side of an edge counts as inside, so the same
//! code serves both windings of positive and negative facings.

use glam::{DVec2, DVec3, Vec3};

use super::plane::EPSILON;
use crate::model::facing::Axis;

pub type Polygon = Vec<Vec3>;

pub fn points_equal(a: Vec3, b: Vec3, epsilon: f32) -> bool {
    (a - b).abs().max_element() <= epsilon
}

/// Zero-area (or fewer than three vertices)
pub fn is_degenerate(poly: &[Vec3]) -> bool {
    if poly.len() < 3 {
        return true;
    }
    let origin = poly[0].as_dvec3();
    let mut normal = DVec3::ZERO;
    for pair in poly[1..].windows(2) {
        let a = pair[0].as_dvec3() - origin;
        let b = pair[1].as_dvec3() - origin;
        normal += a.cross(b);
    }
    normal.length_squared() < 1e-12
}

/// `between` lies on the line through `start` and `end`
fn is_point_between(start: Vec3, end: Vec3, between: Vec3, epsilon: f32) -> bool {
    let test = (end - start).cross(between - start);
    test.abs().element_sum() < epsilon
}

/// Drop a trailing or leading vertex that is collinear with its neighbours.
pub fn trim_collinear_ends(poly: &mut Polygon) {
    let n = poly.len();
    if n >= 3 && is_point_between(poly[n - 2], poly[0], poly[n - 1], EPSILON) {
        poly.pop();
    }
    let n = poly.len();
    if n >= 3 && is_point_between(poly[n - 1], poly[1], poly[0], EPSILON) {
        poly.remove(0);
    }
}

/// Remove repeated vertices and collinear ends; `None` if nothing renderable
/// is left.
pub fn simplify(poly: &[Vec3]) -> Option<Polygon> {
    if poly.len() < 3 {
        return None;
    }

    let mut out: Polygon = Vec::with_capacity(poly.len());
    for &point in poly {
        if out.last().is_none_or(|last| !points_equal(*last, point, EPSILON)) {
            out.push(point);
        }
    }
    if out.len() > 1 && points_equal(out[0], out[out.len() - 1], EPSILON) {
        out.pop();
    }
    trim_collinear_ends(&mut out);

    if out.len() < 3 || is_degenerate(&out) {
        return None;
    }
    Some(out)
}

/// Same vertex set, ignoring order.
pub fn polygons_equal(a: &[Vec3], b: &[Vec3], epsilon: f32) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .all(|p| b.iter().any(|q| points_equal(*p, *q, epsilon)))
}

pub fn dedupe(polys: Vec<Polygon>, epsilon: f32) -> Vec<Polygon> {
    let mut out: Vec<Polygon> = Vec::with_capacity(polys.len());
    for poly in polys {
        if !out.iter().any(|existing| polygons_equal(existing, &poly, epsilon)) {
            out.push(poly);
        }
    }
    out
}

/// Every vertex sits on the plane `axis = value`.
pub fn lies_on_axis_plane(poly: &[Vec3], axis: Axis, value: f32) -> bool {
    !poly.is_empty()
        && poly
            .iter()
            .all(|p| (p[axis.index()] - value).abs() <= EPSILON)
}

/// Point-in-convex-polygon test after projecting onto the `one`/`two` plane.
///
/// Works for either winding; points on an edge count as inside.
pub fn contains_2d(poly: &[Vec3], one: Axis, two: Axis, point: (f32, f32)) -> bool {
    if poly.len() < 3 {
        return false;
    }
    let (pu, pv) = point;
    let mut sign = 0.0f32;
    for (i, a) in poly.iter().enumerate() {
        let b = poly[(i + 1) % poly.len()];
        let (au, av) = (a[one.index()], a[two.index()]);
        let (bu, bv) = (b[one.index()], b[two.index()]);
        let cross = (bu - au) * (pv - av) - (bv - av) * (pu - au);
        if cross.abs() <= EPSILON {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}

fn project(point: Vec3, one: Axis, two: Axis) -> DVec2 {
    DVec2::new(f64::from(point[one.index()]), f64::from(point[two.index()]))
}

fn near(a: f64, b: f64, epsilon: f64) -> bool {
    a == b || (a - b).abs() < epsilon
}

/// Outcome of intersecting two directed lines
enum Crossing {
    /// Both lines run along each other
    Collinear,
    /// Parameter along the first line; `-1` for parallel lines that never meet
    At(f64),
}

/// Directed line from `origin` along `direction` in a face plane
#[derive(Clone, Copy, Debug)]
struct Ray2d {
    origin: DVec2,
    direction: DVec2,
}

impl Ray2d {
    fn new(start: DVec2, end: DVec2) -> Self {
        Self { origin: start, direction: end - start }
    }

    fn edge(start: Vec3, end: Vec3, one: Axis, two: Axis) -> Self {
        Self::new(project(start, one, two), project(end, one, two))
    }

    /// `Some(true)` right of the line, `Some(false)` left, `None` on it
    fn side(&self, point: DVec2) -> Option<bool> {
        let eps = f64::from(EPSILON);
        let rel = point - self.origin;
        let result = self.direction.x * rel.y - self.direction.y * rel.x;
        if result > -eps && result < eps {
            return None;
        }
        Some(result < 0.0)
    }

    fn contains(&self, point: DVec2) -> bool {
        let eps = f64::from(EPSILON);
        if self.direction.x.abs() <= eps {
            return near(self.origin.x, point.x, eps);
        }
        if self.direction.y.abs() <= eps {
            return near(self.origin.y, point.y, eps);
        }
        let along = self.origin.y + self.direction.y * (point.x - self.origin.x) / self.direction.x;
        near(along, point.y, eps)
    }

    /// Parameter along `self` where it meets `line`, `None` when parallel
    fn meet(&self, line: &Ray2d) -> Option<f64> {
        let denom = line.direction.x * self.direction.y - self.direction.x * line.direction.y;
        if denom.abs() <= f64::from(EPSILON) {
            return None;
        }
        let numer = (line.origin.y - self.origin.y) * line.direction.x + self.origin.x * line.direction.y
            - line.origin.x * line.direction.y;
        Some(numer / denom)
    }

    fn crossing(&self, line: &Ray2d) -> Crossing {
        match self.meet(line) {
            Some(t) => Crossing::At(t),
            None if self.contains(line.origin) => Crossing::Collinear,
            None => Crossing::At(-1.0),
        }
    }

    /// Parameters along `self` of both ends of a collinear `other`
    fn overlap(&self, other: &Ray2d) -> (f64, f64) {
        if self.direction.x.abs() <= f64::from(EPSILON) {
            (
                (other.origin.y - self.origin.y) / self.direction.y,
                (other.origin.y + other.direction.y - self.origin.y) / self.direction.y,
            )
        } else {
            (
                (other.origin.x - self.origin.x) / self.direction.x,
                (other.origin.x + other.direction.x - self.origin.x) / self.direction.x,
            )
        }
    }

    /// Point where the segment `start`..`end` meets this line, placed on the
    /// face plane at `third`.
    fn intersect_segment(&self, start: Vec3, end: Vec3, one: Axis, two: Axis, third: f32) -> Option<Vec3> {
        let t = self.meet(&Ray2d::edge(start, end, one, two))?;
        let hit = self.origin + self.direction * t;
        let mut point = Vec3::splat(third);
        point[one.index()] = hit.x as f32;
        point[two.index()] = hit.y as f32;
        Some(point)
    }
}

/// Consecutive vertex pairs, closing back to the first vertex
fn edges(poly: &[Vec3]) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
    poly.iter()
        .enumerate()
        .map(|(i, &start)| (start, poly[(i + 1) % poly.len()]))
}

fn equals_cyclic_2d(a: &[Vec3], b: &[Vec3], one: Axis, two: Axis) -> bool {
    let eps = f64::from(EPSILON);
    let same = |p: Vec3, q: Vec3| (project(p, one, two) - project(q, one, two)).abs().max_element() <= eps;
    if a.len() != b.len() || b.is_empty() {
        return false;
    }
    let Some(start) = a.iter().position(|&p| same(p, b[0])) else {
        return false;
    };
    b.iter()
        .enumerate()
        .skip(1)
        .all(|(i, &q)| same(a[(start + i) % a.len()], q))
}

/// Every vertex of `other` lies inside one fan triangle of `subject`
fn is_inside_2d(subject: &[Vec3], other: &[Vec3], one: Axis, two: Axis, inverse: bool) -> bool {
    let inside_of = |ray: Ray2d, point: DVec2| ray.side(point).is_none_or(|right| !right == inverse);
    other.iter().all(|&vertex| {
        let point = project(vertex, one, two);
        let first = subject[0];
        subject.windows(2).skip(1).any(|pair| {
            let (second, third) = (pair[0], pair[1]);
            inside_of(Ray2d::edge(first, second, one, two), point)
                && inside_of(Ray2d::edge(second, third, one, two), point)
                && inside_of(Ray2d::edge(third, first, one, two), point)
        })
    })
}

/// The projections of `a` and `b` overlap with positive area, or one holds
/// the other.
pub fn intersect_2d(a: &[Vec3], b: &[Vec3], one: Axis, two: Axis, inverse: bool, epsilon: f64) -> bool {
    if a.len() < 3 || b.len() < 3 {
        return false;
    }
    if equals_cyclic_2d(a, b, one, two) {
        return true;
    }

    let strictly_inner = |t: f64| t > epsilon && t < 1.0 - epsilon;
    let mut parallel = 0;
    for (start1, end1) in edges(a) {
        let ray1 = Ray2d::edge(start1, end1, one, two);
        let mut on_edge_low = false;
        let mut on_edge_high = false;
        let mut side_check = false;

        for (start2, end2) in edges(b) {
            let ray2 = Ray2d::edge(start2, end2, one, two);
            match (ray1.crossing(&ray2), ray2.crossing(&ray1)) {
                (Crossing::At(t), Crossing::At(other_t)) => {
                    if strictly_inner(t) && strictly_inner(other_t) {
                        return true;
                    }
                    if other_t > -epsilon && other_t < 1.0 + epsilon {
                        on_edge_low |= near(t, 0.0, epsilon);
                        on_edge_high |= near(t, 1.0, epsilon);
                    }
                    side_check |= on_edge_low && on_edge_high;
                }
                _ => {
                    let (start_t, end_t) = ray1.overlap(&ray2);
                    if strictly_inner(start_t) || strictly_inner(end_t) {
                        parallel += 1;
                        if parallel > 1 {
                            return true;
                        }
                    }
                }
            }
        }

        if side_check {
            let mut sides = b.iter().filter_map(|&v| ray1.side(project(v, one, two)));
            if let Some(first) = sides.next() {
                if sides.any(|side| side != first) {
                    return true;
                }
            }
        }
    }

    is_inside_2d(a, b, one, two, inverse) || is_inside_2d(b, a, one, two, inverse)
}

/// Split `poly` along `ray`. Returns the part on the inner side; the outer
/// part is pushed to `done` when given.
fn cut_by_ray_2d(
    poly: Polygon,
    ray: &Ray2d,
    one: Axis,
    two: Axis,
    done: Option<&mut Vec<Polygon>>,
    inverse: bool,
) -> Option<Polygon> {
    let sides: Vec<Option<bool>> = poly
        .iter()
        .map(|&p| ray.side(project(p, one, two)).map(|right| right != inverse))
        .collect();

    let mut known = sides.iter().flatten();
    let first = known.next().copied();
    let mixed = first.is_some_and(|first| known.any(|&side| side != first));
    if !mixed {
        match first {
            None => return None,
            Some(true) => return Some(poly),
            Some(false) => {
                if let Some(done) = done {
                    done.push(poly);
                }
                return None;
            }
        }
    }

    let third = one.third(two);
    let third_value = poly[0][third.index()];
    let mut left: Polygon = Vec::with_capacity(poly.len() + 1);
    let mut right: Polygon = Vec::with_capacity(poly.len() + 1);

    let mut before_side = sides[sides.len() - 1];
    let mut before = poly[poly.len() - 1];
    for (&vertex, &side) in poly.iter().zip(&sides) {
        if let (Some(now), Some(was)) = (side, before_side) {
            if now != was {
                if let Some(hit) = ray.intersect_segment(vertex, before, one, two, third_value) {
                    left.push(hit);
                    right.push(hit);
                }
            }
        }
        match side {
            Some(true) => right.push(vertex),
            Some(false) => left.push(vertex),
            None => {
                left.push(vertex);
                right.push(vertex);
            }
        }
        before_side = side;
        before = vertex;
    }

    if let (Some(left), Some(done)) = (simplify(&left), done) {
        done.push(left);
    }
    simplify(&right)
}

/// Cut `poly` by every edge of the convex `cutter`.
///
/// With `take_inner` the result is the part of `poly` inside `cutter`;
/// otherwise it is the fans of `poly` left outside it.
pub fn cut_2d(poly: &[Vec3], cutter: &[Vec3], one: Axis, two: Axis, inverse: bool, take_inner: bool) -> Vec<Polygon> {
    let mut done = Vec::new();
    let mut to_cut = poly.to_vec();
    for (start, end) in edges(cutter) {
        let ray = Ray2d::edge(start, end, one, two);
        let sink = if take_inner { None } else { Some(&mut done) };
        match cut_by_ray_2d(to_cut, &ray, one, two, sink, inverse) {
            Some(rest) => to_cut = rest,
            None => return done,
        }
    }
    if take_inner {
        done.push(to_cut);
    }
    done
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Polygon {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(2.0, 2.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        ]
    }

    #[test]
    fn test_degenerate() {
        assert!(!is_degenerate(&quad()));
        let line = vec![Vec3::ZERO, Vec3::X, Vec3::X * 2.0];
        assert!(is_degenerate(&line));
    }

    #[test]
    fn test_simplify_removes_duplicates() {
        let mut poly = quad();
        poly.insert(1, Vec3::ZERO);
        let simplified = simplify(&poly).unwrap();
        assert_eq!(simplified.len(), 4);
    }

    #[test]
    fn test_simplify_collapses_to_none() {
        let poly = vec![Vec3::ZERO, Vec3::ZERO, Vec3::X];
        assert!(simplify(&poly).is_none());
    }

    #[test]
    fn test_polygons_equal_ignores_rotation() {
        let mut rotated = quad();
        rotated.rotate_left(2);
        assert!(polygons_equal(&quad(), &rotated, 1e-4));
        assert!(!polygons_equal(&quad(), &quad()[..3], 1e-4));
    }

    #[test]
    fn test_dedupe() {
        let polys = vec![quad(), quad()];
        assert_eq!(dedupe(polys, 1e-4).len(), 1);
    }

    #[test]
    fn test_contains_2d_both_windings() {
        let poly = quad();
        let mut reversed = quad();
        reversed.reverse();
        for p in [&poly, &reversed] {
            assert!(contains_2d(p, Axis::X, Axis::Y, (1.0, 1.0)));
            assert!(contains_2d(p, Axis::X, Axis::Y, (2.0, 2.0)));
            assert!(!contains_2d(p, Axis::X, Axis::Y, (2.5, 1.0)));
        }
    }

    #[test]
    fn test_lies_on_axis_plane() {
        assert!(lies_on_axis_plane(&quad(), Axis::Z, 0.0));
        assert!(!lies_on_axis_plane(&quad(), Axis::X, 0.0));
    }

    /// Counter-clockwise rectangle on z = 0
    fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Polygon {
        vec![
            Vec3::new(x0, y0, 0.0),
            Vec3::new(x1, y0, 0.0),
            Vec3::new(x1, y1, 0.0),
            Vec3::new(x0, y1, 0.0),
        ]
    }

    fn area(poly: &[Vec3]) -> f32 {
        let twice: f32 = edges(poly).map(|(a, b)| a.x * b.y - b.x * a.y).sum();
        twice.abs() / 2.0
    }

    fn intersects(a: &[Vec3], b: &[Vec3]) -> bool {
        intersect_2d(a, b, Axis::X, Axis::Y, true, 1e-3)
    }

    #[test]
    fn test_intersect_2d() {
        let base = rect(0.0, 0.0, 4.0, 4.0);
        assert!(intersects(&base, &rect(2.0, 2.0, 6.0, 6.0)));
        assert!(intersects(&base, &base));
        assert!(intersects(&rect(0.0, 0.0, 8.0, 8.0), &rect(2.0, 2.0, 4.0, 4.0)));
        assert!(!intersects(&base, &rect(5.0, 0.0, 7.0, 4.0)));
        // sharing an edge is not an overlap
        assert!(!intersects(&base, &rect(4.0, 0.0, 8.0, 4.0)));
    }

    #[test]
    fn test_cut_2d_inner_part() {
        let inner = cut_2d(&rect(0.0, 0.0, 4.0, 4.0), &rect(2.0, 2.0, 6.0, 6.0), Axis::X, Axis::Y, true, true);
        assert_eq!(inner.len(), 1);
        assert!(polygons_equal(&inner[0], &rect(2.0, 2.0, 4.0, 4.0), 1e-4));
    }

    #[test]
    fn test_cut_2d_outer_fans() {
        let fans = cut_2d(&rect(0.0, 0.0, 4.0, 4.0), &rect(2.0, 2.0, 6.0, 6.0), Axis::X, Axis::Y, true, false);
        assert_eq!(fans.len(), 2);
        assert_eq!(fans.iter().map(|f| area(f)).sum::<f32>(), 12.0);
        assert!(fans.iter().flatten().all(|p| p.z == 0.0));
    }

    #[test]
    fn test_cut_2d_outside_cutter_is_untouched() {
        let poly = rect(0.0, 0.0, 2.0, 2.0);
        let fans = cut_2d(&poly, &rect(4.0, 4.0, 6.0, 6.0), Axis::X, Axis::Y, true, false);
        assert_eq!(fans, vec![poly]);
    }
}
