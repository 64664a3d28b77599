//! Planes in tile-grid space and convex polygon clipping

use glam::Vec3;

use crate::model::facing::Facing;

use super::polygon::{self, Polygon};

/// General tolerance for grid-space comparisons
pub const EPSILON: f32 = 5e-4;

/// Tolerance used when clipping tilted strips against the box bounds
pub const CUT_EPSILON: f32 = 5e-4;

/// A plane through `origin` with unit `normal`; "front" is the normal side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub origin: Vec3,
    pub normal: Vec3,
}

impl Plane {
    /// Returns `None` when `normal` cannot be normalized.
    pub fn new(origin: Vec3, normal: Vec3) -> Option<Self> {
        normal.try_normalize().map(|normal| Self { origin, normal })
    }

    /// Outward plane of a box side with the given face coordinate.
    pub fn for_facing(facing: Facing, face_origin: f32) -> Self {
        let mut origin = Vec3::ZERO;
        origin[facing.axis().index()] = face_origin;
        Self {
            origin,
            normal: facing.normal(),
        }
    }

    /// Signed distance from point to plane (positive = in front)
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point - self.origin)
    }

    /// `Some(true)` in front, `Some(false)` behind, `None` on the plane.
    pub fn is_in_front(&self, point: Vec3, epsilon: f32) -> Option<bool> {
        let value = self.distance_to_point(point);
        if value.abs() < epsilon {
            return None;
        }
        Some(value > 0.0)
    }

    /// Normal is (almost) exactly the normal of `facing`.
    pub fn is_facing(&self, facing: Facing) -> bool {
        let diff = (self.normal - facing.normal()).abs();
        diff.max_element() <= 2e-3
    }

    /// Point where the segment's line crosses the plane.
    pub fn intersect_segment(&self, start: Vec3, end: Vec3) -> Option<Vec3> {
        let dir = end - start;
        let len = dir.length();
        if len <= EPSILON {
            return None;
        }
        let unit = dir / len;
        let denom = self.normal.dot(unit);
        if denom.abs() <= EPSILON {
            return None;
        }
        let t = (self.normal.dot(self.origin) - self.normal.dot(start)) / denom;
        Some(start + unit * t)
    }

    /// Keep the part of `polygon` behind the plane.
    ///
    /// Points within `epsilon` of the plane count as kept. Returns `None` when
    /// nothing (or less than a triangle) remains.
    pub fn clip(&self, polygon: &[Vec3], epsilon: f32) -> Option<Polygon> {
        if polygon.len() < 3 {
            return None;
        }

        let keep: Vec<Option<bool>> = polygon
            .iter()
            .map(|p| self.is_in_front(*p, epsilon).map(|front| !front))
            .collect();

        let mut all_value = keep[0];
        let mut all_same = true;
        for &k in &keep[1..] {
            if all_value.is_none() {
                all_value = k;
            } else if k.is_some() && k != all_value {
                all_same = false;
                break;
            }
        }

        if all_same {
            return if all_value == Some(true) {
                Some(polygon.to_vec())
            } else {
                None
            };
        }

        let mut out = Vec::with_capacity(polygon.len() + 1);
        let mut before_keep = keep[keep.len() - 1];
        let mut before_vec = polygon[polygon.len() - 1];

        for (i, &vec) in polygon.iter().enumerate() {
            match (before_keep, keep[i]) {
                (Some(false), Some(true)) => {
                    if let Some(hit) = self.intersect_segment(vec, before_vec) {
                        out.push(hit);
                    }
                    out.push(vec);
                }
                (Some(true), Some(false)) => {
                    if let Some(hit) = self.intersect_segment(vec, before_vec) {
                        out.push(hit);
                    }
                }
                (_, None) | (_, Some(true)) => out.push(vec),
                _ => {}
            }
            before_keep = keep[i];
            before_vec = vec;
        }

        polygon::trim_collinear_ends(&mut out);
        if out.len() < 3 {
            return None;
        }
        Some(out)
    }
}
