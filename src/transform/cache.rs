//! Per-facing geometry cache of transformable boxes
//!
//! For every facing the cache holds the axis-aligned strips that remain of the
//! box's flat side after cutting it by the tilted planes, and the tilted
//! render strips assigned to that facing. Caches live in a [`FaceCacheTable`]
//! keyed by [`BoxId`], never inside the box itself.

use std::collections::HashMap;

use glam::Vec3;

use crate::math::plane::{CUT_EPSILON, EPSILON};
use crate::math::{BoxCorner, Plane, Polygon, polygon};
use crate::model::{Axis, BoxId, Facing, TransformableBox};

/// Order in which tilted faces are built (east, west, up, down, south, north)
const BUILD_ORDER: [Facing; 6] = [
    Facing::East,
    Facing::West,
    Facing::Up,
    Facing::Down,
    Facing::South,
    Facing::North,
];

/// Tolerance used to compare an axis strip against the full face rectangle
const FULL_FACE_EPSILON: f32 = 1e-4;

/// Cut tolerance for DOWN axis strips; keeps strips lying just behind a plane
const DOWN_CUT_EPSILON: f32 = 1e-7;

/// Cached geometry for one facing of one box.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FacingCache {
    /// Remaining parts of the flat face on the box bound
    pub axis_strips: Vec<Polygon>,
    /// Tilted strips whose normal is nearest to this facing
    pub tilted_render: Vec<Polygon>,
    /// Tilted strips built from this facing's corners
    pub tilted_strip1: Option<Polygon>,
    pub tilted_strip2: Option<Polygon>,
    pub is_completely_filled: bool,
}

impl FacingCache {
    pub fn has_axis_strip(&self) -> bool {
        !self.axis_strips.is_empty()
    }

    pub fn has_tilted_strip(&self) -> bool {
        self.tilted_strip1.is_some() || self.tilted_strip2.is_some()
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot {
            axis_strip_count: self.axis_strips.len(),
            tilted_render_count: self.tilted_render.len(),
            has_axis_strip: self.has_axis_strip(),
            has_tilted_strip: self.has_tilted_strip(),
            is_completely_filled: self.is_completely_filled,
        }
    }
}

/// Metrics read from one facing's cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheSnapshot {
    pub axis_strip_count: usize,
    pub tilted_render_count: usize,
    pub has_axis_strip: bool,
    pub has_tilted_strip: bool,
    pub is_completely_filled: bool,
}

/// Cache for all six facings of a box, indexed by facing ordinal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoxFaceCache {
    faces: [FacingCache; 6],
}

/// Tilted geometry contributed by one facing's corner quad
#[derive(Default)]
struct TiltedSource {
    convex: bool,
    strip1: Option<Polygon>,
    strip2: Option<Polygon>,
    plane1: Option<Plane>,
    plane2: Option<Plane>,
}

impl TiltedSource {
    fn flat() -> Self {
        Self {
            convex: true,
            ..Default::default()
        }
    }

    /// Planes that cut the axis strips of other facings
    fn cut_planes(&self) -> (Option<Plane>, Option<Plane>) {
        match (&self.strip1, &self.strip2) {
            (None, None) => (self.plane1, self.plane2),
            (Some(_), Some(_)) => (self.plane1, self.plane2),
            _ if !self.convex => (self.plane1, self.plane2),
            (Some(_), None) => (self.plane1, None),
            (None, Some(_)) => (self.plane2, None),
        }
    }
}

impl BoxFaceCache {
    pub fn get(&self, facing: Facing) -> &FacingCache {
        &self.faces[facing.ordinal()]
    }

    /// Compute the cache of `tbox` from its corners.
    pub fn build(tbox: &TransformableBox) -> Self {
        let corners = tbox.tilted_corners();
        let base = tbox.base_corners();
        let bound_planes =
            Facing::ALL.map(|facing| Plane::for_facing(facing, tbox.bounds.face_origin(facing) as f32));

        let mut sources: [TiltedSource; 6] = std::array::from_fn(|_| TiltedSource::flat());
        let mut faces: [FacingCache; 6] = Default::default();

        for facing in BUILD_ORDER {
            let source = tilted_source(tbox, facing, &corners, &base, &bound_planes);
            if let (Some(strip), Some(plane)) = (&source.strip1, &source.plane1) {
                faces[Facing::nearest(plane.normal).ordinal()].tilted_render.push(strip.clone());
            }
            if let (Some(strip), Some(plane)) = (&source.strip2, &source.plane2) {
                faces[Facing::nearest(plane.normal).ordinal()].tilted_render.push(strip.clone());
            }
            sources[facing.ordinal()] = source;
        }

        for facing in Facing::ALL {
            let full = create_strip(&BoxCorner::face_corners(facing), &base);
            let mut strips: Vec<Polygon> = full.iter().cloned().collect();
            let epsilon = if facing == Facing::Down { DOWN_CUT_EPSILON } else { CUT_EPSILON };

            for source in &sources {
                if strips.is_empty() {
                    break;
                }
                let (cut1, cut2) = source.cut_planes();
                if source.convex {
                    for plane in [cut1, cut2].into_iter().flatten() {
                        strips = cut_single(strips, facing, &plane, epsilon);
                    }
                } else {
                    strips = cut_dual(strips, facing, cut1, cut2, epsilon);
                }
            }

            let source = &sources[facing.ordinal()];
            let cache = &mut faces[facing.ordinal()];
            cache.is_completely_filled = source.strip1.is_none()
                && source.strip2.is_none()
                && strips.len() == 1
                && full
                    .as_ref()
                    .is_some_and(|full| polygon::polygons_equal(&strips[0], full, FULL_FACE_EPSILON));
            cache.axis_strips = strips.into_iter().filter(|s| !polygon::is_degenerate(s)).collect();
            cache.tilted_render.retain(|s| !polygon::is_degenerate(s));
            cache.tilted_strip1 = source.strip1.clone();
            cache.tilted_strip2 = source.strip2.clone();
        }

        Self { faces }
    }
}

fn tilted_source(
    tbox: &TransformableBox,
    facing: Facing,
    corners: &[Vec3; 8],
    base: &[Vec3; 8],
    bound_planes: &[Plane; 6],
) -> TiltedSource {
    let quad = BoxCorner::face_corners(facing);
    let (tri_a, tri_b) = if tbox.flipped(facing) {
        ([quad[0], quad[1], quad[3]], [quad[1], quad[2], quad[3]])
    } else {
        ([quad[0], quad[1], quad[2]], [quad[0], quad[2], quad[3]])
    };

    let axis = facing.axis().index();
    let first_same = keeps_axis(corners, base, &tri_a, axis);
    let second_same = keeps_axis(corners, base, &tri_b, axis);
    if first_same && second_same {
        return TiltedSource::flat();
    }

    let normal_a = triangle_normal(corners, &tri_a).normalize_or_zero();
    let normal_b = triangle_normal(corners, &tri_b).normalize_or_zero();
    let usable_a = !first_same && !polygon::points_equal(normal_a, Vec3::ZERO, EPSILON);
    let usable_b = !second_same && !polygon::points_equal(normal_b, Vec3::ZERO, EPSILON);

    let mut source = TiltedSource::flat();
    if polygon::points_equal(normal_a, normal_b, EPSILON) {
        if usable_a {
            source.strip1 = create_strip(&quad, corners);
            source.plane1 = Plane::new(corners[tri_a[0].index()], normal_a);
        }
    } else {
        if usable_a {
            source.strip1 = create_strip(&tri_a, corners);
            source.plane1 = Plane::new(corners[tri_a[0].index()], normal_a);
        }
        if usable_b {
            source.strip2 = create_strip(&tri_b, corners);
            source.plane2 = Plane::new(corners[tri_b[0].index()], normal_b);
        }
    }

    if source.strip1.is_none() {
        source.plane1 = None;
    }
    if source.plane1.is_none() {
        source.strip1 = None;
    }
    if source.strip2.is_none() {
        source.plane2 = None;
    }
    if source.plane2.is_none() {
        source.strip2 = None;
    }

    if let (Some(plane1), Some(strip2)) = (&source.plane1, &source.strip2) {
        if source.strip1.is_some() && strip2.iter().any(|&p| plane1.is_in_front(p, EPSILON) == Some(true)) {
            source.convex = false;
        }
    }

    for plane in bound_planes {
        source.strip1 = source.strip1.and_then(|s| plane.clip(&s, CUT_EPSILON));
        source.strip2 = source.strip2.and_then(|s| plane.clip(&s, CUT_EPSILON));
    }
    source
}

/// All listed corners kept their coordinate along `axis`
fn keeps_axis(corners: &[Vec3; 8], base: &[Vec3; 8], keys: &[BoxCorner], axis: usize) -> bool {
    keys.iter()
        .all(|k| (corners[k.index()][axis] - base[k.index()][axis]).abs() <= EPSILON)
}

fn triangle_normal(corners: &[Vec3; 8], tri: &[BoxCorner; 3]) -> Vec3 {
    let a = corners[tri[0].index()];
    let b = corners[tri[1].index()];
    let c = corners[tri[2].index()];
    (b - a).cross(c - a)
}

/// Polygon through the given corners with coincident points merged
fn create_strip(keys: &[BoxCorner], corners: &[Vec3; 8]) -> Option<Polygon> {
    let mut out: Polygon = Vec::with_capacity(keys.len());
    for key in keys {
        let point = corners[key.index()];
        if !out.iter().any(|&p| polygon::points_equal(p, point, EPSILON)) {
            out.push(point);
        }
    }
    polygon::simplify(&out)
}

fn cut_single(strips: Vec<Polygon>, facing: Facing, plane: &Plane, epsilon: f32) -> Vec<Polygon> {
    if plane.is_facing(facing) {
        return strips;
    }
    strips
        .iter()
        .filter_map(|strip| plane.clip(strip, epsilon))
        .collect()
}

/// Cut by a non-convex pair of planes: keep what lies behind either plane.
///
/// Where the two clips overlap, the second clip is kept whole and the first
/// contributes only the fans left outside it.
fn cut_dual(
    strips: Vec<Polygon>,
    facing: Facing,
    plane1: Option<Plane>,
    plane2: Option<Plane>,
    epsilon: f32,
) -> Vec<Polygon> {
    let (plane1, plane2) = match (plane1, plane2) {
        (None, None) => return strips,
        (Some(plane), None) | (None, Some(plane)) => return cut_single(strips, facing, &plane, epsilon),
        (Some(a), Some(b)) => (a, b),
    };

    let (one, two) = (facing.one(), facing.two());
    // Face strips wind the other way once up/down faces are projected on (x, z)
    let inverse = facing.positive() != (facing.axis() == Axis::Y);
    let mut out = Vec::with_capacity(strips.len() * 2);
    for strip in &strips {
        match (plane1.clip(strip, epsilon), plane2.clip(strip, epsilon)) {
            (Some(cut1), Some(cut2)) if polygon::intersect_2d(&cut1, &cut2, one, two, inverse, 1e-3) => {
                let fans = polygon::cut_2d(&cut1, &cut2, one, two, inverse, false);
                out.push(cut2);
                out.extend(fans.into_iter().filter(|fan| fan.len() >= 3));
            }
            (cut1, cut2) => out.extend(cut1.into_iter().chain(cut2)),
        }
    }
    polygon::dedupe(out, FULL_FACE_EPSILON)
}

/// Memoized face caches of the transformable boxes of one tree.
#[derive(Clone, Debug, Default)]
pub struct FaceCacheTable {
    caches: HashMap<BoxId, BoxFaceCache>,
}

impl FaceCacheTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached entry, if one was built or inserted
    pub fn get(&self, id: BoxId) -> Option<&BoxFaceCache> {
        self.caches.get(&id)
    }

    /// Cached entry for `tbox`, building it on first request.
    pub fn request(&mut self, tbox: &TransformableBox) -> &BoxFaceCache {
        self.caches.entry(tbox.id).or_insert_with(|| {
            log::trace!("Building face cache for box {:?}", tbox.id);
            BoxFaceCache::build(tbox)
        })
    }

    /// Replace the entry for `id`. Later requests return it unchanged even if
    /// it no longer matches the box.
    pub fn insert(&mut self, id: BoxId, cache: BoxFaceCache) {
        self.caches.insert(id, cache);
    }

    pub fn len(&self) -> usize {
        self.caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }
}
