//! Face classifier: footprint plus neighbour scan to a visibility state

use std::fmt;
use std::str::FromStr;

use crate::core::Error;
use crate::diagnostics::CacheDiagnostic;
use crate::model::{Facing, TileBox, TileRef};
use crate::transform::{FaceCacheTable, diagnose};

use super::footprint::{Footprint, is_outside_origin};
use super::scanner::{ScanCounters, scan_coverage};
use super::state::{FaceState, reason};

/// Which renderer's view of tilted geometry the classifier follows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GeometryMode {
    /// Tilted strips assigned to a facing by their normal count as that face
    #[default]
    Client,
    /// Only the axis footprint counts
    Server,
}

impl GeometryMode {
    pub fn id(self) -> &'static str {
        match self {
            GeometryMode::Client => "client",
            GeometryMode::Server => "server",
        }
    }
}

impl fmt::Display for GeometryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for GeometryMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "client" => Ok(GeometryMode::Client),
            "server" => Ok(GeometryMode::Server),
            _ => Err(Error::InvalidGeometryMode(s.to_string())),
        }
    }
}

/// Classification of one face of one box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceEvaluation {
    pub facing: Facing,
    pub state: FaceState,
    pub reason: &'static str,
    pub total_cells: usize,
    pub filled_cells: usize,
    /// Zero unless a coverage scan ran
    pub counters: ScanCounters,
    /// Present for every face of a transformable box
    pub cache: Option<CacheDiagnostic>,
}

impl FaceEvaluation {
    fn new(facing: Facing, state: FaceState, reason: &'static str, total_cells: usize) -> Self {
        Self {
            facing,
            state,
            reason,
            total_cells,
            filled_cells: 0,
            counters: ScanCounters::default(),
            cache: None,
        }
    }

    pub fn renderable(&self) -> bool {
        self.state.renderable()
    }

    pub fn is_outside(&self) -> bool {
        self.state.outside()
    }
}

/// Classify `facing` of `tile_box`, a box of `subject`, against every tile of
/// the tree.
///
/// Boundary faces always assume an air neighbour and are never scanned.
pub fn evaluate_face(
    subject: TileRef<'_>,
    tile_box: &TileBox,
    facing: Facing,
    tiles: &[TileRef<'_>],
    mode: GeometryMode,
    caches: &mut FaceCacheTable,
) -> FaceEvaluation {
    let grid = subject.group.grid;
    let cull = subject.tile.cull_over_edge;

    let cache = tile_box
        .as_transformable()
        .map(|tbox| diagnose(tbox, facing, grid, caches));

    let footprint = Footprint::generate(tile_box, facing, grid, caches);

    let mut evaluation = match footprint {
        None => match cache {
            Some(diagnostic) if mode == GeometryMode::Client && diagnostic.current.tilted_render_count > 0 => {
                let bounds = tile_box.bounds();
                let total = bounds.span(facing.one()) as usize * bounds.span(facing.two()) as usize;
                if is_outside_origin(bounds.face_origin(facing), grid) {
                    FaceEvaluation::new(facing, FaceState::OutsideUncovered, reason::outside(cull), total)
                } else {
                    FaceEvaluation::new(facing, FaceState::InsideUncovered, reason::INSIDE_UNCOVERED, total)
                }
            }
            _ => FaceEvaluation::new(facing, FaceState::Unloaded, reason::FACE_UNLOADED, 0),
        },
        Some(footprint) if footprint.is_outside() => FaceEvaluation::new(
            facing,
            FaceState::OutsideUncovered,
            reason::outside(cull),
            footprint.total_cells(),
        ),
        Some(mut footprint) => {
            let counters = scan_coverage(&mut footprint, subject.tile, tiles, caches);
            let (state, why) = if footprint.is_filled() {
                (FaceState::InsideCovered, reason::INSIDE_COVERED)
            } else if footprint.is_partially_filled() {
                (FaceState::InsidePartiallyCovered, reason::INSIDE_PARTIALLY_COVERED)
            } else {
                (FaceState::InsideUncovered, reason::INSIDE_UNCOVERED)
            };
            FaceEvaluation {
                filled_cells: footprint.filled_cells(),
                counters,
                ..FaceEvaluation::new(facing, state, why, footprint.total_cells())
            }
        }
    };

    log::trace!(
        "{} {} face {}: {} ({}/{})",
        subject.tile.block_state,
        tile_box.kind(),
        facing.name(),
        evaluation.state.name(),
        evaluation.filled_cells,
        evaluation.total_cells
    );

    evaluation.cache = cache;
    evaluation
}
