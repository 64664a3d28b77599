//! Decoding the transform payload of tilted boxes
//!
//! Layout after the six bounds ints: one indicator int followed by data words.
//! Indicator bits `0..24` mark which corner components carry an offset (corner
//! `i` uses bits `3i`, `3i+1`, `3i+2` for x, y, z); bits `24..30` are the
//! per-facing flip flags. Offsets are signed shorts packed two per word, high
//! half first.

use glam::Vec3;

use crate::math::BoxCorner;
use crate::model::{Facing, TransformableBox};

/// Bit offset of the first facing flip flag
const FLIP_BIT_BASE: usize = 24;

const ACTIVE_SHORT_MASK: i32 = 0x00FF_FFFF;

/// Decoded view of one transformable payload, for reports.
#[derive(Clone, Debug, PartialEq)]
pub struct PayloadDiagnostics {
    pub indicator: i32,
    pub flipped: [bool; 6],
    /// Ints after the bounds (indicator included)
    pub payload_int_count: usize,
    pub data_word_count: usize,
    pub active_short_count: u32,
    pub packed_short_capacity: usize,
    pub corners: [DecodedCorner; 8],
}

impl PayloadDiagnostics {
    /// More offsets announced than the data words can hold
    pub fn exceeds_capacity(&self) -> bool {
        self.active_short_count as usize > self.packed_short_capacity
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecodedCorner {
    pub corner: BoxCorner,
    pub base: glam::IVec3,
    pub transformed: Vec3,
}

impl DecodedCorner {
    pub fn delta(&self) -> Vec3 {
        self.transformed - self.base.as_vec3()
    }
}

impl TransformableBox {
    pub fn indicator(&self) -> i32 {
        self.data.first().copied().unwrap_or(0)
    }

    fn bit(&self, bit: usize) -> bool {
        (self.indicator() as u32 >> bit) & 1 == 1
    }

    /// Whether the face's quad is split along its other diagonal
    pub fn flipped(&self, facing: Facing) -> bool {
        self.bit(FLIP_BIT_BASE + facing.ordinal())
    }

    /// Signed short `index` of the packed data, 0 when out of range.
    pub fn data_short(&self, index: usize) -> i32 {
        let word_index = (index >> 1) + 1;
        let Some(&word) = self.data.get(word_index) else {
            return 0;
        };
        let half = if index & 1 == 1 {
            word as u32 & 0xFFFF
        } else {
            (word as u32 >> 16) & 0xFFFF
        };
        half as u16 as i16 as i32
    }

    /// Corner positions after applying the encoded offsets, in grid units.
    pub fn tilted_corners(&self) -> [Vec3; 8] {
        let mut out = [Vec3::ZERO; 8];
        let mut active = 0;
        for corner in BoxCorner::ALL {
            let mut offset = Vec3::ZERO;
            for component in 0..3 {
                if self.bit(corner.index() * 3 + component) {
                    offset[component] = self.data_short(active) as f32;
                    active += 1;
                }
            }
            // Shorts are exact in f32, so no integer overflow on extreme bounds
            out[corner.index()] = self.bounds.corner(corner).as_vec3() + offset;
        }
        out
    }

    pub fn base_corners(&self) -> [Vec3; 8] {
        BoxCorner::ALL.map(|corner| self.bounds.corner(corner).as_vec3())
    }

    pub fn payload_diagnostics(&self) -> PayloadDiagnostics {
        let indicator = self.indicator();
        let payload_int_count = self.data.len();
        let data_word_count = payload_int_count.saturating_sub(1);
        let tilted = self.tilted_corners();

        let diagnostics = PayloadDiagnostics {
            indicator,
            flipped: Facing::ALL.map(|facing| self.flipped(facing)),
            payload_int_count,
            data_word_count,
            active_short_count: (indicator & ACTIVE_SHORT_MASK).count_ones(),
            packed_short_capacity: data_word_count * 2,
            corners: BoxCorner::ALL.map(|corner| DecodedCorner {
                corner,
                base: self.bounds.corner(corner),
                transformed: tilted[corner.index()],
            }),
        };

        if diagnostics.exceeds_capacity() {
            log::warn!(
                "Transformable box {:?}: indicator announces {} shorts but payload holds {}",
                self.id,
                diagnostics.active_short_count,
                diagnostics.packed_short_capacity
            );
        }
        diagnostics
    }
}

/// `0x%08X` formatting of the indicator's bit pattern
pub fn indicator_hex(indicator: i32) -> String {
    format!("0x{:08X}", indicator as u32)
}

/// Indicator as a 32 character binary string
pub fn indicator_bits(indicator: i32) -> String {
    format!("{:032b}", indicator as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::GridBox;
    use crate::model::BoxId;

    fn tbox(bounds: [i32; 6], data: Vec<i32>) -> TransformableBox {
        TransformableBox {
            id: BoxId(0),
            bounds: GridBox::from_array(&bounds),
            data,
        }
    }

    #[test]
    fn test_data_short_halves_and_sign() {
        let b = tbox([0, 0, 0, 8, 8, 8], vec![-1, 0x0003_FFFE]);
        assert_eq!(b.data_short(0), 3);
        assert_eq!(b.data_short(1), -2);
        assert_eq!(b.data_short(2), 0);
    }

    #[test]
    fn test_flip_bits() {
        // sign bit keeps the indicator negative; bit 24 + 1 flips UP
        let indicator = (1u32 << 31 | 1 << 25) as i32;
        let b = tbox([0, 0, 0, 8, 8, 8], vec![indicator]);
        assert!(b.flipped(Facing::Up));
        assert!(!b.flipped(Facing::Down));
        assert!(!b.flipped(Facing::East));
    }

    #[test]
    fn test_tilted_corners_apply_offsets() {
        // EUN (corner 0) moves by y = -4; EUS (corner 1) moves by x = -2
        let indicator = (1u32 << 31 | 1 << 1 | 1 << 3) as i32;
        let word = ((-4i32 as u32 & 0xFFFF) << 16 | (-2i32 as u32 & 0xFFFF)) as i32;
        let b = tbox([0, 0, 0, 8, 8, 8], vec![indicator, word]);

        let corners = b.tilted_corners();
        assert_eq!(corners[BoxCorner::Eun.index()], Vec3::new(8.0, 4.0, 0.0));
        assert_eq!(corners[BoxCorner::Eus.index()], Vec3::new(6.0, 8.0, 8.0));
        assert_eq!(corners[BoxCorner::Wds.index()], Vec3::new(0.0, 0.0, 8.0));
    }

    #[test]
    fn test_payload_capacity() {
        // three active shorts, one data word (capacity 2)
        let indicator = (1u32 << 31 | 0b111) as i32;
        let b = tbox([0, 0, 0, 8, 8, 8], vec![indicator, 0]);
        let d = b.payload_diagnostics();
        assert_eq!(d.payload_int_count, 2);
        assert_eq!(d.data_word_count, 1);
        assert_eq!(d.active_short_count, 3);
        assert_eq!(d.packed_short_capacity, 2);
        assert!(d.exceeds_capacity());
    }

    #[test]
    fn test_indicator_formatting() {
        assert_eq!(indicator_hex(-1), "0xFFFFFFFF");
        assert_eq!(indicator_hex(-16777216), "0xFF000000");
        assert_eq!(indicator_bits(5), format!("{}101", "0".repeat(29)));
    }

    #[test]
    fn test_corner_delta() {
        let indicator = (1u32 << 31 | 1) as i32;
        let b = tbox([0, 0, 0, 8, 8, 8], vec![indicator, ((-3i32 as u32) << 16) as i32]);
        let d = b.payload_diagnostics();
        assert_eq!(d.corners[0].delta(), Vec3::new(-3.0, 0.0, 0.0));
    }
}
