//! Per-tile collision attributes.
//!
//! [`TileAttribute`] keeps the bit layout of the attribute tables written by
//! the level editor, one `u32` per tile. Call sites never test raw bits;
//! they classify the attribute into a [`TileKind`] and match on that, and
//! slope geometry comes from the [`SlopeVariant`] table.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::numeric::tile_origin;
use crate::{SLOPE_GRADIENT, TILE_SIZE};

/// Collision attribute bitmask of a single tile.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileAttribute(u32);

impl TileAttribute {
    /// Nothing to collide with.
    pub const EMPTY: Self = Self(0);
    /// Solid on every side.
    pub const BLOCK: Self = Self(1 << 0);
    /// Diagonal surface; combined with the shape bits below.
    pub const SLOPE: Self = Self(1 << 1);
    /// Slope surface descends to the right.
    pub const POSITIVE: Self = Self(1 << 2);
    /// Slope surface ascends to the right.
    pub const NEGATIVE: Self = Self(1 << 3);
    /// Slope collides with bodies landing from above.
    pub const FLOOR: Self = Self(1 << 4);
    /// Slope collides with bodies rising from below.
    pub const CEILING: Self = Self(1 << 5);
    /// Slope occupies the lesser half of its tile.
    pub const SHORT: Self = Self(1 << 6);
    /// Slope occupies the greater half of its tile.
    pub const TALL: Self = Self(1 << 7);
    /// Damages bodies touching it.
    pub const HARMFUL: Self = Self(1 << 8);
    /// Marks the edge of the playable world.
    pub const OUT_OF_BOUNDS: Self = Self(1 << 9);
    /// Block that is only solid when landed on from above.
    pub const ONE_WAY: Self = Self(1 << 10);
    /// Valid attachment point for grapple rays.
    pub const HOOKED: Self = Self(1 << 11);

    const ALL_BITS: u32 = (1 << 12) - 1;

    /// Raw bits as stored in the attribute table.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Builds an attribute from raw bits, rejecting bits outside the layout.
    ///
    /// # Examples
    /// ```
    /// use tilebound::TileAttribute;
    /// assert_eq!(TileAttribute::from_bits(0x401), Some(TileAttribute::BLOCK | TileAttribute::ONE_WAY));
    /// assert_eq!(TileAttribute::from_bits(1 << 20), None);
    /// ```
    #[must_use]
    pub const fn from_bits(bits: u32) -> Option<Self> {
        if bits & !Self::ALL_BITS == 0 {
            Some(Self(bits))
        } else {
            None
        }
    }

    /// Builds an attribute from raw bits, dropping unknown bits.
    #[must_use]
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & Self::ALL_BITS)
    }

    /// Bits set in either attribute, usable in constants.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// True when every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when any bit of `other` is set.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// True for the empty attribute.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when the tile hurts bodies touching it.
    #[must_use]
    pub const fn is_harmful(self) -> bool {
        self.contains(Self::HARMFUL)
    }

    /// True when grapple rays lock onto this tile.
    #[must_use]
    pub const fn is_hooked(self) -> bool {
        self.contains(Self::HOOKED)
    }

    /// The slope shape encoded by this attribute, if any.
    #[must_use]
    pub fn slope(self) -> Option<SlopeVariant> {
        SlopeVariant::from_attribute(self)
    }

    /// Classifies the attribute for collision and ray queries.
    ///
    /// Out-of-bounds wins over everything, then blocks (one-way blocks
    /// become [`TileKind::OneWay`]), then recognised slope shapes. Anything
    /// else, including purely harmful tiles, is passable.
    #[must_use]
    pub fn kind(self) -> TileKind {
        if self.contains(Self::OUT_OF_BOUNDS) {
            TileKind::OutOfBounds
        } else if self.contains(Self::BLOCK) {
            if self.contains(Self::ONE_WAY) {
                TileKind::OneWay
            } else {
                TileKind::Solid {
                    hooked: self.is_hooked(),
                }
            }
        } else if let Some(variant) = self.slope() {
            TileKind::Slope(variant)
        } else {
            TileKind::Empty
        }
    }
}

impl BitOr for TileAttribute {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for TileAttribute {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for TileAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TileAttribute({:#06x})", self.0)
    }
}

/// Closed classification of a tile used by every collision call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Passable.
    Empty,
    /// Solid block.
    Solid {
        /// Grapple rays lock onto the tile center.
        hooked: bool,
    },
    /// Platform solid only when landed on from above.
    OneWay,
    /// Diagonal surface.
    Slope(SlopeVariant),
    /// Edge of the playable world.
    OutOfBounds,
}

/// Which approach a slope surface faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlopeOrientation {
    /// Walkable surface, hit while moving down.
    Floor,
    /// Overhead surface, hit while moving up.
    Ceiling,
}

/// Direction of the slope surface in screen space (Y down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlopeSign {
    /// Surface Y grows to the right.
    Positive,
    /// Surface Y shrinks to the right.
    Negative,
}

/// Which half of the tile the surface spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlopeHeight {
    /// The half nearer the open side.
    Short,
    /// The half nearer the solid side.
    Tall,
}

/// The eight slope shapes.
///
/// Two tiles of the same sign and orientation, one `Tall` and one `Short`,
/// make a continuous 1:2 ramp across two tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlopeVariant {
    /// Shape 1: floor from the tile top at the left to mid height at the right.
    PositiveFloorTall,
    /// Shape 2: floor from mid height at the left to the tile bottom at the right.
    PositiveFloorShort,
    /// Shape 3: floor from the tile bottom at the left to mid height at the right.
    NegativeFloorShort,
    /// Shape 4: floor from mid height at the left to the tile top at the right.
    NegativeFloorTall,
    /// Shape 5: ceiling from the tile bottom at the left to mid height at the right.
    NegativeCeilingTall,
    /// Shape 6: ceiling from mid height at the left to the tile top at the right.
    NegativeCeilingShort,
    /// Shape 7: ceiling from the tile top at the left to mid height at the right.
    PositiveCeilingShort,
    /// Shape 8: ceiling from mid height at the left to the tile bottom at the right.
    PositiveCeilingTall,
}

impl SlopeVariant {
    /// Every shape, in editor numbering order.
    pub const ALL: [Self; 8] = [
        Self::PositiveFloorTall,
        Self::PositiveFloorShort,
        Self::NegativeFloorShort,
        Self::NegativeFloorTall,
        Self::NegativeCeilingTall,
        Self::NegativeCeilingShort,
        Self::PositiveCeilingShort,
        Self::PositiveCeilingTall,
    ];

    /// Orientation, sign and height class of the shape.
    #[must_use]
    pub const fn profile(self) -> (SlopeOrientation, SlopeSign, SlopeHeight) {
        use SlopeHeight::{Short, Tall};
        use SlopeOrientation::{Ceiling, Floor};
        use SlopeSign::{Negative, Positive};
        match self {
            Self::PositiveFloorTall => (Floor, Positive, Tall),
            Self::PositiveFloorShort => (Floor, Positive, Short),
            Self::NegativeFloorShort => (Floor, Negative, Short),
            Self::NegativeFloorTall => (Floor, Negative, Tall),
            Self::NegativeCeilingTall => (Ceiling, Negative, Tall),
            Self::NegativeCeilingShort => (Ceiling, Negative, Short),
            Self::PositiveCeilingShort => (Ceiling, Positive, Short),
            Self::PositiveCeilingTall => (Ceiling, Positive, Tall),
        }
    }

    /// Editor number of the shape, `1..=8`.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::PositiveFloorTall => 1,
            Self::PositiveFloorShort => 2,
            Self::NegativeFloorShort => 3,
            Self::NegativeFloorTall => 4,
            Self::NegativeCeilingTall => 5,
            Self::NegativeCeilingShort => 6,
            Self::PositiveCeilingShort => 7,
            Self::PositiveCeilingTall => 8,
        }
    }

    /// Shape for an editor number, `1..=8`.
    #[must_use]
    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|variant| variant.number() == number)
    }

    /// Orientation of the surface.
    #[must_use]
    pub const fn orientation(self) -> SlopeOrientation {
        self.profile().0
    }

    /// Sign of the surface.
    #[must_use]
    pub const fn sign(self) -> SlopeSign {
        self.profile().1
    }

    /// Height class of the surface.
    #[must_use]
    pub const fn height(self) -> SlopeHeight {
        self.profile().2
    }

    /// Full attribute bits of the shape.
    #[must_use]
    pub const fn attribute(self) -> TileAttribute {
        let (orientation, sign, height) = self.profile();
        let orientation = match orientation {
            SlopeOrientation::Floor => TileAttribute::FLOOR,
            SlopeOrientation::Ceiling => TileAttribute::CEILING,
        };
        let sign = match sign {
            SlopeSign::Positive => TileAttribute::POSITIVE,
            SlopeSign::Negative => TileAttribute::NEGATIVE,
        };
        let height = match height {
            SlopeHeight::Short => TileAttribute::SHORT,
            SlopeHeight::Tall => TileAttribute::TALL,
        };
        TileAttribute(TileAttribute::SLOPE.0 | orientation.0 | sign.0 | height.0)
    }

    /// Recovers the shape from an attribute, ignoring unrelated bits such as
    /// `HARMFUL` or `HOOKED`.
    #[must_use]
    pub fn from_attribute(attribute: TileAttribute) -> Option<Self> {
        if !attribute.contains(TileAttribute::SLOPE) {
            return None;
        }
        let shape = TileAttribute::SLOPE
            | TileAttribute::POSITIVE
            | TileAttribute::NEGATIVE
            | TileAttribute::FLOOR
            | TileAttribute::CEILING
            | TileAttribute::SHORT
            | TileAttribute::TALL;
        let bits = attribute.bits() & shape.bits();
        Self::ALL
            .into_iter()
            .find(|variant| variant.attribute().bits() == bits)
    }

    /// Surface Y change per world unit moved right.
    #[must_use]
    pub const fn gradient(self) -> f32 {
        match self.sign() {
            SlopeSign::Positive => SLOPE_GRADIENT,
            SlopeSign::Negative => -SLOPE_GRADIENT,
        }
    }

    /// Surface offset below the tile top at the tile's left edge.
    #[must_use]
    pub const fn baseline(self) -> f32 {
        match self.profile() {
            (SlopeOrientation::Floor, SlopeSign::Positive, SlopeHeight::Tall)
            | (SlopeOrientation::Ceiling, SlopeSign::Positive, SlopeHeight::Short) => 0.0,
            (SlopeOrientation::Floor, SlopeSign::Negative, SlopeHeight::Short)
            | (SlopeOrientation::Ceiling, SlopeSign::Negative, SlopeHeight::Tall) => TILE_SIZE,
            _ => TILE_SIZE / 2.0,
        }
    }

    /// Surface offset below the tile top at `dx` world units right of the
    /// tile's left edge.
    ///
    /// # Examples
    /// ```
    /// use tilebound::SlopeVariant;
    /// let ramp = SlopeVariant::PositiveFloorTall;
    /// assert!(ramp.surface_offset(0.0).abs() < f32::EPSILON);
    /// assert!((ramp.surface_offset(16.0) - 8.0).abs() < f32::EPSILON);
    /// ```
    #[must_use]
    pub fn surface_offset(self, dx: f32) -> f32 {
        self.gradient() * dx + self.baseline()
    }

    /// World-space surface segment of the shape in tile `(x, y)`, from the
    /// tile's left edge to its right edge.
    #[must_use]
    pub fn chord(self, x: i32, y: i32) -> (Vec2, Vec2) {
        let left = tile_origin(x);
        let top = tile_origin(y);
        (
            Vec2::new(left, top + self.surface_offset(0.0)),
            Vec2::new(left + TILE_SIZE, top + self.surface_offset(TILE_SIZE)),
        )
    }
}

impl From<SlopeVariant> for TileAttribute {
    fn from(variant: SlopeVariant) -> Self {
        variant.attribute()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SlopeVariant::PositiveFloorTall, 0x96)]
    #[case(SlopeVariant::PositiveFloorShort, 0x56)]
    #[case(SlopeVariant::NegativeFloorShort, 0x5a)]
    #[case(SlopeVariant::NegativeFloorTall, 0x9a)]
    #[case(SlopeVariant::NegativeCeilingTall, 0xaa)]
    #[case(SlopeVariant::NegativeCeilingShort, 0x6a)]
    #[case(SlopeVariant::PositiveCeilingShort, 0x66)]
    #[case(SlopeVariant::PositiveCeilingTall, 0xa6)]
    fn variants_keep_editor_bit_layout(#[case] variant: SlopeVariant, #[case] bits: u32) {
        assert_eq!(variant.attribute().bits(), bits);
        assert_eq!(TileAttribute::from_bits(bits).and_then(TileAttribute::slope), Some(variant));
        assert_eq!(SlopeVariant::from_number(variant.number()), Some(variant));
    }

    #[rstest]
    #[case(SlopeVariant::PositiveFloorTall, 0.0, 8.0)]
    #[case(SlopeVariant::PositiveFloorShort, 8.0, 16.0)]
    #[case(SlopeVariant::NegativeFloorShort, 16.0, 8.0)]
    #[case(SlopeVariant::NegativeFloorTall, 8.0, 0.0)]
    #[case(SlopeVariant::NegativeCeilingTall, 16.0, 8.0)]
    #[case(SlopeVariant::NegativeCeilingShort, 8.0, 0.0)]
    #[case(SlopeVariant::PositiveCeilingShort, 0.0, 8.0)]
    #[case(SlopeVariant::PositiveCeilingTall, 8.0, 16.0)]
    fn surface_spans_half_a_tile(#[case] variant: SlopeVariant, #[case] left: f32, #[case] right: f32) {
        assert!((variant.surface_offset(0.0) - left).abs() < f32::EPSILON);
        assert!((variant.surface_offset(TILE_SIZE) - right).abs() < f32::EPSILON);
        let (a, b) = variant.chord(2, 3);
        assert_eq!(a, Vec2::new(32.0, 48.0 + left));
        assert_eq!(b, Vec2::new(48.0, 48.0 + right));
    }

    #[rstest]
    #[case(TileAttribute::EMPTY, TileKind::Empty)]
    #[case(TileAttribute::HARMFUL, TileKind::Empty)]
    #[case(TileAttribute::BLOCK, TileKind::Solid { hooked: false })]
    #[case(TileAttribute::BLOCK | TileAttribute::HOOKED, TileKind::Solid { hooked: true })]
    #[case(TileAttribute::BLOCK | TileAttribute::ONE_WAY, TileKind::OneWay)]
    #[case(TileAttribute::OUT_OF_BOUNDS | TileAttribute::BLOCK, TileKind::OutOfBounds)]
    #[case(SlopeVariant::NegativeFloorTall.attribute() | TileAttribute::HARMFUL, TileKind::Slope(SlopeVariant::NegativeFloorTall))]
    #[case(TileAttribute::SLOPE, TileKind::Empty)]
    #[case(TileAttribute::SLOPE | TileAttribute::FLOOR | TileAttribute::CEILING, TileKind::Empty)]
    fn classification(#[case] attribute: TileAttribute, #[case] expected: TileKind) {
        assert_eq!(attribute.kind(), expected);
    }

    #[rstest]
    fn unknown_bits_are_rejected_or_dropped() {
        assert_eq!(TileAttribute::from_bits(0x1000), None);
        assert_eq!(TileAttribute::from_bits_truncate(0x1001), TileAttribute::BLOCK);
        assert!(TileAttribute::EMPTY.is_empty());
        assert!((TileAttribute::BLOCK | TileAttribute::HARMFUL).is_harmful());
    }

    #[rstest]
    fn debug_prints_hex_bits() {
        assert_eq!(format!("{:?}", TileAttribute::ONE_WAY), "TileAttribute(0x0400)");
    }
}
