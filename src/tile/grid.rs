//! The static collision grid of a loaded map.
//!
//! A [`TileGrid`] is built once per map load from the attribute table the
//! loader hands over and is read-only for the rest of the map's lifetime.
//! Systems borrow it as a Bevy resource; queries borrow it directly.

use bevy::prelude::*;
use glam::Vec2;
use log::debug;
use thiserror::Error;

use super::attribute::{TileAttribute, TileKind};
use crate::numeric::tile_origin;

/// Errors raised while building a [`TileGrid`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// The attribute buffer does not hold `width * height` entries.
    #[error("expected {expected} tile attributes for the grid, found {found}")]
    SizeMismatch {
        /// Number of tiles implied by the dimensions.
        expected: usize,
        /// Number of attributes supplied.
        found: usize,
    },
    /// The grid dimensions do not fit the tile index domain.
    #[error("grid dimensions {width}x{height} exceed the tile index range")]
    TooLarge {
        /// Requested width in tiles.
        width: u32,
        /// Requested height in tiles.
        height: u32,
    },
    /// A raw attribute carries bits outside the known layout.
    #[error("tile {index} carries unknown attribute bits {bits:#x}")]
    UnknownBits {
        /// Flat index of the offending tile.
        index: usize,
        /// The raw attribute value.
        bits: u32,
    },
    /// A legend row has a different length from the first row.
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        /// Zero-based row number.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of this row.
        found: usize,
    },
    /// A legend glyph does not name a tile.
    #[error("unknown tile glyph {glyph:?} at ({x}, {y})")]
    UnknownGlyph {
        /// The offending character.
        glyph: char,
        /// Column of the glyph.
        x: usize,
        /// Row of the glyph.
        y: usize,
    },
}

/// Immutable lookup of collision attributes by tile coordinate.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: i32,
    height: i32,
    attributes: Vec<TileAttribute>,
}

impl TileGrid {
    /// Builds a grid from row-major attributes.
    ///
    /// # Errors
    /// Returns [`GridError::SizeMismatch`] when `attributes` does not hold
    /// exactly `width * height` entries, or [`GridError::TooLarge`] when a
    /// dimension does not fit an `i32` tile index.
    pub fn new(width: u32, height: u32, attributes: Vec<TileAttribute>) -> Result<Self, GridError> {
        let too_large = || GridError::TooLarge { width, height };
        let signed_width = i32::try_from(width).map_err(|_| too_large())?;
        let signed_height = i32::try_from(height).map_err(|_| too_large())?;
        let expected = usize::try_from(u64::from(width) * u64::from(height))
            .map_err(|_| too_large())?;
        if attributes.len() != expected {
            return Err(GridError::SizeMismatch {
                expected,
                found: attributes.len(),
            });
        }
        debug!("tile grid built: {width}x{height}");
        Ok(Self {
            width: signed_width,
            height: signed_height,
            attributes,
        })
    }

    /// Builds a grid from the raw `u32` attribute table of a tileset.
    ///
    /// # Errors
    /// Returns [`GridError::UnknownBits`] for the first attribute with bits
    /// outside the known layout, otherwise the errors of [`TileGrid::new`].
    pub fn from_raw(width: u32, height: u32, raw: &[u32]) -> Result<Self, GridError> {
        let attributes = raw
            .iter()
            .enumerate()
            .map(|(index, &bits)| {
                TileAttribute::from_bits(bits).ok_or(GridError::UnknownBits { index, bits })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(width, height, attributes)
    }

    /// Builds a grid by evaluating `tile` for every coordinate.
    ///
    /// # Examples
    /// ```
    /// use tilebound::{TileAttribute, TileGrid};
    /// let grid = TileGrid::from_fn(10, 10, |x, y| {
    ///     if (x, y) == (5, 5) { TileAttribute::BLOCK } else { TileAttribute::EMPTY }
    /// });
    /// assert_eq!(grid.attribute(5, 5), TileAttribute::BLOCK);
    /// assert_eq!(grid.attribute(4, 5), TileAttribute::EMPTY);
    /// ```
    #[must_use]
    pub fn from_fn(width: u16, height: u16, mut tile: impl FnMut(i32, i32) -> TileAttribute) -> Self {
        let (width, height) = (i32::from(width), i32::from(height));
        let attributes = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| tile(x, y))
            .collect();
        Self {
            width,
            height,
            attributes,
        }
    }

    /// A grid of empty tiles.
    #[must_use]
    pub fn empty(width: u16, height: u16) -> Self {
        Self::from_fn(width, height, |_, _| TileAttribute::EMPTY)
    }

    /// Width in tiles.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height in tiles.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Size of the grid in world units.
    #[must_use]
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(tile_origin(self.width), tile_origin(self.height))
    }

    /// True when `(x, y)` addresses a stored tile.
    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if !self.contains(x, y) {
            return None;
        }
        let column = usize::try_from(x).ok()?;
        let row = usize::try_from(y).ok()?;
        let stride = usize::try_from(self.width).ok()?;
        Some(row * stride + column)
    }

    /// Attribute of the tile at `(x, y)`.
    ///
    /// Coordinates outside the grid are empty, except the single row just
    /// below the bottom edge, which reports [`TileAttribute::OUT_OF_BOUNDS`]
    /// at every column so bodies falling off the map are caught once.
    #[must_use]
    pub fn attribute(&self, x: i32, y: i32) -> TileAttribute {
        match self.offset(x, y).and_then(|offset| self.attributes.get(offset)) {
            Some(&attribute) => attribute,
            None if y == self.height => TileAttribute::OUT_OF_BOUNDS,
            None => TileAttribute::EMPTY,
        }
    }

    /// Classified attribute of the tile at `(x, y)`.
    #[must_use]
    pub fn kind(&self, x: i32, y: i32) -> TileKind {
        self.attribute(x, y).kind()
    }

    /// Iterates every stored tile as `(x, y, attribute)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, TileAttribute)> + '_ {
        let width = self.width;
        (0..self.height)
            .flat_map(move |y| (0..width).map(move |x| (x, y)))
            .zip(self.attributes.iter().copied())
            .map(|((x, y), attribute)| (x, y, attribute))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn single_block() -> TileGrid {
        TileGrid::from_fn(10, 10, |x, y| {
            if (x, y) == (5, 5) {
                TileAttribute::BLOCK
            } else {
                TileAttribute::EMPTY
            }
        })
    }

    #[rstest]
    #[case::stored(5, 5, TileAttribute::BLOCK)]
    #[case::stored_empty(0, 0, TileAttribute::EMPTY)]
    #[case::left_of_grid(-1, 5, TileAttribute::EMPTY)]
    #[case::right_of_grid(10, 5, TileAttribute::EMPTY)]
    #[case::above_grid(5, -1, TileAttribute::EMPTY)]
    #[case::row_below_bottom(5, 10, TileAttribute::OUT_OF_BOUNDS)]
    #[case::row_below_bottom_outside_columns(-3, 10, TileAttribute::OUT_OF_BOUNDS)]
    #[case::two_rows_below_bottom(5, 11, TileAttribute::EMPTY)]
    fn attribute_lookup(#[case] x: i32, #[case] y: i32, #[case] expected: TileAttribute) {
        assert_eq!(single_block().attribute(x, y), expected);
    }

    #[rstest]
    fn new_rejects_wrong_length() {
        let err = TileGrid::new(2, 2, vec![TileAttribute::EMPTY; 3]).unwrap_err();
        assert_eq!(
            err,
            GridError::SizeMismatch {
                expected: 4,
                found: 3
            }
        );
    }

    #[rstest]
    fn new_rejects_oversized_dimensions() {
        let err = TileGrid::new(u32::MAX, 1, Vec::new()).unwrap_err();
        assert!(matches!(err, GridError::TooLarge { .. }));
    }

    #[rstest]
    fn from_raw_reports_first_unknown_bits() {
        let err = TileGrid::from_raw(2, 1, &[0x1, 0x8000]).unwrap_err();
        assert_eq!(
            err,
            GridError::UnknownBits {
                index: 1,
                bits: 0x8000
            }
        );
        assert_eq!(err.to_string(), "tile 1 carries unknown attribute bits 0x8000");
    }

    #[rstest]
    fn from_raw_is_row_major() {
        let grid = TileGrid::from_raw(2, 2, &[0x0, 0x1, 0x401, 0x0]).unwrap();
        assert_eq!(grid.kind(1, 0), TileKind::Solid { hooked: false });
        assert_eq!(grid.kind(0, 1), TileKind::OneWay);
        assert_eq!(grid.iter().count(), 4);
        assert_eq!(grid.world_size(), Vec2::new(32.0, 32.0));
    }
}
