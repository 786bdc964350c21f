//! Tile grid fixtures.

use tilebound::scenario::parse_rows;
use tilebound::{TileAttribute, TileGrid};

/// Builds a grid from legend rows.
///
/// # Panics
/// Panics when the legend is malformed; fixtures are expected to be valid.
///
/// # Examples
/// ```
/// use test_utils::grids::grid;
/// let g = grid(&["..", "##"]);
/// assert_eq!(g.height(), 2);
/// ```
pub fn grid(rows: &[&str]) -> TileGrid {
    parse_rows(rows).unwrap_or_else(|err| panic!("invalid test legend: {err}"))
}

/// A 10x10 grid holding `attribute` at `(x, y)` and nothing else.
///
/// # Examples
/// ```
/// use test_utils::grids::single_tile;
/// use tilebound::TileAttribute;
/// let g = single_tile(5, 5, TileAttribute::BLOCK);
/// assert_eq!(g.attribute(5, 5), TileAttribute::BLOCK);
/// ```
pub fn single_tile<A: Into<TileAttribute>>(x: i32, y: i32, attribute: A) -> TileGrid {
    let attribute = attribute.into();
    TileGrid::from_fn(10, 10, move |tx, ty| {
        if (tx, ty) == (x, y) {
            attribute
        } else {
            TileAttribute::EMPTY
        }
    })
}

/// A `width` x `height` grid whose row `y` is filled with `attribute`.
pub fn row_grid<A: Into<TileAttribute>>(width: u16, height: u16, y: i32, attribute: A) -> TileGrid {
    let attribute = attribute.into();
    TileGrid::from_fn(width, height, move |_, ty| {
        if ty == y {
            attribute
        } else {
            TileAttribute::EMPTY
        }
    })
}
