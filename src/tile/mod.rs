//! Tile attributes and the static collision grid.

mod attribute;
mod grid;

pub use attribute::{
    SlopeHeight, SlopeOrientation, SlopeSign, SlopeVariant, TileAttribute, TileKind,
};
pub use grid::{GridError, TileGrid};
