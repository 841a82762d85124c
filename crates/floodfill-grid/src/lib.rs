//! ASCII tile grid graph source for floodfill.
//!
//! A grid is a rectangle of tiles, each one a [`Node`](floodfill_core::Node)
//! whose neighbors are the adjacent non-wall tiles. Filling a grid from its
//! `@` tiles turns every reachable tile into `x`.
//!
//! ```text
//! #####      #####
//! #...#      #xxx#
//! #.#.#  ->  #x#x#
//! #.@.#      #xxx#
//! #####      #####
//! ```
//!
//! Symbols: `@` start, `.` floor, `x` filled, `#` wall, `!` faulty (its
//! visit always fails).

mod error;
mod grid;
mod tile;

pub use error::GridError;
pub use grid::{FAULT, FILL, FLOOR, Grid, START, WALL};
pub use tile::{Tile, TileId};
