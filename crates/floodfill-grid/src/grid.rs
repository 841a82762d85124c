//! ASCII tile grid parsing and rendering.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU64, Ordering};
use std::time::Duration;

use crate::error::GridError;
use crate::tile::{Tile, TileId};

/// Tile the fill starts from.
pub const START: char = '@';
/// Open floor.
pub const FLOOR: char = '.';
/// Tile that has been filled.
pub const FILL: char = 'x';
/// Impassable wall; never a neighbor.
pub const WALL: char = '#';
/// Tile whose visit always fails.
pub const FAULT: char = '!';

const SYMBOLS: [char; 5] = [START, FLOOR, FILL, WALL, FAULT];

/// Shared tile storage behind every [`Tile`] handle.
pub(crate) struct GridState {
    width: usize,
    height: usize,
    symbols: Vec<AtomicU8>,
    pub(crate) visited: Vec<AtomicBool>,
    pub(crate) visits: AtomicU64,
    latency_us: AtomicU64,
}

impl GridState {
    pub(crate) fn contains(&self, id: TileId) -> bool {
        id.x < self.width && id.y < self.height
    }

    pub(crate) fn index(&self, id: TileId) -> usize {
        id.y * self.width + id.x
    }

    pub(crate) fn symbol(&self, id: TileId) -> char {
        char::from(self.symbols[self.index(id)].load(Ordering::Acquire))
    }

    pub(crate) fn set_symbol(&self, id: TileId, symbol: char) {
        // Every known symbol is ASCII.
        self.symbols[self.index(id)].store(symbol as u8, Ordering::Release);
    }

    pub(crate) fn latency(&self) -> Duration {
        Duration::from_micros(self.latency_us.load(Ordering::Relaxed))
    }
}

/// A rectangular grid of tiles that can be flood filled from its `@` tiles.
///
/// Cloning a grid is cheap and shares the tiles.
#[derive(Clone)]
pub struct Grid {
    state: Arc<GridState>,
}

impl Grid {
    /// Parse a grid from its ASCII form.
    ///
    /// Blank lines are skipped; every other row must have the same width.
    pub fn parse(ascii: &str) -> Result<Self, GridError> {
        let mut width = None;
        let mut symbols = Vec::new();
        let mut height = 0;

        for line in ascii.lines() {
            let row = line.trim_end_matches('\r');
            if row.is_empty() {
                continue;
            }

            let mut row_width = 0;
            for (x, symbol) in row.chars().enumerate() {
                if !SYMBOLS.contains(&symbol) {
                    return Err(GridError::UnknownSymbol {
                        symbol,
                        id: TileId::new(x, height),
                    });
                }
                symbols.push(AtomicU8::new(symbol as u8));
                row_width += 1;
            }

            let expected = *width.get_or_insert(row_width);
            if row_width != expected {
                return Err(GridError::Ragged {
                    row: height,
                    width: row_width,
                    expected,
                });
            }
            height += 1;
        }

        let width = width.unwrap_or(0);
        let visited = (0..symbols.len()).map(|_| AtomicBool::new(false)).collect();

        Ok(Self {
            state: Arc::new(GridState {
                width,
                height,
                symbols,
                visited,
                visits: AtomicU64::new(0),
                latency_us: AtomicU64::new(0),
            }),
        })
    }

    /// Read and parse a grid file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GridError> {
        let path = path.as_ref();
        let ascii = std::fs::read_to_string(path).map_err(|e| GridError::io(path, e))?;
        Self::parse(&ascii)
    }

    /// Delay every tile visit by `latency`, simulating a remote fetch.
    pub fn set_latency(&self, latency: Duration) {
        let micros = u64::try_from(latency.as_micros()).unwrap_or(u64::MAX);
        self.state.latency_us.store(micros, Ordering::Relaxed);
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.state.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.state.height
    }

    /// The tile at `(x, y)`, if inside the grid.
    pub fn tile(&self, x: usize, y: usize) -> Option<Tile> {
        let id = TileId::new(x, y);
        self.state.contains(id).then(|| Tile {
            grid: Arc::clone(&self.state),
            id,
        })
    }

    /// Every `@` tile, in row-major order.
    pub fn starts(&self) -> Vec<Tile> {
        self.tiles().filter(|tile| tile.symbol() == START).collect()
    }

    /// Number of successful and failed tile visits so far.
    pub fn visit_count(&self) -> u64 {
        self.state.visits.load(Ordering::Acquire)
    }

    /// Number of tiles currently showing `symbol`.
    pub fn count(&self, symbol: char) -> usize {
        self.tiles().filter(|tile| tile.symbol() == symbol).count()
    }

    /// Render the grid back to ASCII, rows separated by newlines.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.state.height * (self.state.width + 1));
        for y in 0..self.state.height {
            if y > 0 {
                out.push('\n');
            }
            for x in 0..self.state.width {
                out.push(self.state.symbol(TileId::new(x, y)));
            }
        }
        out
    }

    fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        let width = self.state.width;
        (0..self.state.symbols.len()).map(move |index| Tile {
            grid: Arc::clone(&self.state),
            id: TileId::new(index % width, index / width),
        })
    }
}

impl FromStr for Grid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("width", &self.state.width)
            .field("height", &self.state.height)
            .field("visits", &self.visit_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_blank_lines() {
        let grid = Grid::parse("\n.#\n\n#@\n").unwrap();

        assert_eq!(grid.width(), 2);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.render(), ".#\n#@");
    }

    #[test]
    fn test_parse_rejects_ragged_rows() {
        let err = Grid::parse("...\n..").unwrap_err();
        assert!(matches!(
            err,
            GridError::Ragged {
                row: 1,
                width: 2,
                expected: 3
            }
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_symbols() {
        let err = Grid::parse("..\n.?").unwrap_err();
        match err {
            GridError::UnknownSymbol { symbol, id } => {
                assert_eq!(symbol, '?');
                assert_eq!(id, TileId::new(1, 1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_grid() {
        let grid = Grid::parse("").unwrap();
        assert_eq!(grid.width(), 0);
        assert!(grid.starts().is_empty());
        assert_eq!(grid.render(), "");
    }

    #[test]
    fn test_starts_in_row_major_order() {
        let grid = Grid::parse(".@\n@.").unwrap();
        let starts: Vec<_> = grid.starts().iter().map(|t| t.position()).collect();
        assert_eq!(starts, vec![TileId::new(1, 0), TileId::new(0, 1)]);
    }

    #[test]
    fn test_tile_bounds() {
        let grid = Grid::parse("..\n..").unwrap();
        assert!(grid.tile(1, 1).is_some());
        assert!(grid.tile(2, 0).is_none());
        assert!(grid.tile(0, 2).is_none());
    }

    #[test]
    fn test_count_and_crlf() {
        let grid: Grid = "#@#\r\n...\r\n".parse().unwrap();
        assert_eq!(grid.count(WALL), 2);
        assert_eq!(grid.count(FLOOR), 3);
        assert_eq!(grid.count(START), 1);
    }
}
