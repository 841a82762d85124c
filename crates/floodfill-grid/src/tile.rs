//! Grid tiles as flood fill nodes.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use floodfill_core::Node;
use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::grid::{FAULT, FILL, GridState, WALL};

/// Position of a tile, used as its node identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId {
    /// Column, from the left.
    pub x: usize,
    /// Row, from the top.
    pub y: usize,
}

impl TileId {
    /// Create a tile id.
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Handle to one tile of a shared grid.
#[derive(Clone)]
pub struct Tile {
    pub(crate) grid: Arc<GridState>,
    pub(crate) id: TileId,
}

impl Tile {
    /// Position of this tile.
    pub fn position(&self) -> TileId {
        self.id
    }

    /// Current symbol of this tile.
    pub fn symbol(&self) -> char {
        self.grid.symbol(self.id)
    }

    fn neighbor(&self, x: usize, y: usize) -> Option<Tile> {
        let id = TileId::new(x, y);
        (self.grid.contains(id) && self.grid.symbol(id) != WALL).then(|| Tile {
            grid: Arc::clone(&self.grid),
            id,
        })
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tile{}", self.id)
    }
}

impl Node for Tile {
    type Id = TileId;
    type Error = GridError;

    fn id(&self) -> TileId {
        self.id
    }

    async fn visit(&self) -> Result<(), GridError> {
        let latency = self.grid.latency();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let index = self.grid.index(self.id);
        if self.grid.visited[index].swap(true, Ordering::AcqRel) {
            return Err(GridError::AlreadyVisited { id: self.id });
        }
        self.grid.visits.fetch_add(1, Ordering::AcqRel);

        if self.grid.symbol(self.id) == FAULT {
            return Err(GridError::Faulty { id: self.id });
        }
        self.grid.set_symbol(self.id, FILL);
        Ok(())
    }

    async fn neighbors(&self) -> Result<Vec<Self>, GridError> {
        let TileId { x, y } = self.id;
        let mut neighbors = Vec::with_capacity(4);

        if y > 0 {
            neighbors.extend(self.neighbor(x, y - 1));
        }
        neighbors.extend(self.neighbor(x, y + 1));
        if x > 0 {
            neighbors.extend(self.neighbor(x - 1, y));
        }
        neighbors.extend(self.neighbor(x + 1, y));

        Ok(neighbors)
    }
}
