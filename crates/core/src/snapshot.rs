use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::rng::RngState;
use crate::types::Tile;

/// Complete, restorable capture of a [`GridEngine`](crate::GridEngine).
///
/// Includes the generator state, so the tile placements that follow a
/// restore are the same ones that followed the original capture.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Snapshot {
    pub tiles: Grid,
    pub score: u32,
    pub rng: RngState,
}

impl Snapshot {
    pub fn best_tile(&self) -> Tile {
        self.tiles.max_tile()
    }
}
