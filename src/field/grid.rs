use std::sync::mpsc::SyncSender;

use super::tile::Tile;

/// Changes to a grid, streamed to whoever renders it.
/// Coordinates are screen coordinates: `(column, row)` with row 0 at the top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridEvent {
    /// The grid was (re)initialized with every tile set to `tile`.
    Initial { tile: Tile, width: u16, height: u16 },
    /// A single tile changed.
    Update { coord: (u16, u16), old: Tile, new: Tile },
    /// A level finished carving. `road_length` is `None` when the search was exhausted.
    Finished {
        seed: u64,
        road_length: Option<usize>,
    },
}

pub struct Grid {
    data: Box<[Tile]>,
    width: u16,
    height: u16,
    sender: Option<SyncSender<GridEvent>>,
}

impl Grid {
    /// Creates a grid filled with `tile`. Nothing is sent until the first [`Grid::reset`]
    /// or [`Grid::set`], so the listener sees exactly one `Initial` per reset.
    pub fn new(width: u16, height: u16, tile: Tile, sender: Option<SyncSender<GridEvent>>) -> Self {
        Grid {
            data: vec![tile; width as usize * height as usize].into_boxed_slice(),
            width,
            height,
            sender,
        }
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.data
    }

    /// Resizes the grid and fills it with `tile`, discarding the old contents.
    pub fn reset(&mut self, width: u16, height: u16, tile: Tile) {
        self.data = vec![tile; width as usize * height as usize].into_boxed_slice();
        self.width = width;
        self.height = height;
        self.emit(GridEvent::Initial {
            tile,
            width,
            height,
        });
    }

    pub fn is_in_bounds(&self, coord: (u16, u16)) -> bool {
        coord.0 < self.width && coord.1 < self.height
    }

    fn ravel_index(&self, x: u16, y: u16) -> usize {
        // Overflow-safe since width and height are u16 (assuming usize is at least 32 bits)
        y as usize * self.width as usize + x as usize
    }

    pub fn set(&mut self, coord: (u16, u16), tile: Tile) {
        let idx = self.ravel_index(coord.0, coord.1);
        let old = self.data[idx];
        if old != tile {
            self.data[idx] = tile;
            self.emit(GridEvent::Update {
                coord,
                old,
                new: tile,
            });
        }
    }

    /// Forwards an event to the listener, if any. A listener that has hung up is ignored.
    pub fn emit(&self, event: GridEvent) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(event);
        }
    }
}

impl std::ops::Index<(u16, u16)> for Grid {
    type Output = Tile;

    fn index(&self, index: (u16, u16)) -> &Self::Output {
        &self.data[self.ravel_index(index.0, index.1)]
    }
}
