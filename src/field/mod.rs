pub mod grid;
mod point;
pub mod tile;

use std::sync::mpsc::SyncSender;

use grid::{Grid, GridEvent};
pub use point::{Direction, Point};
pub use tile::Tile;

use crate::carver::painter::GridPainter;

/// A grass field that roads are carved into.
///
/// Field coordinates follow [`Point`]: `y = 0` is the bottom row. The backing grid is
/// stored in screen order (row 0 at the top), so every point is flipped on its way in.
pub struct Field {
    grid: Grid,
}

impl Field {
    /// Creates a field filled with grass. Every tile change is forwarded to `sender`, if given.
    /// The listener first hears of the field when it is cleared.
    pub fn new(width: u16, height: u16, sender: Option<SyncSender<GridEvent>>) -> Self {
        Field {
            grid: Grid::new(width, height, Tile::Grass, sender),
        }
    }

    pub fn width(&self) -> u16 {
        self.grid.width()
    }

    pub fn height(&self) -> u16 {
        self.grid.height()
    }

    /// Converts a field point to screen coordinates, or `None` if it is off the field.
    fn screen_coord(&self, point: Point) -> Option<(u16, u16)> {
        let x = u16::try_from(point.x).ok()?;
        let y = u16::try_from(point.y).ok()?;
        if !self.grid.is_in_bounds((x, y)) {
            return None;
        }
        Some((x, self.grid.height() - 1 - y))
    }

    /// Returns the tile at `point`, or `None` if it is off the field.
    pub fn tile(&self, point: Point) -> Option<Tile> {
        self.screen_coord(point).map(|coord| self.grid[coord])
    }

    fn paint(&mut self, point: Point, tile: Tile) {
        match self.screen_coord(point) {
            Some(coord) => self.grid.set(coord, tile),
            None => tracing::warn!("Ignoring paint outside the field at {}", point),
        }
    }

    /// Paints every point of a finished road at once.
    pub fn paint_road(&mut self, road: &[Point]) {
        road.iter().for_each(|&point| self.paint(point, Tile::Road));
    }

    /// Reports the outcome of a carve to the listener.
    pub fn announce(&self, seed: u64, road_length: Option<usize>) {
        self.grid.emit(GridEvent::Finished { seed, road_length });
    }

    /// Counts the road tiles currently on the field.
    pub fn road_tiles(&self) -> usize {
        self.grid
            .tiles()
            .iter()
            .filter(|&&tile| tile == Tile::Road)
            .count()
    }
}

impl GridPainter for Field {
    fn place(&mut self, point: Point) {
        self.paint(point, Tile::Road);
    }

    fn remove(&mut self, point: Point) {
        self.paint(point, Tile::Grass);
    }

    fn clear(&mut self, width: u16, height: u16) {
        self.grid.reset(width, height, Tile::Grass);
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.grid.height() {
            let row = (0..self.grid.width())
                .map(|x| self.grid[(x, y)].symbol())
                .collect::<String>();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_are_flipped_to_screen_rows() {
        let (tx, rx) = std::sync::mpsc::sync_channel(16);
        let mut field = Field::new(4, 3, Some(tx));
        field.place(Point::new(1, 0));
        drop(field);

        let events = rx.iter().collect::<Vec<_>>();
        assert_eq!(
            events,
            vec![GridEvent::Update {
                coord: (1, 2),
                old: Tile::Grass,
                new: Tile::Road
            }]
        );
    }

    #[test]
    fn test_place_and_remove() {
        let mut field = Field::new(5, 5, None);
        field.place(Point::new(2, 4));
        assert_eq!(field.tile(Point::new(2, 4)), Some(Tile::Road));
        field.remove(Point::new(2, 4));
        assert_eq!(field.tile(Point::new(2, 4)), Some(Tile::Grass));
        assert_eq!(field.road_tiles(), 0);
    }

    #[test]
    fn test_off_field_points_are_ignored() {
        let mut field = Field::new(5, 5, None);
        field.place(Point::new(-1, 2));
        field.place(Point::new(2, 5));
        assert_eq!(field.tile(Point::new(-1, 2)), None);
        assert_eq!(field.road_tiles(), 0);
    }

    #[test]
    fn test_clear_resizes() {
        let mut field = Field::new(5, 5, None);
        field.place(Point::new(1, 1));
        field.clear(7, 6);
        assert_eq!((field.width(), field.height()), (7, 6));
        assert_eq!(field.road_tiles(), 0);
    }

    #[test]
    fn test_display_prints_top_row_first() {
        let mut field = Field::new(3, 2, None);
        field.place(Point::new(0, 1));
        field.place(Point::new(2, 0));
        assert_eq!(field.to_string(), "#..\n..#\n");
    }
}
