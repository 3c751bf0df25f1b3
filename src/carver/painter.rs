use crate::field::Point;

/// Sink for the cells the carver places and removes.
///
/// The carver never reads painter state back. `place` is called once for every cell
/// accepted into the road, including a cell that was removed earlier and is accepted
/// again, and `remove` once for every cell undone by backtracking. Implementations are
/// free to pause after each call to animate the carve.
pub trait GridPainter {
    /// Marks `point` as road.
    fn place(&mut self, point: Point);

    /// Marks `point` as background again.
    fn remove(&mut self, point: Point);

    /// Resets the whole `width` x `height` area to background before a run.
    fn clear(&mut self, width: u16, height: u16);
}

/// Painter that discards every call, for headless carving.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPainter;

impl GridPainter for NullPainter {
    fn place(&mut self, _point: Point) {}

    fn remove(&mut self, _point: Point) {}

    fn clear(&mut self, _width: u16, _height: u16) {}
}
