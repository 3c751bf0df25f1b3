use std::collections::HashSet;

use crate::field::{Direction, Point};

/// Extents of the field being carved.
///
/// The carve-able interior is `x` in `[1, width - 2]` and `y` in `[1, height - 2]`.
/// Row `height - 1` holds the start and row `0` is the goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub fn new(width: u16, height: u16) -> Self {
        Bounds {
            width: i32::from(width),
            height: i32::from(height),
        }
    }

    pub fn contains_x(&self, x: i32) -> bool {
        (1..=self.width - 2).contains(&x)
    }

    pub fn contains_y(&self, y: i32) -> bool {
        (1..=self.height - 2).contains(&y)
    }

    /// Checks if an upward step into column `x` leaves room to turn back down on both sides.
    pub fn has_turning_room(&self, x: i32) -> bool {
        x >= 3 && x <= self.width - 4
    }
}

/// Outcome of evaluating a candidate cell, naming the first rule that rejected it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    OutsideColumns,
    OutsideRows,
    AlreadyChecked,
    Crowded,
    NoTurningRoom,
    AlreadyVisited,
}

/// Evaluates `candidate`, reached from the current cell by stepping in `direction`.
///
/// Rules run cheapest first and stop at the first rejection. Any candidate that gets
/// past the bounds checks is recorded in `checked`, whatever the final verdict, so it
/// is never evaluated twice in the same run.
pub fn check(
    candidate: Point,
    direction: Direction,
    bounds: Bounds,
    visited: &HashSet<Point>,
    checked: &mut HashSet<Point>,
) -> Verdict {
    if !bounds.contains_x(candidate.x) {
        return Verdict::OutsideColumns;
    }
    if !bounds.contains_y(candidate.y) {
        return Verdict::OutsideRows;
    }
    if !checked.insert(candidate) {
        return Verdict::AlreadyChecked;
    }

    // The cell we came from accounts for one visited neighbor
    let visited_neighbors = candidate
        .neighbors()
        .into_iter()
        .filter(|neighbor| visited.contains(neighbor))
        .count();
    if visited_neighbors > 1 {
        return Verdict::Crowded;
    }

    if direction == Direction::Up && !bounds.has_turning_room(candidate.x) {
        return Verdict::NoTurningRoom;
    }

    if visited.contains(&candidate) {
        return Verdict::AlreadyVisited;
    }

    Verdict::Accept
}

/// Checks if `candidate` may be carved next. See [`check`].
pub fn is_legal(
    candidate: Point,
    direction: Direction,
    bounds: Bounds,
    visited: &HashSet<Point>,
    checked: &mut HashSet<Point>,
) -> bool {
    check(candidate, direction, bounds, visited, checked) == Verdict::Accept
}
