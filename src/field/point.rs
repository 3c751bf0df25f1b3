/// A cell coordinate on the field. `y` grows upward, so the top row of a field
/// of height `h` is `y = h - 1` and the bottom row is `y = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    /// The four orthogonal neighbors, in `Direction::ALL` order.
    pub fn neighbors(self) -> [Point; 4] {
        Direction::ALL.map(|direction| self + direction)
    }

    /// Checks if `other` is exactly one step away along a single axis.
    pub fn is_adjacent(self, other: Point) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

impl std::ops::Add<Direction> for Point {
    type Output = Point;

    fn add(self, direction: Direction) -> Point {
        let (dx, dy) = direction.offset();
        Point::new(self.x + dx, self.y + dy)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Every direction, in the order a fresh frontier lists them.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector `(dx, dy)` of the direction.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_plus_direction() {
        let p = Point::new(3, 3);
        assert_eq!(p + Direction::Up, Point::new(3, 4));
        assert_eq!(p + Direction::Down, Point::new(3, 2));
        assert_eq!(p + Direction::Left, Point::new(2, 3));
        assert_eq!(p + Direction::Right, Point::new(4, 3));
    }

    #[test]
    fn test_neighbors_are_adjacent() {
        let p = Point::new(0, 0);
        let neighbors = p.neighbors();
        assert_eq!(
            neighbors,
            [
                Point::new(0, 1),
                Point::new(0, -1),
                Point::new(-1, 0),
                Point::new(1, 0)
            ]
        );
        assert!(neighbors.iter().all(|&n| p.is_adjacent(n)));
        assert!(!p.is_adjacent(Point::new(1, 1)));
        assert!(!p.is_adjacent(p));
    }
}
