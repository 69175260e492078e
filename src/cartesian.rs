use std::fmt::{self, Display};

/// A cell on a rectangular board, addressed by row and column.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub row: i32,
    pub col: i32,
}

impl Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl Point {
    pub fn new(row: i32, col: i32) -> Point {
        Point { row, col }
    }

    pub fn manhattan(&self, other: &Point) -> i32 {
        i32::abs(self.row - other.row) + i32::abs(self.col - other.col)
    }

    /// Row-major index on a board with the given number of columns, if on the board.
    pub fn index(&self, rows: usize, cols: usize) -> Option<usize> {
        if self.row < 0 || self.col < 0 {
            return None;
        }
        let (row, col) = (self.row as usize, self.col as usize);
        if row < rows && col < cols {
            Some(row * cols + col)
        } else {
            None
        }
    }

    pub fn from_index(index: usize, cols: usize) -> Point {
        Point::from((index / cols, index % cols))
    }
}

impl From<(usize, usize)> for Point {
    fn from(coordinates: (usize, usize)) -> Self {
        Self {
            row: coordinates.0 as i32,
            col: coordinates.1 as i32,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn all() -> [Direction; 4] {
        [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
    }

    /// The two directions at right angles to this one.
    pub fn orthogonal(&self) -> [Direction; 2] {
        match self {
            Direction::Up | Direction::Down => [Direction::Left, Direction::Right],
            Direction::Left | Direction::Right => [Direction::Up, Direction::Down],
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

impl Point {
    /// Rows grow downwards, as on a printed board.
    pub fn step(&self, direction: Direction) -> Point {
        self.jump(direction, 1)
    }

    pub fn jump(&self, direction: Direction, distance: i32) -> Point {
        match direction {
            Direction::Up => Point {
                row: self.row - distance,
                col: self.col,
            },
            Direction::Down => Point {
                row: self.row + distance,
                col: self.col,
            },
            Direction::Left => Point {
                row: self.row,
                col: self.col - distance,
            },
            Direction::Right => Point {
                row: self.row,
                col: self.col + distance,
            },
        }
    }
}
