//! Grid coordinates, cell identifiers and neighbor enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side length of the primary maze grid
pub const GRID_SIZE: u8 = 5;

/// Identifier of a grid cell, derived from its coordinates.
///
/// The textual form is `c-<x>-<y>`, which is also what the browser layer
/// sees after serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CellId {
    pub x: u8,
    pub y: u8,
}

impl CellId {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Decode the identifier back into `(x, y)`
    pub fn coords(&self) -> (u8, u8) {
        (self.x, self.y)
    }

    /// Row-major index of this cell in a grid of the given size
    pub fn index(&self, size: u8) -> usize {
        self.y as usize * size as usize + self.x as usize
    }

    /// Inverse of [`CellId::index`]
    pub fn from_index(index: usize, size: u8) -> Self {
        let size = size as usize;
        Self::new((index % size) as u8, (index / size) as u8)
    }

    /// Iterate every cell of a grid in row-major order
    pub fn all(size: u8) -> impl Iterator<Item = CellId> {
        (0..size).flat_map(move |y| (0..size).map(move |x| CellId::new(x, y)))
    }

    /// Cell reached by taking `dir` from here, if it stays on the grid
    pub fn step(&self, dir: Direction, size: u8) -> Option<CellId> {
        let x = self.x as i8 + dir.dx;
        let y = self.y as i8 + dir.dy;
        let bound = size as i8;
        if (0..bound).contains(&x) && (0..bound).contains(&y) {
            Some(CellId::new(x as u8, y as u8))
        } else {
            None
        }
    }

    /// Whether `other` is one king-move away (Chebyshev distance 1)
    pub fn is_adjacent(&self, other: CellId) -> bool {
        let dx = (self.x as i16 - other.x as i16).abs();
        let dy = (self.y as i16 - other.y as i16).abs();
        dx.max(dy) == 1
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c-{}-{}", self.x, self.y)
    }
}

impl From<CellId> for String {
    fn from(id: CellId) -> Self {
        id.to_string()
    }
}

/// Errors produced when decoding a cell identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCellIdError {
    /// The text does not have the `c-<x>-<y>` shape
    Malformed(String),
    /// A coordinate is not a small non-negative integer
    BadCoordinate(String),
}

impl fmt::Display for ParseCellIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(s) => write!(f, "Malformed cell id: {}", s),
            Self::BadCoordinate(s) => write!(f, "Bad cell coordinate: {}", s),
        }
    }
}

impl std::error::Error for ParseCellIdError {}

impl FromStr for CellId {
    type Err = ParseCellIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('-');
        let (Some("c"), Some(x), Some(y), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ParseCellIdError::Malformed(s.to_string()));
        };
        let x = x
            .parse()
            .map_err(|_| ParseCellIdError::BadCoordinate(x.to_string()))?;
        let y = y
            .parse()
            .map_err(|_| ParseCellIdError::BadCoordinate(y.to_string()))?;
        Ok(CellId::new(x, y))
    }
}

impl TryFrom<String> for CellId {
    type Error = ParseCellIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Coarse classification of a step, used by the anti-run heuristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectionFamily {
    Horizontal,
    Vertical,
    Diagonal,
}

/// A single king-move step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Direction {
    pub dx: i8,
    pub dy: i8,
}

impl Direction {
    pub const fn new(dx: i8, dy: i8) -> Self {
        Self { dx, dy }
    }

    /// Step vector from `from` to `to`
    pub fn between(from: CellId, to: CellId) -> Self {
        Self::new(to.x as i8 - from.x as i8, to.y as i8 - from.y as i8)
    }

    pub fn family(&self) -> DirectionFamily {
        if self.dx == 0 {
            DirectionFamily::Vertical
        } else if self.dy == 0 {
            DirectionFamily::Horizontal
        } else {
            DirectionFamily::Diagonal
        }
    }

    pub fn is_diagonal(&self) -> bool {
        self.dx != 0 && self.dy != 0
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.dx, self.dy)
    }
}

pub const ORTHOGONAL: [Direction; 4] = [
    Direction::new(1, 0),
    Direction::new(0, 1),
    Direction::new(-1, 0),
    Direction::new(0, -1),
];

pub const DIAGONAL: [Direction; 4] = [
    Direction::new(1, 1),
    Direction::new(-1, 1),
    Direction::new(1, -1),
    Direction::new(-1, -1),
];

/// Orthogonal directions followed by diagonals
pub const ALL_DIRECTIONS: [Direction; 8] = [
    ORTHOGONAL[0],
    ORTHOGONAL[1],
    ORTHOGONAL[2],
    ORTHOGONAL[3],
    DIAGONAL[0],
    DIAGONAL[1],
    DIAGONAL[2],
    DIAGONAL[3],
];

/// Neighbors of `cell` over `directions` that stay inside a `size`×`size` grid,
/// paired with the direction that reaches them.
pub fn neighbor_candidates(
    cell: CellId,
    directions: &[Direction],
    size: u8,
) -> Vec<(CellId, Direction)> {
    directions
        .iter()
        .filter_map(|&dir| cell.step(dir, size).map(|next| (next, dir)))
        .collect()
}

/// Number of geometrically possible king-move neighbors of `cell`
pub fn neighbor_count(cell: CellId, size: u8) -> usize {
    ALL_DIRECTIONS
        .iter()
        .filter(|&&dir| cell.step(dir, size).is_some())
        .count()
}
