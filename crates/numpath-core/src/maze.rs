//! Maze model and graph construction.

use crate::grid::{neighbor_candidates, CellId, ALL_DIRECTIONS};
use crate::question::Answer;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A grid square carrying a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub id: CellId,
    pub x: u8,
    pub y: u8,
    pub question: String,
    #[serde(rename = "correctAnswerNumber")]
    pub correct_answer: Answer,
    /// Answers on this cell's outgoing edges, in edge order
    pub answer_options: Vec<Answer>,
    pub is_exit: bool,
    pub is_dead_end: bool,
}

impl Cell {
    fn new(id: CellId, exit: CellId) -> Self {
        Self {
            id,
            x: id.x,
            y: id.y,
            question: String::new(),
            correct_answer: Answer::default(),
            answer_options: Vec::new(),
            is_exit: id == exit,
            is_dead_end: false,
        }
    }
}

/// A directed move between adjacent cells, labelled with an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    #[serde(rename = "fromCellId")]
    pub from: CellId,
    #[serde(rename = "toCellId")]
    pub to: CellId,
    #[serde(rename = "answerNumber")]
    pub answer: Answer,
    pub is_diagonal: bool,
    /// This edge is the next step of the solution path
    #[serde(rename = "isCorrectEdge")]
    pub is_correct: bool,
}

impl Edge {
    fn new(from: CellId, to: CellId, is_correct: bool) -> Self {
        Self {
            from,
            to,
            answer: Answer::default(),
            is_diagonal: from.x != to.x && from.y != to.y,
            is_correct,
        }
    }
}

/// How a maze came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MazeOrigin {
    /// Searched and validated
    Generated,
    /// Straight-line liveness fallback, never validated
    Fallback,
}

/// A complete maze handed to the game layer.
///
/// Field names on the wire are the ones the browser viewport reads:
/// edges travel as `paths`, endpoints as `startCellId` / `exitCellId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Maze {
    pub grid_size: u8,
    /// Row-major
    pub cells: Vec<Cell>,
    #[serde(rename = "paths")]
    pub edges: Vec<Edge>,
    #[serde(rename = "startCellId")]
    pub start: CellId,
    #[serde(rename = "exitCellId")]
    pub exit: CellId,
    pub solution_path: Vec<CellId>,
    pub origin: MazeOrigin,
}

impl Maze {
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.index(self.grid_size)]
    }

    pub fn cell_mut(&mut self, id: CellId) -> &mut Cell {
        let size = self.grid_size;
        &mut self.cells[id.index(size)]
    }

    pub fn outgoing(&self, id: CellId) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |e| e.from == id)
    }

    pub fn edge(&self, from: CellId, to: CellId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.from == from && e.to == to)
    }

    /// Outgoing edge count per cell, row-major
    pub fn outgoing_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.cells.len()];
        for edge in &self.edges {
            counts[edge.from.index(self.grid_size)] += 1;
        }
        counts
    }

    /// Incoming edge count per cell, row-major
    pub fn incoming_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.cells.len()];
        for edge in &self.edges {
            counts[edge.to.index(self.grid_size)] += 1;
        }
        counts
    }

    /// Cells on the solution path, as a set
    pub fn solution_set(&self) -> HashSet<CellId> {
        self.solution_path.iter().copied().collect()
    }
}

/// Next cell along `path` for each cell that has one. A cell listed twice
/// keeps the successor of its later occurrence.
pub fn successors(path: &[CellId]) -> HashMap<CellId, CellId> {
    path.windows(2).map(|w| (w[0], w[1])).collect()
}

fn base_cells(size: u8, exit: CellId) -> Vec<Cell> {
    CellId::all(size).map(|id| Cell::new(id, exit)).collect()
}

/// Build the dense maze: every cell gets an edge to each of its in-bounds
/// neighbors, and the edge that follows the solution path is marked correct.
pub fn construct(size: u8, start: CellId, exit: CellId, path: Vec<CellId>) -> Maze {
    let next = successors(&path);
    let cells = base_cells(size, exit);

    let edges = cells
        .iter()
        .flat_map(|cell| {
            let successor = next.get(&cell.id).copied();
            neighbor_candidates(cell.id, &ALL_DIRECTIONS, size)
                .into_iter()
                .map(move |(to, _)| Edge::new(cell.id, to, successor == Some(to)))
        })
        .collect();

    Maze {
        grid_size: size,
        cells,
        edges,
        start,
        exit,
        solution_path: path,
        origin: MazeOrigin::Generated,
    }
}

/// Build a maze containing only the path's own edges, all correct
pub fn construct_fallback(size: u8, start: CellId, exit: CellId, path: Vec<CellId>) -> Maze {
    let edges = path.windows(2).map(|w| Edge::new(w[0], w[1], true)).collect();

    Maze {
        grid_size: size,
        cells: base_cells(size, exit),
        edges,
        start,
        exit,
        solution_path: path,
        origin: MazeOrigin::Fallback,
    }
}
