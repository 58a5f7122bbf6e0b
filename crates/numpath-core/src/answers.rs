//! Dead-end marking and per-edge answer assignment.

use crate::grid::CellId;
use crate::maze::Maze;
use crate::question::Answer;
use crate::retry::{Attempt, Rejection, RetryPolicy};
use std::collections::HashSet;

/// Distractor offsets from a cell's correct answer, in whole units
const DISTRACTOR_OFFSETS: [i64; 12] = [3, -2, 6, -4, 9, -7, 12, -9, 15, -11, 18, -14];

/// Seed perturbation rounds before the linear scan takes over
const ANSWER_ROUNDS: usize = 10;

/// Mark every non-exit cell without outgoing edges as a dead end
pub fn mark_dead_ends(maze: &mut Maze) {
    let outgoing = maze.outgoing_counts();
    let size = maze.grid_size;
    for cell in maze.cells.iter_mut() {
        cell.is_dead_end = !cell.is_exit && outgoing[cell.id.index(size)] == 0;
    }
}

/// Label the outgoing edges of every playable cell with distinct answers.
///
/// On the solution path the correct edge carries the cell's answer and the
/// others carry distractors; elsewhere every edge carries a distractor.
pub fn assign_answers(maze: &mut Maze) {
    let on_path = maze.solution_set();
    let size = maze.grid_size;
    let ids: Vec<CellId> = maze.cells.iter().map(|c| c.id).collect();

    for id in ids {
        let cell = maze.cell(id);
        let edge_slots: Vec<usize> = (0..maze.edges.len())
            .filter(|&i| maze.edges[i].from == id)
            .collect();
        if cell.is_exit || cell.is_dead_end || edge_slots.is_empty() {
            maze.cell_mut(id).answer_options.clear();
            continue;
        }

        let base = cell.correct_answer;
        let seed = id.x as usize + id.y as usize * size as usize;
        let correct_slot = if on_path.contains(&id) {
            edge_slots.iter().copied().find(|&i| maze.edges[i].is_correct)
        } else {
            None
        };

        let mut used = HashSet::new();
        if let Some(slot) = correct_slot {
            used.insert(base);
            maze.edges[slot].answer = base;
        }
        let others: Vec<usize> = edge_slots
            .iter()
            .copied()
            .filter(|&i| Some(i) != correct_slot)
            .collect();
        let values = distractors(base, others.len(), &used, seed);
        for (slot, value) in others.iter().zip(values) {
            maze.edges[*slot].answer = value;
        }

        let options: Vec<Answer> = edge_slots.iter().map(|&i| maze.edges[i].answer).collect();
        let distinct: HashSet<Answer> = options.iter().copied().collect();
        if distinct.len() != options.len() {
            tracing::warn!(cell = %id, ?options, "duplicate answers detected");
        }
        maze.cell_mut(id).answer_options = options;
    }
}

/// `count` distinct values near `base`, none of them in `exclude`
pub fn distractors(
    base: Answer,
    count: usize,
    exclude: &HashSet<Answer>,
    seed: usize,
) -> Vec<Answer> {
    let mut partial = Vec::new();
    let rounds = RetryPolicy::new(ANSWER_ROUNDS).run("answer assignment", |round| {
        let values = offset_round(base, count, exclude, seed + round * 11);
        if values.len() == count {
            Attempt::Accepted(values)
        } else {
            partial = values;
            Attempt::Rejected(Rejection::Collision)
        }
    });

    let mut values = rounds.ok().unwrap_or(partial);
    let mut step = 1;
    while values.len() < count {
        let candidate = base.offset(step);
        if !exclude.contains(&candidate) && !values.contains(&candidate) {
            values.push(candidate);
        }
        step += 1;
    }
    values
}

/// One pass over the offset table starting at `seed`
fn offset_round(base: Answer, count: usize, exclude: &HashSet<Answer>, seed: usize) -> Vec<Answer> {
    let mut values = Vec::with_capacity(count);
    let n = DISTRACTOR_OFFSETS.len();
    for i in 0..n {
        if values.len() == count {
            break;
        }
        let candidate = base.offset(DISTRACTOR_OFFSETS[(i + seed) % n]);
        if !exclude.contains(&candidate) && !values.contains(&candidate) {
            values.push(candidate);
        }
    }
    values
}
