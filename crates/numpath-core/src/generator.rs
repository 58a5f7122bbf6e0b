//! Top-level maze building.
//!
//! [`MazeGenerator`] picks an exit, retries search and validation under a
//! [`RetryPolicy`], and finishes the accepted maze with questions, dead ends
//! and answers.

use crate::answers::{assign_answers, mark_dead_ends};
use crate::grid::{CellId, GRID_SIZE};
use crate::maze::{construct, construct_fallback, Maze};
use crate::path::{fallback_path, LengthBand, PathPrefix, PathSearch, PATH_PREFIX_LENGTH};
use crate::question::{ArithmeticQuestions, Grade, Operation, QuestionSource};
use crate::retry::{Attempt, Outcome, Rejection, RetryPolicy};
use crate::rng::{RandomSource, SimpleRng};
use crate::validate::validate;
use serde::{Deserialize, Serialize};

/// Configuration for maze generation
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Side length of the grid
    pub grid_size: u8,
    /// Cell the player starts on
    pub start: CellId,
    /// Leading path cells compared against the previous maze
    pub prefix_len: usize,
    /// Range the minimum path length is drawn from
    pub min_length: (usize, usize),
    /// Range the maximum path length is drawn from (raised to min + 2)
    pub max_length: (usize, usize),
    /// Whole-maze generate-and-validate attempts before the fallback maze
    pub maze_attempts: usize,
    /// Fresh path searches per maze attempt
    pub path_attempts: usize,
    /// Cells one path search may expand before giving up
    pub expansion_budget: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::with_grid_size(GRID_SIZE)
    }
}

impl GeneratorConfig {
    /// Default tuning for a square grid of the given size, starting on the
    /// middle of the left edge
    pub fn with_grid_size(grid_size: u8) -> Self {
        Self {
            grid_size,
            start: CellId::new(0, grid_size / 2),
            prefix_len: PATH_PREFIX_LENGTH,
            min_length: (8, 11),
            max_length: (12, 16),
            maze_attempts: 30,
            path_attempts: 200,
            expansion_budget: 20_000,
        }
    }

    /// Draw a random length band
    pub fn draw_band<R: RandomSource>(&self, rng: &mut R) -> LengthBand {
        let min = rng.int_in(self.min_length.0 as i64, self.min_length.1 as i64) as usize;
        let max = rng.int_in(self.max_length.0 as i64, self.max_length.1 as i64) as usize;
        LengthBand::new(min, max.max(min + 2))
    }
}

/// A maze plus the prefix to hand to the next build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltMaze {
    pub maze: Maze,
    pub prefix: PathPrefix,
}

/// Maze generator
#[derive(Debug, Clone, Default)]
pub struct MazeGenerator {
    config: GeneratorConfig,
}

impl MazeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Build a maze with fresh entropy and the built-in question generator
    pub fn build(
        &self,
        grade: Grade,
        operation: Operation,
        previous: Option<&PathPrefix>,
    ) -> BuiltMaze {
        self.build_maze(
            grade,
            operation,
            previous,
            &mut SimpleRng::new(),
            &mut ArithmeticQuestions,
        )
    }

    /// Build a complete maze: pick an exit, search and validate with retries,
    /// fall back to a straight-line maze if every attempt fails, then attach
    /// questions, dead ends and answers.
    pub fn build_maze<R, Q>(
        &self,
        grade: Grade,
        operation: Operation,
        previous: Option<&PathPrefix>,
        rng: &mut R,
        questions: &mut Q,
    ) -> BuiltMaze
    where
        R: RandomSource,
        Q: QuestionSource + ?Sized,
    {
        let exit = self.pick_exit(rng);
        let mut maze = match self.generate(exit, previous, rng) {
            Outcome::Success { value, attempts } => {
                tracing::debug!(attempts, %exit, "maze generated");
                value
            }
            Outcome::Exhausted { attempts, last } => {
                tracing::warn!(attempts, ?last, %exit, "falling back to straight-line maze");
                self.fallback_maze(exit)
            }
        };

        self.apply_questions(&mut maze, grade, operation, rng, questions);
        mark_dead_ends(&mut maze);
        assign_answers(&mut maze);

        let prefix = PathPrefix::of(&maze.solution_path, self.config.prefix_len);
        BuiltMaze { maze, prefix }
    }

    /// Any cell but the start, uniformly
    fn pick_exit<R: RandomSource>(&self, rng: &mut R) -> CellId {
        let size = self.config.grid_size;
        let candidates: Vec<CellId> = CellId::all(size)
            .filter(|&id| id != self.config.start)
            .collect();
        if candidates.is_empty() {
            return self.config.start;
        }
        candidates[rng.index(candidates.len())]
    }

    /// The generate-and-validate retry loop
    fn generate<R: RandomSource>(
        &self,
        exit: CellId,
        previous: Option<&PathPrefix>,
        rng: &mut R,
    ) -> Outcome<Maze> {
        let config = &self.config;
        RetryPolicy::new(config.maze_attempts).run("maze", |_| {
            let band = config.draw_band(rng);
            let search = PathSearch {
                size: config.grid_size,
                start: config.start,
                exit,
                band,
                previous,
                prefix_len: config.prefix_len,
                expansion_budget: config.expansion_budget,
            };
            let Some(path) = search.run(rng, RetryPolicy::new(config.path_attempts)).ok() else {
                return Attempt::Rejected(Rejection::SearchExhausted);
            };

            let maze = construct(config.grid_size, config.start, exit, path);
            match validate(&maze) {
                Ok(()) => Attempt::Accepted(maze),
                Err(violation) => Attempt::Rejected(Rejection::Invalid(violation)),
            }
        })
    }

    fn fallback_maze(&self, exit: CellId) -> Maze {
        let path = fallback_path(self.config.start, exit);
        construct_fallback(self.config.grid_size, self.config.start, exit, path)
    }

    fn apply_questions<R, Q>(
        &self,
        maze: &mut Maze,
        grade: Grade,
        operation: Operation,
        rng: &mut R,
        questions: &mut Q,
    )
    where
        R: RandomSource,
        Q: QuestionSource + ?Sized,
    {
        let count = maze.cells.len();
        let generated = questions.generate(count, grade, operation, rng);
        if generated.len() != count {
            tracing::warn!(expected = count, got = generated.len(), "question count mismatch");
        }
        for (cell, question) in maze.cells.iter_mut().zip(generated) {
            cell.question = question.text;
            cell.correct_answer = question.answer;
        }
    }
}

/// Build a maze with the default configuration
pub fn build_maze<R, Q>(
    grade: Grade,
    operation: Operation,
    previous: Option<&PathPrefix>,
    rng: &mut R,
    questions: &mut Q,
) -> BuiltMaze
where
    R: RandomSource,
    Q: QuestionSource + ?Sized,
{
    MazeGenerator::new().build_maze(grade, operation, previous, rng, questions)
}
