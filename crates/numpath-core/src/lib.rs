//! Maze engine for the number path game.
//!
//! A maze is a 5×5 grid where every cell shows an arithmetic question and
//! every move to a neighboring cell is labelled with a number. Following the
//! moves whose number answers the current cell's question walks the
//! solution path from the start to the exit.
//!
//! ```no_run
//! use numpath_core::{Grade, MazeGenerator, Operation};
//!
//! let generator = MazeGenerator::new();
//! let first = generator.build(Grade::default(), Operation::Mixed, None);
//! // Hand the prefix back so the next maze opens differently
//! let second = generator.build(Grade::default(), Operation::Mixed, Some(&first.prefix));
//! assert_eq!(second.maze.cells.len(), 25);
//! ```

pub mod answers;
mod generator;
pub mod grid;
pub mod maze;
pub mod path;
pub mod question;
pub mod retry;
pub mod rng;
pub mod validate;

pub use generator::{build_maze, BuiltMaze, GeneratorConfig, MazeGenerator};
pub use grid::{CellId, Direction, DirectionFamily, GRID_SIZE};
pub use maze::{Cell, Edge, Maze, MazeOrigin};
pub use path::{LengthBand, PathPrefix};
pub use question::{
    generate_question, Answer, ArithmeticQuestions, FixedQuestions, Grade, Operation, Question,
    QuestionSource,
};
pub use rng::{RandomSource, SequenceRng, SimpleRng};
pub use validate::{validate, Violation};
