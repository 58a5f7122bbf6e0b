//! End-to-end properties of generated mazes

use numpath_core::answers::{assign_answers, mark_dead_ends};
use numpath_core::maze::construct;
use numpath_core::path::path_directions;
use numpath_core::{
    build_maze, Answer, ArithmeticQuestions, BuiltMaze, CellId, FixedQuestions, Grade, Maze,
    MazeGenerator, MazeOrigin, Operation, Question, RandomSource, SequenceRng, SimpleRng,
    Violation,
};
use std::collections::HashSet;

fn build_seeded(seed: u64, previous: Option<&numpath_core::PathPrefix>) -> BuiltMaze {
    let mut rng = SimpleRng::with_seed(seed);
    build_maze(Grade::default(), Operation::Mixed, previous, &mut rng, &mut ArithmeticQuestions)
}

fn assert_path_valid(maze: &Maze) {
    let path = &maze.solution_path;
    assert_eq!(path.first(), Some(&maze.start));
    assert_eq!(path.last(), Some(&maze.exit));
    for w in path.windows(2) {
        assert!(w[0].is_adjacent(w[1]), "{} -> {}", w[0], w[1]);
    }
    let unique: HashSet<CellId> = path.iter().copied().collect();
    assert_eq!(unique.len(), path.len());

    if maze.origin == MazeOrigin::Generated {
        assert!((8..=16).contains(&path.len()), "length {}", path.len());

        let dirs = path_directions(path);
        assert!(dirs.iter().any(|d| d.is_diagonal()), "no diagonal in {:?}", path);
        for run in dirs.windows(4) {
            assert!(run.iter().any(|d| *d != run[0]), "run of four in {:?}", path);
        }
    }
}

fn assert_answers_valid(maze: &Maze) {
    let solution: HashSet<CellId> = maze.solution_path.iter().copied().collect();

    for cell in &maze.cells {
        let out: Vec<_> = maze.outgoing(cell.id).collect();
        assert_eq!(cell.is_dead_end, !cell.is_exit && out.is_empty(), "{}", cell.id);
        if cell.is_exit || cell.is_dead_end {
            continue;
        }

        let answers: HashSet<Answer> = out.iter().map(|e| e.answer).collect();
        assert_eq!(answers.len(), out.len(), "duplicate answers at {}", cell.id);

        if solution.contains(&cell.id) {
            let correct: Vec<_> = out.iter().filter(|e| e.is_correct).collect();
            assert_eq!(correct.len(), 1, "{}", cell.id);
            assert_eq!(correct[0].answer, cell.correct_answer);
        }
    }
    assert!(!maze.cell(maze.exit).is_dead_end);
}

#[test]
fn test_generated_mazes_hold_every_property() {
    for seed in 0..40 {
        let built = build_seeded(seed, None);
        let maze = &built.maze;
        assert_eq!(maze.grid_size, 5);
        assert_eq!(maze.cells.len(), 25);
        assert_eq!(maze.start, CellId::new(0, 2));
        assert_ne!(maze.exit, maze.start);
        assert_eq!(maze.cells.iter().filter(|c| c.is_exit).count(), 1);
        assert_path_valid(maze);
        assert_answers_valid(maze);
        assert!(maze.cells.iter().all(|c| {
            c.correct_answer >= Answer::whole(2) && c.correct_answer <= Answer::whole(999)
        }));
    }
}

#[test]
fn test_generated_mazes_pass_validation() {
    for seed in 100..120 {
        let built = build_seeded(seed, None);
        if built.maze.origin == MazeOrigin::Generated {
            assert_eq!(numpath_core::validate(&built.maze), Ok(()));
        }
    }
}

#[test]
fn test_consecutive_mazes_open_differently() {
    let generator = MazeGenerator::new();
    let mut rng = SimpleRng::with_seed(77);
    let mut previous: Option<BuiltMaze> = None;

    for _ in 0..15 {
        let built = generator.build_maze(
            Grade::default(),
            Operation::Mixed,
            previous.as_ref().map(|b| &b.prefix),
            &mut rng,
            &mut ArithmeticQuestions,
        );
        if let Some(prev) = &previous {
            if built.maze.origin == MazeOrigin::Generated {
                assert_ne!(built.prefix, prev.prefix);
            }
        }
        assert_eq!(built.prefix.cells().len(), built.maze.solution_path.len().min(8));
        previous = Some(built);
    }
}

#[test]
fn test_fixed_draws_rebuild_identically() {
    let mut source = SimpleRng::with_seed(99);
    let draws: Vec<f64> = (0..1009).map(|_| source.next_f64()).collect();
    let build = || {
        let mut rng = SequenceRng::new(draws.clone());
        build_maze(
            Grade::new(6).unwrap(),
            Operation::Mixed,
            None,
            &mut rng,
            &mut ArithmeticQuestions,
        )
    };
    assert_eq!(build(), build());

    let a = build_seeded(5, None);
    let b = build_seeded(5, None);
    assert_eq!(a, b);
}

#[test]
fn test_decimal_grades_keep_distinct_answers() {
    for seed in 0..10 {
        let mut rng = SimpleRng::with_seed(seed);
        let built = build_maze(
            Grade::new(7).unwrap(),
            Operation::Mixed,
            None,
            &mut rng,
            &mut ArithmeticQuestions,
        );
        assert_answers_valid(&built.maze);
    }
}

#[test]
fn test_every_operation_builds() {
    for &op in Operation::all() {
        let mut rng = SimpleRng::with_seed(31);
        let built = build_maze(
            Grade::new(4).unwrap(),
            op,
            None,
            &mut rng,
            &mut ArithmeticQuestions,
        );
        assert_answers_valid(&built.maze);
        assert!(built.maze.cells.iter().all(|c| !c.question.is_empty()));
    }
}

#[test]
fn test_built_maze_json_shape() {
    let built = build_seeded(3, None);
    let json = serde_json::to_value(&built).unwrap();
    assert_eq!(json["maze"]["gridSize"], 5);
    assert_eq!(json["maze"]["startCellId"], "c-0-2");
    assert_eq!(json["maze"]["exitCellId"], built.maze.exit.to_string());
    assert_eq!(json["maze"]["cells"].as_array().unwrap().len(), 25);
    assert_eq!(json["maze"]["paths"].as_array().unwrap().len(), built.maze.edges.len());

    // The correct move out of the start carries the start cell's answer
    let start = &json["maze"]["cells"][CellId::new(0, 2).index(5)];
    assert_eq!((start["x"].as_u64(), start["y"].as_u64()), (Some(0), Some(2)));
    let correct = json["maze"]["paths"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["fromCellId"] == "c-0-2" && p["isCorrectEdge"] == true)
        .unwrap();
    assert_eq!(correct["toCellId"], built.maze.solution_path[1].to_string());
    assert_eq!(correct["answerNumber"], start["correctAnswerNumber"]);
    assert!(json["prefix"].as_array().unwrap().len() <= 8);

    let back: BuiltMaze = serde_json::from_value(json).unwrap();
    assert_eq!(back, built);
}

fn ids(coords: &[(u8, u8)]) -> Vec<CellId> {
    coords.iter().map(|&(x, y)| CellId::new(x, y)).collect()
}

#[test]
fn test_hand_written_path_end_to_end() {
    let path = ids(&[
        (0, 2),
        (1, 1),
        (2, 0),
        (3, 1),
        (4, 0),
        (3, 1),
        (2, 2),
        (1, 3),
        (0, 4),
        (1, 4),
        (2, 3),
        (3, 4),
        (4, 3),
        (4, 2),
    ]);
    let exit = CellId::new(4, 2);
    let mut maze = construct(5, CellId::new(0, 2), exit, path);

    // Four (-1,+1) steps in a row: (4,0) -> (3,1) -> (2,2) -> (1,3) -> (0,4)
    assert_eq!(
        numpath_core::validate(&maze),
        Err(Violation::StraightRun { at: CellId::new(0, 4) })
    );

    let questions: Vec<Question> = (0..25)
        .map(|i| Question::new(format!("{} + 0", 10 + i), Answer::whole(10 + i)))
        .collect();
    for (cell, q) in maze.cells.iter_mut().zip(questions) {
        cell.question = q.text;
        cell.correct_answer = q.answer;
    }
    mark_dead_ends(&mut maze);
    assign_answers(&mut maze);

    assert!(!maze.cell(exit).is_dead_end);
    let edge = maze.edge(CellId::new(3, 1), CellId::new(2, 2)).unwrap();
    assert!(edge.is_correct);
    assert_eq!(edge.answer, maze.cell(CellId::new(3, 1)).correct_answer);
    assert!(!maze.edge(CellId::new(3, 1), CellId::new(4, 0)).unwrap().is_correct);
    assert_answers_valid(&maze);
}

#[test]
fn test_fixed_question_bank_lands_in_row_major_order() {
    let bank: Vec<Question> = (0..25)
        .map(|i| Question::new(format!("q{}", i), Answer::whole(100 + i)))
        .collect();
    let mut rng = SimpleRng::with_seed(12);
    let built = build_maze(
        Grade::default(),
        Operation::Mixed,
        None,
        &mut rng,
        &mut FixedQuestions(bank),
    );
    for (i, cell) in built.maze.cells.iter().enumerate() {
        assert_eq!(cell.question, format!("q{}", i));
        assert_eq!(cell.id, CellId::from_index(i, 5));
    }
}
