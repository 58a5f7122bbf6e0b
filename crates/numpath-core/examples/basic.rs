//! Basic example of using the maze engine

use numpath_core::{Grade, MazeGenerator, MazeOrigin, Operation};

fn main() {
    let generator = MazeGenerator::new();

    println!("Generating a Grade 5 maze...\n");
    let built = generator.build(Grade::default(), Operation::Mixed, None);
    let maze = &built.maze;

    println!("Start: {}  Exit: {}", maze.start, maze.exit);
    if maze.origin == MazeOrigin::Fallback {
        println!("(straight-line fallback maze)");
    }

    println!("\nSolution path ({} cells):", maze.solution_path.len());
    for pair in maze.solution_path.windows(2) {
        let cell = maze.cell(pair[0]);
        println!("  {}  {} = {}  ->  {}", cell.id, cell.question, cell.correct_answer, pair[1]);
    }

    let start = maze.cell(maze.start);
    println!("\nChoices on the start cell ({}):", start.question);
    for edge in maze.outgoing(maze.start) {
        let marker = if edge.is_correct { "*" } else { " " };
        println!("  {} {} -> {}", marker, edge.answer, edge.to);
    }

    // Pass the prefix back so the next maze opens a different way
    let next = generator.build(Grade::default(), Operation::Mixed, Some(&built.prefix));
    println!("\nPrevious opening: {}", built.prefix);
    println!("Next opening:     {}", next.prefix);
}
