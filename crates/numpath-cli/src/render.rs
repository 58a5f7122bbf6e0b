use crate::theme::Theme;
use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use numpath_core::{BuiltMaze, CellId, Maze, MazeOrigin};
use std::collections::HashMap;
use std::io::{self, Write};

/// Characters per grid cell, including padding
const CELL_WIDTH: usize = 5;

/// Print `text`, colored when a theme is active
fn paint<W: Write>(out: &mut W, color: Option<Color>, text: &str) -> io::Result<()> {
    match color {
        Some(color) => queue!(out, SetForegroundColor(color), Print(text), ResetColor),
        None => queue!(out, Print(text)),
    }
}

/// Position of each solution cell along the path, 1-based
fn path_order(maze: &Maze) -> HashMap<CellId, usize> {
    maze.solution_path.iter().enumerate().map(|(i, &id)| (id, i + 1)).collect()
}

/// Short label for a grid cell: start, exit, step number, dead end or blank
pub fn cell_label(maze: &Maze, id: CellId, order: &HashMap<CellId, usize>) -> String {
    if id == maze.start {
        "S".to_string()
    } else if id == maze.exit {
        "E".to_string()
    } else if let Some(step) = order.get(&id) {
        step.to_string()
    } else if maze.cell(id).is_dead_end {
        "x".to_string()
    } else {
        ".".to_string()
    }
}

fn label_color(
    maze: &Maze,
    id: CellId,
    order: &HashMap<CellId, usize>,
    theme: Option<&Theme>,
) -> Option<Color> {
    let theme = theme?;
    Some(if id == maze.start {
        theme.start
    } else if id == maze.exit {
        theme.exit
    } else if order.contains_key(&id) {
        theme.path
    } else if maze.cell(id).is_dead_end {
        theme.dead_end
    } else {
        theme.info
    })
}

fn border_line(size: u8) -> String {
    let mut line = String::from("+");
    for _ in 0..size {
        line.push_str(&"-".repeat(CELL_WIDTH));
        line.push('+');
    }
    line.push('\n');
    line
}

/// Draw the grid with the solution path numbered in order
pub fn render_grid<W: Write>(out: &mut W, maze: &Maze, theme: Option<&Theme>) -> io::Result<()> {
    let order = path_order(maze);
    let border = border_line(maze.grid_size);
    let border_color = theme.map(|t| t.border);

    for y in 0..maze.grid_size {
        paint(out, border_color, &border)?;
        paint(out, border_color, "|")?;
        for x in 0..maze.grid_size {
            let id = CellId::new(x, y);
            let label = cell_label(maze, id, &order);
            let text = format!("{:^width$}", label, width = CELL_WIDTH);
            paint(out, label_color(maze, id, &order, theme), &text)?;
            paint(out, border_color, "|")?;
        }
        queue!(out, Print("\n"))?;
    }
    paint(out, border_color, &border)
}

/// List each step of the solution: the question, the choices offered and
/// where the correct answer leads
pub fn render_steps<W: Write>(out: &mut W, maze: &Maze, theme: Option<&Theme>) -> io::Result<()> {
    let question_color = theme.map(|t| t.question);
    let correct_color = theme.map(|t| t.correct);
    let info_color = theme.map(|t| t.info);

    for (i, pair) in maze.solution_path.windows(2).enumerate() {
        let (from, to) = (pair[0], pair[1]);
        let cell = maze.cell(from);

        paint(out, info_color, &format!("{:>3}. {} ", i + 1, from))?;
        paint(out, question_color, &format!("{} = ?", cell.question))?;
        paint(out, info_color, "  [")?;
        for (j, edge) in maze.outgoing(from).enumerate() {
            if j > 0 {
                paint(out, info_color, " ")?;
            }
            let color = if edge.is_correct && edge.to == to {
                correct_color
            } else {
                info_color
            };
            paint(out, color, &edge.answer.to_string())?;
        }
        paint(out, info_color, "]  -> ")?;
        paint(out, correct_color, &format!("{} via {}\n", to, cell.correct_answer))?;
    }
    Ok(())
}

/// Full text report for a built maze
pub fn render_maze<W: Write>(
    out: &mut W,
    built: &BuiltMaze,
    theme: Option<&Theme>,
) -> io::Result<()> {
    let maze = &built.maze;
    let fg = theme.map(|t| t.fg);
    let info = theme.map(|t| t.info);

    paint(
        out,
        fg,
        &format!(
            "Maze {}x{}  start {}  exit {}  path {} cells\n",
            maze.grid_size,
            maze.grid_size,
            maze.start,
            maze.exit,
            maze.solution_path.len()
        ),
    )?;
    if maze.origin == MazeOrigin::Fallback {
        paint(out, theme.map(|t| t.dead_end), "(straight-line fallback maze)\n")?;
    }
    render_grid(out, maze, theme)?;
    paint(out, info, "S start, E exit, numbers mark the path, x dead end\n\n")?;
    render_steps(out, maze, theme)?;
    paint(out, info, &format!("\nPrefix: {}\n", built.prefix))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use numpath_core::{build_maze, ArithmeticQuestions, Grade, Operation, SimpleRng};

    fn built(seed: u64) -> BuiltMaze {
        let mut rng = SimpleRng::with_seed(seed);
        build_maze(Grade::default(), Operation::Add, None, &mut rng, &mut ArithmeticQuestions)
    }

    fn plain(built: &BuiltMaze) -> String {
        let mut buf = Vec::new();
        render_maze(&mut buf, built, None).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_labels() {
        let built = built(2);
        let maze = &built.maze;
        let order = path_order(maze);
        assert_eq!(cell_label(maze, maze.start, &order), "S");
        assert_eq!(cell_label(maze, maze.exit, &order), "E");
        if maze.solution_path.len() > 2 {
            assert_eq!(cell_label(maze, maze.solution_path[1], &order), "2");
        }
    }

    #[test]
    fn test_plain_output_has_no_escape_codes() {
        let text = plain(&built(6));
        assert!(!text.contains('\x1b'));
        let grid: String = text.lines().filter(|l| l.starts_with('|')).collect();
        assert_eq!(grid.matches(" S ").count(), 1);
        assert_eq!(grid.matches(" E ").count(), 1);
        assert!(text.contains("S start, E exit"));
        assert!(text.contains("Prefix: c-0-2"));
    }

    #[test]
    fn test_grid_shape() {
        let built = built(9);
        let mut buf = Vec::new();
        render_grid(&mut buf, &built.maze, None).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        // a border above each row plus one below
        assert_eq!(lines.len(), 11);
        assert!(lines.iter().all(|l| l.len() == 1 + 5 * (CELL_WIDTH + 1)));
    }

    #[test]
    fn test_one_step_line_per_move() {
        let built = built(12);
        let mut buf = Vec::new();
        render_steps(&mut buf, &built.maze, None).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), built.maze.solution_path.len() - 1);
        assert!(text.lines().all(|l| l.contains("= ?")));
    }

    #[test]
    fn test_themed_output_is_colored() {
        let built = built(1);
        let mut buf = Vec::new();
        render_maze(&mut buf, &built, Some(&Theme::dark())).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains('\x1b'));
    }
}
