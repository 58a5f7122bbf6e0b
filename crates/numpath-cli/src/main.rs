mod memory;
mod render;
mod source;
mod theme;

use clap::Parser;
use memory::SessionMemory;
use numpath_core::{ArithmeticQuestions, Grade, MazeGenerator, Operation};
use rand::rngs::StdRng;
use rand::SeedableRng;
use source::RandSource;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use theme::Theme;
use tracing_subscriber::EnvFilter;

/// Build a number path maze
#[derive(Debug, Parser)]
#[command(name = "numpath", version, about)]
struct Args {
    /// School grade, 3 through 7
    #[arg(short, long, default_value = "5")]
    grade: Grade,

    /// mixed, add, sub, mul, div or fraction
    #[arg(short, long, default_value = "mixed")]
    operation: Operation,

    /// Seed for a reproducible maze
    #[arg(long)]
    seed: Option<u64>,

    /// Print the maze as JSON
    #[arg(long)]
    json: bool,

    /// Ignore and clear the remembered opening
    #[arg(long)]
    forget: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Where to keep state between runs
    #[arg(long)]
    state_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> io::Result<()> {
    let state_path = args.state_file.clone().unwrap_or_else(SessionMemory::default_path);
    let mut memory = SessionMemory::load(&state_path);
    if args.forget {
        memory.last_prefix = None;
    }

    let mut rng = RandSource(match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    });

    tracing::info!(
        grade = %args.grade,
        operation = %args.operation,
        previous = ?memory.last_prefix,
        "building maze"
    );
    let built = MazeGenerator::new().build_maze(
        args.grade,
        args.operation,
        memory.last_prefix.as_ref(),
        &mut rng,
        &mut ArithmeticQuestions,
    );

    memory.record(&built);
    if let Err(e) = memory.save(&state_path) {
        tracing::warn!(path = %state_path.display(), error = %e, "could not save state");
    }

    let mut stdout = io::stdout().lock();
    if args.json {
        let json = serde_json::to_string_pretty(&built)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(stdout, "{}", json)?;
        return Ok(());
    }

    let theme = Theme::default();
    let colored = !args.no_color && stdout.is_terminal();
    render::render_maze(&mut stdout, &built, colored.then_some(&theme))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["numpath"]);
        assert_eq!(args.grade, Grade::default());
        assert_eq!(args.operation, Operation::Mixed);
        assert!(args.seed.is_none());
        assert!(!args.json);
    }

    #[test]
    fn test_parses_options() {
        let args = Args::parse_from([
            "numpath", "-g", "7", "-o", "fraction", "--seed", "42", "--json", "--forget",
        ]);
        assert_eq!(args.grade, Grade::new(7).unwrap());
        assert_eq!(args.operation, Operation::Fraction);
        assert_eq!(args.seed, Some(42));
        assert!(args.json && args.forget);
    }

    #[test]
    fn test_rejects_bad_grade() {
        assert!(Args::try_parse_from(["numpath", "--grade", "9"]).is_err());
        assert!(Args::try_parse_from(["numpath", "--operation", "pow"]).is_err());
    }

    #[test]
    fn test_run_remembers_prefix() {
        let dir = std::env::temp_dir().join(format!("numpath-main-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let state_file = dir.join("state.json");
        let args = Args::parse_from([
            "numpath".to_string(),
            "--seed".to_string(),
            "3".to_string(),
            "--json".to_string(),
            "--state-file".to_string(),
            state_file.display().to_string(),
        ]);
        run(&args).unwrap();
        let first = SessionMemory::load(&state_file);
        assert!(first.last_prefix.is_some());
        assert_eq!(first.mazes_built, 1);

        run(&args).unwrap();
        assert_eq!(SessionMemory::load(&state_file).mazes_built, 2);
        let _ = std::fs::remove_dir_all(dir);
    }
}
