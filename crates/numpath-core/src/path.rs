//! Solution path search.
//!
//! A randomized depth-first walk from the start cell to the exit. Candidate
//! steps are ordered to favor turns, and a path that opens the same way as
//! the previously accepted maze is not accepted.

use crate::grid::{neighbor_candidates, CellId, Direction, ALL_DIRECTIONS};
use crate::retry::{Attempt, Outcome, Rejection, RetryPolicy};
use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of leading cells remembered between generations
pub const PATH_PREFIX_LENGTH: usize = 8;

/// Longest run of identical steps a search will produce
pub const MAX_STRAIGHT_RUN: usize = 3;

/// Opening cells of an accepted solution path.
///
/// Passing the previous build's prefix into the next build keeps two mazes
/// in a row from starting the same way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathPrefix(Vec<CellId>);

impl PathPrefix {
    /// The first `len` cells of `path`
    pub fn of(path: &[CellId], len: usize) -> Self {
        Self(path.iter().take(len).copied().collect())
    }

    pub fn cells(&self) -> &[CellId] {
        &self.0
    }
}

impl fmt::Display for PathPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "|")?;
            }
            write!(f, "{}", id)?;
        }
        Ok(())
    }
}

impl FromStr for PathPrefix {
    type Err = crate::grid::ParseCellIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self(Vec::new()));
        }
        s.split('|')
            .map(str::parse::<CellId>)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// Inclusive bounds on the number of cells in a solution path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthBand {
    pub min: usize,
    pub max: usize,
}

impl LengthBand {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, len: usize) -> bool {
        (self.min..=self.max).contains(&len)
    }
}

/// One search problem: where to go, how long the path may be, and what the
/// last accepted maze opened with.
#[derive(Debug, Clone)]
pub struct PathSearch<'a> {
    pub size: u8,
    pub start: CellId,
    pub exit: CellId,
    pub band: LengthBand,
    pub previous: Option<&'a PathPrefix>,
    pub prefix_len: usize,
    /// Cells a single attempt may expand before giving up
    pub expansion_budget: usize,
}

impl<'a> PathSearch<'a> {
    /// Run fresh attempts until one yields a path or the policy is spent
    pub fn run<R: RandomSource>(&self, rng: &mut R, policy: RetryPolicy) -> Outcome<Vec<CellId>> {
        policy.run("path search", |_| self.attempt(&mut *rng))
    }

    /// A single randomized depth-first search
    pub fn attempt<R: RandomSource>(&self, rng: R) -> Attempt<Vec<CellId>> {
        let cells = self.size as usize * self.size as usize;
        let mut walk = Walk {
            search: self,
            rng,
            visited: vec![false; cells],
            path: vec![self.start],
            expansions: 0,
            out_of_budget: false,
        };
        walk.visited[self.start.index(self.size)] = true;

        if walk.extend(self.start, None, 0) {
            Attempt::Accepted(walk.path)
        } else {
            Attempt::Rejected(Rejection::SearchExhausted)
        }
    }

    fn prefix_is_fresh(&self, path: &[CellId]) -> bool {
        match self.previous {
            Some(previous) => PathPrefix::of(path, self.prefix_len) != *previous,
            None => true,
        }
    }
}

struct Walk<'s, 'a, R> {
    search: &'s PathSearch<'a>,
    rng: R,
    visited: Vec<bool>,
    path: Vec<CellId>,
    expansions: usize,
    out_of_budget: bool,
}

impl<R: RandomSource> Walk<'_, '_, R> {
    /// Extend the path from `current`; `last` is the step that reached it and
    /// `run` how many identical steps ended there.
    fn extend(&mut self, current: CellId, last: Option<Direction>, run: usize) -> bool {
        self.expansions += 1;
        if self.expansions > self.search.expansion_budget {
            self.out_of_budget = true;
            return false;
        }

        let band = self.search.band;
        if current == self.search.exit {
            return band.contains(self.path.len()) && self.search.prefix_is_fresh(&self.path);
        }
        if self.path.len() >= band.max {
            return false;
        }

        for (next, dir) in self.ordered_candidates(current, last, run) {
            let slot = next.index(self.search.size);
            if self.visited[slot] {
                continue;
            }
            if next == self.search.exit && self.path.len() + 1 < band.min {
                continue;
            }
            if last == Some(dir) && run >= MAX_STRAIGHT_RUN {
                continue;
            }

            self.visited[slot] = true;
            self.path.push(next);
            let next_run = if last == Some(dir) { run + 1 } else { 1 };
            if self.extend(next, Some(dir), next_run) {
                return true;
            }
            self.path.pop();
            self.visited[slot] = false;

            if self.out_of_budget {
                return false;
            }
        }
        false
    }

    /// Shuffled neighbors, sorted by a penalty that discourages repeating the
    /// previous step's family or exact vector, plus jitter to break ties.
    fn ordered_candidates(
        &mut self,
        current: CellId,
        last: Option<Direction>,
        run: usize,
    ) -> Vec<(CellId, Direction)> {
        let mut candidates = neighbor_candidates(current, &ALL_DIRECTIONS, self.search.size);
        self.rng.shuffle(&mut candidates);

        let last_family = last.map(|d| d.family());
        let mut scored: Vec<(f64, CellId, Direction)> = candidates
            .into_iter()
            .map(|(id, dir)| {
                let mut penalty = 0.0;
                if last_family == Some(dir.family()) {
                    penalty += if run >= 2 { 5.0 } else { 2.0 };
                }
                if last == Some(dir) {
                    penalty += 1.0;
                }
                (penalty + self.rng.next_f64(), id, dir)
            })
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        scored.into_iter().map(|(_, id, dir)| (id, dir)).collect()
    }
}

/// Straight-line route from `start` to `exit`: diagonal while both
/// coordinates differ, then orthogonal. Always adjacent and never repeats a
/// cell, but ignores length, turn and diagonal constraints.
pub fn fallback_path(start: CellId, exit: CellId) -> Vec<CellId> {
    let mut path = vec![start];
    let (mut x, mut y) = (start.x as i16, start.y as i16);
    let (ex, ey) = (exit.x as i16, exit.y as i16);

    while x != ex || y != ey {
        x += (ex - x).signum();
        y += (ey - y).signum();
        path.push(CellId::new(x as u8, y as u8));
    }
    path
}

/// Step vectors between consecutive path cells
pub fn path_directions(path: &[CellId]) -> Vec<Direction> {
    path.windows(2).map(|w| Direction::between(w[0], w[1])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GRID_SIZE;
    use crate::rng::SimpleRng;

    const START: CellId = CellId::new(0, 2);

    fn search(exit: CellId, band: LengthBand, previous: Option<&PathPrefix>) -> PathSearch<'_> {
        PathSearch {
            size: GRID_SIZE,
            start: START,
            exit,
            band,
            previous,
            prefix_len: PATH_PREFIX_LENGTH,
            expansion_budget: 20_000,
        }
    }

    fn assert_valid(path: &[CellId], exit: CellId, band: LengthBand) {
        assert_eq!(path.first(), Some(&START));
        assert_eq!(path.last(), Some(&exit));
        assert!(band.contains(path.len()), "length {} outside {:?}", path.len(), band);
        for w in path.windows(2) {
            assert!(w[0].is_adjacent(w[1]), "{} -> {} not adjacent", w[0], w[1]);
        }
        let mut seen = path.to_vec();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), path.len(), "repeated cell in {:?}", path);

        let dirs = path_directions(path);
        for run in dirs.windows(MAX_STRAIGHT_RUN + 1) {
            assert!(run.iter().any(|d| *d != run[0]), "straight run in {:?}", path);
        }
    }

    #[test]
    fn test_search_produces_valid_paths() {
        let mut rng = SimpleRng::with_seed(11);
        let band = LengthBand::new(9, 14);
        for exit in [CellId::new(4, 2), CellId::new(4, 4), CellId::new(1, 2), CellId::new(0, 0)] {
            let outcome = search(exit, band, None).run(&mut rng, RetryPolicy::new(200));
            let path = outcome.ok().expect("search should succeed");
            assert_valid(&path, exit, band);
        }
    }

    #[test]
    fn test_search_avoids_previous_prefix() {
        let mut rng = SimpleRng::with_seed(3);
        let band = LengthBand::new(8, 14);
        let exit = CellId::new(4, 0);
        for _ in 0..10 {
            let first = search(exit, band, None).run(&mut rng, RetryPolicy::new(200)).ok().unwrap();
            let prefix = PathPrefix::of(&first, PATH_PREFIX_LENGTH);
            let second = search(exit, band, Some(&prefix))
                .run(&mut rng, RetryPolicy::new(200))
                .ok()
                .unwrap();
            assert_ne!(PathPrefix::of(&second, PATH_PREFIX_LENGTH), prefix);
        }
    }

    #[test]
    fn test_tiny_budget_rejects_attempt() {
        let mut s = search(CellId::new(4, 2), LengthBand::new(8, 12), None);
        s.expansion_budget = 3;
        let attempt = s.attempt(SimpleRng::with_seed(1));
        assert_eq!(attempt, Attempt::Rejected(Rejection::SearchExhausted));
    }

    #[test]
    fn test_impossible_band_exhausts() {
        // A 5x5 grid has only 25 cells
        let s = search(CellId::new(4, 2), LengthBand::new(30, 40), None);
        let outcome = s.run(&mut SimpleRng::with_seed(1), RetryPolicy::new(3));
        assert_eq!(outcome.attempts(), 3);
        assert!(outcome.ok().is_none());
    }

    #[test]
    fn test_fallback_path_shape() {
        assert_eq!(
            fallback_path(START, CellId::new(4, 0)),
            vec![
                CellId::new(0, 2),
                CellId::new(1, 1),
                CellId::new(2, 0),
                CellId::new(3, 0),
                CellId::new(4, 0),
            ]
        );
        assert_eq!(
            fallback_path(START, CellId::new(0, 4)),
            vec![CellId::new(0, 2), CellId::new(0, 3), CellId::new(0, 4)]
        );
        for exit in CellId::all(GRID_SIZE) {
            let path = fallback_path(START, exit);
            assert_eq!(path.last(), Some(&exit));
            assert!(path.windows(2).all(|w| w[0].is_adjacent(w[1])));
        }
    }

    #[test]
    fn test_prefix_text_round_trip() {
        let prefix = PathPrefix::of(&[CellId::new(0, 2), CellId::new(1, 1), CellId::new(2, 0)], 8);
        assert_eq!(prefix.to_string(), "c-0-2|c-1-1|c-2-0");
        assert_eq!(prefix.to_string().parse::<PathPrefix>(), Ok(prefix));
        assert_eq!("".parse::<PathPrefix>().map(|p| p.cells().len()), Ok(0));
        assert!("c-0-2|oops".parse::<PathPrefix>().is_err());
    }
}
