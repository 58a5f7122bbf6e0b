//! Bounded retry loops.
//!
//! Each stage of maze generation that can fail (path search, whole-maze
//! validation, answer de-duplication) reports an [`Attempt`] per try. A
//! [`RetryPolicy`] runs the stage until it is accepted or the budget is spent,
//! and the caller decides what to fall back to on [`Outcome::Exhausted`].

use crate::validate::Violation;
use std::fmt;

/// Why a single attempt was thrown away
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The randomized search found no path in its band
    SearchExhausted,
    /// A constructed maze broke a structural rule
    Invalid(Violation),
    /// Not enough distinct answer values were produced
    Collision,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SearchExhausted => write!(f, "no solution path found"),
            Self::Invalid(v) => write!(f, "invalid maze: {}", v),
            Self::Collision => write!(f, "answer collision"),
        }
    }
}

/// Result of one try
#[derive(Debug, Clone, PartialEq)]
pub enum Attempt<T> {
    Accepted(T),
    Rejected(Rejection),
}

/// Result of a whole retry loop
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success { value: T, attempts: usize },
    Exhausted { attempts: usize, last: Option<Rejection> },
}

impl<T> Outcome<T> {
    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Success { value, .. } => Some(value),
            Outcome::Exhausted { .. } => None,
        }
    }

    pub fn attempts(&self) -> usize {
        match self {
            Outcome::Success { attempts, .. } | Outcome::Exhausted { attempts, .. } => *attempts,
        }
    }
}

/// Fixed attempt budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
}

impl RetryPolicy {
    pub const fn new(max_attempts: usize) -> Self {
        Self { max_attempts }
    }

    /// Run `attempt` with the zero-based attempt index until it is accepted
    /// or the budget runs out.
    pub fn run<T>(&self, stage: &str, mut attempt: impl FnMut(usize) -> Attempt<T>) -> Outcome<T> {
        let mut last = None;
        for index in 0..self.max_attempts {
            match attempt(index) {
                Attempt::Accepted(value) => {
                    return Outcome::Success {
                        value,
                        attempts: index + 1,
                    }
                }
                Attempt::Rejected(reason) => {
                    tracing::debug!(stage, attempt = index, %reason, "attempt rejected");
                    last = Some(reason);
                }
            }
        }
        Outcome::Exhausted {
            attempts: self.max_attempts,
            last,
        }
    }
}
