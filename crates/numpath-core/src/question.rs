//! Grade-based arithmetic questions.
//!
//! The maze engine only needs `count` (question, answer) pairs in row-major
//! cell order; [`QuestionSource`] is that seam. [`ArithmeticQuestions`] is the
//! built-in generator used by the game.

use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smallest and largest answer a generated question may have
pub const MIN_ANSWER: i64 = 2;
pub const MAX_ANSWER: i64 = 999;

/// Regeneration budget before falling back to a trivial question
const MAX_QUESTION_TRIES: usize = 50;

/// A numeric answer with one decimal place of precision, stored in tenths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "f64", from = "f64")]
pub struct Answer(i64);

impl Answer {
    pub const fn whole(value: i64) -> Self {
        Self(value * 10)
    }

    pub const fn from_tenths(tenths: i64) -> Self {
        Self(tenths)
    }

    /// Round `value` to a whole number, or to tenths when decimals are allowed
    pub fn rounded(value: f64, allow_decimal: bool) -> Self {
        if allow_decimal {
            Self((value * 10.0).round() as i64)
        } else {
            Self::whole(value.round() as i64)
        }
    }

    pub fn tenths(&self) -> i64 {
        self.0
    }

    pub fn is_whole(&self) -> bool {
        self.0 % 10 == 0
    }

    /// This answer shifted by a whole number of units
    pub fn offset(&self, units: i64) -> Self {
        Self(self.0 + units * 10)
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 10.0
    }
}

impl From<f64> for Answer {
    fn from(value: f64) -> Self {
        Self((value * 10.0).round() as i64)
    }
}

impl From<Answer> for f64 {
    fn from(answer: Answer) -> Self {
        answer.as_f64()
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_whole() {
            write!(f, "{}", self.0 / 10)
        } else {
            write!(f, "{:.1}", self.as_f64())
        }
    }
}

/// A question shown on a cell and its correct answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub answer: Answer,
}

impl Question {
    pub fn new(text: impl Into<String>, answer: Answer) -> Self {
        Self {
            text: text.into(),
            answer,
        }
    }
}

/// School grade controlling arithmetic complexity (3 through 7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Grade(u8);

impl Grade {
    pub const MIN: u8 = 3;
    pub const MAX: u8 = 7;

    pub fn new(grade: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&grade).then_some(Self(grade))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Grade> {
        (Self::MIN..=Self::MAX).map(Grade)
    }

    fn config(&self) -> DifficultyConfig {
        match self.0 {
            3 => DifficultyConfig::new(100, 1),
            4 => DifficultyConfig::new(500, 2),
            6 => DifficultyConfig {
                allow_negative: true,
                allow_decimal: true,
                ..DifficultyConfig::new(1000, 3)
            },
            7 => DifficultyConfig {
                allow_negative: true,
                allow_decimal: true,
                allow_exponent: true,
                allow_fractions: true,
                ..DifficultyConfig::new(5000, 4)
            },
            _ => DifficultyConfig::new(1000, 3),
        }
    }
}

impl Default for Grade {
    fn default() -> Self {
        Self(5)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grade {}", self.0)
    }
}

/// Errors produced when parsing a grade
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseGradeError {
    NotANumber(String),
    OutOfRange(u8),
}

impl fmt::Display for ParseGradeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotANumber(s) => write!(f, "Grade is not a number: {}", s),
            Self::OutOfRange(g) => write!(
                f,
                "Grade {} is outside {}..={}",
                g,
                Grade::MIN,
                Grade::MAX
            ),
        }
    }
}

impl std::error::Error for ParseGradeError {}

impl TryFrom<u8> for Grade {
    type Error = ParseGradeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Grade::new(value).ok_or(ParseGradeError::OutOfRange(value))
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.0
    }
}

impl FromStr for Grade {
    type Err = ParseGradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| ParseGradeError::NotANumber(s.to_string()))?;
        Grade::try_from(value)
    }
}

/// The kind of problem a run is restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    #[default]
    Mixed,
    Add,
    Sub,
    Mul,
    Div,
    Fraction,
}

impl Operation {
    pub fn all() -> &'static [Operation] {
        &[
            Operation::Mixed,
            Operation::Add,
            Operation::Sub,
            Operation::Mul,
            Operation::Div,
            Operation::Fraction,
        ]
    }

    /// Short identifier used by the browser and CLI
    pub fn id(&self) -> &'static str {
        match self {
            Operation::Mixed => "mixed",
            Operation::Add => "add",
            Operation::Sub => "sub",
            Operation::Mul => "mul",
            Operation::Div => "div",
            Operation::Fraction => "fraction",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Mixed => write!(f, "Mixed"),
            Operation::Add => write!(f, "Addition"),
            Operation::Sub => write!(f, "Subtraction"),
            Operation::Mul => write!(f, "Multiplication"),
            Operation::Div => write!(f, "Division"),
            Operation::Fraction => write!(f, "Fractions"),
        }
    }
}

/// Error for an unknown operation identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOperationError(pub String);

impl fmt::Display for ParseOperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown operation: {}", self.0)
    }
}

impl std::error::Error for ParseOperationError {}

impl FromStr for Operation {
    type Err = ParseOperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Operation::all()
            .iter()
            .copied()
            .find(|op| op.id() == lower)
            .ok_or_else(|| ParseOperationError(s.to_string()))
    }
}

/// Supplies the per-cell questions for a maze
pub trait QuestionSource {
    /// Produce `count` questions, one per cell in row-major order
    fn generate(
        &mut self,
        count: usize,
        grade: Grade,
        operation: Operation,
        rng: &mut dyn RandomSource,
    ) -> Vec<Question>;
}

/// A fixed question bank, handed out in order
#[derive(Debug, Clone, Default)]
pub struct FixedQuestions(pub Vec<Question>);

impl QuestionSource for FixedQuestions {
    fn generate(
        &mut self,
        count: usize,
        _: Grade,
        _: Operation,
        _: &mut dyn RandomSource,
    ) -> Vec<Question> {
        self.0.iter().take(count).cloned().collect()
    }
}

/// Arithmetic question generator driven by grade and operation
#[derive(Debug, Clone, Copy, Default)]
pub struct ArithmeticQuestions;

impl QuestionSource for ArithmeticQuestions {
    fn generate(
        &mut self,
        count: usize,
        grade: Grade,
        operation: Operation,
        rng: &mut dyn RandomSource,
    ) -> Vec<Question> {
        (0..count).map(|_| generate_question(grade, operation, &mut *rng)).collect()
    }
}

#[derive(Debug, Clone, Copy)]
struct DifficultyConfig {
    max: i64,
    ops: u8,
    allow_negative: bool,
    allow_decimal: bool,
    allow_exponent: bool,
    allow_fractions: bool,
}

impl DifficultyConfig {
    fn new(max: i64, ops: u8) -> Self {
        Self {
            max,
            ops,
            allow_negative: false,
            allow_decimal: false,
            allow_exponent: false,
            allow_fractions: false,
        }
    }

    /// Largest leading operand for this complexity
    fn cap(&self) -> i64 {
        let by_ops = match self.ops {
            0 | 1 => 50,
            2 => 100,
            3 => 200,
            _ => 500,
        };
        self.max.min(by_ops)
    }
}

/// Generate one question whose answer lies in `[MIN_ANSWER, MAX_ANSWER]`
pub fn generate_question<R: RandomSource>(
    grade: Grade,
    operation: Operation,
    mut rng: R,
) -> Question {
    let config = grade.config();
    for _ in 0..MAX_QUESTION_TRIES {
        let question = match operation {
            Operation::Mixed => mixed_expression(&config, &mut rng),
            op => single_operation(op, &config, &mut rng),
        };
        let answer = question.answer;
        if answer >= Answer::whole(MIN_ANSWER) && answer <= Answer::whole(MAX_ANSWER) {
            return question;
        }
    }
    let a = rng.int_in(1, 9);
    let b = rng.int_in(1, 9);
    Question::new(format!("{} + {}", a, b), Answer::whole(a + b))
}

fn single_operation<R: RandomSource>(
    op: Operation,
    config: &DifficultyConfig,
    rng: &mut R,
) -> Question {
    let cap = config.cap();
    match op {
        Operation::Add => {
            let a = rng.int_in(1, cap);
            let b = rng.int_in(1, cap);
            Question::new(format!("{} + {}", a, b), Answer::whole(a + b))
        }
        Operation::Sub => {
            let a = rng.int_in(MIN_ANSWER + 1, cap.max(MIN_ANSWER + 1));
            let b = rng.int_in(1, a - MIN_ANSWER);
            Question::new(format!("{} − {}", a, b), Answer::whole(a - b))
        }
        Operation::Mul => {
            let a = rng.int_in(2, 12);
            let b = rng.int_in(1, (cap / 10).max(12));
            Question::new(format!("{} × {}", a, b), Answer::whole(a * b))
        }
        Operation::Div => {
            let d = rng.int_in(2, 12);
            let q = rng.int_in(MIN_ANSWER, (cap / d).max(MIN_ANSWER));
            Question::new(format!("{} / {}", q * d, d), Answer::whole(q))
        }
        Operation::Fraction => {
            if config.allow_fractions && rng.chance(0.5) {
                if let Some(q) = fraction_sum(rng) {
                    return q;
                }
            }
            let n = rng.int_in(1, 9);
            let d = rng.int_in(2, 10);
            let k = rng.int_in(1, 10);
            Question::new(format!("{}/{} × {}", n, d, d * k), Answer::whole(n * k))
        }
        Operation::Mixed => mixed_expression(config, rng),
    }
}

fn mixed_expression<R: RandomSource>(config: &DifficultyConfig, rng: &mut R) -> Question {
    let cap = config.cap();
    let decimals = config.allow_decimal;
    let answer = |v: f64| Answer::rounded(v, decimals);

    match config.ops {
        1 => {
            let a = rng.int_in(1, cap);
            match rng.index(3) {
                0 => {
                    let b = rng.int_in(1, cap - a);
                    Question::new(format!("{} + {}", a, b), answer((a + b) as f64))
                }
                1 => {
                    let b = rng.int_in(0, a - 1);
                    Question::new(format!("{} − {}", a, b), answer((a - b) as f64))
                }
                _ => {
                    let b = rng.int_in(1, 12);
                    Question::new(format!("{} × {}", a, b), answer((a * b) as f64))
                }
            }
        }
        2 => {
            if rng.chance(0.5) {
                let d = rng.int_in(2, 12);
                let q = rng.int_in(1, cap / d);
                let b = rng.int_in(1, 50);
                Question::new(format!("({} / {}) + {}", q * d, d, b), answer((q + b) as f64))
            } else {
                let a = rng.int_in(1, 30);
                let b = rng.int_in(2, 10);
                let c = rng.int_in(1, 50);
                Question::new(format!("{} + {} × {}", a, b, c), answer((a + b * c) as f64))
            }
        }
        3 => {
            if config.allow_negative && rng.chance(0.4) {
                let a = rng.int_in(1, 30);
                let b = rng.int_in(2, 12);
                let c = rng.int_in(1, 20);
                return Question::new(
                    format!("-{} + {} × {}", a, b, c),
                    answer((b * c - a) as f64),
                );
            }
            if config.allow_decimal && rng.chance(0.4) {
                let w = rng.int_in(1, 15);
                let t = rng.int_in(1, 9);
                let b = rng.int_in(2, 6);
                let c = rng.int_in(1, 10);
                let v = w as f64 + t as f64 / 10.0 + (b * c) as f64;
                return Question::new(
                    format!("{}.{} + {} × {}", w, t, b, c),
                    Answer::rounded(v, true),
                );
            }
            if rng.chance(0.5) {
                subtract_chain(cap, decimals, rng)
            } else {
                let a = rng.int_in(50, 150);
                let b = rng.int_in(2, 12);
                let c = rng.int_in(1, 50);
                let d = rng.int_in(2, 8);
                Question::new(
                    format!("({} / {}) + {} × {}", a, b, c, d),
                    answer((a / b + c * d) as f64),
                )
            }
        }
        _ => {
            if config.allow_exponent && config.allow_fractions {
                for _ in 0..15 {
                    let candidate = match rng.index(4) {
                        0 => fraction_sum(rng),
                        1 => Some(exponent_ratio(rng)),
                        2 => Some(square_quotient(rng)),
                        _ => Some(exponent_sum(rng)),
                    };
                    if let Some(q) = candidate {
                        if q.answer >= Answer::whole(MIN_ANSWER) && q.answer <= Answer::whole(500) {
                            return q;
                        }
                    }
                }
            }
            subtract_chain(cap, decimals, rng)
        }
    }
}

fn subtract_chain<R: RandomSource>(cap: i64, decimals: bool, rng: &mut R) -> Question {
    let a = rng.int_in(50, cap.max(50));
    let b = rng.int_in(5, 30);
    let c = rng.int_in(2, 10);
    let d = rng.int_in(10, 60);
    Question::new(
        format!("{} − {} × {} + {}", a, b, c, d),
        Answer::rounded((a - b * c + d) as f64, decimals),
    )
}

fn fraction_sum<R: RandomSource>(rng: &mut R) -> Option<Question> {
    let (n1, d1) = (rng.int_in(1, 9), rng.int_in(2, 10));
    let (n2, d2) = (rng.int_in(1, 9), rng.int_in(2, 10));
    let mult = d1 * d2;
    let v = n1 * d2 + n2 * d1;
    (v >= MIN_ANSWER).then(|| {
        Question::new(
            format!("({}/{} + {}/{}) × {}", n1, d1, n2, d2, mult),
            Answer::whole(v),
        )
    })
}

fn exponent<R: RandomSource>(rng: &mut R) -> (i64, u32) {
    (rng.int_in(2, 12), rng.int_in(2, 3) as u32)
}

fn exponent_ratio<R: RandomSource>(rng: &mut R) -> Question {
    let (b1, e1) = exponent(rng);
    let (b2, e2) = exponent(rng);
    let m = rng.int_in(2, 8);
    let d = rng.int_in(2, 6);
    let v = b1.pow(e1) as f64 + (b2.pow(e2) * m) as f64 / d as f64;
    Question::new(
        format!("{}^{} + {}^{} × {} / {}", b1, e1, b2, e2, m, d),
        Answer::rounded(v, true),
    )
}

fn square_quotient<R: RandomSource>(rng: &mut R) -> Question {
    let b = rng.int_in(2, 5);
    let sub = rng.int_in(1, b * b - 1);
    let denom = b * b - sub;
    let quo = rng.int_in(2, 12);
    let add = rng.int_in(1, 15);
    Question::new(
        format!("{} / ({}^2 − {}) + {}", denom * quo, b, sub, add),
        Answer::whole(quo + add),
    )
}

fn exponent_sum<R: RandomSource>(rng: &mut R) -> Question {
    let (b1, e1) = exponent(rng);
    let (b2, e2) = exponent(rng);
    let add = rng.int_in(1, 25);
    Question::new(
        format!("{}^{} + {}^{} + {}", b1, e1, b2, e2, add),
        Answer::whole(b1.pow(e1) + b2.pow(e2) + add),
    )
}
