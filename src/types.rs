//! This module defines the core data structures and types used throughout the Turing Machine
//! simulator, including the machine description, transitions, execution outcomes, and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::table::TransitionTable;
use crate::Rule;

/// The reserved blank symbol. It is never declared in the alphabet but always belongs to it.
pub const BLANK_SYMBOL: char = 'D';
/// The maximum allowed size for a machine description in bytes.
pub const MAX_DESCRIPTION_SIZE: usize = 65536; // 64KB

/// Policy applied to the analyzer findings while loading a machine description.
///
/// - `Normal` (default): findings are logged as warnings and the machine loads anyway.
///   Ambiguous rules are resolved by "first match wins".
/// - `Strict`: the first finding aborts the load with a validation error.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Mode {
    /// Findings are reported but tolerated.
    #[default]
    Normal,
    /// Findings are treated as errors.
    Strict,
}

/// Represents the possible directions the head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// Returns the move character used in machine descriptions.
    pub fn symbol(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Stay => 'S',
        }
    }

    /// Parses a move character, returning `None` for anything other than `L`, `R` or `S`.
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            'L' => Some(Direction::Left),
            'R' => Some(Direction::Right),
            'S' => Some(Direction::Stay),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single rule: in state `from` reading `read`, write `write`, move `direction`
/// and continue in state `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The source state.
    pub from: String,
    /// The state the machine enters after applying the rule.
    pub to: String,
    /// The symbol that must be under the head.
    pub read: char,
    /// The symbol written over the read symbol.
    pub write: char,
    /// The head movement applied after writing.
    pub direction: Direction,
}

impl fmt::Display for Transition {
    /// Formats the rule in listing form: `FROM TO RW M`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}{} {}",
            self.from, self.to, self.read, self.write, self.direction
        )
    }
}

/// The declared tape symbols. The blank symbol is an implicit member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    /// Builds an alphabet from the declared symbols, in declaration order.
    /// Duplicates and an explicitly listed blank are dropped.
    pub fn new(declared: &str) -> Self {
        let mut symbols = Vec::new();
        for c in declared.chars() {
            if c != BLANK_SYMBOL && !symbols.contains(&c) {
                symbols.push(c);
            }
        }

        Self { symbols }
    }

    /// Checks whether `c` may appear on the tape, the blank included.
    pub fn contains(&self, c: char) -> bool {
        c == BLANK_SYMBOL || self.symbols.contains(&c)
    }

    /// Returns the declared (non-blank) symbols.
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.symbols.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

/// A fully loaded machine description. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachineSpec {
    /// Declared number of states. Informational only.
    pub state_count: usize,
    /// The state the machine starts in.
    pub start_state: String,
    /// Reaching this state accepts the input.
    pub accept_state: String,
    /// The declared tape alphabet.
    pub alphabet: Alphabet,
    /// The transition rules grouped by source state.
    pub table: TransitionTable,
}

impl MachineSpec {
    /// Returns the state a fresh run begins in.
    pub fn initial_state(&self) -> State {
        self.state_for(&self.start_state)
    }

    /// Maps a state identifier onto the run state machine.
    pub fn state_for(&self, id: &str) -> State {
        if id == self.accept_state {
            State::Accept
        } else {
            State::Running(id.to_string())
        }
    }
}

/// The control state of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    /// The machine is in the named, non-accepting state.
    Running(String),
    /// The machine reached its accept state.
    Accept,
    /// No transition applied, or the tape was rejected before the run.
    Reject,
}

impl State {
    /// Checks whether the run is over.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, State::Running(_))
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Running(id) => write!(f, "{id}"),
            State::Accept => write!(f, "<accept>"),
            State::Reject => write!(f, "<reject>"),
        }
    }
}

/// The terminal outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The machine reached its accept state.
    Accepted,
    /// The machine was rejected.
    Rejected(Rejection),
}

impl Verdict {
    /// Checks whether the verdict is an acceptance.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accepted => write!(f, "Accepted."),
            Verdict::Rejected(Rejection::InvalidSymbol(c)) => {
                write!(f, "{c} is not in the alphabet! Rejected.")
            }
            Verdict::Rejected(_) => write!(f, "Rejected."),
        }
    }
}

/// Why a run was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    /// The supplied tape was empty.
    EmptyTape,
    /// The supplied tape contained a symbol outside the alphabet.
    InvalidSymbol(char),
    /// No rule matched the current state and the symbol under the head.
    NoTransition { state: String, symbol: char },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::EmptyTape => write!(f, "tape is empty"),
            Rejection::InvalidSymbol(c) => write!(f, "{c} is not in the alphabet"),
            Rejection::NoTransition { state, symbol } => {
                write!(f, "no transition from state {state} reading {symbol}")
            }
        }
    }
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A transition was applied and the run continues.
    Continue,
    /// The run is over.
    Halt(Verdict),
}

/// Represents the fatal errors that can occur while loading or running a machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// The description does not follow the line structure of the format.
    #[error("Description parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// A transition reads or writes a symbol outside the alphabet.
    #[error("Error! {symbol} is not in the alphabet! (line {line})")]
    SymbolNotInAlphabet { symbol: char, line: usize },
    /// A transition uses a move character other than `L`, `R` or `S`.
    #[error("Error! {symbol} is not a valid move! (line {line})")]
    InvalidMove { symbol: char, line: usize },
    /// The description is well formed but inconsistent.
    #[error("Description validation error: {0}")]
    ValidationError(String),
    /// The description could not be read.
    #[error("File error: {0}")]
    FileError(String),
    /// The run did not reach a verdict within the configured number of steps.
    #[error("No verdict after {0} steps")]
    StepLimitExceeded(usize),
}
