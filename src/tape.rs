//! This module defines the `Tape`, a row of cells that grows with blanks in both directions
//! as the head moves past either end.

use crate::types::{Alphabet, Direction, Rejection, BLANK_SYMBOL};
use serde::Serialize;
use std::fmt;

/// The tape of a single run together with its head.
///
/// The head always points at an existing cell: moving off either end first adds a blank
/// cell there. `origin` tracks where the first input cell currently sits in `cells`, so
/// positions stay relative to the original input even after growing to the left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tape {
    cells: Vec<char>,
    head: usize,
    origin: usize,
}

impl Tape {
    /// Validates `input` against the alphabet and builds a tape with the head on the first cell.
    ///
    /// # Returns
    ///
    /// * `Ok(Tape)` if every character belongs to the alphabet or is the blank.
    /// * `Err(Rejection::EmptyTape)` if `input` is empty.
    /// * `Err(Rejection::InvalidSymbol)` with the first offending character otherwise.
    pub fn new(input: &str, alphabet: &Alphabet) -> Result<Self, Rejection> {
        if input.is_empty() {
            return Err(Rejection::EmptyTape);
        }

        if let Some(c) = input.chars().find(|&c| !alphabet.contains(c)) {
            return Err(Rejection::InvalidSymbol(c));
        }

        Ok(Self {
            cells: input.chars().collect(),
            head: 0,
            origin: 0,
        })
    }

    /// Advances the head rightwards past the leading run of blanks.
    ///
    /// On an all-blank tape the head ends on a new blank cell right after the input.
    pub fn skip_blanks(&mut self) {
        let end = self.cells.len();
        while self.head < end && self.read() == BLANK_SYMBOL {
            self.shift(Direction::Right);
        }
    }

    /// Returns the symbol under the head.
    pub fn read(&self) -> char {
        self.cells[self.head]
    }

    /// Overwrites the symbol under the head.
    pub fn write(&mut self, symbol: char) {
        self.cells[self.head] = symbol;
    }

    /// Moves the head one cell, growing the tape with a blank when it runs off an end.
    pub fn shift(&mut self, direction: Direction) {
        match direction {
            Direction::Left => {
                if self.head == 0 {
                    self.cells.insert(0, BLANK_SYMBOL);
                    self.origin += 1;
                } else {
                    self.head -= 1;
                }
            }
            Direction::Right => {
                self.head += 1;
                if self.head == self.cells.len() {
                    self.cells.push(BLANK_SYMBOL);
                }
            }
            Direction::Stay => {}
        }
    }

    /// Returns the head position relative to the first input cell. Negative once the head
    /// has moved left of the input.
    pub fn position(&self) -> isize {
        self.head as isize - self.origin as isize
    }

    /// Returns the index of the head into `cells()`.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns every cell written or visited so far.
    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    /// Returns the tape contents as a string.
    pub fn contents(&self) -> String {
        self.cells.iter().collect()
    }
}

impl fmt::Display for Tape {
    /// Renders the cells with the symbol under the head in brackets, e.g. `D1[1]D`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.cells.iter().enumerate() {
            if i == self.head {
                write!(f, "[{c}]")?;
            } else {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}
