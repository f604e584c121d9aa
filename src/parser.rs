//! This module provides the parser for machine descriptions, utilizing the `pest` crate.
//! It defines the grammar for description files and functions to turn the parse tree into a
//! validated `MachineSpec`.

use crate::{
    analyzer,
    table::TransitionTable,
    types::{
        Alphabet, Direction, MachineSpec, Mode, Transition, TuringMachineError, BLANK_SYMBOL,
        MAX_DESCRIPTION_SIZE,
    },
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::{Pair, Pairs},
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use tracing::{debug, warn};

/// Derives a `PestParser` for the description grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct DescriptionParser;

/// Parses a machine description using the default `Mode::Normal` policy.
///
/// # Arguments
///
/// * `input` - A string slice containing the machine description.
///
/// # Returns
///
/// * `Ok(MachineSpec)` if the input is successfully parsed and validated.
/// * `Err(TuringMachineError::ParseError)` if the line structure is wrong.
/// * `Err(TuringMachineError::SymbolNotInAlphabet)` or `Err(TuringMachineError::InvalidMove)`
///   if a transition record is invalid.
pub fn parse(input: &str) -> Result<MachineSpec, TuringMachineError> {
    parse_with_mode(input, Mode::Normal)
}

/// Parses a machine description and applies the analyzer under the given `mode`.
///
/// In `Mode::Strict` any analyzer finding (for example two rules of one state reading the
/// same symbol) is returned as a `TuringMachineError::ValidationError`.
pub fn parse_with_mode(input: &str, mode: Mode) -> Result<MachineSpec, TuringMachineError> {
    check_size(input)?;

    let root = DescriptionParser::parse(Rule::description, input)
        .map_err(|e| TuringMachineError::ParseError(e.into()))?
        .next()
        .ok_or_else(|| TuringMachineError::ValidationError("Empty description".into()))?;

    let spec = parse_description(root)?;

    debug!(
        start = %spec.start_state,
        accept = %spec.accept_state,
        alphabet = %spec.alphabet,
        states = spec.table.state_count(),
        transitions = spec.table.len(),
        "parsed machine description"
    );

    analyzer::check(&spec, mode)?;

    Ok(spec)
}

/// Parses a transition listing (`FROM TO RW M` per line) back into a `TransitionTable`.
///
/// Records go through the same validation and grouping as the transitions of a description.
pub fn parse_listing(
    input: &str,
    alphabet: &Alphabet,
) -> Result<TransitionTable, TuringMachineError> {
    check_size(input)?;

    let root = DescriptionParser::parse(Rule::listing, input)
        .map_err(|e| TuringMachineError::ParseError(e.into()))?
        .next()
        .ok_or_else(|| TuringMachineError::ValidationError("Empty listing".into()))?;

    root.into_inner()
        .filter(|p| p.as_rule() == Rule::listed_transition)
        .map(|p| parse_transition(p, alphabet))
        .collect()
}

/// Parses the header and every transition record of a `Pair<Rule::description>`.
fn parse_description(pair: Pair<Rule>) -> Result<MachineSpec, TuringMachineError> {
    let mut state_count = 0;
    let mut start_state = String::new();
    let mut accept_state = String::new();
    let mut alphabet = Alphabet::default();
    let mut table = TransitionTable::new();

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::header => {
                (state_count, start_state, accept_state, alphabet) = parse_header(p)?;
            }
            Rule::transition => table.insert(parse_transition(p, &alphabet)?),
            _ => {} // EOI
        }
    }

    Ok(MachineSpec {
        state_count,
        start_state,
        accept_state,
        alphabet,
        table,
    })
}

/// Parses the four header lines: state count, start state, accept state and alphabet.
fn parse_header(
    pair: Pair<Rule>,
) -> Result<(usize, String, String, Alphabet), TuringMachineError> {
    let mut pairs = pair.into_inner();

    let count_pair = pairs.next();
    let state_count = match &count_pair {
        Some(p) => p
            .as_str()
            .parse::<usize>()
            .map_err(|_| parse_error("State count is out of range", p.as_span()))?,
        None => 0,
    };

    let start_state = parse_string(&mut pairs);
    let accept_state = parse_string(&mut pairs);
    let declared = parse_string(&mut pairs);

    if declared.contains(BLANK_SYMBOL) {
        warn!(
            blank = %BLANK_SYMBOL,
            "the blank symbol is implicit and should not be declared in the alphabet"
        );
    }

    Ok((state_count, start_state, accept_state, Alphabet::new(&declared)))
}

/// Parses a single transition record from a `Pair<Rule::transition>` or
/// `Pair<Rule::listed_transition>`.
///
/// The read symbol, the write symbol and the move character are checked in that order and the
/// first violation is reported with the line of the record.
fn parse_transition(
    pair: Pair<Rule>,
    alphabet: &Alphabet,
) -> Result<Transition, TuringMachineError> {
    let (line, _) = pair.line_col();
    let mut pairs = pair.into_inner();

    let from = parse_string(&mut pairs);
    let to = parse_string(&mut pairs);

    // Rule: (action | listed_action) > symbol, symbol, move_symbol
    let mut action = pairs.next().map(Pair::into_inner).into_iter().flatten();
    let read = parse_symbol(action.next().as_ref());
    let write = parse_symbol(action.next().as_ref());
    let movement = parse_symbol(action.next().as_ref());

    for symbol in [read, write] {
        if !alphabet.contains(symbol) {
            return Err(TuringMachineError::SymbolNotInAlphabet { symbol, line });
        }
    }

    let direction = Direction::from_symbol(movement).ok_or(TuringMachineError::InvalidMove {
        symbol: movement,
        line,
    })?;

    Ok(Transition {
        from,
        to,
        read,
        write,
        direction,
    })
}

/// Rejects descriptions larger than `MAX_DESCRIPTION_SIZE`.
fn check_size(input: &str) -> Result<(), TuringMachineError> {
    if input.len() > MAX_DESCRIPTION_SIZE {
        return Err(TuringMachineError::ValidationError(format!(
            "Description is {} bytes, the limit is {} bytes",
            input.len(),
            MAX_DESCRIPTION_SIZE
        )));
    }

    Ok(())
}

/// Creates a `TuringMachineError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> TuringMachineError {
    TuringMachineError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

/// Extracts the single character of a symbol pair.
fn parse_symbol(pair: Option<&Pair<Rule>>) -> char {
    pair.and_then(|p| p.as_str().chars().next()).unwrap_or(BLANK_SYMBOL)
}

/// Extracts the string content from the current `Pair` in a `Pairs` iterator.
fn parse_string(pairs: &mut Pairs<Rule>) -> String {
    pairs
        .next()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default()
}
