//! This module provides functions for analyzing machine descriptions to detect likely mistakes
//! before execution: ambiguous rules, more source states than declared, a start state without
//! rules, rules leaving the accept state, and source states that can never be reached.

use crate::types::{MachineSpec, Mode, TuringMachineError};
use std::collections::HashSet;
use tracing::warn;

/// Represents the findings of the analysis of a machine description.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// A state lists the same read symbol more than once. Only the first rule can fire.
    AmbiguousTransitions(Vec<(String, char)>),
    /// More source states appear than the declared state count allows (the accept state
    /// contributes no outgoing rules, so at most `N-1` are expected).
    CapacityExceeded { declared: usize, used: usize },
    /// The start state has no rules and is not the accept state, so every run rejects.
    InvalidStartState(String),
    /// The accept state has rules. They never fire because reaching it ends the run.
    AcceptStateTransitions(String),
    /// Source states that cannot be reached from the start state.
    UnreachableStates(Vec<String>),
}

impl From<AnalysisError> for TuringMachineError {
    /// Converts an `AnalysisError` into a `TuringMachineError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        TuringMachineError::ValidationError(error.to_string())
    }
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::AmbiguousTransitions(pairs) => {
                let pairs = pairs
                    .iter()
                    .map(|(state, symbol)| format!("({state}, {symbol})"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "Several transitions read the same symbol: {pairs}")
            }
            AnalysisError::CapacityExceeded { declared, used } => write!(
                f,
                "{used} source states used but only {declared} states declared"
            ),
            AnalysisError::InvalidStartState(state) => {
                write!(f, "Start state {state} has no transitions")
            }
            AnalysisError::AcceptStateTransitions(state) => {
                write!(f, "Accept state {state} has transitions that never fire")
            }
            AnalysisError::UnreachableStates(states) => {
                write!(f, "Unreachable states detected: {:?}", states)
            }
        }
    }
}

/// Runs every check against `spec` and collects the findings in a deterministic order.
///
/// # Arguments
///
/// * `spec` - A reference to the `MachineSpec` to be analyzed.
///
/// # Returns
///
/// * An empty vector if nothing suspicious was found.
/// * The findings otherwise, one per failed check.
pub fn analyze(spec: &MachineSpec) -> Vec<AnalysisError> {
    [
        check_ambiguous_transitions,
        check_capacity,
        check_start_state,
        check_accept_state,
        check_unreachable_states,
    ]
    .iter()
    .filter_map(|f| f(spec).err())
    .collect()
}

/// Applies the load `mode` to the findings of `analyze`.
///
/// `Mode::Normal` logs every finding as a warning and succeeds. `Mode::Strict` fails with
/// the first finding.
pub fn check(spec: &MachineSpec, mode: Mode) -> Result<(), TuringMachineError> {
    let findings = analyze(spec);

    match mode {
        Mode::Normal => {
            for finding in &findings {
                warn!(%finding, "suspicious machine description");
            }
            Ok(())
        }
        Mode::Strict => match findings.into_iter().next() {
            Some(finding) => Err(finding.into()),
            None => Ok(()),
        },
    }
}

/// Checks that no state lists the same read symbol twice.
fn check_ambiguous_transitions(spec: &MachineSpec) -> Result<(), AnalysisError> {
    let ambiguous = spec.table.ambiguities();

    if !ambiguous.is_empty() {
        return Err(AnalysisError::AmbiguousTransitions(ambiguous));
    }

    Ok(())
}

/// Checks the number of source states against the declared state count.
fn check_capacity(spec: &MachineSpec) -> Result<(), AnalysisError> {
    let declared = spec.state_count;
    let used = spec.table.state_count();

    if used > declared.saturating_sub(1) {
        return Err(AnalysisError::CapacityExceeded { declared, used });
    }

    Ok(())
}

/// Checks whether the start state can make a first move.
fn check_start_state(spec: &MachineSpec) -> Result<(), AnalysisError> {
    if spec.start_state != spec.accept_state && !spec.table.has_state(&spec.start_state) {
        return Err(AnalysisError::InvalidStartState(spec.start_state.clone()));
    }

    Ok(())
}

/// Checks that the accept state has no outgoing rules.
fn check_accept_state(spec: &MachineSpec) -> Result<(), AnalysisError> {
    if spec.table.has_state(&spec.accept_state) {
        return Err(AnalysisError::AcceptStateTransitions(
            spec.accept_state.clone(),
        ));
    }

    Ok(())
}

/// Checks for unreachable source states with a depth-first traversal from the start state.
///
/// Traversal stops at the accept state because the run ends there.
fn check_unreachable_states(spec: &MachineSpec) -> Result<(), AnalysisError> {
    let mut visited = HashSet::new();
    let mut stack = vec![spec.start_state.as_str()];

    while let Some(state) = stack.pop() {
        if !visited.insert(state) || state == spec.accept_state {
            continue;
        }

        for transition in spec.table.transitions(state) {
            if !visited.contains(transition.to.as_str()) {
                stack.push(&transition.to);
            }
        }
    }

    let mut unreachable: Vec<String> = spec
        .table
        .states()
        .filter(|state| !visited.contains(state) && *state != spec.accept_state)
        .map(String::from)
        .collect();

    if !unreachable.is_empty() {
        unreachable.sort(); // Sort for deterministic output
        return Err(AnalysisError::UnreachableStates(unreachable));
    }

    Ok(())
}
