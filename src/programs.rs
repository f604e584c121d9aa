use crate::parser::parse;
use crate::types::{MachineSpec, TuringMachineError};

use tracing::warn;

// Bundled machine descriptions, by name
const MACHINE_TEXTS: [(&str, &str); 4] = [
    (
        "unary-acceptor",
        include_str!("../machines/unary-acceptor.tm"),
    ),
    ("even-ones", include_str!("../machines/even-ones.tm")),
    (
        "binary-palindrome",
        include_str!("../machines/binary-palindrome.tm"),
    ),
    (
        "zeros-then-ones",
        include_str!("../machines/zeros-then-ones.tm"),
    ),
];

lazy_static::lazy_static! {
    /// The bundled machines that parse, in catalog order. Parsed once on first access.
    pub static ref MACHINES: Vec<(&'static str, MachineSpec)> = MACHINE_TEXTS
        .iter()
        .filter_map(|(name, text)| match parse(text) {
            Ok(spec) => Some((*name, spec)),
            Err(e) => {
                warn!(machine = *name, error = %e, "failed to parse bundled machine");
                None
            }
        })
        .collect();
}

pub struct MachineCatalog;

impl MachineCatalog {
    /// Get the number of available machines
    pub fn count() -> usize {
        MACHINES.len()
    }

    /// List all machine names
    pub fn names() -> Vec<&'static str> {
        MACHINES.iter().map(|(name, _)| *name).collect()
    }

    /// Get a machine by its index
    pub fn get_by_index(index: usize) -> Result<&'static MachineSpec, TuringMachineError> {
        MACHINES.get(index).map(|(_, spec)| spec).ok_or_else(|| {
            TuringMachineError::ValidationError(format!("Machine index {} out of range", index))
        })
    }

    /// Get a machine by its name
    pub fn get_by_name(name: &str) -> Result<&'static MachineSpec, TuringMachineError> {
        MACHINES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, spec)| spec)
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Machine '{}' not found", name))
            })
    }

    /// Get the original description text of a machine by its name
    pub fn text_by_name(name: &str) -> Result<&'static str, TuringMachineError> {
        MACHINE_TEXTS
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, text)| *text)
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Machine '{}' not found", name))
            })
    }

    /// Get information about a machine by its index
    pub fn info(index: usize) -> Result<MachineInfo, TuringMachineError> {
        let spec = Self::get_by_index(index)?;

        Ok(MachineInfo {
            index,
            name: MACHINES[index].0.to_string(),
            start_state: spec.start_state.clone(),
            accept_state: spec.accept_state.clone(),
            alphabet: spec.alphabet.to_string(),
            state_count: spec.state_count,
            transition_count: spec.table.len(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct MachineInfo {
    pub index: usize,
    pub name: String,
    pub start_state: String,
    pub accept_state: String,
    pub alphabet: String,
    pub state_count: usize,
    pub transition_count: usize,
}
