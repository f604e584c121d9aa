//! This crate provides the core logic for a single-tape deterministic Turing Machine simulator.
//! It includes modules for parsing machine descriptions into a transition table, simulating
//! their execution against a tape, analyzing descriptions for likely mistakes, and a small
//! catalog of bundled machines.

pub mod analyzer;
pub mod encoder;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod table;
pub mod tape;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the `encode` function from the encoder module.
pub use encoder::encode;
/// Re-exports the `MachineLoader` struct from the loader module.
pub use loader::MachineLoader;
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
/// Re-exports the parsing functions from the parser module.
pub use parser::{parse, parse_listing, parse_with_mode};
/// Re-exports `MachineCatalog`, `MachineInfo` and `MACHINES` from the programs module.
pub use programs::{MachineCatalog, MachineInfo, MACHINES};
/// Re-exports the `TransitionTable` struct from the table module.
pub use table::TransitionTable;
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports the types describing machines, runs and errors from the types module.
pub use types::{
    Alphabet, Direction, MachineSpec, Mode, Rejection, State, Step, Transition,
    TuringMachineError, Verdict, BLANK_SYMBOL, MAX_DESCRIPTION_SIZE,
};

/// Loads a machine description with the default `Mode::Normal` policy.
pub fn load(description: &str) -> Result<MachineSpec, TuringMachineError> {
    parse(description)
}

/// Runs `spec` against `tape` until it accepts or rejects.
///
/// Tape validation failures are rejections, not errors. A machine that never reaches a
/// verdict makes this function loop forever; see `run_with_limit`.
pub fn run(spec: &MachineSpec, tape: &str) -> Verdict {
    let mut machine = TuringMachine::new(spec);
    // A rejected tape leaves the machine halted with that rejection.
    let _ = machine.set_tape(tape);
    machine.run()
}

/// Runs `spec` against `tape` for at most `limit` transitions.
pub fn run_with_limit(
    spec: &MachineSpec,
    tape: &str,
    limit: usize,
) -> Result<Verdict, TuringMachineError> {
    let mut machine = TuringMachine::new(spec);
    let _ = machine.set_tape(tape);
    machine.run_with_limit(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNARY: &str = "2\nq0\nqf\n1\nq0 qf 11R\n";

    #[test]
    fn test_load_and_run() {
        let spec = load(UNARY).unwrap();

        assert_eq!(run(&spec, "D1D"), Verdict::Accepted);
        assert_eq!(run(&spec, "D1D").to_string(), "Accepted.");
    }

    #[test]
    fn test_run_rejections() {
        let spec = load("2\nq0\nqf\n01\nq0 qf 11R\n").unwrap();

        assert_eq!(run(&spec, "D0D").to_string(), "Rejected.");
        assert_eq!(run(&spec, "").to_string(), "Rejected.");
        assert_eq!(
            run(&spec, "D2D").to_string(),
            "2 is not in the alphabet! Rejected."
        );
    }

    #[test]
    fn test_rejected_tape_leaves_spec_untouched() {
        let spec = load(UNARY).unwrap();
        let before = spec.clone();

        run(&spec, "D2D");
        assert_eq!(spec, before);
    }

    #[test]
    fn test_identical_loads_agree_on_every_lookup() {
        let text = "3\nq0\nqf\n01\nq0 q1 01R\nq1 q0 10L\nq1 qf DDS\n";
        let first = load(text).unwrap();
        let second = load(text).unwrap();

        for state in ["q0", "q1", "qf", "missing"] {
            for symbol in ['0', '1', BLANK_SYMBOL, 'x'] {
                assert_eq!(
                    first.table.lookup(state, symbol),
                    second.table.lookup(state, symbol)
                );
            }
        }
    }

    #[test]
    fn test_run_with_limit() {
        let spec = load("2\nq0\nqf\n1\nq0 q0 11S\n").unwrap();

        assert_eq!(
            run_with_limit(&spec, "1", 10),
            Err(TuringMachineError::StepLimitExceeded(10))
        );
    }

    #[test]
    fn test_runs_share_one_spec_across_threads() {
        let spec = load(UNARY).unwrap();

        std::thread::scope(|scope| {
            let accepted = scope.spawn(|| run(&spec, "D1D"));
            let rejected = scope.spawn(|| run(&spec, "D2D"));

            assert!(accepted.join().unwrap().is_accepted());
            assert!(!rejected.join().unwrap().is_accepted());
        });
    }
}
