//! This module defines the `TuringMachine` struct, the execution engine of the simulator. It
//! owns the tape and the head of a single run, applies transition rules looked up in a shared
//! `MachineSpec`, and determines the verdict.

use crate::tape::Tape;
use crate::types::{MachineSpec, Rejection, State, Step, TuringMachineError, Verdict};
use tracing::{debug, trace};

/// A single run of a machine.
///
/// The `MachineSpec` is only borrowed, so any number of runs can share one loaded description.
/// The tape, head and control state belong to this run alone.
pub struct TuringMachine<'a> {
    spec: &'a MachineSpec,
    state: State,
    tape: Option<Tape>,
    rejection: Option<Rejection>,
    step_count: usize,
}

impl<'a> TuringMachine<'a> {
    /// Creates a machine in its start state without a tape.
    ///
    /// Running it before `set_tape` rejects, as for an empty tape.
    pub fn new(spec: &'a MachineSpec) -> Self {
        Self {
            spec,
            state: spec.initial_state(),
            tape: None,
            rejection: None,
            step_count: 0,
        }
    }

    /// Validates `input` and loads it as the tape, then moves the head past leading blanks.
    ///
    /// On failure the run is rejected right away: the machine enters the reject state and the
    /// reason is returned as well as reported by the next `step` or `run`.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the tape is non-empty and every symbol belongs to the alphabet.
    /// * `Err(Rejection)` otherwise.
    pub fn set_tape(&mut self, input: &str) -> Result<(), Rejection> {
        self.state = self.spec.initial_state();
        self.rejection = None;
        self.step_count = 0;

        match Tape::new(input, &self.spec.alphabet) {
            Ok(mut tape) => {
                tape.skip_blanks();
                debug!(tape = %tape, "tape loaded");
                self.tape = Some(tape);
                Ok(())
            }
            Err(rejection) => {
                debug!(%rejection, "tape rejected");
                self.tape = None;
                self.reject(rejection.clone());
                Err(rejection)
            }
        }
    }

    /// Executes a single step.
    ///
    /// Looks up the rule for the current state and the symbol under the head. If there is one,
    /// its symbol is written, the state changes and the head moves. If there is none, the
    /// machine rejects.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if a rule was applied.
    /// * `Step::Halt(verdict)` if the machine is in, or has just entered, a terminal state
    ///   without applying a rule.
    pub fn step(&mut self) -> Step {
        let spec = self.spec;

        let current = match &self.state {
            State::Running(id) => id,
            _ => return self.halt(),
        };

        let Some(tape) = self.tape.as_mut() else {
            self.reject(Rejection::EmptyTape);
            return self.halt();
        };

        let symbol = tape.read();
        let Some(transition) = spec.table.lookup(current, symbol) else {
            trace!(state = %current, %symbol, "no transition");
            let rejection = Rejection::NoTransition {
                state: current.clone(),
                symbol,
            };
            self.reject(rejection);
            return self.halt();
        };

        tape.write(transition.write);
        tape.shift(transition.direction);
        self.state = spec.state_for(&transition.to);
        self.step_count += 1;

        trace!(
            step = self.step_count,
            rule = %transition,
            tape = %tape,
            "applied transition"
        );

        Step::Continue
    }

    /// Runs the machine until it accepts or rejects.
    ///
    /// There is no step ceiling: a machine that never reaches a verdict never returns. Use
    /// `run_with_limit` when that matters.
    pub fn run(&mut self) -> Verdict {
        loop {
            if let Step::Halt(verdict) = self.step() {
                return verdict;
            }
        }
    }

    /// Runs the machine for at most `limit` transitions.
    ///
    /// # Returns
    ///
    /// * `Ok(Verdict)` if a verdict was reached within `limit` applied transitions.
    /// * `Err(TuringMachineError::StepLimitExceeded)` otherwise. The machine keeps its
    ///   configuration and can be stepped further.
    pub fn run_with_limit(&mut self, limit: usize) -> Result<Verdict, TuringMachineError> {
        let mut applied = 0;

        loop {
            if applied == limit && !self.state.is_terminal() {
                return Err(TuringMachineError::StepLimitExceeded(limit));
            }

            match self.step() {
                Step::Continue => applied += 1,
                Step::Halt(verdict) => return Ok(verdict),
            }
        }
    }

    /// Returns the verdict once the machine is in a terminal state.
    pub fn verdict(&self) -> Option<Verdict> {
        match &self.state {
            State::Running(_) => None,
            State::Accept => Some(Verdict::Accepted),
            State::Reject => Some(Verdict::Rejected(
                self.rejection.clone().unwrap_or(Rejection::EmptyTape),
            )),
        }
    }

    /// Checks if the machine has reached a verdict.
    pub fn is_halted(&self) -> bool {
        self.state.is_terminal()
    }

    /// Returns the current control state.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Returns the tape, if one was loaded successfully.
    pub fn tape(&self) -> Option<&Tape> {
        self.tape.as_ref()
    }

    /// Returns the number of transitions applied so far.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Resets the machine to its start state and drops the tape.
    pub fn reset(&mut self) {
        self.state = self.spec.initial_state();
        self.tape = None;
        self.rejection = None;
        self.step_count = 0;
    }

    fn reject(&mut self, rejection: Rejection) {
        self.state = State::Reject;
        self.rejection = Some(rejection);
    }

    fn halt(&self) -> Step {
        match self.verdict() {
            Some(verdict) => Step::Halt(verdict),
            None => Step::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::types::Direction;

    const UNARY: &str = "2\nq0\nqf\n1\nq0 qf 11R\n";

    fn unary_with_zero() -> MachineSpec {
        parse("2\nq0\nqf\n01\nq0 qf 11R\n").unwrap()
    }

    #[test]
    fn test_machine_creation() {
        let spec = parse(UNARY).unwrap();
        let machine = TuringMachine::new(&spec);

        assert_eq!(machine.state(), &State::Running("q0".to_string()));
        assert!(machine.tape().is_none());
        assert_eq!(machine.step_count(), 0);
        assert!(!machine.is_halted());
        assert_eq!(machine.verdict(), None);
    }

    #[test]
    fn test_accepts_after_skipping_leading_blank() {
        let spec = parse(UNARY).unwrap();
        let mut machine = TuringMachine::new(&spec);
        machine.set_tape("D1D").unwrap();

        assert_eq!(machine.tape().unwrap().position(), 1);

        assert_eq!(machine.step(), Step::Continue);
        assert_eq!(machine.state(), &State::Accept);
        assert_eq!(machine.tape().unwrap().position(), 2);
        assert_eq!(machine.step_count(), 1);

        assert_eq!(machine.step(), Step::Halt(Verdict::Accepted));
        assert_eq!(machine.run(), Verdict::Accepted);
    }

    #[test]
    fn test_rejects_without_matching_transition() {
        let spec = unary_with_zero();
        let mut machine = TuringMachine::new(&spec);
        machine.set_tape("D0D").unwrap();

        let verdict = machine.run();
        assert_eq!(
            verdict,
            Verdict::Rejected(Rejection::NoTransition {
                state: "q0".to_string(),
                symbol: '0'
            })
        );
        assert_eq!(verdict.to_string(), "Rejected.");
        assert_eq!(machine.step_count(), 0);
        // The tape is left untouched.
        assert_eq!(machine.tape().unwrap().contents(), "D0D");
    }

    #[test]
    fn test_rejects_symbol_outside_alphabet() {
        let spec = parse(UNARY).unwrap();
        let mut machine = TuringMachine::new(&spec);

        assert_eq!(
            machine.set_tape("D2D"),
            Err(Rejection::InvalidSymbol('2'))
        );
        assert!(machine.is_halted());

        let verdict = machine.run();
        assert_eq!(verdict, Verdict::Rejected(Rejection::InvalidSymbol('2')));
        assert_eq!(verdict.to_string(), "2 is not in the alphabet! Rejected.");
        assert_eq!(machine.step_count(), 0);
    }

    #[test]
    fn test_rejects_empty_tape() {
        let spec = parse(UNARY).unwrap();
        let mut machine = TuringMachine::new(&spec);

        assert_eq!(machine.set_tape(""), Err(Rejection::EmptyTape));
        assert_eq!(machine.run(), Verdict::Rejected(Rejection::EmptyTape));
    }

    #[test]
    fn test_run_without_tape_rejects() {
        let spec = parse(UNARY).unwrap();
        let mut machine = TuringMachine::new(&spec);

        assert_eq!(machine.run(), Verdict::Rejected(Rejection::EmptyTape));
    }

    #[test]
    fn test_all_blank_tape() {
        let spec = parse("2\nq0\nqf\n1\nq0 qf DDS\n").unwrap();
        let mut machine = TuringMachine::new(&spec);
        machine.set_tape("DDD").unwrap();

        assert_eq!(machine.tape().unwrap().position(), 3);
        assert_eq!(machine.run(), Verdict::Accepted);
    }

    #[test]
    fn test_start_state_is_accept_state() {
        let spec = parse("1\nq0\nq0\n1\n").unwrap();
        let mut machine = TuringMachine::new(&spec);
        machine.set_tape("1").unwrap();

        assert_eq!(machine.run(), Verdict::Accepted);
        assert_eq!(machine.step_count(), 0);
    }

    #[test]
    fn test_user_state_named_reject_is_not_terminal() {
        let spec = parse("3\nreject\nqf\n1\nreject qf 11R\n").unwrap();
        let mut machine = TuringMachine::new(&spec);
        machine.set_tape("1").unwrap();

        assert_eq!(machine.run(), Verdict::Accepted);
    }

    #[test]
    fn test_moving_left_of_the_input_extends_the_tape() {
        let spec = parse("3\nq0\nqf\n1\nq0 q1 11L\nq1 qf D1S\n").unwrap();
        let mut machine = TuringMachine::new(&spec);
        machine.set_tape("1").unwrap();

        assert_eq!(machine.run(), Verdict::Accepted);

        let tape = machine.tape().unwrap();
        assert_eq!(tape.contents(), "11");
        assert_eq!(tape.position(), -1);
    }

    #[test]
    fn test_writes_symbols_and_moves() {
        // Replaces every 0 with 1 while moving right, accepts on the first blank.
        let spec = parse("2\nq0\nqf\n01\nq0 q0 01R\nq0 q0 11R\nq0 qf DDS\n").unwrap();
        let mut machine = TuringMachine::new(&spec);
        machine.set_tape("D0101D").unwrap();

        assert_eq!(machine.run(), Verdict::Accepted);
        assert_eq!(machine.tape().unwrap().contents(), "D1111D");
        assert_eq!(machine.step_count(), 5);
        assert_eq!(
            spec.table.lookup("q0", 'D').unwrap().direction,
            Direction::Stay
        );
    }

    #[test]
    fn test_run_with_limit_stops_a_looping_machine() {
        let spec = parse("2\nq0\nqf\n1\nq0 q0 DDR\nq0 q0 11R\n").unwrap();
        let mut machine = TuringMachine::new(&spec);
        machine.set_tape("D1D").unwrap();

        assert_eq!(
            machine.run_with_limit(100),
            Err(TuringMachineError::StepLimitExceeded(100))
        );
        assert_eq!(machine.step_count(), 100);
        assert!(!machine.is_halted());
    }

    #[test]
    fn test_run_with_limit_reaching_verdict_on_last_step() {
        let spec = parse(UNARY).unwrap();
        let mut machine = TuringMachine::new(&spec);
        machine.set_tape("D1D").unwrap();

        assert_eq!(machine.run_with_limit(1), Ok(Verdict::Accepted));
    }

    #[test]
    fn test_shared_spec_between_runs() {
        let spec = unary_with_zero();
        let mut first = TuringMachine::new(&spec);
        let mut second = TuringMachine::new(&spec);

        first.set_tape("D1D").unwrap();
        second.set_tape("D0D").unwrap();

        assert_eq!(first.run(), Verdict::Accepted);
        assert!(!second.run().is_accepted());
    }

    #[test]
    fn test_reset() {
        let spec = parse(UNARY).unwrap();
        let mut machine = TuringMachine::new(&spec);
        machine.set_tape("D1D").unwrap();
        machine.run();

        machine.reset();
        assert_eq!(machine.state(), &State::Running("q0".to_string()));
        assert!(machine.tape().is_none());
        assert_eq!(machine.step_count(), 0);
    }

    #[test]
    fn test_set_tape_restarts_the_run() {
        let spec = unary_with_zero();
        let mut machine = TuringMachine::new(&spec);

        machine.set_tape("D0D").unwrap();
        assert!(!machine.run().is_accepted());

        machine.set_tape("D1D").unwrap();
        assert_eq!(machine.run(), Verdict::Accepted);
    }
}
