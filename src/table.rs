//! This module defines the `TransitionTable`, the rule set of a machine. Rules are grouped by
//! source state, states keep the order in which they were first seen, and rules keep the order
//! in which they were inserted.

use crate::types::Transition;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// The transition rules of a machine, grouped by source state.
/// Built only through `insert`, so `order` and `rules` always list the same states.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransitionTable {
    /// Source states in first-seen order.
    order: Vec<String>,
    /// Rules per source state, in insertion order.
    rules: HashMap<String, Vec<Transition>>,
}

impl TransitionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule to the group of its source state, opening the group the first time
    /// the state is seen.
    pub fn insert(&mut self, transition: Transition) {
        match self.rules.get_mut(&transition.from) {
            Some(group) => group.push(transition),
            None => {
                self.order.push(transition.from.clone());
                self.rules.insert(transition.from.clone(), vec![transition]);
            }
        }
    }

    /// Finds the rule for `state` reading `symbol`.
    ///
    /// The group is scanned in insertion order and the first rule whose read symbol matches
    /// is returned, so when a state lists the same read symbol twice the earlier rule wins.
    ///
    /// # Returns
    ///
    /// * `Some(&Transition)` if a matching rule exists.
    /// * `None` if the state has no rules or none of them reads `symbol`.
    pub fn lookup(&self, state: &str, symbol: char) -> Option<&Transition> {
        self.rules
            .get(state)
            .and_then(|group| group.iter().find(|t| t.read == symbol))
    }

    /// Returns the rules leaving `state`, or an empty slice.
    pub fn transitions(&self, state: &str) -> &[Transition] {
        self.rules.get(state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Checks whether `state` has at least one outgoing rule.
    pub fn has_state(&self, state: &str) -> bool {
        self.rules.contains_key(state)
    }

    /// Iterates over the source states in first-seen order.
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Iterates over every rule in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.order
            .iter()
            .flat_map(move |state| self.transitions(state).iter())
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    /// Checks whether the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the number of distinct source states.
    pub fn state_count(&self) -> usize {
        self.order.len()
    }

    /// Lists every `(state, symbol)` pair read by more than one rule, in storage order.
    /// Only the first of those rules can ever fire.
    pub fn ambiguities(&self) -> Vec<(String, char)> {
        let mut ambiguous = Vec::new();

        for state in &self.order {
            let mut seen = Vec::new();
            for transition in self.transitions(state) {
                if seen.contains(&transition.read) {
                    let key = (state.clone(), transition.read);
                    if !ambiguous.contains(&key) {
                        ambiguous.push(key);
                    }
                } else {
                    seen.push(transition.read);
                }
            }
        }

        ambiguous
    }

    /// Renders every rule, one per line, as `FROM TO RW M`.
    pub fn listing(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TransitionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.iter().try_for_each(|t| writeln!(f, "{t}"))
    }
}

impl FromIterator<Transition> for TransitionTable {
    fn from_iter<I: IntoIterator<Item = Transition>>(iter: I) -> Self {
        let mut table = Self::new();
        for transition in iter {
            table.insert(transition);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    fn rule(from: &str, to: &str, read: char, write: char, direction: Direction) -> Transition {
        Transition {
            from: from.to_string(),
            to: to.to_string(),
            read,
            write,
            direction,
        }
    }

    fn create_test_table() -> TransitionTable {
        [
            rule("q0", "q1", '0', '1', Direction::Right),
            rule("q1", "q0", '1', '0', Direction::Left),
            rule("q0", "qf", 'D', 'D', Direction::Stay),
            rule("q1", "qf", '0', '0', Direction::Right),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_groups_by_first_seen_state() {
        let table = create_test_table();

        assert_eq!(table.states().collect::<Vec<_>>(), vec!["q0", "q1"]);
        assert_eq!(table.transitions("q0").len(), 2);
        assert_eq!(table.transitions("q1").len(), 2);
        assert_eq!(table.len(), 4);
        assert_eq!(table.state_count(), 2);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_storage_order_follows_groups() {
        let table = create_test_table();
        let reads: Vec<(&str, char)> = table.iter().map(|t| (t.from.as_str(), t.read)).collect();

        assert_eq!(reads, vec![("q0", '0'), ("q0", 'D'), ("q1", '1'), ("q1", '0')]);
    }

    #[test]
    fn test_lookup() {
        let table = create_test_table();

        let transition = table.lookup("q0", 'D').unwrap();
        assert_eq!(transition.to, "qf");
        assert_eq!(transition.direction, Direction::Stay);

        assert!(table.lookup("q0", '1').is_none());
        assert!(table.lookup("qf", '0').is_none());
        assert!(table.transitions("qf").is_empty());
    }

    #[test]
    fn test_lookup_is_repeatable() {
        let table = create_test_table();

        let first = table.lookup("q1", '1').cloned();
        let second = table.lookup("q1", '1').cloned();
        assert_eq!(first, second);
    }

    #[test]
    fn test_first_match_wins() {
        let table: TransitionTable = [
            rule("q0", "a", '1', '1', Direction::Right),
            rule("q0", "b", '1', '0', Direction::Left),
        ]
        .into_iter()
        .collect();

        assert_eq!(table.lookup("q0", '1').unwrap().to, "a");
        assert_eq!(table.ambiguities(), vec![("q0".to_string(), '1')]);
    }

    #[test]
    fn test_no_ambiguities() {
        assert!(create_test_table().ambiguities().is_empty());
    }

    #[test]
    fn test_listing() {
        let table = create_test_table();

        assert_eq!(
            table.listing(),
            "q0 q1 01 R\nq0 qf DD S\nq1 q0 10 L\nq1 qf 00 R\n"
        );
    }

    #[test]
    fn test_serializes_groups_with_their_order() {
        let table: TransitionTable = [rule("q0", "qf", '1', '1', Direction::Right)]
            .into_iter()
            .collect();

        assert_eq!(
            serde_json::to_string(&table).unwrap(),
            r#"{"order":["q0"],"rules":{"q0":[{"from":"q0","to":"qf","read":"1","write":"1","direction":"Right"}]}}"#
        );
    }

    #[test]
    fn test_empty_table() {
        let table = TransitionTable::new();

        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert_eq!(table.listing(), "");
        assert!(table.lookup("q0", '1').is_none());
    }
}
