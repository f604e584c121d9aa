//! This module provides encoding functionality for writing a `MachineSpec` back into the
//! machine description format it was loaded from.

use crate::types::MachineSpec;
use std::fmt::Write;

/// Encodes a machine into description text.
///
/// Format:
/// - the state count, start state, accept state and alphabet, one per line;
/// - one `FROM TO RWM` record per transition, in storage order.
///
/// Parsing the result yields a `MachineSpec` equal to `spec`.
///
/// # Arguments
///
/// * `spec` - The MachineSpec to encode.
///
/// # Returns
///
/// * `String` - The encoded description.
pub fn encode(spec: &MachineSpec) -> String {
    let mut out = format!(
        "{}\n{}\n{}\n{}\n",
        spec.state_count, spec.start_state, spec.accept_state, spec.alphabet
    );

    for t in spec.table.iter() {
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "{} {} {}{}{}",
            t.from,
            t.to,
            t.read,
            t.write,
            t.direction.symbol()
        );
    }

    out
}
