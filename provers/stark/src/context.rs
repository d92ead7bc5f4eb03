/// Static description of an AIR: how wide, how long, and how constrained.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AirContext {
    /// Number of steps `S` of the base trace. Must be a power of two.
    pub trace_length: usize,
    /// Number of registers `R`.
    pub trace_columns: usize,
    /// Declared degree of each transition constraint, in trace cells.
    pub transition_degrees: Vec<usize>,
    /// Number of trailing steps on which transition constraints do not hold
    /// (at least 1: the last row has no successor).
    pub transition_exemptions: usize,
}

impl AirContext {
    pub fn num_transition_constraints(&self) -> usize {
        self.transition_degrees.len()
    }

    pub fn max_constraint_degree(&self) -> usize {
        self.transition_degrees.iter().copied().max().unwrap_or(1)
    }
}
