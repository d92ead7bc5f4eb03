use lodestark_math::fft::errors::FFTError;
use lodestark_math::fft::polynomial::FFTPoly;
use lodestark_math::field::element::FieldElement;
use lodestark_math::field::traits::{IsFFTField, IsField};
use lodestark_math::polynomial::Polynomial;

#[cfg(feature = "parallel")]
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};

use crate::errors::{InputShapeError, ProvingError};
use crate::traits::AIR;

/// A two-dimensional representation of an execution trace, stored
/// column-major: one vector of `n_rows` values per register.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceTable<F: IsField> {
    columns: Vec<Vec<FieldElement<F>>>,
}

impl<F: IsField> TraceTable<F> {
    pub fn from_columns(columns: Vec<Vec<FieldElement<F>>>) -> Self {
        debug_assert!(columns.windows(2).all(|pair| pair[0].len() == pair[1].len()));
        Self { columns }
    }

    pub fn from_rows(rows: Vec<Vec<FieldElement<F>>>) -> Self {
        let n_cols = rows.first().map(Vec::len).unwrap_or(0);
        let mut columns = vec![Vec::with_capacity(rows.len()); n_cols];
        for row in rows {
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }
        Self { columns }
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map(Vec::len).unwrap_or(0)
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Vec<FieldElement<F>>] {
        &self.columns
    }

    pub fn get(&self, row: usize, col: usize) -> &FieldElement<F> {
        &self.columns[col][row]
    }

    pub fn get_row(&self, row: usize) -> Vec<FieldElement<F>> {
        self.columns.iter().map(|col| col[row].clone()).collect()
    }

    /// Materializes the row-major view, the layout the Merkle committer
    /// hashes.
    pub fn rows(&self) -> Vec<Vec<FieldElement<F>>> {
        (0..self.n_rows()).map(|row| self.get_row(row)).collect()
    }
}

impl<F: IsFFTField> TraceTable<F> {
    /// Interpolates each register column over the base domain.
    pub fn compute_trace_polys(&self) -> Result<Vec<Polynomial<FieldElement<F>>>, FFTError> {
        #[cfg(feature = "parallel")]
        let iter = self.columns.par_iter();
        #[cfg(not(feature = "parallel"))]
        let iter = self.columns.iter();

        iter.map(|column| Polynomial::interpolate_fft(column))
            .collect()
    }
}

/// Executes the AIR transition function over the full base length, producing
/// the register-by-step trace. A failing transition aborts with the step it
/// failed at.
pub fn build_trace<A: AIR>(
    air: &A,
    static_columns: &[Vec<FieldElement<A::Field>>],
) -> Result<TraceTable<A::Field>, ProvingError> {
    let steps = air.step_count();
    let registers = air.register_count();

    let initial_state = air.initial_state();
    if initial_state.len() != registers {
        return Err(InputShapeError::WrongStateWidth {
            got: initial_state.len(),
            expected: registers,
        }
        .into());
    }

    let mut columns = vec![Vec::with_capacity(steps); registers];
    let mut state = initial_state;
    let mut statics_at_step = vec![FieldElement::zero(); static_columns.len()];
    for step in 0..steps {
        for (register, value) in state.iter().enumerate() {
            columns[register].push(value.clone());
        }
        if step + 1 == steps {
            break;
        }
        for (slot, column) in statics_at_step.iter_mut().zip(static_columns) {
            *slot = column[step].clone();
        }
        let next_state = air
            .advance(&state, &statics_at_step, step)
            .map_err(|source| ProvingError::TraceExecution { step, source })?;
        if next_state.len() != registers {
            return Err(InputShapeError::WrongStateWidth {
                got: next_state.len(),
                expected: registers,
            }
            .into());
        }
        state = next_state;
    }

    Ok(TraceTable::from_columns(columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::examples::simple_fibonacci::{FibonacciAIR, FibonacciPublicInputs};
    use lodestark_math::field::fields::fft_friendly::two_adic_32_prime_field::TwoAdic32FieldElement as FE;

    #[test]
    fn fibonacci_trace_follows_the_recurrence() {
        let air = FibonacciAIR::new(
            16,
            FibonacciPublicInputs {
                a0: FE::one(),
                a1: FE::one(),
            },
        );
        let trace = build_trace(&air, &[]).unwrap();
        assert_eq!(trace.n_rows(), 16);
        assert_eq!(trace.n_cols(), 2);
        assert_eq!(trace.get(0, 0), &FE::one());
        // Register 0 holds every other Fibonacci number: 1, 2, 5, 13, ...
        assert_eq!(trace.get(1, 0), &FE::from(2));
        assert_eq!(trace.get(2, 0), &FE::from(5));
        assert_eq!(trace.get(2, 1), &FE::from(8));
    }

    #[test]
    fn rows_and_columns_agree() {
        let air = FibonacciAIR::new(
            8,
            FibonacciPublicInputs {
                a0: FE::one(),
                a1: FE::from(3),
            },
        );
        let trace = build_trace(&air, &[]).unwrap();
        let rows = trace.rows();
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row, &trace.get_row(i));
            for (j, value) in row.iter().enumerate() {
                assert_eq!(value, trace.get(i, j));
            }
        }
    }

    #[test]
    fn trace_polys_reproduce_the_columns() {
        let air = FibonacciAIR::new(
            8,
            FibonacciPublicInputs {
                a0: FE::one(),
                a1: FE::one(),
            },
        );
        let trace = build_trace(&air, &[]).unwrap();
        let polys = trace.compute_trace_polys().unwrap();
        for (poly, column) in polys.iter().zip(trace.columns()) {
            let evaluations = poly.evaluate_fft(1, Some(8)).unwrap();
            assert_eq!(&evaluations, column);
        }
    }
}
