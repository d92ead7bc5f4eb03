use lodestark_math::fft::errors::FFTError;
use lodestark_math::fft::polynomial::FFTPoly;
use lodestark_math::field::element::FieldElement;
use lodestark_math::field::traits::IsFFTField;
use lodestark_math::polynomial::Polynomial;

use crate::errors::InputShapeError;

/// A static register table: a deterministic function from step index to
/// field element, fixed when the AIR is built and known to both parties.
///
/// Every variant has a closed-form polynomial of degree below the trace
/// length that the verifier can evaluate at any domain point from the
/// declared values alone; the prover materializes the same polynomial over
/// the base domain and extends it by FFT.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StaticColumn<F: IsFFTField> {
    /// `pattern` repeated cyclically across the trace.
    Cyclic { pattern: Vec<FieldElement<F>> },
    /// `values[j]` at step `j * (S / len)`, zero on every other step.
    Stretched { values: Vec<FieldElement<F>> },
    /// `values[j]` at step `j * (S / len)`, low-degree interpolated between.
    Input { values: Vec<FieldElement<F>> },
}

impl<F: IsFFTField> StaticColumn<F> {
    pub fn declared_values(&self) -> &[FieldElement<F>] {
        match self {
            StaticColumn::Cyclic { pattern } => pattern,
            StaticColumn::Stretched { values } => values,
            StaticColumn::Input { values } => values,
        }
    }

    pub fn tag(&self) -> u8 {
        match self {
            StaticColumn::Cyclic { .. } => 0,
            StaticColumn::Stretched { .. } => 1,
            StaticColumn::Input { .. } => 2,
        }
    }

    pub fn validate(&self, column: usize, trace_length: usize) -> Result<(), InputShapeError> {
        let len = self.declared_values().len();
        if len == 0 {
            return Err(InputShapeError::InvalidStaticColumn {
                column,
                reason: "no values declared",
            });
        }
        if !len.is_power_of_two() {
            return Err(InputShapeError::InvalidStaticColumn {
                column,
                reason: "value count must be a power of two",
            });
        }
        if len > trace_length {
            return Err(InputShapeError::InvalidStaticColumn {
                column,
                reason: "more values than trace steps",
            });
        }
        Ok(())
    }

    /// The polynomial interpolating the declared values over the roots of
    /// unity of their own (power-of-two) length.
    pub fn interpolant(&self) -> Result<Polynomial<FieldElement<F>>, FFTError> {
        Polynomial::interpolate_fft(self.declared_values())
    }

    /// The full base-domain column of `trace_length` values.
    pub fn base_column(&self, trace_length: usize) -> Result<Vec<FieldElement<F>>, FFTError> {
        match self {
            StaticColumn::Cyclic { pattern } => Ok(pattern
                .iter()
                .cycle()
                .take(trace_length)
                .cloned()
                .collect()),
            StaticColumn::Stretched { values } => {
                let stride = trace_length / values.len();
                let mut column = vec![FieldElement::zero(); trace_length];
                for (j, value) in values.iter().enumerate() {
                    column[j * stride] = value.clone();
                }
                Ok(column)
            }
            StaticColumn::Input { values } => {
                let interpolant = self.interpolant()?;
                interpolant.evaluate_fft(trace_length / values.len(), Some(values.len()))
            }
        }
    }

    /// Closed-form evaluation at an arbitrary point `x` of the evaluation
    /// domain, consistent with the unique degree-<S interpolant of
    /// [`StaticColumn::base_column`].
    ///
    /// With `len` declared values, `m = S / len` and `P` the interpolant of
    /// the values over the `len`-th roots of unity:
    /// cyclic is `P(x^m)`, input is `P(x)`, and stretched is
    /// `P(x) · (x^S − 1) / (m · (x^len − 1))`, where the second factor is
    /// the indicator of `step ≡ 0 (mod m)`: a geometric sum that collapses
    /// to 1 wherever `x^len = 1`.
    pub fn evaluate_with(
        &self,
        interpolant: &Polynomial<FieldElement<F>>,
        x: &FieldElement<F>,
        trace_length: usize,
    ) -> Option<FieldElement<F>> {
        let len = self.declared_values().len();
        let stride = trace_length / len;
        match self {
            StaticColumn::Cyclic { .. } => Some(interpolant.evaluate(&x.pow(stride as u128))),
            StaticColumn::Input { .. } => Some(interpolant.evaluate(x)),
            StaticColumn::Stretched { .. } => {
                let x_pow_len = x.pow(len as u128);
                if x_pow_len == FieldElement::one() {
                    return Some(interpolant.evaluate(x));
                }
                let denominator =
                    (FieldElement::from(stride as u64) * (&x_pow_len - FieldElement::one()))
                        .inv()
                        .ok()?;
                let numerator = x.pow(trace_length as u128) - FieldElement::one();
                Some(interpolant.evaluate(x) * numerator * denominator)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodestark_math::field::fields::fft_friendly::stark128_prime_field::Stark128PrimeField;
    use lodestark_math::field::traits::IsFFTField;

    type F = Stark128PrimeField;
    type FE = FieldElement<F>;

    const TRACE_LENGTH: usize = 32;

    fn trace_domain() -> Vec<FE> {
        let root = F::get_primitive_root_of_unity(5).unwrap();
        (0..TRACE_LENGTH).map(|i| root.pow(i as u128)).collect()
    }

    fn lde_point(index: usize) -> FE {
        // A point of the 4x extended domain that is not in the base domain.
        let root = F::get_primitive_root_of_unity(7).unwrap();
        root.pow(index as u128)
    }

    fn check_closed_form_matches_base_column(column: StaticColumn<F>) {
        let base = column.base_column(TRACE_LENGTH).unwrap();
        let interpolant = column.interpolant().unwrap();
        for (step, x) in trace_domain().iter().enumerate() {
            let evaluated = column
                .evaluate_with(&interpolant, x, TRACE_LENGTH)
                .unwrap();
            assert_eq!(evaluated, base[step], "step {step}");
        }
    }

    #[test]
    fn cyclic_column_repeats_its_pattern() {
        let pattern: Vec<FE> = (1..=8u64).map(FE::from).collect();
        let column = StaticColumn::Cyclic { pattern: pattern.clone() };
        let base = column.base_column(TRACE_LENGTH).unwrap();
        for (step, value) in base.iter().enumerate() {
            assert_eq!(value, &pattern[step % 8]);
        }
        check_closed_form_matches_base_column(column);
    }

    #[test]
    fn stretched_column_is_zero_off_stride() {
        let values: Vec<FE> = (1..=4u64).map(FE::from).collect();
        let column = StaticColumn::Stretched { values: values.clone() };
        let base = column.base_column(TRACE_LENGTH).unwrap();
        for (step, value) in base.iter().enumerate() {
            if step % 8 == 0 {
                assert_eq!(value, &values[step / 8]);
            } else {
                assert_eq!(value, &FE::zero());
            }
        }
        check_closed_form_matches_base_column(column);
    }

    #[test]
    fn input_column_passes_through_the_spread_values() {
        let values: Vec<FE> = [7u64, 21, 5, 9].iter().map(|v| FE::from(*v)).collect();
        let column = StaticColumn::Input { values: values.clone() };
        let base = column.base_column(TRACE_LENGTH).unwrap();
        for (j, value) in values.iter().enumerate() {
            assert_eq!(&base[j * 8], value);
        }
        check_closed_form_matches_base_column(column);
    }

    #[test]
    fn closed_forms_agree_with_the_lde_of_the_base_column() {
        // The closed form and the FFT extension must agree outside the base
        // domain too, at any point where the query engine could land.
        let columns = [
            StaticColumn::Cyclic {
                pattern: (1..=8u64).map(FE::from).collect(),
            },
            StaticColumn::Stretched {
                values: (1..=4u64).map(FE::from).collect(),
            },
            StaticColumn::Input {
                values: (3..=6u64).map(FE::from).collect(),
            },
        ];
        for column in columns {
            let base = column.base_column(TRACE_LENGTH).unwrap();
            let poly = Polynomial::interpolate_fft(&base).unwrap();
            let lde = poly.evaluate_fft(4, Some(TRACE_LENGTH)).unwrap();
            let interpolant = column.interpolant().unwrap();
            for index in [1usize, 5, 33, 77, 126] {
                let x = lde_point(index);
                let evaluated = column
                    .evaluate_with(&interpolant, &x, TRACE_LENGTH)
                    .unwrap();
                assert_eq!(evaluated, lde[index], "index {index}");
            }
        }
    }

    #[test]
    fn non_power_of_two_patterns_are_rejected() {
        let column = StaticColumn::Cyclic {
            pattern: (1..=6u64).map(FE::from).collect(),
        };
        assert!(column.validate(0, TRACE_LENGTH).is_err());
    }
}
