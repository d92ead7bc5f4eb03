use lodestark_math::field::element::FieldElement;
use lodestark_math::field::traits::IsField;
use lodestark_math::polynomial::Polynomial;

use crate::context::AirContext;
use crate::errors::InputShapeError;

/// A public claim that one trace cell holds one value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assertion<F: IsField> {
    pub step: usize,
    pub register: usize,
    pub value: FieldElement<F>,
}

impl<F: IsField> Assertion<F> {
    pub fn new(step: usize, register: usize, value: FieldElement<F>) -> Self {
        Self {
            step,
            register,
            value,
        }
    }
}

/// The assertions of one register, turned into a boundary constraint: the
/// register's trace polynomial minus the interpolant of the asserted values,
/// divided by the vanishing polynomial of the asserted steps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundaryGroup<F: IsField> {
    pub register: usize,
    pub steps: Vec<usize>,
    pub values: Vec<FieldElement<F>>,
}

impl<F: IsField> BoundaryGroup<F> {
    /// The x-coordinates `ω_S^step` of this group's assertions.
    pub fn domain_points(
        &self,
        trace_roots_of_unity: &[FieldElement<F>],
    ) -> Vec<FieldElement<F>> {
        self.steps
            .iter()
            .map(|step| trace_roots_of_unity[*step].clone())
            .collect()
    }

    /// The interpolant `B_r` through the asserted `(ω_S^step, value)` pairs.
    pub fn interpolant(
        &self,
        trace_roots_of_unity: &[FieldElement<F>],
    ) -> Polynomial<FieldElement<F>> {
        let points = self.domain_points(trace_roots_of_unity);
        Polynomial::interpolate(&points, &self.values)
            .expect("asserted steps are distinct by construction")
    }

    /// `Z_r(x) = Π (x − ω_S^step)` over this group's assertions.
    pub fn zerofier_at(
        &self,
        x: &FieldElement<F>,
        trace_roots_of_unity: &[FieldElement<F>],
    ) -> FieldElement<F> {
        self.domain_points(trace_roots_of_unity)
            .iter()
            .fold(FieldElement::one(), |acc, point| acc * (x - point))
    }
}

/// Validates a batch of assertions against the AIR shape and groups them by
/// register (ascending registers, ascending steps within each), the order
/// in which composition weights are assigned.
pub fn group_assertions<F: IsField>(
    assertions: &[Assertion<F>],
    context: &AirContext,
) -> Result<Vec<BoundaryGroup<F>>, InputShapeError> {
    if assertions.is_empty() {
        return Err(InputShapeError::NoAssertions);
    }

    let mut sorted: Vec<&Assertion<F>> = assertions.iter().collect();
    sorted.sort_by_key(|assertion| (assertion.register, assertion.step));

    let mut groups: Vec<BoundaryGroup<F>> = Vec::new();
    for assertion in sorted {
        if assertion.register >= context.trace_columns {
            return Err(InputShapeError::RegisterOutOfRange {
                register: assertion.register,
                register_count: context.trace_columns,
            });
        }
        if assertion.step >= context.trace_length {
            return Err(InputShapeError::StepOutOfRange {
                step: assertion.step,
                step_count: context.trace_length,
            });
        }

        match groups.last_mut() {
            Some(group) if group.register == assertion.register => {
                if group.steps.last() == Some(&assertion.step) {
                    return Err(InputShapeError::DuplicateAssertion {
                        step: assertion.step,
                        register: assertion.register,
                    });
                }
                group.steps.push(assertion.step);
                group.values.push(assertion.value.clone());
            }
            _ => groups.push(BoundaryGroup {
                register: assertion.register,
                steps: vec![assertion.step],
                values: vec![assertion.value.clone()],
            }),
        }
    }

    Ok(groups)
}
