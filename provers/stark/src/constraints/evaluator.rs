use lodestark_math::fft::cpu::roots_of_unity::get_power_cycle;
use lodestark_math::fft::polynomial::FFTPoly;
use lodestark_math::field::element::FieldElement;
use lodestark_math::field::traits::IsFFTField;
use lodestark_math::traits::ByteConversion;

#[cfg(feature = "parallel")]
use rayon::prelude::{IntoParallelIterator, ParallelIterator};

use super::boundary::BoundaryGroup;
use crate::context::AirContext;
use crate::domain::Domain;
use crate::errors::{ConfigurationError, InputShapeError, ProvingError};
use crate::frame::Frame;
use crate::trace::TraceTable;
use crate::traits::AIR;
use crate::transcript::StarkTranscript;
use lodestark_crypto::fiat_shamir::is_transcript::IsTranscript;
use sha2::Digest;

/// The transcript-derived linear combination weights: an `(α, β)` pair per
/// transition constraint, then per boundary group. `α` weighs the raw
/// quotient, `β` the degree-lifted copy.
#[derive(Clone, Debug)]
pub struct CompositionCoefficients<F: IsFFTField> {
    pub transition: Vec<(FieldElement<F>, FieldElement<F>)>,
    pub boundary: Vec<(FieldElement<F>, FieldElement<F>)>,
}

pub fn sample_composition_coefficients<F, D>(
    constraint_count: usize,
    boundary_group_count: usize,
    transcript: &mut StarkTranscript<F, D>,
) -> CompositionCoefficients<F>
where
    F: IsFFTField,
    D: Digest,
    FieldElement<F>: ByteConversion,
{
    let mut draw_pairs = |count: usize| -> Vec<(FieldElement<F>, FieldElement<F>)> {
        (0..count)
            .map(|_| {
                let alpha = transcript.sample_field_element();
                let beta = transcript.sample_field_element();
                (alpha, beta)
            })
            .collect()
    };
    let transition = draw_pairs(constraint_count);
    let boundary = draw_pairs(boundary_group_count);
    CompositionCoefficients {
        transition,
        boundary,
    }
}

/// Degree bookkeeping for the composition polynomial.
///
/// The target bound is `D = max(d_max − 1, 2) · S`; every quotient is lifted
/// to degree `D − 1` by an `x^lift` companion term, so the combination has
/// degree below `D`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DegreeSchedule {
    /// The bound `D`.
    pub composition_degree: usize,
    pub transition_lifts: Vec<usize>,
    pub boundary_lifts: Vec<usize>,
}

impl DegreeSchedule {
    pub fn new<F: IsFFTField>(
        context: &AirContext,
        boundary_groups: &[BoundaryGroup<F>],
    ) -> Result<Self, ConfigurationError> {
        let trace_length = context.trace_length;
        let exemptions = context.transition_exemptions;
        let composition_degree = context.max_constraint_degree().saturating_sub(1).max(2)
            * trace_length;

        let transition_lifts = context
            .transition_degrees
            .iter()
            .map(|degree| {
                let quotient_degree = degree * (trace_length - 1) - (trace_length - exemptions);
                (composition_degree - 1)
                    .checked_sub(quotient_degree)
                    .ok_or(ConfigurationError::InvalidConstraintDegrees)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let boundary_lifts = boundary_groups
            .iter()
            .map(|group| {
                let quotient_degree = (trace_length - 1)
                    .checked_sub(group.steps.len())
                    .ok_or(ConfigurationError::InvalidConstraintDegrees)?;
                (composition_degree - 1)
                    .checked_sub(quotient_degree)
                    .ok_or(ConfigurationError::InvalidConstraintDegrees)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            composition_degree,
            transition_lifts,
            boundary_lifts,
        })
    }

    /// Remainder degree bound after folding the composition down to
    /// `remainder_size` points: `D · remainder_size / N`.
    pub fn remainder_degree_bound(&self, lde_domain_size: usize, remainder_size: usize) -> usize {
        self.composition_degree * remainder_size / lde_domain_size
    }
}

/// Inverts every nonzero entry in place, leaving zeros untouched. Division
/// by a vanishing polynomial is only meaningful off its zero set; the query
/// engine never selects the affected positions.
pub fn batch_inverse_or_zero<F: IsFFTField>(values: &mut [FieldElement<F>]) {
    let zeroes: Vec<bool> = values.iter().map(|value| value.is_zero()).collect();
    for value in values.iter_mut() {
        if value.is_zero() {
            *value = FieldElement::one();
        }
    }
    FieldElement::inplace_batch_inverse(values).expect("zero entries were masked");
    for (value, was_zero) in values.iter_mut().zip(zeroes) {
        if was_zero {
            *value = FieldElement::zero();
        }
    }
}

/// `Σ_k (α_k + β_k · x^lift_k) · q_k` over the transition quotients followed
/// by the boundary quotients. Shared verbatim by the prover (vectorized over
/// the extended domain) and the verifier (at single queried points).
pub fn linear_combination<F: IsFFTField>(
    x: &FieldElement<F>,
    transition_quotients: &[FieldElement<F>],
    boundary_quotients: &[FieldElement<F>],
    schedule: &DegreeSchedule,
    coefficients: &CompositionCoefficients<F>,
) -> FieldElement<F> {
    let mut accumulator = FieldElement::zero();
    let terms = transition_quotients
        .iter()
        .zip(&schedule.transition_lifts)
        .zip(&coefficients.transition)
        .chain(
            boundary_quotients
                .iter()
                .zip(&schedule.boundary_lifts)
                .zip(&coefficients.boundary),
        );
    for ((quotient, lift), (alpha, beta)) in terms {
        let lifted = beta * x.pow(*lift as u128);
        accumulator = accumulator + (alpha + lifted) * quotient;
    }
    accumulator
}

/// `1 / Z_t(x)` for the transition vanishing polynomial
/// `Z_t(x) = (x^S − 1) / Π_{j=1..e} (x − ω_S^{S−j})`. `None` at the zeros of
/// `Z_t`, i.e. on the non-exempt base domain.
pub fn transition_zerofier_inverse_at<F: IsFFTField>(
    x: &FieldElement<F>,
    context: &AirContext,
    trace_roots_of_unity: &[FieldElement<F>],
) -> Option<FieldElement<F>> {
    let trace_length = context.trace_length;
    let numerator = x.pow(trace_length as u128) - FieldElement::one();
    let numerator_inv = numerator.inv().ok()?;
    let denominator = (1..=context.transition_exemptions).fold(
        FieldElement::one(),
        |acc, j| acc * (x - &trace_roots_of_unity[trace_length - j]),
    );
    Some(denominator * numerator_inv)
}

/// Evaluates the composition polynomial over the extended domain.
///
/// For every point the transition constraints are evaluated on the current
/// and next-in-base-domain rows and divided by the transition vanishing
/// polynomial; each boundary group contributes its quotient; the weighted
/// combination of all quotients is the composition value. Values at indices
/// that are multiples of the extension factor divide by zero and are
/// deliberately left as zero.
pub struct ConstraintEvaluator<'a, F: IsFFTField, A: AIR<Field = F>> {
    air: &'a A,
    boundary_groups: &'a [BoundaryGroup<F>],
    schedule: &'a DegreeSchedule,
    coefficients: &'a CompositionCoefficients<F>,
}

impl<'a, F, A> ConstraintEvaluator<'a, F, A>
where
    F: IsFFTField,
    A: AIR<Field = F> + Send + Sync,
    FieldElement<F>: Send + Sync,
{
    pub fn new(
        air: &'a A,
        boundary_groups: &'a [BoundaryGroup<F>],
        schedule: &'a DegreeSchedule,
        coefficients: &'a CompositionCoefficients<F>,
    ) -> Self {
        Self {
            air,
            boundary_groups,
            schedule,
            coefficients,
        }
    }

    pub fn evaluate(
        &self,
        domain: &Domain<F>,
        lde_trace: &TraceTable<F>,
        static_lde: &[Vec<FieldElement<F>>],
    ) -> Result<Vec<FieldElement<F>>, ProvingError> {
        let context = self.air.context();
        let trace_length = context.trace_length;
        let blowup = domain.blowup_factor;
        let domain_size = domain.lde_domain_size;

        // 1 / Z_t over the whole domain. x^S cycles with period E, so the
        // numerator needs only E distinct values.
        let numerator_cycle =
            get_power_cycle(&domain.lde_primitive_root.pow(trace_length as u128), blowup);
        let mut zerofier_inverses: Vec<FieldElement<F>> = (0..domain_size)
            .map(|i| &numerator_cycle[i % blowup] - FieldElement::one())
            .collect();
        batch_inverse_or_zero(&mut zerofier_inverses);
        for (i, inverse) in zerofier_inverses.iter_mut().enumerate() {
            let x = &domain.lde_roots_of_unity[i];
            let denominator = (1..=context.transition_exemptions).fold(
                FieldElement::one(),
                |acc, j| acc * (x - &domain.trace_roots_of_unity[trace_length - j]),
            );
            *inverse = &*inverse * denominator;
        }

        // Boundary numerators (T_r − B_r) and inverted zerofiers per group.
        let mut boundary_numerators = Vec::with_capacity(self.boundary_groups.len());
        let mut boundary_zerofier_inverses = Vec::with_capacity(self.boundary_groups.len());
        for group in self.boundary_groups {
            let interpolant = group.interpolant(&domain.trace_roots_of_unity);
            let interpolant_evaluations = interpolant
                .evaluate_fft(1, Some(domain_size))
                .map_err(ProvingError::Fft)?;
            let register_column = &lde_trace.columns()[group.register];
            let numerators: Vec<FieldElement<F>> = register_column
                .iter()
                .zip(interpolant_evaluations)
                .map(|(trace_value, interpolant_value)| trace_value - interpolant_value)
                .collect();
            boundary_numerators.push(numerators);

            let points = group.domain_points(&domain.trace_roots_of_unity);
            let mut zerofiers: Vec<FieldElement<F>> = domain
                .lde_roots_of_unity
                .iter()
                .map(|x| {
                    points
                        .iter()
                        .fold(FieldElement::one(), |acc, point| acc * (x - point))
                })
                .collect();
            batch_inverse_or_zero(&mut zerofiers);
            boundary_zerofier_inverses.push(zerofiers);
        }

        let evaluate_at = |index: usize| -> Result<FieldElement<F>, ProvingError> {
            let x = &domain.lde_roots_of_unity[index];
            let next_index = (index + blowup) % domain_size;
            let frame = Frame::from_rows(lde_trace.get_row(index), lde_trace.get_row(next_index));
            let statics: Vec<FieldElement<F>> = static_lde
                .iter()
                .map(|column| column[index].clone())
                .collect();

            let constraint_evaluations = self.air.evaluate_transition(&frame, &statics);
            if constraint_evaluations.len() != context.num_transition_constraints() {
                return Err(InputShapeError::WrongConstraintCount {
                    got: constraint_evaluations.len(),
                    expected: context.num_transition_constraints(),
                }
                .into());
            }

            let transition_quotients: Vec<FieldElement<F>> = constraint_evaluations
                .iter()
                .map(|evaluation| evaluation * &zerofier_inverses[index])
                .collect();
            let boundary_quotients: Vec<FieldElement<F>> = boundary_numerators
                .iter()
                .zip(&boundary_zerofier_inverses)
                .map(|(numerators, inverses)| &numerators[index] * &inverses[index])
                .collect();

            Ok(linear_combination(
                x,
                &transition_quotients,
                &boundary_quotients,
                self.schedule,
                self.coefficients,
            ))
        };

        #[cfg(feature = "parallel")]
        let evaluations = (0..domain_size)
            .into_par_iter()
            .map(evaluate_at)
            .collect::<Result<Vec<_>, _>>()?;
        #[cfg(not(feature = "parallel"))]
        let evaluations = (0..domain_size)
            .map(evaluate_at)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(evaluations)
    }
}
