use lodestark_math::fft::cpu::roots_of_unity::get_power_cycle;
use lodestark_math::field::element::FieldElement;
use lodestark_math::field::traits::IsFFTField;

use crate::errors::ProvingError;
use lodestark_math::fft::errors::FFTError;

/// Folds a layer of evaluations by `folding_factor` at the challenge `ζ`.
///
/// A fold by `f = 2^t` is `t` successive half-folds with challenges
/// `ζ, ζ², ζ⁴, …`: writing `P(x) = P_even(x²) + x · P_odd(x²)`, one half-fold
/// maps the evaluations of `P` over the size-`L` domain to the evaluations
/// of `P_even + ζ · P_odd` over the size-`L/2` domain,
///
/// `next[c] = (v[c] + v[c + L/2]) / 2 + ζ · (v[c] − v[c + L/2]) / (2·ω^c)`.
///
/// The composition of the half-folds equals interpolating each coset of `f`
/// points under `x ↦ x^f` and evaluating the interpolant at `ζ`, which is
/// the check the verifier performs.
pub fn fold_evaluations<F: IsFFTField>(
    evaluations: Vec<FieldElement<F>>,
    zeta: &FieldElement<F>,
    folding_factor: usize,
) -> Result<Vec<FieldElement<F>>, ProvingError> {
    let mut values = evaluations;
    let mut challenge = zeta.clone();
    let inverse_of_two = FieldElement::<F>::from(2)
        .inv()
        .map_err(|error| ProvingError::Fft(FFTError::from(error)))?;

    for _ in 0..folding_factor.trailing_zeros() {
        let len = values.len();
        let half = len / 2;
        let root = F::get_primitive_root_of_unity(len.trailing_zeros() as u64)
            .map_err(|error| ProvingError::Fft(FFTError::from(error)))?;
        let root_inverse = root
            .inv()
            .map_err(|error| ProvingError::Fft(FFTError::from(error)))?;
        let inverse_points = get_power_cycle(&root_inverse, half);

        values = (0..half)
            .map(|c| {
                let sum = &values[c] + &values[c + half];
                let difference = &values[c] - &values[c + half];
                (sum + &challenge * difference * &inverse_points[c]) * &inverse_of_two
            })
            .collect();
        challenge = challenge.square();
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodestark_math::fft::cpu::roots_of_unity::get_powers_of_primitive_root;
    use lodestark_math::field::fields::u64_prime_field::{F17, FE17};
    use lodestark_math::polynomial::Polynomial;

    #[test]
    fn half_fold_of_a_constant_is_the_constant() {
        let values = vec![FE17::from(5); 8];
        let folded = fold_evaluations(values, &FE17::from(3), 2).unwrap();
        assert_eq!(folded, vec![FE17::from(5); 4]);
    }

    #[test]
    fn fold_matches_coset_interpolation_on_a_small_field() {
        // Arbitrary (high-degree) evaluations: the fold must still equal the
        // per-coset interpolation evaluated at the challenge.
        let values: Vec<FE17> = [3u64, 14, 1, 5, 9, 2, 6, 11]
            .iter()
            .map(|v| FE17::from(*v))
            .collect();
        let zeta = FE17::from(7);
        let folded = fold_evaluations(values.clone(), &zeta, 4).unwrap();
        assert_eq!(folded.len(), 2);

        let roots = get_powers_of_primitive_root::<F17>(3, 8).unwrap();
        for column in 0..2 {
            let positions: Vec<usize> = (0..4).map(|m| column + m * 2).collect();
            let xs: Vec<FE17> = positions.iter().map(|p| roots[*p]).collect();
            let coset_values: Vec<FE17> = positions.iter().map(|p| values[*p]).collect();
            let interpolant = Polynomial::interpolate(&xs, &coset_values).unwrap();
            assert_eq!(interpolant.evaluate(&zeta), folded[column]);
        }
    }
}
