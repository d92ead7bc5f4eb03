use super::cpu::fft::in_place_radix2_fft;
use super::errors::FFTError;
use crate::field::element::FieldElement;
use crate::field::traits::IsFFTField;
use crate::polynomial::Polynomial;

/// FFT-based evaluation and interpolation over power-of-two subgroups of the
/// field's roots of unity.
pub trait FFTPoly<F: IsFFTField>: Sized {
    /// Returns `N` evaluations of this polynomial (`P(w^i)` for a primitive
    /// N-th root of unity `w`), with
    /// `N = max(coeff_len, domain_size).next_power_of_two() * blowup_factor`.
    fn evaluate_fft(
        &self,
        blowup_factor: usize,
        domain_size: Option<usize>,
    ) -> Result<Vec<FieldElement<F>>, FFTError>;

    /// Returns the polynomial that interpolates `(w^i, fft_evals[i])`, the
    /// inverse of [`FFTPoly::evaluate_fft`].
    fn interpolate_fft(fft_evals: &[FieldElement<F>]) -> Result<Self, FFTError>;
}

impl<F: IsFFTField> FFTPoly<F> for Polynomial<FieldElement<F>> {
    fn evaluate_fft(
        &self,
        blowup_factor: usize,
        domain_size: Option<usize>,
    ) -> Result<Vec<FieldElement<F>>, FFTError> {
        let domain_size = domain_size.unwrap_or(0);
        let len = core::cmp::max(self.coeff_len(), domain_size).next_power_of_two()
            * blowup_factor;
        if !len.is_power_of_two() {
            return Err(FFTError::InputError(len));
        }

        if self.coefficients().is_empty() {
            return Ok(vec![FieldElement::zero(); len]);
        }

        let mut coefficients = self.coefficients().to_vec();
        coefficients.resize(len, FieldElement::zero());

        let order = len.trailing_zeros() as u64;
        let root = F::get_primitive_root_of_unity(order)?;
        in_place_radix2_fft(&mut coefficients, &root);
        Ok(coefficients)
    }

    fn interpolate_fft(fft_evals: &[FieldElement<F>]) -> Result<Self, FFTError> {
        if !fft_evals.len().is_power_of_two() {
            return Err(FFTError::InputError(fft_evals.len()));
        }

        let order = fft_evals.len().trailing_zeros() as u64;
        let root = F::get_primitive_root_of_unity(order)?;
        let root_inv = root.inv().map_err(FFTError::from)?;

        let mut coefficients = fft_evals.to_vec();
        in_place_radix2_fft(&mut coefficients, &root_inv);

        let len_inv = FieldElement::<F>::from(fft_evals.len() as u64)
            .inv()
            .map_err(FFTError::from)?;
        let coefficients: Vec<_> = coefficients.iter().map(|c| c * &len_inv).collect();
        Ok(Polynomial::new(&coefficients))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::fields::fft_friendly::stark128_prime_field::Stark128PrimeField;
    use crate::field::fields::u64_prime_field::F17;

    type FE = FieldElement<F17>;

    #[test]
    fn evaluations_match_pointwise_evaluation() {
        let poly = Polynomial::new(&[FE::from(3), FE::from(1), FE::from(4), FE::from(1)]);
        let evals = poly.evaluate_fft(2, None).unwrap();
        assert_eq!(evals.len(), 8);

        let root = F17::get_primitive_root_of_unity(3).unwrap();
        for (i, eval) in evals.iter().enumerate() {
            assert_eq!(*eval, poly.evaluate(&root.pow(i as u128)));
        }
    }

    #[test]
    fn interpolate_is_the_inverse_of_evaluate() {
        let poly = Polynomial::new(&[FE::from(5), FE::from(7), FE::from(11)]);
        let evals = poly.evaluate_fft(1, Some(8)).unwrap();
        let recovered = Polynomial::interpolate_fft(&evals).unwrap();
        assert_eq!(recovered, poly);
    }

    #[test]
    fn blowup_keeps_the_base_evaluations_at_even_strides() {
        let poly = Polynomial::new(&[FE::from(2), FE::from(9), FE::from(6), FE::from(13)]);
        let base = poly.evaluate_fft(1, None).unwrap();
        let extended = poly.evaluate_fft(4, None).unwrap();
        for (i, value) in base.iter().enumerate() {
            assert_eq!(value, &extended[i * 4]);
        }
    }

    #[test]
    fn round_trip_on_the_large_field() {
        type BigFE = FieldElement<Stark128PrimeField>;
        let poly = Polynomial::new(&[
            BigFE::from(1u64 << 40),
            BigFE::new(0x0123456789abcdef0123456789abcdef),
            BigFE::from(42),
        ]);
        let evals = poly.evaluate_fft(2, Some(16)).unwrap();
        assert_eq!(evals.len(), 32);
        assert_eq!(Polynomial::interpolate_fft(&evals).unwrap(), poly);
    }

    #[test]
    fn non_power_of_two_interpolation_is_rejected() {
        let evals: Vec<FE> = (0..6).map(FE::from).collect();
        assert_eq!(
            Polynomial::<FE>::interpolate_fft(&evals),
            Err(FFTError::InputError(6))
        );
    }

    #[test]
    fn oversized_domains_are_rejected() {
        let poly = Polynomial::new(&[FE::from(1), FE::from(2)]);
        // F17 only supports domains up to 2^4.
        assert!(poly.evaluate_fft(1, Some(64)).is_err());
    }
}
