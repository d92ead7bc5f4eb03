use super::bit_reversing::in_place_bit_reverse_permute;
use crate::field::element::FieldElement;
use crate::field::traits::IsField;

/// In-place radix-2 Cooley-Tukey FFT.
///
/// `input` must have power-of-two length `n` and `root` must be a primitive
/// n-th root of unity. Input and output are both in natural order; the
/// bit-reversal permutation is applied internally before the butterflies.
pub fn in_place_radix2_fft<F: IsField>(input: &mut [FieldElement<F>], root: &FieldElement<F>) {
    debug_assert!(input.len().is_power_of_two());
    in_place_bit_reverse_permute(input);

    let n = input.len();
    let mut len = 2;
    while len <= n {
        let step_root = root.pow((n / len) as u128);
        for start in (0..n).step_by(len) {
            let mut twiddle = FieldElement::<F>::one();
            for j in start..start + len / 2 {
                let even = input[j].clone();
                let odd = &input[j + len / 2] * &twiddle;
                input[j] = &even + &odd;
                input[j + len / 2] = &even - &odd;
                twiddle = &twiddle * &step_root;
            }
        }
        len <<= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::fields::u64_prime_field::F17;
    use crate::field::traits::IsFFTField;

    type FE = FieldElement<F17>;

    // O(n^2) reference evaluation at the powers of `root`.
    fn naive_dft(coefficients: &[FE], root: &FE) -> Vec<FE> {
        (0..coefficients.len())
            .map(|i| {
                coefficients
                    .iter()
                    .enumerate()
                    .fold(FE::zero(), |acc, (j, coeff)| {
                        acc + coeff * root.pow((i * j) as u128)
                    })
            })
            .collect()
    }

    #[test]
    fn matches_naive_dft_on_eight_points() {
        let root = F17::get_primitive_root_of_unity(3).unwrap();
        let coefficients: Vec<FE> = (1..=8).map(FE::from).collect();
        let expected = naive_dft(&coefficients, &root);

        let mut values = coefficients;
        in_place_radix2_fft(&mut values, &root);
        assert_eq!(values, expected);
    }

    #[test]
    fn inverse_transform_recovers_the_input() {
        let root = F17::get_primitive_root_of_unity(4).unwrap();
        let coefficients: Vec<FE> = (0..16).map(FE::from).collect();

        let mut values = coefficients.clone();
        in_place_radix2_fft(&mut values, &root);
        in_place_radix2_fft(&mut values, &root.inv().unwrap());

        let n_inv = FE::from(16).inv().unwrap();
        let recovered: Vec<FE> = values.iter().map(|v| v * &n_inv).collect();
        assert_eq!(recovered, coefficients);
    }
}
