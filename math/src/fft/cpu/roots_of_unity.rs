use crate::fft::errors::FFTError;
use crate::field::element::FieldElement;
use crate::field::traits::IsFFTField;

/// Returns `[1, g, g^2, ..., g^(count-1)]` for `g` a primitive root of unity
/// of order `2^order`.
pub fn get_powers_of_primitive_root<F: IsFFTField>(
    order: u64,
    count: usize,
) -> Result<Vec<FieldElement<F>>, FFTError> {
    let root = F::get_primitive_root_of_unity(order)?;
    Ok(get_power_cycle(&root, count))
}

/// Returns `[1, g, g^2, ..., g^(count-1)]`.
pub fn get_power_cycle<F: IsFFTField>(
    root: &FieldElement<F>,
    count: usize,
) -> Vec<FieldElement<F>> {
    let mut powers = Vec::with_capacity(count);
    let mut current = FieldElement::one();
    for _ in 0..count {
        powers.push(current.clone());
        current = &current * root;
    }
    powers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::fields::u64_prime_field::F17;

    type FE = FieldElement<F17>;

    #[test]
    fn power_cycle_of_order_four() {
        // 4 has order 4 in F17: 4, 16, 13, 1.
        let powers = get_power_cycle(&FE::from(4), 4);
        let expected: Vec<FE> = [1u64, 4, 16, 13].iter().map(|x| FE::from(*x)).collect();
        assert_eq!(powers, expected);
    }

    #[test]
    fn primitive_root_powers_cycle_back_to_one() {
        let powers = get_powers_of_primitive_root::<F17>(3, 9).unwrap();
        assert_eq!(powers[0], FE::one());
        assert_eq!(powers[8], FE::one());
        assert_ne!(powers[4], FE::one());
    }
}
