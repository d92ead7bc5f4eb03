use crate::field::element::FieldElement;
use crate::field::fields::u64_prime_field::U64PrimeField;
use crate::field::traits::IsFFTField;

/// The 32-bit prime `p = 2^32 − 3·2^25 + 1 = 4194304001`.
///
/// `p − 1 = 2^25 · 125`, giving evaluation domains of up to `2^25` points
/// while keeping all arithmetic in a single machine word.
pub type TwoAdic32PrimeField = U64PrimeField<4194304001>;

pub type TwoAdic32FieldElement = FieldElement<TwoAdic32PrimeField>;

impl IsFFTField for TwoAdic32PrimeField {
    const TWO_ADICITY: u64 = 25;
    // 3^((p − 1) / 2^25); 3 generates the multiplicative group.
    const TWO_ADIC_PRIMITIVE_ROOT_OF_UNITY: u64 = 1177770062;
}
