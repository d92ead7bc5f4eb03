use core::fmt::Debug;

use super::element::FieldElement;
use super::errors::FieldError;

/// Trait to add field behaviour to a struct.
pub trait IsField: Debug + Clone {
    /// The underlying base type for representing elements from the field.
    type BaseType: Clone + Debug + PartialEq + Eq + Send + Sync;

    /// Returns the sum of `a` and `b`.
    fn add(a: &Self::BaseType, b: &Self::BaseType) -> Self::BaseType;

    /// Returns the subtraction of `a` and `b`.
    fn sub(a: &Self::BaseType, b: &Self::BaseType) -> Self::BaseType;

    /// Returns the multiplication of `a` and `b`.
    fn mul(a: &Self::BaseType, b: &Self::BaseType) -> Self::BaseType;

    /// Returns the additive inverse of `a`.
    fn neg(a: &Self::BaseType) -> Self::BaseType;

    /// Returns the multiplicative inverse of `a`.
    fn inv(a: &Self::BaseType) -> Result<Self::BaseType, FieldError>;

    /// Returns a boolean indicating whether `a` and `b` are equal.
    fn eq(a: &Self::BaseType, b: &Self::BaseType) -> bool;

    /// Returns the additive neutral element.
    fn zero() -> Self::BaseType;

    /// Returns the multiplicative neutral element.
    fn one() -> Self::BaseType;

    /// Returns the element `x * 1` where 1 is the multiplicative neutral element.
    fn from_u64(x: u64) -> Self::BaseType;

    /// Returns `a` raised to the power of `exponent`.
    fn pow(a: &Self::BaseType, mut exponent: u128) -> Self::BaseType {
        let mut result = Self::one();
        let mut base = a.clone();

        while exponent > 0 {
            if exponent & 1 == 1 {
                result = Self::mul(&result, &base);
            }
            exponent >>= 1;
            base = Self::mul(&base, &base);
        }
        result
    }
}

/// Trait for prime fields, where elements have a canonical integer
/// representative in `[0, p)`.
pub trait IsPrimeField: IsField {
    /// Returns the canonical representative of `a`.
    fn representative(a: &Self::BaseType) -> Self::BaseType;

    /// Number of bits of the smallest integer power of two above the modulus.
    fn field_bit_size() -> usize;
}

/// Trait for prime fields with a large power-of-two subgroup, suitable for
/// radix-2 FFTs over domains of size up to `2^TWO_ADICITY`.
pub trait IsFFTField: IsPrimeField {
    const TWO_ADICITY: u64;

    /// An element of multiplicative order exactly `2^TWO_ADICITY`.
    const TWO_ADIC_PRIMITIVE_ROOT_OF_UNITY: Self::BaseType;

    /// Returns a primitive root of unity of order `2^order`.
    fn get_primitive_root_of_unity(order: u64) -> Result<FieldElement<Self>, FieldError>
    where
        Self: Sized,
    {
        if order > Self::TWO_ADICITY {
            return Err(FieldError::RootOfUnityError(order));
        }
        let two_adic_root = FieldElement::<Self>::new(Self::TWO_ADIC_PRIMITIVE_ROOT_OF_UNITY);
        let exponent = 1u128 << (Self::TWO_ADICITY - order);
        Ok(two_adic_root.pow(exponent))
    }
}
