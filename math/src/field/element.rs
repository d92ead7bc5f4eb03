use core::fmt::Debug;
use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

use super::errors::FieldError;
use super::traits::{IsField, IsPrimeField};

/// An element of the field `F`, wrapping the backend representation so that
/// arithmetic can only combine elements of the same field.
#[derive(Debug, Clone)]
pub struct FieldElement<F: IsField> {
    value: F::BaseType,
}

impl<F: IsField> FieldElement<F> {
    pub fn new(value: F::BaseType) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &F::BaseType {
        &self.value
    }

    pub fn zero() -> Self {
        Self { value: F::zero() }
    }

    pub fn one() -> Self {
        Self { value: F::one() }
    }

    pub fn is_zero(&self) -> bool {
        F::eq(&self.value, &F::zero())
    }

    pub fn square(&self) -> Self {
        Self {
            value: F::mul(&self.value, &self.value),
        }
    }

    pub fn pow(&self, exponent: u128) -> Self {
        Self {
            value: F::pow(&self.value, exponent),
        }
    }

    pub fn inv(&self) -> Result<Self, FieldError> {
        Ok(Self {
            value: F::inv(&self.value)?,
        })
    }

    /// Inverts every element of the slice in place using Montgomery's batch
    /// inversion trick (one field inversion total). Fails on zero entries.
    pub fn inplace_batch_inverse(numbers: &mut [Self]) -> Result<(), FieldError> {
        if numbers.is_empty() {
            return Ok(());
        }
        let mut prod_prefix = Vec::with_capacity(numbers.len());
        prod_prefix.push(numbers[0].clone());
        for x in &numbers[1..] {
            let last = prod_prefix
                .last()
                .cloned()
                .unwrap_or_else(FieldElement::one);
            prod_prefix.push(&last * x);
        }
        let mut bi_inv = prod_prefix
            .last()
            .cloned()
            .unwrap_or_else(FieldElement::one)
            .inv()?;
        for i in (1..numbers.len()).rev() {
            let ai_inv = &bi_inv * &prod_prefix[i - 1];
            bi_inv = &bi_inv * &numbers[i];
            numbers[i] = ai_inv;
        }
        numbers[0] = bi_inv;
        Ok(())
    }
}

impl<F: IsPrimeField> FieldElement<F> {
    /// The canonical integer representative of this element.
    pub fn representative(&self) -> F::BaseType {
        F::representative(&self.value)
    }
}

impl<F: IsField> Default for FieldElement<F> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<F: IsField> PartialEq for FieldElement<F> {
    fn eq(&self, other: &Self) -> bool {
        F::eq(&self.value, &other.value)
    }
}

impl<F: IsField> Eq for FieldElement<F> {}

impl<F: IsField> From<u64> for FieldElement<F> {
    fn from(value: u64) -> Self {
        Self {
            value: F::from_u64(value),
        }
    }
}

impl<F: IsField> From<&FieldElement<F>> for FieldElement<F> {
    fn from(value: &FieldElement<F>) -> Self {
        value.clone()
    }
}

impl<F: IsField> Add<&FieldElement<F>> for &FieldElement<F> {
    type Output = FieldElement<F>;

    fn add(self, rhs: &FieldElement<F>) -> Self::Output {
        FieldElement {
            value: F::add(&self.value, &rhs.value),
        }
    }
}

impl<F: IsField> Add<FieldElement<F>> for FieldElement<F> {
    type Output = FieldElement<F>;

    fn add(self, rhs: FieldElement<F>) -> Self::Output {
        &self + &rhs
    }
}

impl<F: IsField> Add<&FieldElement<F>> for FieldElement<F> {
    type Output = FieldElement<F>;

    fn add(self, rhs: &FieldElement<F>) -> Self::Output {
        &self + rhs
    }
}

impl<F: IsField> Add<FieldElement<F>> for &FieldElement<F> {
    type Output = FieldElement<F>;

    fn add(self, rhs: FieldElement<F>) -> Self::Output {
        self + &rhs
    }
}

impl<F: IsField> AddAssign<&FieldElement<F>> for FieldElement<F> {
    fn add_assign(&mut self, rhs: &FieldElement<F>) {
        self.value = F::add(&self.value, &rhs.value);
    }
}

impl<F: IsField> AddAssign<FieldElement<F>> for FieldElement<F> {
    fn add_assign(&mut self, rhs: FieldElement<F>) {
        *self += &rhs;
    }
}

impl<F: IsField> Sub<&FieldElement<F>> for &FieldElement<F> {
    type Output = FieldElement<F>;

    fn sub(self, rhs: &FieldElement<F>) -> Self::Output {
        FieldElement {
            value: F::sub(&self.value, &rhs.value),
        }
    }
}

impl<F: IsField> Sub<FieldElement<F>> for FieldElement<F> {
    type Output = FieldElement<F>;

    fn sub(self, rhs: FieldElement<F>) -> Self::Output {
        &self - &rhs
    }
}

impl<F: IsField> Sub<&FieldElement<F>> for FieldElement<F> {
    type Output = FieldElement<F>;

    fn sub(self, rhs: &FieldElement<F>) -> Self::Output {
        &self - rhs
    }
}

impl<F: IsField> Sub<FieldElement<F>> for &FieldElement<F> {
    type Output = FieldElement<F>;

    fn sub(self, rhs: FieldElement<F>) -> Self::Output {
        self - &rhs
    }
}

impl<F: IsField> Mul<&FieldElement<F>> for &FieldElement<F> {
    type Output = FieldElement<F>;

    fn mul(self, rhs: &FieldElement<F>) -> Self::Output {
        FieldElement {
            value: F::mul(&self.value, &rhs.value),
        }
    }
}

impl<F: IsField> Mul<FieldElement<F>> for FieldElement<F> {
    type Output = FieldElement<F>;

    fn mul(self, rhs: FieldElement<F>) -> Self::Output {
        &self * &rhs
    }
}

impl<F: IsField> Mul<&FieldElement<F>> for FieldElement<F> {
    type Output = FieldElement<F>;

    fn mul(self, rhs: &FieldElement<F>) -> Self::Output {
        &self * rhs
    }
}

impl<F: IsField> Mul<FieldElement<F>> for &FieldElement<F> {
    type Output = FieldElement<F>;

    fn mul(self, rhs: FieldElement<F>) -> Self::Output {
        self * &rhs
    }
}

impl<F: IsField> Div<&FieldElement<F>> for &FieldElement<F> {
    type Output = FieldElement<F>;

    /// Panics when dividing by zero; fallible code paths should use
    /// [`FieldElement::inv`] instead.
    fn div(self, rhs: &FieldElement<F>) -> Self::Output {
        let inverse = rhs.inv().expect("division by zero");
        self * &inverse
    }
}

impl<F: IsField> Div<FieldElement<F>> for FieldElement<F> {
    type Output = FieldElement<F>;

    fn div(self, rhs: FieldElement<F>) -> Self::Output {
        &self / &rhs
    }
}

impl<F: IsField> Div<&FieldElement<F>> for FieldElement<F> {
    type Output = FieldElement<F>;

    fn div(self, rhs: &FieldElement<F>) -> Self::Output {
        &self / rhs
    }
}

impl<F: IsField> Div<FieldElement<F>> for &FieldElement<F> {
    type Output = FieldElement<F>;

    fn div(self, rhs: FieldElement<F>) -> Self::Output {
        self / &rhs
    }
}

impl<F: IsField> Neg for &FieldElement<F> {
    type Output = FieldElement<F>;

    fn neg(self) -> Self::Output {
        FieldElement {
            value: F::neg(&self.value),
        }
    }
}

impl<F: IsField> Neg for FieldElement<F> {
    type Output = FieldElement<F>;

    fn neg(self) -> Self::Output {
        -&self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::fields::u64_prime_field::U64PrimeField;

    const MODULUS: u64 = 13;
    type F = U64PrimeField<MODULUS>;
    type FE = FieldElement<F>;

    #[test]
    fn batch_inverse_inverts_every_element() {
        let mut numbers: Vec<FE> = (1..MODULUS).map(FE::from).collect();
        let expected: Vec<FE> = numbers
            .iter()
            .map(|x| x.inv().unwrap())
            .collect();
        FE::inplace_batch_inverse(&mut numbers).unwrap();
        assert_eq!(numbers, expected);
    }

    #[test]
    fn batch_inverse_fails_on_zero_entry() {
        let mut numbers = vec![FE::from(3), FE::zero(), FE::from(5)];
        assert_eq!(
            FE::inplace_batch_inverse(&mut numbers),
            Err(FieldError::InvZeroError)
        );
    }

    #[test]
    fn batch_inverse_of_empty_slice_is_ok() {
        let mut numbers: Vec<FE> = vec![];
        assert!(FE::inplace_batch_inverse(&mut numbers).is_ok());
    }
}
