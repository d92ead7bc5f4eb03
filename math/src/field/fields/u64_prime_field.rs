use crate::errors::ByteConversionError;
use crate::field::element::FieldElement;
use crate::field::errors::FieldError;
use crate::field::traits::{IsFFTField, IsField, IsPrimeField};
use crate::traits::ByteConversion;

/// A prime field with modulus below 2^64, with arithmetic carried out through
/// `u128` intermediates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct U64PrimeField<const MODULUS: u64>;

pub type U64FieldElement<const MODULUS: u64> = FieldElement<U64PrimeField<MODULUS>>;

pub type F17 = U64PrimeField<17>;
pub type FE17 = U64FieldElement<17>;

impl<const MODULUS: u64> IsField for U64PrimeField<MODULUS> {
    type BaseType = u64;

    fn add(a: &u64, b: &u64) -> u64 {
        ((*a as u128 + *b as u128) % MODULUS as u128) as u64
    }

    fn sub(a: &u64, b: &u64) -> u64 {
        (((*a as u128 + MODULUS as u128) - *b as u128) % MODULUS as u128) as u64
    }

    fn mul(a: &u64, b: &u64) -> u64 {
        ((*a as u128 * *b as u128) % MODULUS as u128) as u64
    }

    fn neg(a: &u64) -> u64 {
        if *a == 0 {
            0
        } else {
            MODULUS - a
        }
    }

    fn inv(a: &u64) -> Result<u64, FieldError> {
        if *a == 0 {
            return Err(FieldError::InvZeroError);
        }
        Ok(Self::pow(a, (MODULUS - 2) as u128))
    }

    fn eq(a: &u64, b: &u64) -> bool {
        a == b
    }

    fn zero() -> u64 {
        0
    }

    fn one() -> u64 {
        1
    }

    fn from_u64(x: u64) -> u64 {
        x % MODULUS
    }
}

impl<const MODULUS: u64> IsPrimeField for U64PrimeField<MODULUS> {
    fn representative(a: &u64) -> u64 {
        *a
    }

    fn field_bit_size() -> usize {
        (64 - MODULUS.leading_zeros()) as usize
    }
}

impl<const MODULUS: u64> Copy for U64FieldElement<MODULUS> {}

impl<const MODULUS: u64> ByteConversion for U64FieldElement<MODULUS> {
    fn to_bytes_be(&self) -> Vec<u8> {
        self.representative().to_be_bytes().to_vec()
    }

    fn to_bytes_le(&self) -> Vec<u8> {
        self.representative().to_le_bytes().to_vec()
    }

    fn from_bytes_be(bytes: &[u8]) -> Result<Self, ByteConversionError> {
        let bytes: [u8; 8] = bytes
            .try_into()
            .map_err(|_| ByteConversionError::InvalidLength {
                expected: 8,
                got: bytes.len(),
            })?;
        let value = u64::from_be_bytes(bytes);
        if value >= MODULUS {
            return Err(ByteConversionError::ValueNotInField);
        }
        Ok(Self::new(value))
    }

    fn from_bytes_le(bytes: &[u8]) -> Result<Self, ByteConversionError> {
        let bytes: [u8; 8] = bytes
            .try_into()
            .map_err(|_| ByteConversionError::InvalidLength {
                expected: 8,
                got: bytes.len(),
            })?;
        let value = u64::from_le_bytes(bytes);
        if value >= MODULUS {
            return Err(ByteConversionError::ValueNotInField);
        }
        Ok(Self::new(value))
    }
}

// 17 = 2^4 + 1; 3 generates the full multiplicative group, so it has order
// exactly 2^4. Handy for exercising the FFT on a tiny field.
impl IsFFTField for U64PrimeField<17> {
    const TWO_ADICITY: u64 = 4;
    const TWO_ADIC_PRIMITIVE_ROOT_OF_UNITY: u64 = 3;
}
