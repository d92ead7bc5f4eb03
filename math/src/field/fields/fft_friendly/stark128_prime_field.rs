use crate::errors::ByteConversionError;
use crate::field::element::FieldElement;
use crate::field::errors::FieldError;
use crate::field::traits::{IsFFTField, IsField, IsPrimeField};
use crate::traits::ByteConversion;

/// The 128-bit STARK-friendly prime field with modulus
/// `p = 2^128 − 9·2^32 + 1`.
///
/// `p − 1 = 2^32 · (2^96 − 9)`, so the multiplicative group has a subgroup of
/// order `2^32`, enough for evaluation domains of that size. Elements are
/// kept in plain (non-Montgomery) form; reduction after multiplication folds
/// the high 128 bits of the product through `2^128 ≡ 9·2^32 − 1 (mod p)`
/// twice, which leaves at most two conditional subtractions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stark128PrimeField;

pub const STARK128_MODULUS: u128 = 0xfffffffffffffffffffffff700000001;

// 2^128 mod p.
const FOLD: u128 = 0x8ffffffff;

impl Stark128PrimeField {
    /// Full 256-bit product of `a` and `b` as `(high, low)` 128-bit halves.
    fn mul_wide(a: u128, b: u128) -> (u128, u128) {
        let (a_lo, a_hi) = (a as u64 as u128, a >> 64);
        let (b_lo, b_hi) = (b as u64 as u128, b >> 64);

        let lo_lo = a_lo * b_lo;
        let lo_hi = a_lo * b_hi;
        let hi_lo = a_hi * b_lo;
        let hi_hi = a_hi * b_hi;

        let carry = ((lo_lo >> 64) + (lo_hi & 0xffffffffffffffff) + (hi_lo & 0xffffffffffffffff))
            >> 64;
        let lo = lo_lo
            .wrapping_add(lo_hi << 64)
            .wrapping_add(hi_lo << 64);
        let hi = hi_hi + (lo_hi >> 64) + (hi_lo >> 64) + carry;
        (hi, lo)
    }

    /// Reduces a 256-bit value `hi·2^128 + lo` modulo `p`.
    fn reduce(hi: u128, lo: u128) -> u128 {
        // First fold: hi·2^128 ≡ hi·FOLD, a 164-bit quantity.
        let (fold_hi, fold_lo) = Self::mul_wide(hi, FOLD);
        let (acc, carried) = fold_lo.overflowing_add(lo);
        // Second fold: the ~37 remaining high bits fit a single product.
        let tail = (fold_hi + carried as u128) * FOLD;
        let (mut result, overflowed) = acc.overflowing_add(tail);
        if overflowed {
            result += FOLD;
        }
        while result >= STARK128_MODULUS {
            result -= STARK128_MODULUS;
        }
        result
    }
}

impl IsField for Stark128PrimeField {
    type BaseType = u128;

    fn add(a: &u128, b: &u128) -> u128 {
        let (sum, overflowed) = a.overflowing_add(*b);
        let sum = if overflowed {
            sum.wrapping_add(FOLD)
        } else {
            sum
        };
        if sum >= STARK128_MODULUS {
            sum - STARK128_MODULUS
        } else {
            sum
        }
    }

    fn sub(a: &u128, b: &u128) -> u128 {
        if a >= b {
            a - b
        } else {
            STARK128_MODULUS - (b - a)
        }
    }

    fn mul(a: &u128, b: &u128) -> u128 {
        let (hi, lo) = Self::mul_wide(*a, *b);
        Self::reduce(hi, lo)
    }

    fn neg(a: &u128) -> u128 {
        if *a == 0 {
            0
        } else {
            STARK128_MODULUS - a
        }
    }

    fn inv(a: &u128) -> Result<u128, FieldError> {
        if *a == 0 {
            return Err(FieldError::InvZeroError);
        }
        Ok(Self::pow(a, STARK128_MODULUS - 2))
    }

    fn eq(a: &u128, b: &u128) -> bool {
        a == b
    }

    fn zero() -> u128 {
        0
    }

    fn one() -> u128 {
        1
    }

    fn from_u64(x: u64) -> u128 {
        x as u128
    }
}

impl IsPrimeField for Stark128PrimeField {
    fn representative(a: &u128) -> u128 {
        *a
    }

    fn field_bit_size() -> usize {
        128
    }
}

impl IsFFTField for Stark128PrimeField {
    const TWO_ADICITY: u64 = 32;
    // 3^((p − 1) / 2^32); 3 is a quadratic non-residue mod p.
    const TWO_ADIC_PRIMITIVE_ROOT_OF_UNITY: u128 = 0x0c368304ae2a8df0f6d4a0e8a19262da;
}

impl ByteConversion for FieldElement<Stark128PrimeField> {
    fn to_bytes_be(&self) -> Vec<u8> {
        self.representative().to_be_bytes().to_vec()
    }

    fn to_bytes_le(&self) -> Vec<u8> {
        self.representative().to_le_bytes().to_vec()
    }

    fn from_bytes_be(bytes: &[u8]) -> Result<Self, ByteConversionError> {
        let bytes: [u8; 16] = bytes
            .try_into()
            .map_err(|_| ByteConversionError::InvalidLength {
                expected: 16,
                got: bytes.len(),
            })?;
        let value = u128::from_be_bytes(bytes);
        if value >= STARK128_MODULUS {
            return Err(ByteConversionError::ValueNotInField);
        }
        Ok(Self::new(value))
    }

    fn from_bytes_le(bytes: &[u8]) -> Result<Self, ByteConversionError> {
        let bytes: [u8; 16] = bytes
            .try_into()
            .map_err(|_| ByteConversionError::InvalidLength {
                expected: 16,
                got: bytes.len(),
            })?;
        let value = u128::from_le_bytes(bytes);
        if value >= STARK128_MODULUS {
            return Err(ByteConversionError::ValueNotInField);
        }
        Ok(Self::new(value))
    }
}
