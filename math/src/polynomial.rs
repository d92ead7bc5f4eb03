use core::ops;

use crate::field::element::FieldElement;
use crate::field::traits::IsField;

/// Represents the polynomial c_0 + c_1 * X + c_2 * X^2 + ... + c_n * X^n
/// as a vector of coefficients `[c_0, c_1, ... , c_n]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polynomial<FE> {
    coefficients: Vec<FE>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum InterpolateError {
    NonUniqueXs,
    UnequalLengths { xs: usize, ys: usize },
}

impl core::fmt::Display for InterpolateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InterpolateError::NonUniqueXs => write!(f, "interpolation points must be distinct"),
            InterpolateError::UnequalLengths { xs, ys } => {
                write!(f, "got {xs} x-coordinates for {ys} y-coordinates")
            }
        }
    }
}

impl std::error::Error for InterpolateError {}

impl<F: IsField> Polynomial<FieldElement<F>> {
    /// Creates a new polynomial with the given coefficients, dropping
    /// trailing zeros.
    pub fn new(coefficients: &[FieldElement<F>]) -> Self {
        let mut unpadded_coefficients = coefficients
            .iter()
            .rev()
            .skip_while(|x| **x == FieldElement::zero())
            .cloned()
            .collect::<Vec<FieldElement<F>>>();
        unpadded_coefficients.reverse();
        Polynomial {
            coefficients: unpadded_coefficients,
        }
    }

    pub fn new_monomial(coefficient: FieldElement<F>, degree: usize) -> Self {
        let mut coefficients = vec![FieldElement::zero(); degree];
        coefficients.push(coefficient);
        Self::new(&coefficients)
    }

    pub fn zero() -> Self {
        Self::new(&[])
    }

    /// Lagrange interpolation over arbitrary distinct points. Quadratic in
    /// the number of points; meant for the small point sets of boundary
    /// polynomials, FRI cosets and the remainder check.
    pub fn interpolate(
        xs: &[FieldElement<F>],
        ys: &[FieldElement<F>],
    ) -> Result<Self, InterpolateError> {
        if xs.len() != ys.len() {
            return Err(InterpolateError::UnequalLengths {
                xs: xs.len(),
                ys: ys.len(),
            });
        }

        let mut result = Polynomial::zero();
        for (i, y) in ys.iter().enumerate() {
            // Numerator Π_{j≠i} (X − x_j) and denominator Π_{j≠i} (x_i − x_j).
            let mut numerator = Polynomial::new(&[y.clone()]);
            let mut denominator = FieldElement::<F>::one();
            for (j, x) in xs.iter().enumerate() {
                if i == j {
                    continue;
                }
                numerator = numerator.mul_with_ref(&Polynomial::new(&[-x, FieldElement::one()]));
                denominator = denominator * (&xs[i] - x);
            }
            let denominator_inv = denominator
                .inv()
                .map_err(|_| InterpolateError::NonUniqueXs)?;
            result = result + numerator.scale_by(&denominator_inv);
        }
        Ok(result)
    }

    pub fn evaluate(&self, x: &FieldElement<F>) -> FieldElement<F> {
        self.coefficients
            .iter()
            .rev()
            .fold(FieldElement::zero(), |acc, coeff| acc * x + coeff)
    }

    pub fn evaluate_slice(&self, input: &[FieldElement<F>]) -> Vec<FieldElement<F>> {
        input.iter().map(|x| self.evaluate(x)).collect()
    }

    pub fn degree(&self) -> usize {
        if self.coefficients.is_empty() {
            0
        } else {
            self.coefficients.len() - 1
        }
    }

    /// Returns coefficients of the polynomial as an array
    /// \[c_0, c_1, c_2, ..., c_n\]
    pub fn coefficients(&self) -> &[FieldElement<F>] {
        &self.coefficients
    }

    pub fn coeff_len(&self) -> usize {
        self.coefficients.len()
    }

    /// Multiplies every coefficient by the given scalar.
    pub fn scale_by(&self, factor: &FieldElement<F>) -> Self {
        let coefficients = self
            .coefficients
            .iter()
            .map(|coeff| coeff * factor)
            .collect::<Vec<_>>();
        Self { coefficients }
    }

    /// Pads polynomial representations with minimum number of zeros to match lengths.
    pub fn pad_with_zero_coefficients(pa: &Self, pb: &Self) -> (Self, Self) {
        let mut pa = pa.clone();
        let mut pb = pb.clone();

        if pa.coefficients.len() > pb.coefficients.len() {
            pb.coefficients
                .resize(pa.coefficients.len(), FieldElement::zero());
        } else {
            pa.coefficients
                .resize(pb.coefficients.len(), FieldElement::zero());
        }
        (pa, pb)
    }

    pub fn mul_with_ref(&self, factor: &Self) -> Self {
        if self.coefficients.is_empty() || factor.coefficients.is_empty() {
            return Polynomial::zero();
        }

        let degree = self.degree() + factor.degree();
        let mut coefficients = vec![FieldElement::zero(); degree + 1];
        for i in 0..=factor.degree() {
            for j in 0..=self.degree() {
                coefficients[i + j] += &factor.coefficients[i] * &self.coefficients[j];
            }
        }
        Polynomial::new(&coefficients)
    }
}

impl<F: IsField> ops::Add<&Polynomial<FieldElement<F>>> for &Polynomial<FieldElement<F>> {
    type Output = Polynomial<FieldElement<F>>;

    fn add(self, a_polynomial: &Polynomial<FieldElement<F>>) -> Self::Output {
        let (pa, pb) = Polynomial::pad_with_zero_coefficients(self, a_polynomial);
        let new_coefficients = pa
            .coefficients
            .iter()
            .zip(pb.coefficients.iter())
            .map(|(x, y)| x + y)
            .collect::<Vec<FieldElement<F>>>();
        Polynomial::new(&new_coefficients)
    }
}

impl<F: IsField> ops::Add<Polynomial<FieldElement<F>>> for Polynomial<FieldElement<F>> {
    type Output = Polynomial<FieldElement<F>>;

    fn add(self, a_polynomial: Polynomial<FieldElement<F>>) -> Polynomial<FieldElement<F>> {
        &self + &a_polynomial
    }
}

impl<F: IsField> ops::Add<&Polynomial<FieldElement<F>>> for Polynomial<FieldElement<F>> {
    type Output = Polynomial<FieldElement<F>>;

    fn add(self, a_polynomial: &Polynomial<FieldElement<F>>) -> Polynomial<FieldElement<F>> {
        &self + a_polynomial
    }
}

impl<F: IsField> ops::Add<Polynomial<FieldElement<F>>> for &Polynomial<FieldElement<F>> {
    type Output = Polynomial<FieldElement<F>>;

    fn add(self, a_polynomial: Polynomial<FieldElement<F>>) -> Polynomial<FieldElement<F>> {
        self + &a_polynomial
    }
}

impl<F: IsField> ops::Neg for &Polynomial<FieldElement<F>> {
    type Output = Polynomial<FieldElement<F>>;

    fn neg(self) -> Polynomial<FieldElement<F>> {
        let neg = self
            .coefficients
            .iter()
            .map(|x| -x)
            .collect::<Vec<FieldElement<F>>>();
        Polynomial::new(&neg)
    }
}

impl<F: IsField> ops::Neg for Polynomial<FieldElement<F>> {
    type Output = Polynomial<FieldElement<F>>;

    fn neg(self) -> Polynomial<FieldElement<F>> {
        -&self
    }
}

impl<F: IsField> ops::Sub<&Polynomial<FieldElement<F>>> for &Polynomial<FieldElement<F>> {
    type Output = Polynomial<FieldElement<F>>;

    fn sub(self, substrahend: &Polynomial<FieldElement<F>>) -> Polynomial<FieldElement<F>> {
        self + &(-substrahend)
    }
}

impl<F: IsField> ops::Sub<Polynomial<FieldElement<F>>> for Polynomial<FieldElement<F>> {
    type Output = Polynomial<FieldElement<F>>;

    fn sub(self, substrahend: Polynomial<FieldElement<F>>) -> Polynomial<FieldElement<F>> {
        &self - &substrahend
    }
}

impl<F: IsField> ops::Mul<&Polynomial<FieldElement<F>>> for &Polynomial<FieldElement<F>> {
    type Output = Polynomial<FieldElement<F>>;

    fn mul(self, factor: &Polynomial<FieldElement<F>>) -> Polynomial<FieldElement<F>> {
        self.mul_with_ref(factor)
    }
}

impl<F: IsField> ops::Mul<Polynomial<FieldElement<F>>> for Polynomial<FieldElement<F>> {
    type Output = Polynomial<FieldElement<F>>;

    fn mul(self, factor: Polynomial<FieldElement<F>>) -> Polynomial<FieldElement<F>> {
        self.mul_with_ref(&factor)
    }
}
