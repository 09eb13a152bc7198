//! Polynomials in a single unknown, stored in canonical form.

use std::{
    collections::BTreeMap,
    fmt::{self, Display, Formatter},
    iter::{Extend, FromIterator},
    ops::{Add, Mul, Neg, Sub},
};

/// The relative size of the rounding error left over when two terms cancel.
const CANCELLATION: f64 = 1e-12;

/// A mapping from exponent to coefficient.
///
/// Terms with a zero coefficient are never stored, so the empty mapping is
/// the constant `0` and two polynomials with the same terms always compare
/// equal.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Polynomial {
    terms: BTreeMap<u32, f64>,
}

impl Polynomial {
    pub fn zero() -> Self { Polynomial::default() }

    pub fn constant(value: f64) -> Self { Polynomial::monomial(value, 0) }

    pub fn monomial(coefficient: f64, exponent: u32) -> Self {
        let mut poly = Polynomial::zero();
        poly.add_term(exponent, coefficient);
        poly
    }

    /// The variable itself, `x`.
    pub fn identity() -> Self { Polynomial::monomial(1.0, 1) }

    /// Accumulate a term, pruning the entry if it cancels out.
    ///
    /// Cancellation is judged relative to the two values being added, so a
    /// genuinely tiny coefficient like `1e-12` is kept.
    pub fn add_term(&mut self, exponent: u32, coefficient: f64) {
        let existing = self.coefficient(exponent);

        if approx::relative_eq!(
            existing,
            -coefficient,
            epsilon = 0.0,
            max_relative = CANCELLATION
        ) {
            self.terms.remove(&exponent);
        } else {
            self.terms.insert(exponent, existing + coefficient);
        }
    }

    pub fn coefficient(&self, exponent: u32) -> f64 {
        self.terms.get(&exponent).copied().unwrap_or(0.0)
    }

    /// The highest exponent with a non-zero coefficient, or `-1` for the zero
    /// polynomial.
    pub fn degree(&self) -> i32 {
        self.terms.keys().next_back().map_or(-1, |&e| e as i32)
    }

    pub fn is_zero(&self) -> bool { self.terms.is_empty() }

    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    /// The value of this polynomial if it doesn't depend on the variable.
    pub fn as_constant(&self) -> Option<f64> {
        match self.degree() {
            -1 => Some(0.0),
            0 => Some(self.coefficient(0)),
            _ => None,
        }
    }

    fn leading_term(&self) -> Option<(u32, f64)> {
        self.terms.iter().next_back().map(|(&e, &c)| (e, c))
    }

    /// Iterate over the `(exponent, coefficient)` pairs, lowest exponent
    /// first.
    pub fn terms(&self) -> impl DoubleEndedIterator<Item = (u32, f64)> + '_ {
        self.terms.iter().map(|(&e, &c)| (e, c))
    }

    /// Evaluate the polynomial at `x` using Horner's method.
    pub fn evaluate(&self, x: f64) -> f64 {
        let degree = match self.leading_term() {
            Some((degree, _)) => degree,
            None => return 0.0,
        };

        (0..=degree)
            .rev()
            .fold(0.0, |acc, exponent| acc * x + self.coefficient(exponent))
    }

    pub fn scale(&self, factor: f64) -> Polynomial {
        self.terms()
            .map(|(exponent, coefficient)| (exponent, coefficient * factor))
            .collect()
    }

    /// Raise to a non-negative integer power by repeated multiplication.
    pub fn pow(&self, exponent: u32) -> Polynomial {
        (0..exponent).fold(Polynomial::constant(1.0), |acc, _| &acc * self)
    }

    /// The size of the largest coefficient.
    pub fn magnitude(&self) -> f64 {
        self.terms.values().fold(0.0, |max, c| c.abs().max(max))
    }

    pub fn is_finite(&self) -> bool {
        self.terms.values().all(|c| c.is_finite())
    }

    /// Polynomial long division, returning the quotient and remainder.
    ///
    /// Returns `None` when dividing by the zero polynomial.
    pub fn div_rem(
        &self,
        divisor: &Polynomial,
    ) -> Option<(Polynomial, Polynomial)> {
        let (divisor_degree, divisor_lead) = divisor.leading_term()?;

        let mut quotient = Polynomial::zero();
        let mut remainder = self.clone();

        while let Some((degree, lead)) = remainder.leading_term() {
            if degree < divisor_degree {
                break;
            }

            let step =
                Polynomial::monomial(lead / divisor_lead, degree - divisor_degree);
            remainder = &remainder - &(&step * divisor);
            // make sure the leading term is gone, even with rounding errors
            remainder.terms.remove(&degree);
            quotient = &quotient + &step;
        }

        Some((quotient, remainder))
    }

    /// Get something which will print this polynomial using `variable` as the
    /// unknown.
    pub fn display(&self, variable: char) -> DisplayPolynomial<'_> {
        DisplayPolynomial {
            poly: self,
            variable,
        }
    }
}

impl FromIterator<(u32, f64)> for Polynomial {
    fn from_iter<T: IntoIterator<Item = (u32, f64)>>(iter: T) -> Self {
        let mut poly = Polynomial::zero();
        poly.extend(iter);
        poly
    }
}

impl Extend<(u32, f64)> for Polynomial {
    fn extend<T: IntoIterator<Item = (u32, f64)>>(&mut self, iter: T) {
        for (exponent, coefficient) in iter {
            self.add_term(exponent, coefficient);
        }
    }
}

// operator overloads so polynomial arithmetic reads like normal arithmetic

impl<'a> Add for &'a Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &'a Polynomial) -> Polynomial {
        let mut sum = self.clone();
        sum.extend(rhs.terms());
        sum
    }
}

impl<'a> Sub for &'a Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: &'a Polynomial) -> Polynomial {
        let mut difference = self.clone();
        difference.extend(rhs.terms().map(|(e, c)| (e, -c)));
        difference
    }
}

impl<'a> Mul for &'a Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: &'a Polynomial) -> Polynomial {
        let mut product = Polynomial::zero();

        for (left_exponent, left) in self.terms() {
            for (right_exponent, right) in rhs.terms() {
                product.add_term(left_exponent + right_exponent, left * right);
            }
        }

        product
    }
}

impl<'a> Neg for &'a Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial { self.scale(-1.0) }
}

impl Add for Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: Polynomial) -> Polynomial { &self + &rhs }
}

impl Sub for Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: Polynomial) -> Polynomial { &self - &rhs }
}

impl Mul for Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: Polynomial) -> Polynomial { &self * &rhs }
}

impl Neg for Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial { -&self }
}

/// Prints a [`Polynomial`] highest power first, e.g. `3*x^2-x+0.5`.
#[derive(Debug, Copy, Clone)]
pub struct DisplayPolynomial<'a> {
    poly: &'a Polynomial,
    variable: char,
}

impl<'a> Display for DisplayPolynomial<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.poly.is_zero() {
            return write!(f, "0");
        }

        for (i, (exponent, coefficient)) in self.poly.terms().rev().enumerate()
        {
            let magnitude = coefficient.abs();

            if coefficient < 0.0 {
                write!(f, "-")?;
            } else if i > 0 {
                write!(f, "+")?;
            }

            match exponent {
                0 => write!(f, "{}", magnitude)?,
                _ if magnitude == 1.0 => write!(f, "{}", self.variable)?,
                _ => write!(f, "{}*{}", magnitude, self.variable)?,
            }

            if exponent > 1 {
                write!(f, "^{}", exponent)?;
            }
        }

        Ok(())
    }
}
