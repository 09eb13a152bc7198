use crate::{polynomial::DisplayPolynomial, Polynomial, SolveError};
use std::{
    fmt::{self, Display, Formatter},
    ops::{Add, Mul, Neg, Sub},
};

/// How large a remainder may be, relative to the dividend, while still
/// counting as an exact division.
const EXACT: f64 = 1e-9;

/// A polynomial divided by another polynomial.
///
/// This only lives for as long as it takes to normalize one side of a
/// relation. Denominators involving the variable must cancel out before the
/// side can become a [`Polynomial`].
#[derive(Debug, Clone, PartialEq)]
pub struct Fraction {
    numerator: Polynomial,
    denominator: Polynomial,
}

impl Fraction {
    /// Create a new [`Fraction`], cancelling the denominator where it divides
    /// the numerator exactly.
    pub fn new(
        numerator: Polynomial,
        denominator: Polynomial,
    ) -> Result<Self, SolveError> {
        if denominator.is_zero() {
            return Err(SolveError::DivisionByZero);
        }

        Ok(Fraction {
            numerator,
            denominator,
        }
        .reduced())
    }

    pub fn constant(value: f64) -> Self {
        Fraction::from(Polynomial::constant(value))
    }

    pub fn one() -> Self { Fraction::constant(1.0) }

    pub fn numerator(&self) -> &Polynomial { &self.numerator }

    pub fn denominator(&self) -> &Polynomial { &self.denominator }

    /// The value of this fraction if it doesn't depend on the variable.
    pub fn as_constant(&self) -> Option<f64> {
        match (self.numerator.as_constant(), self.denominator.as_constant()) {
            (Some(n), Some(d)) => Some(n / d),
            _ => None,
        }
    }

    /// Try to turn this back into a plain [`Polynomial`].
    pub fn into_polynomial(self) -> Option<Polynomial> {
        let Fraction {
            numerator,
            denominator,
        } = self;

        denominator.as_constant().map(|d| numerator.scale(1.0 / d))
    }

    pub fn is_finite(&self) -> bool {
        self.numerator.is_finite() && self.denominator.is_finite()
    }

    pub fn checked_div(&self, rhs: &Fraction) -> Result<Fraction, SolveError> {
        Fraction::new(
            &self.numerator * &rhs.denominator,
            &self.denominator * &rhs.numerator,
        )
    }

    pub fn pow(&self, exponent: u32) -> Fraction {
        Fraction {
            numerator: self.numerator.pow(exponent),
            denominator: self.denominator.pow(exponent),
        }
    }

    pub fn display(&self, variable: char) -> DisplayFraction<'_> {
        DisplayFraction {
            numerator: self.numerator.display(variable),
            denominator: self.denominator.display(variable),
            has_denominator: self.denominator != Polynomial::constant(1.0),
        }
    }

    fn reduced(self) -> Fraction {
        if let Some(d) = self.denominator.as_constant() {
            return Fraction::from(self.numerator.scale(1.0 / d));
        }

        match self.numerator.div_rem(&self.denominator) {
            Some((quotient, remainder))
                if is_negligible(&remainder, &self.numerator) =>
            {
                Fraction::from(quotient)
            },
            _ => self,
        }
    }
}

fn is_negligible(remainder: &Polynomial, dividend: &Polynomial) -> bool {
    remainder.magnitude() <= dividend.magnitude() * EXACT
}

impl From<Polynomial> for Fraction {
    fn from(numerator: Polynomial) -> Self {
        Fraction {
            numerator,
            denominator: Polynomial::constant(1.0),
        }
    }
}

impl<'a> Add for &'a Fraction {
    type Output = Fraction;

    fn add(self, rhs: &'a Fraction) -> Fraction {
        let sum = if self.denominator == rhs.denominator {
            Fraction {
                numerator: &self.numerator + &rhs.numerator,
                denominator: self.denominator.clone(),
            }
        } else {
            Fraction {
                numerator: &(&self.numerator * &rhs.denominator)
                    + &(&rhs.numerator * &self.denominator),
                denominator: &self.denominator * &rhs.denominator,
            }
        };

        sum.reduced()
    }
}

impl<'a> Sub for &'a Fraction {
    type Output = Fraction;

    fn sub(self, rhs: &'a Fraction) -> Fraction { self + &-rhs }
}

impl<'a> Mul for &'a Fraction {
    type Output = Fraction;

    fn mul(self, rhs: &'a Fraction) -> Fraction {
        Fraction {
            numerator: &self.numerator * &rhs.numerator,
            denominator: &self.denominator * &rhs.denominator,
        }
        .reduced()
    }
}

impl<'a> Neg for &'a Fraction {
    type Output = Fraction;

    fn neg(self) -> Fraction {
        Fraction {
            numerator: -&self.numerator,
            denominator: self.denominator.clone(),
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct DisplayFraction<'a> {
    numerator: DisplayPolynomial<'a>,
    denominator: DisplayPolynomial<'a>,
    has_denominator: bool,
}

impl<'a> Display for DisplayFraction<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.has_denominator {
            write!(f, "{}/({})", self.numerator, self.denominator)
        } else {
            write!(f, "{}", self.numerator)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(terms: &[(u32, f64)]) -> Polynomial {
        terms.iter().copied().collect()
    }

    fn one_over_x() -> Fraction {
        Fraction::new(Polynomial::constant(1.0), Polynomial::identity())
            .unwrap()
    }

    #[test]
    fn zero_denominators_are_rejected() {
        let got = Fraction::new(Polynomial::identity(), Polynomial::zero());

        assert_eq!(got, Err(SolveError::DivisionByZero));
    }

    #[test]
    fn constant_denominators_are_folded_into_the_numerator() {
        let got =
            Fraction::new(poly(&[(1, 3.0)]), Polynomial::constant(2.0)).unwrap();

        assert_eq!(got.into_polynomial(), Some(poly(&[(1, 1.5)])));
    }

    #[test]
    fn multiplying_by_the_denominator_cancels_it() {
        let got = &one_over_x() * &Fraction::from(Polynomial::identity());

        assert_eq!(got, Fraction::one());
    }

    #[test]
    fn common_factors_cancel() {
        // (x^2 - 1)/(x - 1) = x + 1
        let got =
            Fraction::new(poly(&[(2, 1.0), (0, -1.0)]), poly(&[(1, 1.0), (0, -1.0)]))
                .unwrap();

        assert_eq!(got.into_polynomial(), Some(poly(&[(1, 1.0), (0, 1.0)])));
    }

    #[test]
    fn small_remainders_are_judged_against_the_dividend() {
        // (1e-12*x + 1e-13)/x isn't exact, even though the remainder is tiny
        let got = Fraction::new(
            poly(&[(1, 1e-12), (0, 1e-13)]),
            Polynomial::identity(),
        )
        .unwrap();

        assert_eq!(got.clone().into_polynomial(), None);
        assert_eq!(got.denominator(), &Polynomial::identity());
    }

    #[test]
    fn sums_share_a_denominator() {
        let got = &one_over_x() + &one_over_x();

        assert_eq!(got.numerator(), &Polynomial::constant(2.0));
        assert_eq!(got.denominator(), &Polynomial::identity());
        assert_eq!(got.clone().into_polynomial(), None);
        assert_eq!(got.display('x').to_string(), "2/(x)");
    }

    #[test]
    fn differences_can_cancel_completely() {
        let got = &one_over_x() - &one_over_x();

        assert_eq!(got.as_constant(), Some(0.0));
    }

    #[test]
    fn dividing_by_zero_fails() {
        let zero = Fraction::constant(0.0);

        assert_eq!(
            Fraction::one().checked_div(&zero),
            Err(SolveError::DivisionByZero)
        );
    }
}
