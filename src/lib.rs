//! Solve equations and inequalities in a single unknown.
//!
//! ```rust
//! assert_eq!(univariate::solve("2x + 3 = 7").unwrap(), "x = 2.00");
//! assert_eq!(
//!     univariate::solve("x^2 - 1 > 0").unwrap(),
//!     "x < -1.00 or x > 1.00"
//! );
//! ```
//!
//! Solving happens in a handful of stages, each of which is also available on
//! its own:
//!
//! 1. [`lexer::split()`] validates the text and splits it into two sides
//! 2. [`grouping::simplify()`] removes brackets and absolute values
//! 3. [`normalize::normalize()`] collects like terms into a [`Polynomial`]
//! 4. [`reduce()`] classifies the [`Relation`] by degree and solves it

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

pub mod arithmetic;
mod error;
mod format;
pub mod grouping;
pub mod lexer;
pub mod normalize;
mod options;
mod polynomial;
mod rational;
mod relation;
mod solution;
mod solve;

pub use error::SolveError;
pub use format::Answer;
pub use options::Options;
pub use polynomial::{DisplayPolynomial, Polynomial};
pub use rational::{DisplayFraction, Fraction};
pub use relation::{Relation, RelationOp};
pub use solution::{Bound, Interval, Solution};
pub use solve::{reduce, solve_with};

/// Solve a relation using the default [`Options`], returning the solved
/// statement as text.
pub fn solve(text: &str) -> Result<String, SolveError> {
    solve_with(text, &Options::default()).map(|answer| answer.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solve_renders_the_answer() {
        let inputs = vec![
            ("2x+3=7", "x = 2.00"),
            ("x^2-4=0", "x = -2.00 or x = 2.00"),
            ("-2x>4", "x < -2.00"),
            ("1/x=1/2", "x = 2.00"),
            ("x=x", "All real numbers"),
            ("x=x+1", "No solution"),
        ];

        for (src, should_be) in inputs {
            assert_eq!(solve(src).unwrap(), should_be);
        }
    }

    #[test]
    fn errors_are_passed_through() {
        assert_eq!(solve("x+1"), Err(SolveError::InvalidRelationOperator));
        assert_eq!(solve("2=3"), Err(SolveError::NoVariable));
        assert_eq!(
            solve("x^3=8"),
            Err(SolveError::HigherOrderUnsupported { degree: 3 })
        );
    }

    #[test]
    fn errors_have_readable_messages() {
        let err = solve("x=y").unwrap_err();

        assert_eq!(
            err.to_string(),
            "expected a single variable, found both 'x' and 'y'"
        );
    }
}
