//! Rendering a [`Solution`] as text.

use crate::{
    solution::{Bound, Interval, Solution},
    Relation,
};
use std::fmt::{self, Display, Formatter};

/// The result of solving a relation.
///
/// Its [`Display`] impl gives the canonical solved statement, e.g.
/// `x = 2.00` or `x < -1.00 or x > 1.00`.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    /// The relation after both sides were normalized (and any variable
    /// denominators were cleared).
    pub relation: Relation,
    pub solution: Solution,
    /// Decimal places used when printing numbers.
    pub precision: usize,
}

impl Answer {
    pub fn variable(&self) -> char { self.relation.variable }

    fn number(&self, value: f64) -> Number {
        Number {
            value,
            precision: self.precision,
        }
    }

    fn write_interval(
        &self,
        f: &mut Formatter<'_>,
        interval: &Interval,
    ) -> fmt::Result {
        let x = self.variable();

        if let Some(value) = interval.as_point() {
            return write!(f, "{} = {}", x, self.number(value));
        }

        match (interval.lower, interval.upper) {
            (Bound::Unbounded, Bound::Unbounded) => {
                write!(f, "All real numbers")
            },
            (Bound::Unbounded, upper) => write!(
                f,
                "{} {} {}",
                x,
                below(upper),
                self.number(value_of(upper))
            ),
            (Bound::Open(a), Bound::Unbounded) => {
                write!(f, "{} > {}", x, self.number(a))
            },
            (Bound::Closed(a), Bound::Unbounded) => {
                write!(f, "{} >= {}", x, self.number(a))
            },
            (lower, upper) => write!(
                f,
                "{} {} {} {} {}",
                self.number(value_of(lower)),
                below(lower),
                x,
                below(upper),
                self.number(value_of(upper))
            ),
        }
    }
}

/// The comparison used when a bound sits to the right of the variable.
fn below(bound: Bound) -> &'static str {
    if bound.is_closed() {
        "<="
    } else {
        "<"
    }
}

fn value_of(bound: Bound) -> f64 { bound.value().unwrap_or(0.0) }

impl Display for Answer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.solution {
            Solution::NoRealSolution => write!(f, "No real solution"),
            Solution::Roots(roots) if roots.is_empty() => {
                write!(f, "No solution")
            },
            Solution::Roots(roots) => {
                for (i, &root) in roots.iter().enumerate() {
                    if i > 0 {
                        write!(f, " or ")?;
                    }
                    write!(f, "{} = {}", self.variable(), self.number(root))?;
                }
                Ok(())
            },
            Solution::Intervals(intervals) if intervals.is_empty() => {
                write!(f, "No solution")
            },
            Solution::Intervals(intervals) => {
                for (i, interval) in intervals.iter().enumerate() {
                    if i > 0 {
                        write!(f, " or ")?;
                    }
                    self.write_interval(f, interval)?;
                }
                Ok(())
            },
        }
    }
}

/// A number printed with a fixed number of decimal places, where `-0.00` is
/// always written as `0.00`.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Number {
    value: f64,
    precision: usize,
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let text = format!("{:.*}", self.precision, self.value);

        match text.strip_prefix('-') {
            Some(magnitude) if is_zero(magnitude) => write!(f, "{}", magnitude),
            _ => write!(f, "{}", text),
        }
    }
}

fn is_zero(digits: &str) -> bool {
    digits.chars().all(|c| c == '0' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Polynomial, RelationOp};

    fn answer(solution: Solution) -> Answer {
        Answer {
            relation: Relation::new(
                Polynomial::identity(),
                RelationOp::Equal,
                Polynomial::zero(),
                'x',
            ),
            solution,
            precision: 2,
        }
    }

    fn rendered(solution: Solution) -> String { answer(solution).to_string() }

    #[test]
    fn numbers_use_a_fixed_precision() {
        let inputs = vec![
            (2.0, 2, "2.00"),
            (-2.0, 2, "-2.00"),
            (1.0 / 3.0, 3, "0.333"),
            (2.4, 0, "2"),
            (-0.0, 2, "0.00"),
            (-0.001, 2, "0.00"),
        ];

        for (value, precision, should_be) in inputs {
            let got = Number { value, precision }.to_string();

            assert_eq!(got, should_be, "{}", value);
        }
    }

    #[test]
    fn roots() {
        assert_eq!(rendered(Solution::roots(vec![2.0])), "x = 2.00");
        assert_eq!(
            rendered(Solution::roots(vec![-2.0, 2.0])),
            "x = -2.00 or x = 2.00"
        );
        assert_eq!(rendered(Solution::roots(vec![])), "No solution");
        assert_eq!(rendered(Solution::NoRealSolution), "No real solution");
    }

    #[test]
    fn rays() {
        let inputs = vec![
            (Bound::Unbounded, Bound::Open(-2.0), "x < -2.00"),
            (Bound::Unbounded, Bound::Closed(3.0), "x <= 3.00"),
            (Bound::Open(1.5), Bound::Unbounded, "x > 1.50"),
            (Bound::Closed(0.0), Bound::Unbounded, "x >= 0.00"),
        ];

        for (lower, upper, should_be) in inputs {
            let solution = Solution::Intervals(vec![Interval::new(lower, upper)]);

            assert_eq!(rendered(solution), should_be);
        }
    }

    #[test]
    fn bounded_intervals() {
        let inputs = vec![
            (Bound::Open(-1.0), Bound::Open(1.0), "-1.00 < x < 1.00"),
            (Bound::Closed(-1.0), Bound::Open(1.0), "-1.00 <= x < 1.00"),
            (Bound::Closed(-1.0), Bound::Closed(1.0), "-1.00 <= x <= 1.00"),
            (Bound::Closed(4.0), Bound::Closed(4.0), "x = 4.00"),
        ];

        for (lower, upper, should_be) in inputs {
            let solution = Solution::Intervals(vec![Interval::new(lower, upper)]);

            assert_eq!(rendered(solution), should_be);
        }
    }

    #[test]
    fn special_cases() {
        assert_eq!(rendered(Solution::all_real_numbers()), "All real numbers");
        assert_eq!(rendered(Solution::none()), "No solution");
    }

    #[test]
    fn unions_are_joined_with_or() {
        let solution = Solution::Intervals(vec![
            Interval::new(Bound::Unbounded, Bound::Open(-1.0)),
            Interval::new(Bound::Closed(1.0), Bound::Unbounded),
        ]);

        assert_eq!(rendered(solution), "x < -1.00 or x >= 1.00");
    }

    #[test]
    fn the_variable_name_is_used() {
        let mut got = answer(Solution::roots(vec![0.5]));
        got.relation.variable = 'y';

        assert_eq!(got.to_string(), "y = 0.50");
    }
}
