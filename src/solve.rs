//! Reducing a relation to its solution set.

use crate::{
    format::Answer,
    grouping,
    lexer::{self, Delimiter, Operator, RawRelation, Token},
    normalize,
    solution::{Bound, Interval, Solution},
    Fraction, Options, Polynomial, Relation, RelationOp, SolveError,
};
use arrayvec::ArrayVec;
use std::cmp::Ordering;

/// Solve a relation, returning the full [`Answer`].
///
/// Any denominator which involves the variable is cleared by multiplying
/// both sides by the product of every such denominator. Inequalities only
/// ever multiply by something non-negative (see `clearing_factor()`), so
/// the direction never changes. Values which would make one of those
/// denominators zero are removed from the final solution.
pub fn solve_with(text: &str, options: &Options) -> Result<Answer, SolveError> {
    let RawRelation {
        left,
        op,
        right,
        variable,
    } = lexer::split(text)?;
    log::debug!(
        "Solving \"{} {} {}\" for {}",
        lexer::render(&left),
        op,
        lexer::render(&right),
        variable
    );

    let sides = [left.as_slice(), right.as_slice()];
    let denominators = variable_denominators(&sides, options)?;
    let mut excluded = Vec::new();
    for denominator in &denominators {
        excluded.extend(real_roots(denominator.numerator(), options)?);
        excluded.extend(real_roots(denominator.denominator(), options)?);
    }

    let mut multiplier = Fraction::one();
    for denominator in &denominators {
        let factor = clearing_factor(denominator, op, options);
        multiplier = &multiplier * &factor;
    }

    if !denominators.is_empty() {
        log::debug!(
            "Clearing denominators by multiplying by {}, excluding {:?}",
            multiplier.display(variable),
            excluded
        );
    }

    let relation = Relation::new(
        normalize_side(&left, &multiplier, options)?,
        op,
        normalize_side(&right, &multiplier, options)?,
        variable,
    );
    log::debug!("Normalized to {}", relation);

    let solution = reduce(&relation, options)?
        .excluding(&excluded, options.tolerance);
    log::debug!("Solution: {:?}", solution);

    Ok(Answer {
        relation,
        solution,
        precision: options.precision,
    })
}

/// How the sign of a value behaves across the whole real line.
#[derive(Debug, Copy, Clone, PartialEq)]
enum SignPattern {
    Positive,
    Negative,
    Changes,
}

impl SignPattern {
    fn of(poly: &Polynomial, options: &Options) -> SignPattern {
        let leading = match poly.degree() {
            0 => poly.coefficient(0),
            2 => {
                let a = poly.coefficient(2);
                let b = poly.coefficient(1);
                let c = poly.coefficient(0);

                match quadratic_roots(a, b, c, options.tolerance) {
                    Some(ref roots) if roots.len() == 2 => {
                        return SignPattern::Changes
                    },
                    // a repeated root touches zero without crossing it
                    _ => a,
                }
            },
            _ => return SignPattern::Changes,
        };

        if leading < 0.0 {
            SignPattern::Negative
        } else {
            SignPattern::Positive
        }
    }

    fn times(self, other: SignPattern) -> SignPattern {
        match (self, other) {
            (SignPattern::Changes, _) | (_, SignPattern::Changes) => {
                SignPattern::Changes
            },
            (a, b) if a == b => SignPattern::Positive,
            _ => SignPattern::Negative,
        }
    }
}

/// What to multiply both sides by so `denominator` disappears.
///
/// Equations can use the denominator as-is. Inequalities need something
/// which is never negative so the direction is kept, so a denominator that
/// changes sign is squared and one that is always negative is negated.
fn clearing_factor(
    denominator: &Fraction,
    op: RelationOp,
    options: &Options,
) -> Fraction {
    if !op.is_inequality() {
        return denominator.clone();
    }

    let pattern = SignPattern::of(denominator.numerator(), options)
        .times(SignPattern::of(denominator.denominator(), options));

    match pattern {
        SignPattern::Positive => denominator.clone(),
        SignPattern::Negative => -denominator,
        SignPattern::Changes => denominator * denominator,
    }
}

/// Classify `left - right` by degree and solve it.
pub fn reduce(
    relation: &Relation,
    options: &Options,
) -> Result<Solution, SolveError> {
    let difference = relation.difference();
    let op = relation.op;

    match difference.degree() {
        -1 | 0 => {
            let constant = difference.coefficient(0);

            if op.holds(sign(constant)) {
                Ok(Solution::all_real_numbers())
            } else {
                Ok(Solution::none())
            }
        },
        1 => {
            let a = difference.coefficient(1);
            let b = difference.coefficient(0);
            let root = -b / a;

            match op {
                RelationOp::Equal => Ok(Solution::roots(vec![root])),
                // dividing through by a negative number
                _ if a < 0.0 => {
                    Ok(Solution::Intervals(vec![ray(op.flipped(), root)]))
                },
                _ => Ok(Solution::Intervals(vec![ray(op, root)])),
            }
        },
        2 => {
            let a = difference.coefficient(2);
            let b = difference.coefficient(1);
            let c = difference.coefficient(0);
            let roots = quadratic_roots(a, b, c, options.tolerance);

            match (op, roots) {
                (RelationOp::Equal, Some(roots)) => Ok(Solution::Roots(roots)),
                (RelationOp::Equal, None) => Ok(Solution::NoRealSolution),
                (_, roots) => {
                    let roots = roots.unwrap_or_default();
                    let intervals = sign_chart(&roots, op, |x| {
                        sign(difference.evaluate(x))
                    });
                    Ok(Solution::Intervals(intervals))
                },
            }
        },
        degree => Err(SolveError::HigherOrderUnsupported { degree }),
    }
}

fn sign(value: f64) -> Ordering {
    value.partial_cmp(&0.0).unwrap_or(Ordering::Equal)
}

/// The interval of values satisfying `x op value`.
fn ray(op: RelationOp, value: f64) -> Interval {
    match op {
        RelationOp::Equal => Interval::point(value),
        RelationOp::Less => Interval::new(Bound::Unbounded, Bound::Open(value)),
        RelationOp::LessOrEqual => {
            Interval::new(Bound::Unbounded, Bound::Closed(value))
        },
        RelationOp::Greater => {
            Interval::new(Bound::Open(value), Bound::Unbounded)
        },
        RelationOp::GreaterOrEqual => {
            Interval::new(Bound::Closed(value), Bound::Unbounded)
        },
    }
}

/// The distinct real roots of `ax^2 + bx + c` in ascending order, or `None`
/// if the discriminant is negative.
///
/// The two roots are found with `q = -(b + sign(b)*sqrt(discriminant))/2`
/// as `q/a` and `c/q`, which avoids subtracting two nearly equal numbers.
fn quadratic_roots(
    a: f64,
    b: f64,
    c: f64,
    tolerance: f64,
) -> Option<ArrayVec<[f64; 2]>> {
    let discriminant = b * b - 4.0 * a * c;
    let mut roots = ArrayVec::new();

    // compared relative to the size of b^2 and 4ac so tiny coefficients
    // still give two roots
    if approx::relative_eq!(
        b * b,
        4.0 * a * c,
        epsilon = 0.0,
        max_relative = tolerance
    ) {
        roots.push(-b / (2.0 * a));
        return Some(roots);
    }

    if discriminant < 0.0 {
        return None;
    }

    let q = -0.5 * (b + b.signum() * discriminant.sqrt());
    let (first, second) = (q / a, c / q);

    if first <= second {
        roots.push(first);
        roots.push(second);
    } else {
        roots.push(second);
        roots.push(first);
    }

    Some(roots)
}

/// The real values of the variable which make `poly` zero.
fn real_roots(
    poly: &Polynomial,
    options: &Options,
) -> Result<ArrayVec<[f64; 2]>, SolveError> {
    let mut roots = ArrayVec::new();

    match poly.degree() {
        -1 | 0 => {},
        1 => roots.push(-poly.coefficient(0) / poly.coefficient(1)),
        2 => {
            if let Some(found) = quadratic_roots(
                poly.coefficient(2),
                poly.coefficient(1),
                poly.coefficient(0),
                options.tolerance,
            ) {
                roots = found;
            }
        },
        degree => return Err(SolveError::HigherOrderUnsupported { degree }),
    }

    Ok(roots)
}

/// Work out which intervals satisfy the relation by checking the sign of the
/// polynomial between each pair of neighbouring roots.
fn sign_chart<F>(roots: &[f64], op: RelationOp, sign_at: F) -> Vec<Interval>
where
    F: Fn(f64) -> Ordering,
{
    let mut pieces = Vec::with_capacity(2 * roots.len() + 1);
    let mut lower = Bound::Unbounded;

    for (i, &root) in roots.iter().enumerate() {
        let sample = match i {
            0 => root - 1.0,
            _ => (roots[i - 1] + root) / 2.0,
        };

        pieces.push((
            Interval::new(lower, Bound::Open(root)),
            op.holds(sign_at(sample)),
        ));
        pieces.push((Interval::point(root), op.holds(Ordering::Equal)));
        lower = Bound::Open(root);
    }

    let sample = roots.last().map_or(0.0, |root| root + 1.0);
    pieces.push((
        Interval::new(lower, Bound::Unbounded),
        op.holds(sign_at(sample)),
    ));

    // join neighbouring pieces which both hold
    let mut intervals: Vec<Interval> = Vec::new();
    let mut extends_previous = false;

    for (piece, holds) in pieces {
        if !holds {
            extends_previous = false;
            continue;
        }

        match intervals.last_mut().filter(|_| extends_previous) {
            Some(last) => last.upper = piece.upper,
            None => intervals.push(piece),
        }
        extends_previous = true;
    }

    intervals
}

fn normalize_side(
    tokens: &[Token],
    multiplier: &Fraction,
    options: &Options,
) -> Result<Polynomial, SolveError> {
    let simplified = grouping::simplify(tokens, options.max_passes)?;
    let value = normalize::fraction(&simplified)?;

    (&value * multiplier)
        .into_polynomial()
        .ok_or_else(|| SolveError::unsupported(lexer::render(tokens)))
}

/// Find every distinct denominator which involves the variable.
fn variable_denominators(
    sides: &[&[Token]],
    options: &Options,
) -> Result<Vec<Fraction>, SolveError> {
    let mut denominators: Vec<Fraction> = Vec::new();

    for side in sides {
        for (i, token) in side.iter().enumerate() {
            if !token.is_operator(Operator::Divide) {
                continue;
            }

            let end = match factor_end(side, i + 1) {
                Some(end) => end,
                // the normalizer will complain about this later
                None => continue,
            };
            let factor = &side[i + 1..end];

            if !factor.iter().any(|t| t.mentions_variable()) {
                continue;
            }

            let simplified = grouping::simplify(factor, options.max_passes)?;
            let value = normalize::fraction(&simplified)?;

            if value.as_constant() == Some(0.0) {
                return Err(SolveError::DivisionByZero);
            }
            if !denominators.contains(&value) {
                denominators.push(value);
            }
        }
    }

    Ok(denominators)
}

/// The index just past the factor starting at `start`, including any unary
/// signs in front of it and any `^` chain after it.
fn factor_end(tokens: &[Token], start: usize) -> Option<usize> {
    let mut cursor = start;

    loop {
        match tokens.get(cursor) {
            Some(Token::Operator(Operator::Plus))
            | Some(Token::Operator(Operator::Minus)) => cursor += 1,
            _ => break,
        }
    }

    let mut end = atom_end(tokens, cursor)?;

    while tokens.get(end) == Some(&Token::Operator(Operator::Power)) {
        let mut next = end + 1;
        if tokens.get(next) == Some(&Token::Operator(Operator::Minus)) {
            next += 1;
        }
        end = atom_end(tokens, next)?;
    }

    Some(end)
}

fn atom_end(tokens: &[Token], start: usize) -> Option<usize> {
    match tokens.get(start)? {
        Token::Number(_) | Token::Variable(_) => Some(start + 1),
        Token::Group { delimiter, .. }
            if *delimiter != Delimiter::Bar && delimiter.is_opening() =>
        {
            let mut depth = 0;

            for (i, token) in tokens.iter().enumerate().skip(start) {
                match token.delimiter() {
                    None | Some(Delimiter::Bar) => {},
                    Some(d) if d.is_opening() => depth += 1,
                    Some(_) => {
                        depth -= 1;
                        if depth == 0 {
                            return Some(i + 1);
                        }
                    },
                }
            }

            None
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solved(text: &str) -> String {
        solve_with(text, &Options::default())
            .map(|answer| answer.to_string())
            .unwrap_or_else(|e| panic!("Unable to solve {:?}: {}", text, e))
    }

    fn error(text: &str) -> SolveError {
        solve_with(text, &Options::default()).unwrap_err()
    }

    macro_rules! solve_test {
        ($name:ident, $src:expr, $should_be:expr) => {
            #[test]
            fn $name() {
                let got = solved($src);

                assert_eq!(got, $should_be, "{}", $src);
            }
        };
    }

    solve_test!(linear_equation, "2x+3=7", "x = 2.00");
    solve_test!(linear_equation_with_spaces, " 2 * x + 3 = 7 ", "x = 2.00");
    solve_test!(two_roots, "x^2-4=0", "x = -2.00 or x = 2.00");
    solve_test!(negative_coefficient_flips, "-2x>4", "x < -2.00");
    solve_test!(positive_coefficient_keeps, "3x+1<=7", "x <= 2.00");
    solve_test!(greater_or_equal, "x>=2", "x >= 2.00");
    solve_test!(variable_on_the_right, "4 > 2 - x", "x > -2.00");
    solve_test!(other_variable_names, "y+1=3", "y = 2.00");
    solve_test!(identity, "x=x", "All real numbers");
    solve_test!(contradiction, "x=x+1", "No solution");
    solve_test!(strict_identity_fails, "x<x", "No solution");
    solve_test!(non_strict_identity_holds, "x<=x", "All real numbers");
    solve_test!(constant_inequality, "x+3>x+1", "All real numbers");
    solve_test!(group_with_coefficient, "2(x+1)=8", "x = 3.00");
    solve_test!(nested_groups, "[3{x-(2-1)}]=6", "x = 3.00");
    solve_test!(numeric_absolute_value, "|1-4|x=9", "x = 3.00");
    solve_test!(negative_base_rule, "-2^2=x", "x = 4.00");
    solve_test!(negative_discriminant, "x^2+1=0", "No real solution");
    solve_test!(repeated_root, "x^2-2x+1=0", "x = 1.00");
    solve_test!(expanded_square, "(x+1)^2=x^2+3", "x = 1.00");
    solve_test!(outside_the_roots, "x^2-1>0", "x < -1.00 or x > 1.00");
    solve_test!(between_the_roots, "x^2-1<=0", "-1.00 <= x <= 1.00");
    solve_test!(downward_parabola, "-x^2+4>0", "-2.00 < x < 2.00");
    solve_test!(always_positive, "x^2+1>0", "All real numbers");
    solve_test!(never_negative, "x^2+1<0", "No solution");
    solve_test!(square_is_positive, "(x-1)^2>0", "x < 1.00 or x > 1.00");
    solve_test!(square_is_non_positive, "(x-1)^2<=0", "x = 1.00");
    solve_test!(reciprocal, "1/x=1/2", "x = 2.00");
    solve_test!(cancelling_fraction, "x/x=1", "x < 0.00 or x > 0.00");
    solve_test!(extraneous_root, "x/(x-1)=1/(x-1)", "No solution");
    solve_test!(reciprocal_inequality, "1/x>2", "0.00 < x < 0.50");
    solve_test!(sum_of_fractions, "1/x+1/x=1", "x = 2.00");
    solve_test!(nested_fraction, "1/(1+1/x)=2", "x = -2.00");
    solve_test!(zero_prints_without_a_sign, "-3x=0", "x = 0.00");
    solve_test!(
        tiny_coefficient,
        "x/1000000000000=1",
        "x = 1000000000000.00"
    );
    solve_test!(
        tiny_quadratic_coefficients,
        "x^2/100000=1/100000",
        "x = -1.00 or x = 1.00"
    );
    solve_test!(
        even_power_denominator,
        "1/x^2>1",
        "-1.00 < x < 0.00 or 0.00 < x < 1.00"
    );
    solve_test!(positive_denominator, "1/(x^2+1)<1", "x < 0.00 or x > 0.00");
    solve_test!(negative_denominator, "1/(-x^2-1)<0", "All real numbers");
    solve_test!(
        division_binds_to_a_single_factor,
        "1/2x=3",
        "x = 6.00"
    );

    #[test]
    fn precision_is_configurable() {
        let options = Options::default().with_precision(3);

        let got = solve_with("3x=1", &options).unwrap();

        assert_eq!(got.to_string(), "x = 0.333");
    }

    #[test]
    fn tiny_constant_terms_still_give_two_roots() {
        let options = Options::default().with_precision(5);

        let got = solve_with("x^2-1/10000000000=0", &options).unwrap();

        assert_eq!(got.to_string(), "x = -0.00001 or x = 0.00001");
    }

    #[test]
    fn the_answer_keeps_the_normalized_relation() {
        let got = solve_with("2(x+1)=x", &Options::default()).unwrap();

        assert_eq!(got.relation.to_string(), "2*x+2 = x");
        assert_eq!(got.variable(), 'x');
    }

    #[test]
    fn roots_satisfy_the_equation() {
        let got = solve_with("x^2-3x+1=0", &Options::default()).unwrap();

        let roots = match got.solution {
            Solution::Roots(roots) => roots,
            other => panic!("Expected roots, got {:?}", other),
        };

        assert_eq!(roots.len(), 2);
        for root in roots {
            let value = root * root - 3.0 * root + 1.0;
            approx::assert_abs_diff_eq!(value, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn cubics_are_unsupported() {
        assert_eq!(
            error("x^3=1"),
            SolveError::HigherOrderUnsupported { degree: 3 }
        );
        assert_eq!(
            error("x*x*x+x=0"),
            SolveError::HigherOrderUnsupported { degree: 3 }
        );
    }

    #[test]
    fn validation_errors_come_through() {
        let inputs = vec![
            ("x+1", SolveError::InvalidRelationOperator),
            ("x=1=2", SolveError::InvalidRelationOperator),
            ("2=3", SolveError::NoVariable),
            ("x=y", SolveError::MultipleVariables {
                first: 'x',
                second: 'y',
            }),
            ("(x=1)", SolveError::UnbalancedGrouping),
            ("=x", SolveError::EmptySide),
            ("x=1/0", SolveError::DivisionByZero),
            ("x=2++", SolveError::MalformedExpression),
        ];

        for (src, should_be) in inputs {
            assert_eq!(error(src), should_be, "{}", src);
        }
    }

    #[test]
    fn invalid_characters_report_their_position() {
        assert_eq!(
            error("x = 2 $"),
            SolveError::InvalidCharacter {
                character: '$',
                index: 6
            }
        );
    }

    #[test]
    fn absolute_values_of_the_variable_are_unsupported() {
        match error("|x|=2") {
            SolveError::UnsupportedTerm { .. } => {},
            other => panic!("Expected an unsupported term, got {:?}", other),
        }
    }

    #[test]
    fn the_pass_limit_comes_from_the_options() {
        let options = Options::default().with_max_passes(1);

        let got = solve_with("((x))=1", &options);

        assert_eq!(got, Err(SolveError::IterationLimitExceeded { passes: 1 }));
    }

    #[test]
    fn quadratic_roots_are_sorted() {
        let got = quadratic_roots(-1.0, 0.0, 4.0, 1e-9).unwrap();

        assert_eq!(got.as_slice(), &[-2.0, 2.0]);
        assert!(quadratic_roots(1.0, 0.0, 1.0, 1e-9).is_none());
    }

    #[test]
    fn repeated_roots_are_judged_relative_to_the_coefficients() {
        let got = quadratic_roots(1e-5, 0.0, -1e-5, 1e-9).unwrap();
        assert_eq!(got.len(), 2);
        approx::assert_relative_eq!(got[0], -1.0);
        approx::assert_relative_eq!(got[1], 1.0);

        let got = quadratic_roots(1e-5, -2e-5, 1e-5, 1e-9).unwrap();
        assert_eq!(got.len(), 1);
        approx::assert_relative_eq!(got[0], 1.0);
    }

    #[test]
    fn only_denominators_which_change_sign_are_squared() {
        let options = Options::default();
        let x = Fraction::from(Polynomial::identity());
        let x_squared = Fraction::from(Polynomial::monomial(1.0, 2));
        let negative = Fraction::from(
            vec![(2, -1.0), (0, -1.0)]
                .into_iter()
                .collect::<Polynomial>(),
        );

        assert_eq!(
            clearing_factor(&x, RelationOp::Less, &options),
            x_squared
        );
        assert_eq!(
            clearing_factor(&x_squared, RelationOp::Less, &options),
            x_squared
        );
        assert_eq!(
            clearing_factor(&negative, RelationOp::Greater, &options),
            -&negative
        );
        assert_eq!(clearing_factor(&x, RelationOp::Equal, &options), x);
    }

    #[test]
    fn sign_chart_merges_neighbouring_pieces() {
        // (x+1)^2 * (x-2) >= 0
        let poly = |x: f64| (x + 1.0) * (x + 1.0) * (x - 2.0);

        let got = sign_chart(&[-1.0, 2.0], RelationOp::GreaterOrEqual, |x| {
            sign(poly(x))
        });

        assert_eq!(
            got,
            vec![
                Interval::point(-1.0),
                Interval::new(Bound::Closed(2.0), Bound::Unbounded),
            ]
        );
    }

    #[test]
    fn denominators_are_found_with_their_exponents() {
        let tokens = lexer::tokenize("1/(x+1)^2+3/x-2/4").unwrap();

        let got =
            variable_denominators(&[tokens.as_slice()], &Options::default())
                .unwrap();

        assert_eq!(got.len(), 2);
        assert_eq!(got[0].numerator().degree(), 2);
        assert_eq!(got[1].numerator(), &Polynomial::identity());
    }
}
