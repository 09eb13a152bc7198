//! Removing parentheses, brackets, braces and absolute value bars.

use crate::{
    arithmetic,
    lexer::{self, Delimiter, Operator, Token},
    normalize, Fraction, SolveError,
};

/// Repeatedly collapse the innermost groups until no grouping symbols are
/// left.
///
/// Each pass finds every *simple* group (one with no other grouping symbols
/// inside it) and replaces it, along with any `^n` directly after it, with
/// its value:
///
/// - numeric groups are evaluated with [`arithmetic::evaluate_tokens()`]
/// - groups involving the variable are normalized and expanded, with the
///   exponent applied by repeated multiplication
/// - absolute values of numbers become numbers, absolute values involving
///   the variable are kept as an opaque [`Token::Absolute`]
///
/// A coefficient written directly in front of a group is turned into an
/// explicit multiplication. Text without any grouping symbols is returned
/// unchanged.
pub fn simplify(
    tokens: &[Token],
    max_passes: usize,
) -> Result<Vec<Token>, SolveError> {
    let mut tokens = tokens.to_vec();

    for pass in 0..max_passes {
        if !has_delimiters(&tokens) {
            return Ok(tokens);
        }

        let groups = simple_groups(&tokens);
        if groups.is_empty() {
            // the delimiters cross over each other, e.g. "(|x)|"
            return Err(SolveError::UnbalancedGrouping);
        }

        // work backwards so earlier indices stay valid
        for group in groups.iter().rev() {
            collapse(&mut tokens, group)?;
        }

        log::trace!("Pass {}: {}", pass + 1, lexer::render(&tokens));
    }

    if has_delimiters(&tokens) {
        Err(SolveError::IterationLimitExceeded { passes: max_passes })
    } else {
        Ok(tokens)
    }
}

fn has_delimiters(tokens: &[Token]) -> bool {
    tokens.iter().any(|t| t.delimiter().is_some())
}

/// The indices of a group's opening and closing delimiters.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Group {
    open: usize,
    close: usize,
}

/// Could the absolute value bar at `index` start a group?
///
/// Bars share a glyph for opening and closing, so we use whatever comes
/// before it. A coefficient (`2|x|`) or another bar (`||x|-1|`) leaves both
/// options open.
fn bar_can_open(tokens: &[Token], index: usize) -> bool {
    match index.checked_sub(1).map(|i| &tokens[i]) {
        None | Some(Token::Operator(_)) => true,
        Some(Token::Group { delimiter, .. }) => {
            *delimiter == Delimiter::Bar || delimiter.is_opening()
        },
        Some(_) => true,
    }
}

fn bar_can_close(tokens: &[Token], index: usize) -> bool {
    match index.checked_sub(1).map(|i| &tokens[i]) {
        None | Some(Token::Operator(_)) => false,
        Some(Token::Group { delimiter, .. }) => {
            *delimiter == Delimiter::Bar || delimiter.is_closing()
        },
        Some(_) => true,
    }
}

/// Find every group which doesn't contain other grouping symbols, matching
/// them up by position.
fn simple_groups(tokens: &[Token]) -> Vec<Group> {
    let mut groups = Vec::new();
    let mut pending_open: Option<usize> = None;

    for (index, token) in tokens.iter().enumerate() {
        let delimiter = match token.delimiter() {
            Some(d) => d,
            None => continue,
        };

        let closes_pending = pending_open.map_or(false, |open| {
            let opener = tokens[open].delimiter();
            let matches = opener.map_or(false, |o| delimiter.closes(o));

            match delimiter {
                // bars always have something between them
                Delimiter::Bar => {
                    matches
                        && index > open + 1
                        && bar_can_close(tokens, index)
                },
                _ => matches,
            }
        });

        if closes_pending {
            if let Some(open) = pending_open.take() {
                groups.push(Group {
                    open,
                    close: index,
                });
            }
            continue;
        }

        let can_open = match delimiter {
            Delimiter::Bar => bar_can_open(tokens, index),
            other => other.is_opening(),
        };
        pending_open = if can_open { Some(index) } else { None };
    }

    groups
}

/// A constant exponent written directly after a group, along with the index
/// of the last token it uses.
///
/// Exponents which are themselves raised to a power (`(x)^2^3`) are left for
/// the normalizer so `^` stays right associative.
fn trailing_exponent(tokens: &[Token], close: usize) -> Option<(f64, usize)> {
    if tokens.get(close + 1) != Some(&Token::Operator(Operator::Power)) {
        return None;
    }

    let (value, end) = match (tokens.get(close + 2), tokens.get(close + 3)) {
        (Some(Token::Number(n)), _) => (*n, close + 2),
        (
            Some(Token::Operator(Operator::Minus)),
            Some(Token::Number(n)),
        ) => (-n, close + 3),
        _ => return None,
    };

    if tokens.get(end + 1) == Some(&Token::Operator(Operator::Power)) {
        None
    } else {
        Some((value, end))
    }
}

fn collapse(tokens: &mut Vec<Token>, group: &Group) -> Result<(), SolveError> {
    let Group { open, close } = *group;
    let inner = &tokens[open + 1..close];
    let is_absolute = tokens[open].delimiter() == Some(Delimiter::Bar);
    let exponent = trailing_exponent(tokens, close);

    let value = if is_absolute {
        absolute_value(inner)?
    } else {
        group_value(inner)?
    };

    let (value, end) = match (value, exponent) {
        (GroupValue::Known(value), Some((exponent, end))) => {
            let term = &tokens[open..=end];
            (GroupValue::Known(normalize::power(&value, exponent, term)?), end)
        },
        (value, _) => (value, close),
    };

    let mut replacement = Vec::with_capacity(3);

    if open > 0 && tokens[open - 1].is_operand() {
        replacement.push(Token::Operator(Operator::Times));
    }
    replacement.push(value.into_token(variable_in(inner)));
    if tokens.get(end + 1).map_or(false, starts_a_factor) {
        replacement.push(Token::Operator(Operator::Times));
    }

    tokens.splice(open..=end, replacement);

    Ok(())
}

fn starts_a_factor(token: &Token) -> bool {
    match token {
        Token::Group { delimiter, .. } => {
            *delimiter != Delimiter::Bar && delimiter.is_opening()
        },
        other => other.is_operand(),
    }
}

fn variable_in(tokens: &[Token]) -> char {
    tokens
        .iter()
        .find_map(|t| match t {
            Token::Variable(v) | Token::Resolved { variable: v, .. } => Some(*v),
            _ => None,
        })
        .unwrap_or('x')
}

#[derive(Debug, Clone, PartialEq)]
enum GroupValue {
    Known(Fraction),
    Absolute(Vec<Token>),
}

impl GroupValue {
    fn into_token(self, variable: char) -> Token {
        match self {
            GroupValue::Known(value) => match value.as_constant() {
                Some(n) => Token::Number(n),
                None => Token::Resolved { value, variable },
            },
            GroupValue::Absolute(inner) => Token::Absolute(inner),
        }
    }
}

fn group_value(inner: &[Token]) -> Result<GroupValue, SolveError> {
    if arithmetic::is_numeric(inner) {
        let value = arithmetic::evaluate_tokens(inner)?;
        Ok(GroupValue::Known(Fraction::constant(value)))
    } else {
        normalize::fraction(inner).map(GroupValue::Known)
    }
}

fn absolute_value(inner: &[Token]) -> Result<GroupValue, SolveError> {
    match group_value(inner)? {
        GroupValue::Known(value) => match value.as_constant() {
            Some(n) => Ok(GroupValue::Known(Fraction::constant(n.abs()))),
            None => Ok(GroupValue::Absolute(inner.to_vec())),
        },
        absolute => Ok(absolute),
    }
}
