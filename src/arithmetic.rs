//! Evaluating purely numeric expressions.

use crate::{
    lexer::{self, Operator, Token},
    SolveError,
};

/// Evaluate a numeric expression like `2+3*4`.
pub fn evaluate(src: &str) -> Result<f64, SolveError> {
    let tokens = lexer::tokenize(src)?;
    evaluate_tokens(&tokens)
}

/// Evaluate a stream of number and operator tokens.
///
/// A `-` at the start of the stream or directly after another operator is
/// merged into the number which follows it *before* anything else happens,
/// so `-2^2` is `(-2)^2 = 4`. After that, operators are applied in three
/// passes:
///
/// 1. `^`, right to left (so `2^3^2` is `2^9`)
/// 2. `*` and `/`, left to right
/// 3. `+` and `-`, left to right
pub fn evaluate_tokens(tokens: &[Token]) -> Result<f64, SolveError> {
    let mut stream = merge_unary_minus(tokens)?;

    apply_right_to_left(&mut stream, &[Operator::Power])?;
    apply_left_to_right(&mut stream, &[Operator::Times, Operator::Divide])?;
    apply_left_to_right(&mut stream, &[Operator::Plus, Operator::Minus])?;

    match stream.as_slice() {
        [Item::Number(value)] if value.is_finite() => Ok(*value),
        _ => Err(SolveError::MalformedExpression),
    }
}

/// Is this something [`evaluate_tokens()`] can deal with?
pub fn is_numeric(tokens: &[Token]) -> bool {
    tokens.iter().all(|token| match token {
        Token::Number(_) | Token::Operator(_) => true,
        _ => false,
    })
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Item {
    Number(f64),
    Operator(Operator),
}

fn merge_unary_minus(tokens: &[Token]) -> Result<Vec<Item>, SolveError> {
    let mut items = Vec::with_capacity(tokens.len());
    let mut negate_next = false;

    for token in tokens {
        let follows_operand = match items.last() {
            Some(Item::Number(_)) => true,
            _ => false,
        };

        match token {
            Token::Number(n) => {
                let n = if negate_next { -n } else { *n };
                negate_next = false;
                items.push(Item::Number(n));
            },
            Token::Operator(Operator::Minus)
                if !follows_operand && !negate_next =>
            {
                negate_next = true;
            },
            Token::Operator(op) if !negate_next => {
                items.push(Item::Operator(*op))
            },
            _ => return Err(SolveError::MalformedExpression),
        }
    }

    if negate_next {
        Err(SolveError::MalformedExpression)
    } else {
        Ok(items)
    }
}

fn operands(
    items: &[Item],
    operator_index: usize,
) -> Result<(f64, f64), SolveError> {
    let left = operator_index.checked_sub(1).and_then(|i| items.get(i));
    let right = items.get(operator_index + 1);

    match (left, right) {
        (Some(Item::Number(l)), Some(Item::Number(r))) => Ok((*l, *r)),
        _ => Err(SolveError::MalformedExpression),
    }
}

fn apply(left: f64, op: Operator, right: f64) -> Result<f64, SolveError> {
    match op {
        Operator::Plus => Ok(left + right),
        Operator::Minus => Ok(left - right),
        Operator::Times => Ok(left * right),
        Operator::Divide if right == 0.0 => Err(SolveError::DivisionByZero),
        Operator::Divide => Ok(left / right),
        Operator::Power if left == 0.0 && right < 0.0 => {
            Err(SolveError::DivisionByZero)
        },
        Operator::Power => Ok(left.powf(right)),
    }
}

/// Replace `items[i-1..=i+1]` with the result of applying the operator at
/// `items[i]`.
fn collapse(items: &mut Vec<Item>, i: usize) -> Result<(), SolveError> {
    let (left, right) = operands(items, i)?;
    let op = match items[i] {
        Item::Operator(op) => op,
        Item::Number(_) => unreachable!(),
    };

    items[i - 1] = Item::Number(apply(left, op, right)?);
    items.drain(i..=i + 1);

    Ok(())
}

fn apply_right_to_left(
    items: &mut Vec<Item>,
    ops: &[Operator],
) -> Result<(), SolveError> {
    let mut i = items.len();

    while i > 0 {
        i -= 1;

        if let Item::Operator(op) = items[i] {
            if ops.contains(&op) {
                collapse(items, i)?;
                // the result now lives at i-1, keep scanning to its left
            }
        }
    }

    Ok(())
}

fn apply_left_to_right(
    items: &mut Vec<Item>,
    ops: &[Operator],
) -> Result<(), SolveError> {
    let mut i = 0;

    while i < items.len() {
        match items[i] {
            Item::Operator(op) if ops.contains(&op) => collapse(items, i)?,
            _ => i += 1,
        }
    }

    Ok(())
}
