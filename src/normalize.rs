//! Turning a delimiter-free side into a canonical [`Polynomial`].

use crate::{
    lexer::{self, Operator, Token},
    Fraction, Polynomial, SolveError,
};

/// The largest power a non-constant expression may be raised to.
pub(crate) const MAX_EXPANDED_POWER: u32 = 64;

/// Collect like terms into a [`Polynomial`].
///
/// The tokens must not contain any grouping symbols (see
/// [`crate::grouping::simplify()`]). The grammar for each term is:
///
/// ```text
/// side    := ["+" | "-"] term (("+" | "-") term)*
/// term    := factor (["*" | "/"] factor)*
/// factor  := ("+" | "-")* atom ["^" factor]
/// atom    := NUMBER | VARIABLE | RESOLVED_GROUP
/// ```
///
/// A missing operator between two factors means multiplication, so `3x` is
/// `3*x`.
pub fn normalize(tokens: &[Token]) -> Result<Polynomial, SolveError> {
    fraction(tokens)?
        .into_polynomial()
        .ok_or_else(|| SolveError::unsupported(lexer::render(tokens)))
}

/// Like [`normalize()`], except the variable is allowed to end up in a
/// denominator.
pub(crate) fn fraction(tokens: &[Token]) -> Result<Fraction, SolveError> {
    if tokens.iter().any(|t| t.delimiter().is_some()) {
        return Err(SolveError::MalformedExpression);
    }

    let mut signed = Vec::with_capacity(tokens.len() + 1);
    if tokens.first() != Some(&Token::Operator(Operator::Plus)) {
        signed.push(Token::Operator(Operator::Plus));
    }
    signed.extend_from_slice(tokens);

    let mut total = Fraction::constant(0.0);

    for (sign, term) in signed_terms(&signed) {
        if term.is_empty() {
            return Err(SolveError::MalformedExpression);
        }

        let value = TermParser::new(term).parse()?;
        total = match sign {
            Operator::Minus => &total - &value,
            _ => &total + &value,
        };
    }

    if total.is_finite() {
        Ok(total)
    } else {
        Err(SolveError::MalformedExpression)
    }
}

/// Split at every `+` or `-` that separates two terms (i.e. it isn't a unary
/// sign).
fn signed_terms(tokens: &[Token]) -> Vec<(Operator, &[Token])> {
    let mut terms = Vec::new();
    let mut current: Option<(Operator, usize)> = None;

    for (i, token) in tokens.iter().enumerate() {
        let sign = match token {
            Token::Operator(op @ Operator::Plus)
            | Token::Operator(op @ Operator::Minus) => *op,
            _ => continue,
        };
        let is_boundary = i == 0 || tokens[i - 1].is_operand();

        if is_boundary {
            if let Some((previous, start)) = current {
                terms.push((previous, &tokens[start..i]));
            }
            current = Some((sign, i + 1));
        }
    }

    if let Some((sign, start)) = current {
        terms.push((sign, &tokens[start..]));
    }

    terms
}

/// Convert an exponent into something we can expand by repeated
/// multiplication.
pub(crate) fn integer_exponent(exponent: f64) -> Option<u32> {
    let in_range = exponent >= 0.0 && exponent <= MAX_EXPANDED_POWER as f64;

    if in_range && exponent.fract() == 0.0 {
        Some(exponent as u32)
    } else {
        None
    }
}

/// Raise a value to a constant power.
pub(crate) fn power(
    base: &Fraction,
    exponent: f64,
    term: &[Token],
) -> Result<Fraction, SolveError> {
    if let Some(b) = base.as_constant() {
        if b == 0.0 && exponent < 0.0 {
            return Err(SolveError::DivisionByZero);
        }

        let value = b.powf(exponent);
        return if value.is_finite() {
            Ok(Fraction::constant(value))
        } else {
            Err(SolveError::MalformedExpression)
        };
    }

    integer_exponent(exponent)
        .map(|n| base.pow(n))
        .ok_or_else(|| SolveError::unsupported(lexer::render(term)))
}

/// A recursive descent parser for a single term.
#[derive(Debug, Clone)]
struct TermParser<'t> {
    tokens: &'t [Token],
    cursor: usize,
}

impl<'t> TermParser<'t> {
    fn new(tokens: &'t [Token]) -> Self { TermParser { tokens, cursor: 0 } }

    fn peek(&self) -> Option<&'t Token> { self.tokens.get(self.cursor) }

    fn advance(&mut self) -> Result<&'t Token, SolveError> {
        let token = self.peek().ok_or(SolveError::MalformedExpression)?;
        self.cursor += 1;
        Ok(token)
    }

    fn unsupported(&self) -> SolveError {
        SolveError::unsupported(lexer::render(self.tokens))
    }

    fn parse(mut self) -> Result<Fraction, SolveError> {
        let mut value = self.factor()?;

        while let Some(token) = self.peek() {
            value = match token {
                Token::Operator(Operator::Times) => {
                    self.advance()?;
                    &value * &self.factor()?
                },
                Token::Operator(Operator::Divide) => {
                    self.advance()?;
                    value.checked_div(&self.factor()?)?
                },
                implicit if implicit.is_operand() => &value * &self.factor()?,
                _ => return Err(SolveError::MalformedExpression),
            };
        }

        Ok(value)
    }

    fn factor(&mut self) -> Result<Fraction, SolveError> {
        let mut negative = false;

        loop {
            match self.peek() {
                Some(Token::Operator(Operator::Minus)) => negative = !negative,
                Some(Token::Operator(Operator::Plus)) => {},
                _ => break,
            }
            self.advance()?;
        }

        let base = match self.advance()? {
            // a unary minus binds tighter than "^" when it sits directly in
            // front of a number, the same as in arithmetic::evaluate()
            Token::Number(n) if negative => {
                negative = false;
                Fraction::constant(-n)
            },
            Token::Number(n) => Fraction::constant(*n),
            Token::Variable(_) => Fraction::from(Polynomial::identity()),
            Token::Resolved { value, .. } => value.clone(),
            Token::Absolute(_) => return Err(self.unsupported()),
            _ => return Err(SolveError::MalformedExpression),
        };

        let value = if self.peek() == Some(&Token::Operator(Operator::Power)) {
            self.advance()?;
            let exponent = self.factor()?;
            let exponent =
                exponent.as_constant().ok_or_else(|| self.unsupported())?;
            power(&base, exponent, self.tokens)?
        } else {
            base
        };

        Ok(if negative { -&value } else { value })
    }
}
