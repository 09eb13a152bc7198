//! Validating relations and breaking each side into [`Token`]s.

use crate::{rational::Fraction, relation::RelationOp, SolveError};
use std::{
    fmt::{self, Display, Formatter},
    ops::Range,
};

/// The pieces of a relation that survive validation, before any
/// simplification has been done.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRelation {
    pub left: Vec<Token>,
    pub op: RelationOp,
    pub right: Vec<Token>,
    pub variable: char,
}

/// Validate some text and split it into the left and right hand sides of a
/// relation.
///
/// Whitespace is ignored. Checks are done in this order:
///
/// 1. every character is a letter, digit, or one of `^+-*/()[]{}|<>=`
/// 2. grouping symbols are balanced
/// 3. there is exactly one relation operator
/// 4. neither side is empty
/// 5. exactly one distinct letter is used
pub fn split(text: &str) -> Result<RawRelation, SolveError> {
    let compact = strip_and_validate_characters(text)?;
    check_grouping(&compact)?;

    let (op, span) = find_relation_operator(&compact)?;
    let left = &compact[..span.start];
    let right = &compact[span.end..];

    if left.is_empty() || right.is_empty() {
        return Err(SolveError::EmptySide);
    }

    // a relation operator hidden inside a group leaves each side unbalanced
    check_grouping(left)?;
    check_grouping(right)?;

    let variable = find_variable(&compact)?;

    Ok(RawRelation {
        left: tokenize(left)?,
        op,
        right: tokenize(right)?,
        variable,
    })
}

/// Break an expression into a sequence of [`Token`]s.
pub fn tokenize(src: &str) -> Result<Vec<Token>, SolveError> {
    Tokens::new(src).collect()
}

/// Write tokens back out as text.
pub fn render(tokens: &[Token]) -> String {
    tokens.iter().map(ToString::to_string).collect()
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || "^+-*/()[]{}|<>=".contains(c)
}

fn strip_and_validate_characters(text: &str) -> Result<String, SolveError> {
    let mut compact = String::with_capacity(text.len());

    for (index, character) in text.char_indices() {
        if character.is_whitespace() {
            continue;
        }
        if !is_allowed(character) {
            return Err(SolveError::InvalidCharacter { character, index });
        }

        compact.push(character);
    }

    Ok(compact)
}

/// Brackets are matched with a stack, but `|` opens and closes with the same
/// glyph so it only gets a parity check.
fn check_grouping(src: &str) -> Result<(), SolveError> {
    let mut stack = Vec::new();
    let mut bars = 0_usize;

    for c in src.chars() {
        match Delimiter::from_char(c) {
            Some(Delimiter::Bar) => bars += 1,
            Some(open) if open.is_opening() => stack.push(open),
            Some(close) => match stack.pop() {
                Some(open) if close.closes(open) => {},
                _ => return Err(SolveError::UnbalancedGrouping),
            },
            None => {},
        }
    }

    if stack.is_empty() && bars % 2 == 0 {
        Ok(())
    } else {
        Err(SolveError::UnbalancedGrouping)
    }
}

/// Find the one relation operator, preferring `<=` and `>=` over their single
/// character prefixes.
fn find_relation_operator(
    src: &str,
) -> Result<(RelationOp, Range<usize>), SolveError> {
    const CANDIDATES: &[(&str, RelationOp)] = &[
        ("<=", RelationOp::LessOrEqual),
        (">=", RelationOp::GreaterOrEqual),
        ("=", RelationOp::Equal),
        ("<", RelationOp::Less),
        (">", RelationOp::Greater),
    ];

    let mut found = None;
    let mut cursor = 0;

    while cursor < src.len() {
        let rest = &src[cursor..];
        let candidate = CANDIDATES
            .iter()
            .find(|(symbol, _)| rest.starts_with(symbol));

        match candidate {
            Some((symbol, op)) => {
                if found.is_some() {
                    return Err(SolveError::InvalidRelationOperator);
                }
                found = Some((*op, cursor..cursor + symbol.len()));
                cursor += symbol.len();
            },
            None => cursor += rest.chars().next().map_or(1, char::len_utf8),
        }
    }

    found.ok_or(SolveError::InvalidRelationOperator)
}

fn find_variable(src: &str) -> Result<char, SolveError> {
    let mut letters = src.chars().filter(|c| c.is_ascii_alphabetic());
    let first = letters.next().ok_or(SolveError::NoVariable)?;

    match letters.find(|&c| c != first) {
        Some(second) => Err(SolveError::MultipleVariables { first, second }),
        None => Ok(first),
    }
}

/// A single lexical unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Variable(char),
    Operator(Operator),
    Group {
        delimiter: Delimiter,
        position: usize,
    },
    /// A group which has already been collapsed down to a single value.
    Resolved { value: Fraction, variable: char },
    /// An absolute value wrapping an expression that involves the variable.
    Absolute(Vec<Token>),
}

impl Token {
    /// Can this token be used as a value (as opposed to an operator or
    /// delimiter)?
    pub fn is_operand(&self) -> bool {
        match self {
            Token::Number(_)
            | Token::Variable(_)
            | Token::Resolved { .. }
            | Token::Absolute(_) => true,
            Token::Operator(_) | Token::Group { .. } => false,
        }
    }

    pub fn is_operator(&self, op: Operator) -> bool {
        *self == Token::Operator(op)
    }

    pub fn delimiter(&self) -> Option<Delimiter> {
        match self {
            Token::Group { delimiter, .. } => Some(*delimiter),
            _ => None,
        }
    }

    pub fn mentions_variable(&self) -> bool {
        match self {
            Token::Variable(_) | Token::Absolute(_) => true,
            Token::Resolved { value, .. } => value.as_constant().is_none(),
            _ => false,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Variable(v) => write!(f, "{}", v),
            Token::Operator(op) => write!(f, "{}", op.symbol()),
            Token::Group { delimiter, .. } => {
                write!(f, "{}", delimiter.symbol())
            },
            Token::Resolved { value, variable } => {
                write!(f, "({})", value.display(*variable))
            },
            Token::Absolute(inner) => write!(f, "|{}|", render(inner)),
        }
    }
}

/// The arithmetic operators.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Operator {
    Plus,
    Minus,
    Times,
    Divide,
    Power,
}

impl Operator {
    pub fn symbol(self) -> char {
        match self {
            Operator::Plus => '+',
            Operator::Minus => '-',
            Operator::Times => '*',
            Operator::Divide => '/',
            Operator::Power => '^',
        }
    }
}

/// The characters used to group things.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Delimiter {
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    /// The absolute value bar, which both opens and closes.
    Bar,
}

impl Delimiter {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '(' => Some(Delimiter::OpenParen),
            ')' => Some(Delimiter::CloseParen),
            '[' => Some(Delimiter::OpenBracket),
            ']' => Some(Delimiter::CloseBracket),
            '{' => Some(Delimiter::OpenBrace),
            '}' => Some(Delimiter::CloseBrace),
            '|' => Some(Delimiter::Bar),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Delimiter::OpenParen => '(',
            Delimiter::CloseParen => ')',
            Delimiter::OpenBracket => '[',
            Delimiter::CloseBracket => ']',
            Delimiter::OpenBrace => '{',
            Delimiter::CloseBrace => '}',
            Delimiter::Bar => '|',
        }
    }

    pub fn is_opening(self) -> bool {
        match self {
            Delimiter::OpenParen
            | Delimiter::OpenBracket
            | Delimiter::OpenBrace
            | Delimiter::Bar => true,
            _ => false,
        }
    }

    pub fn is_closing(self) -> bool {
        match self {
            Delimiter::CloseParen
            | Delimiter::CloseBracket
            | Delimiter::CloseBrace
            | Delimiter::Bar => true,
            _ => false,
        }
    }

    /// Does this delimiter close a group started with `open`?
    pub fn closes(self, open: Delimiter) -> bool {
        match (open, self) {
            (Delimiter::OpenParen, Delimiter::CloseParen)
            | (Delimiter::OpenBracket, Delimiter::CloseBracket)
            | (Delimiter::OpenBrace, Delimiter::CloseBrace)
            | (Delimiter::Bar, Delimiter::Bar) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Tokens<'a> {
    src: &'a str,
    cursor: usize,
}

impl<'a> Tokens<'a> {
    fn new(src: &'a str) -> Self { Tokens { src, cursor: 0 } }

    fn rest(&self) -> &'a str { &self.src[self.cursor..] }

    fn peek(&self) -> Option<char> { self.rest().chars().next() }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += c.len_utf8();
        Some(c)
    }

    fn chomp(&mut self, token: Token) -> Option<Result<Token, SolveError>> {
        self.advance()?;
        Some(Ok(token))
    }

    fn take_while<P>(&mut self, mut predicate: P) -> &'a str
    where
        P: FnMut(char) -> bool,
    {
        let start = self.cursor;

        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }

            self.advance();
        }

        &self.src[start..self.cursor]
    }

    fn chomp_number(&mut self) -> Result<Token, SolveError> {
        let start = self.cursor;
        self.take_while(|c| c.is_ascii_digit());

        if self.peek() == Some('.') {
            // skip past the decimal
            self.advance();
            self.take_while(|c| c.is_ascii_digit());
        }

        self.src[start..self.cursor]
            .parse()
            .map(Token::Number)
            .map_err(|_| SolveError::MalformedExpression)
    }

    fn chomp_group(&mut self, delimiter: Delimiter) -> Token {
        let position = self.cursor;
        self.advance();

        Token::Group {
            delimiter,
            position,
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<Token, SolveError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let c = self.peek()?;

            if let Some(delimiter) = Delimiter::from_char(c) {
                return Some(Ok(self.chomp_group(delimiter)));
            }

            return match c {
                space if space.is_whitespace() => {
                    self.advance();
                    continue;
                },
                '+' => self.chomp(Token::Operator(Operator::Plus)),
                '-' => self.chomp(Token::Operator(Operator::Minus)),
                '*' => self.chomp(Token::Operator(Operator::Times)),
                '/' => self.chomp(Token::Operator(Operator::Divide)),
                '^' => self.chomp(Token::Operator(Operator::Power)),
                letter if letter.is_ascii_alphabetic() => {
                    self.chomp(Token::Variable(letter))
                },
                '0'..='9' | '.' => Some(self.chomp_number()),
                other => Some(Err(SolveError::InvalidCharacter {
                    character: other,
                    index: self.cursor,
                })),
            };
        }
    }
}
