use smol_str::SmolStr;

/// Everything that can go wrong while solving a relation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolveError {
    #[error("invalid character {character:?} at index {index}")]
    InvalidCharacter { character: char, index: usize },

    #[error("unbalanced grouping symbols")]
    UnbalancedGrouping,

    #[error("no variable found")]
    NoVariable,

    #[error("expected a single variable, found both {first:?} and {second:?}")]
    MultipleVariables { first: char, second: char },

    #[error("expected exactly one of =, <, >, <= or >=")]
    InvalidRelationOperator,

    #[error("both sides of the relation must be non-empty")]
    EmptySide,

    #[error("division by zero")]
    DivisionByZero,

    #[error("malformed expression")]
    MalformedExpression,

    #[error("unsupported term \"{term}\"")]
    UnsupportedTerm { term: SmolStr },

    #[error("polynomials of degree {degree} are not supported")]
    HigherOrderUnsupported { degree: i32 },

    #[error("grouping symbols were not resolved after {passes} passes")]
    IterationLimitExceeded { passes: usize },
}

impl SolveError {
    pub(crate) fn unsupported<S: Into<SmolStr>>(term: S) -> Self {
        SolveError::UnsupportedTerm { term: term.into() }
    }
}
