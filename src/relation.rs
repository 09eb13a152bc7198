use crate::Polynomial;
use std::{
    cmp::Ordering,
    fmt::{self, Display, Formatter},
};

/// The comparison joining the two sides of a [`Relation`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RelationOp {
    Equal,
    Less,
    Greater,
    LessOrEqual,
    GreaterOrEqual,
}

impl RelationOp {
    /// Does `left REL right` hold, given how `left` compares to `right`?
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            RelationOp::Equal => ordering == Ordering::Equal,
            RelationOp::Less => ordering == Ordering::Less,
            RelationOp::Greater => ordering == Ordering::Greater,
            RelationOp::LessOrEqual => ordering != Ordering::Greater,
            RelationOp::GreaterOrEqual => ordering != Ordering::Less,
        }
    }

    /// The operator you get after multiplying both sides by a negative
    /// number.
    pub fn flipped(self) -> Self {
        match self {
            RelationOp::Equal => RelationOp::Equal,
            RelationOp::Less => RelationOp::Greater,
            RelationOp::Greater => RelationOp::Less,
            RelationOp::LessOrEqual => RelationOp::GreaterOrEqual,
            RelationOp::GreaterOrEqual => RelationOp::LessOrEqual,
        }
    }

    pub fn is_inequality(self) -> bool { self != RelationOp::Equal }

    pub fn symbol(self) -> &'static str {
        match self {
            RelationOp::Equal => "=",
            RelationOp::Less => "<",
            RelationOp::Greater => ">",
            RelationOp::LessOrEqual => "<=",
            RelationOp::GreaterOrEqual => ">=",
        }
    }
}

impl Display for RelationOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Two normalized sides joined by a comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub left: Polynomial,
    pub op: RelationOp,
    pub right: Polynomial,
    pub variable: char,
}

impl Relation {
    pub fn new(
        left: Polynomial,
        op: RelationOp,
        right: Polynomial,
        variable: char,
    ) -> Self {
        Relation {
            left,
            op,
            right,
            variable,
        }
    }

    /// Move everything to the left hand side, `left - right`.
    pub fn difference(&self) -> Polynomial { &self.left - &self.right }
}

impl Display for Relation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.left.display(self.variable),
            self.op,
            self.right.display(self.variable)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truth_table() {
        let inputs = vec![
            (RelationOp::Equal, [false, true, false]),
            (RelationOp::Less, [true, false, false]),
            (RelationOp::Greater, [false, false, true]),
            (RelationOp::LessOrEqual, [true, true, false]),
            (RelationOp::GreaterOrEqual, [false, true, true]),
        ];
        let orderings = [Ordering::Less, Ordering::Equal, Ordering::Greater];

        for (op, should_be) in inputs {
            for (ordering, &expected) in orderings.iter().zip(&should_be) {
                assert_eq!(op.holds(*ordering), expected, "{} {:?}", op, ordering);
            }
        }
    }

    #[test]
    fn flipping_twice_is_a_no_op() {
        let ops = [
            RelationOp::Equal,
            RelationOp::Less,
            RelationOp::Greater,
            RelationOp::LessOrEqual,
            RelationOp::GreaterOrEqual,
        ];

        for &op in &ops {
            assert_eq!(op.flipped().flipped(), op);
        }
        assert_eq!(RelationOp::Less.flipped(), RelationOp::Greater);
    }

    #[test]
    fn difference_subtracts_the_right_hand_side() {
        let relation = Relation::new(
            vec![(1, 2.0), (0, 3.0)].into_iter().collect(),
            RelationOp::Equal,
            vec![(0, 7.0)].into_iter().collect(),
            'x',
        );

        let got = relation.difference();

        assert_eq!(
            got,
            vec![(1, 2.0), (0, -4.0)].into_iter().collect::<Polynomial>()
        );
        assert_eq!(relation.to_string(), "2*x+3 = 7");
    }
}
