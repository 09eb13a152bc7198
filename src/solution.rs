//! The set of values which satisfy a relation.

use arrayvec::ArrayVec;

/// One end of an [`Interval`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Bound {
    Unbounded,
    /// The interval gets arbitrarily close to this value without including
    /// it.
    Open(f64),
    Closed(f64),
}

impl Bound {
    pub fn value(self) -> Option<f64> {
        match self {
            Bound::Unbounded => None,
            Bound::Open(v) | Bound::Closed(v) => Some(v),
        }
    }

    pub fn is_closed(self) -> bool {
        match self {
            Bound::Closed(_) => true,
            _ => false,
        }
    }
}

/// A contiguous range of values.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Interval {
    pub lower: Bound,
    pub upper: Bound,
}

impl Interval {
    pub fn new(lower: Bound, upper: Bound) -> Self { Interval { lower, upper } }

    /// The whole real number line.
    pub fn everything() -> Self {
        Interval::new(Bound::Unbounded, Bound::Unbounded)
    }

    pub fn point(value: f64) -> Self {
        Interval::new(Bound::Closed(value), Bound::Closed(value))
    }

    pub fn is_everything(&self) -> bool { *self == Interval::everything() }

    /// Does this interval contain just a single value?
    pub fn as_point(&self) -> Option<f64> {
        match (self.lower, self.upper) {
            (Bound::Closed(a), Bound::Closed(b)) if a == b => Some(a),
            _ => None,
        }
    }

    /// Does `value` fall inside this interval (give or take `tolerance`)?
    pub fn contains(&self, value: f64, tolerance: f64) -> bool {
        let above_lower = match self.lower {
            Bound::Unbounded => true,
            Bound::Open(a) => value > a - tolerance,
            Bound::Closed(a) => value >= a - tolerance,
        };
        let below_upper = match self.upper {
            Bound::Unbounded => true,
            Bound::Open(b) => value < b + tolerance,
            Bound::Closed(b) => value <= b + tolerance,
        };

        above_lower && below_upper
    }

    pub fn is_empty(&self, tolerance: f64) -> bool {
        match (self.lower.value(), self.upper.value()) {
            (Some(a), Some(b)) if (a - b).abs() <= tolerance => {
                !(self.lower.is_closed() && self.upper.is_closed())
            },
            (Some(a), Some(b)) => a > b,
            _ => false,
        }
    }

    /// Remove a single value from this interval, splitting it in two if
    /// necessary.
    pub fn puncture(self, point: f64, tolerance: f64) -> Vec<Interval> {
        if !self.contains(point, tolerance) {
            return vec![self];
        }

        vec![
            Interval::new(self.lower, Bound::Open(point)),
            Interval::new(Bound::Open(point), self.upper),
        ]
        .into_iter()
        .filter(|piece| !piece.is_empty(tolerance))
        .collect()
    }
}

/// Every value of the variable which satisfies a relation.
#[derive(Debug, Clone, PartialEq)]
pub enum Solution {
    /// A quadratic equation with a negative discriminant.
    NoRealSolution,
    /// The distinct roots of an equation, in ascending order. No roots means
    /// there is no solution.
    Roots(ArrayVec<[f64; 2]>),
    /// A union of disjoint intervals, in ascending order. An empty list means
    /// there is no solution.
    Intervals(Vec<Interval>),
}

impl Solution {
    pub fn all_real_numbers() -> Self {
        Solution::Intervals(vec![Interval::everything()])
    }

    pub fn none() -> Self { Solution::Intervals(Vec::new()) }

    pub fn roots<I>(roots: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        Solution::Roots(roots.into_iter().collect())
    }

    /// Is there nothing which satisfies the relation?
    pub fn is_empty(&self) -> bool {
        match self {
            Solution::NoRealSolution => true,
            Solution::Roots(roots) => roots.is_empty(),
            Solution::Intervals(intervals) => intervals.is_empty(),
        }
    }

    /// Does `value` satisfy the relation?
    pub fn contains(&self, value: f64, tolerance: f64) -> bool {
        match self {
            Solution::NoRealSolution => false,
            Solution::Roots(roots) => {
                roots.iter().any(|r| (r - value).abs() <= tolerance)
            },
            Solution::Intervals(intervals) => {
                intervals.iter().any(|i| i.contains(value, tolerance))
            },
        }
    }

    /// Remove values the variable may never take (e.g. because they'd make
    /// a denominator zero).
    pub fn excluding(self, excluded: &[f64], tolerance: f64) -> Solution {
        if excluded.is_empty() {
            return self;
        }

        let is_excluded =
            |value: f64| excluded.iter().any(|e| (e - value).abs() <= tolerance);

        match self {
            Solution::NoRealSolution => Solution::NoRealSolution,
            Solution::Roots(roots) => Solution::Roots(
                roots.into_iter().filter(|&r| !is_excluded(r)).collect(),
            ),
            Solution::Intervals(mut intervals) => {
                for &point in excluded {
                    intervals = intervals
                        .into_iter()
                        .flat_map(|i| i.puncture(point, tolerance))
                        .collect();
                }

                Solution::Intervals(intervals)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn open_and_closed_bounds() {
        let half_open = Interval::new(Bound::Open(0.0), Bound::Closed(1.0));

        assert!(!half_open.contains(-0.5, TOLERANCE));
        assert!(half_open.contains(0.5, TOLERANCE));
        assert!(half_open.contains(1.0, TOLERANCE));
        assert!(!half_open.contains(1.5, TOLERANCE));
        assert!(Interval::everything().contains(1e300, TOLERANCE));
    }

    #[test]
    fn empty_intervals() {
        assert!(!Interval::point(2.0).is_empty(TOLERANCE));
        assert!(Interval::new(Bound::Open(2.0), Bound::Closed(2.0))
            .is_empty(TOLERANCE));
        assert!(Interval::new(Bound::Closed(3.0), Bound::Closed(2.0))
            .is_empty(TOLERANCE));
        assert!(!Interval::everything().is_empty(TOLERANCE));
    }

    #[test]
    fn puncturing_splits_an_interval() {
        let got = Interval::everything().puncture(0.0, TOLERANCE);

        assert_eq!(
            got,
            vec![
                Interval::new(Bound::Unbounded, Bound::Open(0.0)),
                Interval::new(Bound::Open(0.0), Bound::Unbounded),
            ]
        );
    }

    #[test]
    fn puncturing_an_endpoint_opens_it() {
        let ray = Interval::new(Bound::Closed(1.0), Bound::Unbounded);

        let got = ray.puncture(1.0, TOLERANCE);

        assert_eq!(got, vec![Interval::new(Bound::Open(1.0), Bound::Unbounded)]);
    }

    #[test]
    fn puncturing_a_point_removes_it() {
        assert!(Interval::point(4.0).puncture(4.0, TOLERANCE).is_empty());
        assert_eq!(
            Interval::point(4.0).puncture(5.0, TOLERANCE),
            vec![Interval::point(4.0)]
        );
    }

    #[test]
    fn excluded_roots_are_filtered_out() {
        let solution = Solution::roots(vec![0.0, 2.0]);

        let got = solution.excluding(&[0.0], TOLERANCE);

        assert_eq!(got, Solution::roots(vec![2.0]));
        assert!(got.contains(2.0, TOLERANCE));
        assert!(!got.contains(0.0, TOLERANCE));
    }

    #[test]
    fn excluding_every_root_leaves_nothing() {
        let got = Solution::roots(vec![1.0]).excluding(&[1.0], TOLERANCE);

        assert!(got.is_empty());
        assert_ne!(got, Solution::NoRealSolution);
    }

    #[test]
    fn excluded_points_are_punctured_from_intervals() {
        let got =
            Solution::all_real_numbers().excluding(&[-1.0, 1.0], TOLERANCE);

        assert_eq!(
            got,
            Solution::Intervals(vec![
                Interval::new(Bound::Unbounded, Bound::Open(-1.0)),
                Interval::new(Bound::Open(-1.0), Bound::Open(1.0)),
                Interval::new(Bound::Open(1.0), Bound::Unbounded),
            ])
        );
    }
}
