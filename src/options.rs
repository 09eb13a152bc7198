/// Knobs which control how a relation is solved and rendered.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Options {
    /// The maximum number of passes the grouping simplifier may make before
    /// giving up.
    pub max_passes: usize,
    /// How many decimal places to use when rendering numbers.
    pub precision: usize,
    /// How close two values need to be before they are considered equal.
    pub tolerance: f64,
}

impl Options {
    pub fn new() -> Self { Options::default() }

    pub fn with_max_passes(self, max_passes: usize) -> Self {
        Options { max_passes, ..self }
    }

    pub fn with_precision(self, precision: usize) -> Self {
        Options { precision, ..self }
    }

    pub fn with_tolerance(self, tolerance: f64) -> Self {
        Options { tolerance, ..self }
    }
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_passes: 64,
            precision: 2,
            tolerance: 1e-9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_only_touch_their_own_field() {
        let got = Options::new().with_precision(4).with_max_passes(3);

        assert_eq!(
            got,
            Options {
                max_passes: 3,
                precision: 4,
                tolerance: 1e-9,
            }
        );
    }
}
