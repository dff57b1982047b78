use std::fmt;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use super::archive::{self, Archivable, Archive, ArchiveError};
use super::Predictor;

/// Predictor that ignores its input and outputs a fixed number.
///
/// Serves as the leaf of decision trees and as the trivial baseline model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstantPredictor {
    value: f64,
}

impl ConstantPredictor {
    /// Create a predictor that always returns `value`.
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    /// The constant output.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Return the constant, whatever the input.
    pub fn predict<T: ?Sized>(&self, _input: &T) -> f64 {
        self.value
    }

    /// Write the predictor on its own line, indented by `tabs` tabs.
    pub fn print_line<W: Write>(&self, out: &mut W, tabs: usize) -> io::Result<()> {
        writeln!(out, "{}{}", "\t".repeat(tabs), self)
    }
}

impl fmt::Display for ConstantPredictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConstantPredictor({})", self.value)
    }
}

impl Archivable for ConstantPredictor {
    const TYPE_NAME: &'static str = "ConstantPredictor";
}

impl Predictor for ConstantPredictor {
    fn predict(&self, _features: &[f64]) -> f64 {
        self.value
    }

    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn to_archive(&self) -> Result<Archive, ArchiveError> {
        archive::write(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignores_input() {
        let predictor = ConstantPredictor::new(4.2);
        assert_eq!(predictor.predict(&[1.0, 2.0][..]), 4.2);
        assert_eq!(predictor.predict("anything"), 4.2);
        assert_eq!(predictor.predict(&()), 4.2);
        assert_eq!(Predictor::predict(&predictor, &[]), 4.2);
    }

    #[test]
    fn test_default_is_zero() {
        assert_eq!(ConstantPredictor::default().value(), 0.0);
    }

    #[test]
    fn test_archive_round_trip() {
        let predictor = ConstantPredictor::new(4.2);
        let archive = predictor.to_archive().unwrap();
        assert_eq!(archive.type_name, "ConstantPredictor");
        assert_eq!(archive::read::<ConstantPredictor>(&archive).unwrap(), predictor);
    }

    #[test]
    fn test_print_line() {
        let mut out = Vec::new();
        ConstantPredictor::new(-1.5).print_line(&mut out, 2).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\t\tConstantPredictor(-1.5)\n");
    }
}
