use std::fmt;

use serde::{Deserialize, Serialize};

use super::archive::{self, Archivable, Archive, ArchiveError};
use super::Predictor;

/// Affine predictor `bias + w · x`.
///
/// Features beyond the weight vector are ignored, and missing trailing
/// features count as zero, so sparse rows shorter than the model still score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearPredictor {
    weights: Vec<f64>,
    bias: f64,
}

impl LinearPredictor {
    /// Create a predictor from its weights and bias.
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        Self { weights, bias }
    }

    /// Per-feature weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Intercept term.
    pub fn bias(&self) -> f64 {
        self.bias
    }
}

impl fmt::Display for LinearPredictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LinearPredictor(bias={}, weights={:?})",
            self.bias, self.weights
        )
    }
}

impl Archivable for LinearPredictor {
    const TYPE_NAME: &'static str = "LinearPredictor";
}

impl Predictor for LinearPredictor {
    fn predict(&self, features: &[f64]) -> f64 {
        self.weights
            .iter()
            .zip(features)
            .fold(self.bias, |acc, (w, x)| acc + w * x)
    }

    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn to_archive(&self) -> Result<Archive, ArchiveError> {
        archive::write(self)
    }
}
