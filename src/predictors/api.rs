use std::fmt;

use super::archive::{Archive, ArchiveError};

/// Capability set shared by every predictor.
pub trait Predictor: fmt::Debug {
    /// Score a dense feature vector.
    fn predict(&self, features: &[f64]) -> f64;

    /// Stable type name, identical to the one recorded in archives.
    fn type_name(&self) -> &'static str;

    /// Archive the predictor under its type name.
    fn to_archive(&self) -> Result<Archive, ArchiveError>;
}
