//! Predictors consumed downstream of the dataset iterators.
//!
//! Every predictor implements [`Predictor`] and [`Archivable`], so it can be
//! scored, written to a type-tagged [`Archive`], and rebuilt through a
//! [`PredictorRegistry`] without the reader knowing its concrete type.

pub mod archive;
mod api;
mod constant;
mod linear;
mod registry;

pub use api::Predictor;
pub use archive::{Archivable, Archive, ArchiveError, ARCHIVE_VERSION};
pub use constant::ConstantPredictor;
pub use linear::LinearPredictor;
pub use registry::{PredictorInfo, PredictorRegistry};
