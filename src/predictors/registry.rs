use std::collections::HashMap;

use super::archive::{self, Archivable, Archive, ArchiveError};
use super::{ConstantPredictor, LinearPredictor, Predictor};

type ReadFn = fn(&Archive) -> Result<Box<dyn Predictor>, ArchiveError>;

/// Metadata describing a registered predictor type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictorInfo {
    /// Type name recorded in archives.
    pub type_name: String,
}

/// Registry mapping archive type names to predictor readers.
#[derive(Debug, Default)]
pub struct PredictorRegistry {
    readers: HashMap<String, ReadFn>,
}

impl PredictorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            readers: HashMap::new(),
        }
    }

    /// Registry with every predictor shipped by this crate.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry
            .register::<ConstantPredictor>()
            .register::<LinearPredictor>();
        registry
    }

    /// Register `P` under its archive type name, replacing any previous
    /// reader for that name.
    pub fn register<P>(&mut self) -> &mut Self
    where
        P: Predictor + Archivable + 'static,
    {
        self.readers
            .insert(P::TYPE_NAME.to_string(), read_boxed::<P>);
        self
    }

    /// Whether a reader exists for `type_name`.
    pub fn contains(&self, type_name: &str) -> bool {
        self.readers.contains_key(type_name)
    }

    /// Rebuild a predictor from an archive of any registered type.
    pub fn read(&self, archive: &Archive) -> Result<Box<dyn Predictor>, ArchiveError> {
        let reader = self
            .readers
            .get(&archive.type_name)
            .ok_or_else(|| ArchiveError::UnknownType(archive.type_name.clone()))?;
        reader(archive)
    }

    /// List registered predictor types, sorted by name.
    pub fn list(&self) -> Vec<PredictorInfo> {
        let mut infos: Vec<PredictorInfo> = self
            .readers
            .keys()
            .map(|name| PredictorInfo {
                type_name: name.clone(),
            })
            .collect();
        infos.sort_by(|a, b| a.type_name.cmp(&b.type_name));
        infos
    }
}

fn read_boxed<P>(archive: &Archive) -> Result<Box<dyn Predictor>, ArchiveError>
where
    P: Predictor + Archivable + 'static,
{
    Ok(Box::new(archive::read::<P>(archive)?))
}
