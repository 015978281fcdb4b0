use super::{Store, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// A pretty-printed JSON document holding a single value of `T`.
#[derive(Debug, Clone)]
pub struct JsonFile<T> {
    path: PathBuf,
    _doc: PhantomData<T>,
}

impl<T> JsonFile<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _doc: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: Serialize + DeserializeOwned> Store for JsonFile<T> {
    type Doc = T;

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn load(&self) -> Result<T, StoreError> {
        if !self.exists() {
            return Err(StoreError::Missing {
                path: self.path.clone(),
            });
        }
        let text = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn save(&self, doc: &T) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(doc)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}
