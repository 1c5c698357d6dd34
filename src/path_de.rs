use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::LoadError;

/// Deepest property path a schema document can hold and still load:
/// serde_json stops at 128 nested containers, and an array leaf adds one.
pub const MAX_LOADABLE_DEPTH: usize = 100;

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, LoadError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_load_error)
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, LoadError> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_load_error)
}

/// Read and deserialize a schema file.
pub fn from_file_with_path<T: DeserializeOwned>(file: &Path) -> Result<T, LoadError> {
    let bytes = std::fs::read(file).map_err(|source| LoadError::Io {
        file: file.display().to_string(),
        source,
    })?;
    from_slice_with_path(&bytes)
}

fn into_load_error(err: serde_path_to_error::Error<serde_json::Error>) -> LoadError {
    let path = err.path().to_string();
    LoadError::Json { path, message: err.into_inner().to_string() }
}
