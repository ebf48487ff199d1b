use serde::de::DeserializeOwned;
use thiserror::Error;

/// A decode failure pinned to the JSON path where it happened.
#[derive(Debug, Error)]
#[error("at JSON path {path} → {message}")]
pub struct DecodeError {
    pub path: String,
    pub message: String,
}

impl DecodeError {
    fn from_path_error(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = err.path().to_string();
        Self { path, message: err.into_inner().to_string() }
    }
}

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, DecodeError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(DecodeError::from_path_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Outer {
        inner: Vec<Inner>,
    }

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Inner {
        count: u32,
    }

    #[test]
    fn error_names_the_nested_path() {
        let err = from_str_with_path::<Outer>(r#"{"inner": [{"count": 1}, {"count": "x"}]}"#).unwrap_err();
        assert_eq!(err.path, "inner[1].count");
        assert!(err.to_string().starts_with("at JSON path inner[1].count → "));
    }
}
