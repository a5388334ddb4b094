//! `data://random_data?length=N` resource resolution: bounded random
//! alphanumeric generation, entirely synthetic (no I/O).

use crate::error::EngineError;
use rand::distr::Alphanumeric;
use rand::Rng;

const MIN_LENGTH: usize = 1;
const MAX_LENGTH: usize = 1024;

/// Resolve a `data://random_data?length=N` URI. `length` must be in
/// `1..=1024`; anything else is `InvalidParams`.
pub fn resolve(uri: &str) -> Result<(String, Vec<u8>), EngineError> {
    let rest = uri
        .strip_prefix("data://random_data")
        .ok_or_else(|| EngineError::InvalidParams(format!("unsupported data:// resource: {uri}")))?;

    let length = parse_length(rest)?;

    if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
        return Err(EngineError::InvalidParams(format!(
            "length must be between {MIN_LENGTH} and {MAX_LENGTH}, got {length}"
        )));
    }

    let data: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect();

    Ok(("text/plain".to_string(), data.into_bytes()))
}

fn parse_length(query: &str) -> Result<usize, EngineError> {
    let query = query.strip_prefix('?').unwrap_or(query);
    for pair in query.split('&') {
        if let Some(value) = pair.strip_prefix("length=") {
            return value
                .parse::<usize>()
                .map_err(|_| EngineError::InvalidParams(format!("invalid length: {value}")));
        }
    }
    Err(EngineError::InvalidParams(
        "data://random_data requires a length parameter".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generates_requested_length() {
        let (mime, bytes) = resolve("data://random_data?length=16").unwrap();
        assert_eq!(mime, "text/plain");
        assert_eq!(bytes.len(), 16);
    }

    #[test]
    fn test_rejects_zero_length() {
        assert!(resolve("data://random_data?length=0").is_err());
    }

    #[test]
    fn test_rejects_length_over_max() {
        assert!(resolve("data://random_data?length=1025").is_err());
    }

    #[test]
    fn test_accepts_max_length() {
        let (_, bytes) = resolve("data://random_data?length=1024").unwrap();
        assert_eq!(bytes.len(), 1024);
    }

    #[test]
    fn test_missing_length_param_errors() {
        assert!(resolve("data://random_data").is_err());
    }

    #[test]
    fn test_output_is_alphanumeric() {
        let (_, bytes) = resolve("data://random_data?length=64").unwrap();
        assert!(bytes.iter().all(|b| b.is_ascii_alphanumeric()));
    }
}
