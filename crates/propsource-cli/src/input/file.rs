use propsource_core::calculator::CalculatorConfig;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Read a calculator configuration from a `.json`, `.yaml` or `.yml` file.
///
/// Fields missing from the document take their defaults. The configuration
/// is validated before it is returned.
pub fn read_config(path: &str) -> Result<CalculatorConfig, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;

    let is_yaml = canonical
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let config: CalculatorConfig = if is_yaml {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    };
    config.validate()?;

    log::debug!("Loaded calculator config from {}", canonical.display());
    Ok(config)
}

/// Resolve and validate the path, preventing directory traversal.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use propsource_core::calculator::RangePolicy;
    use propsource_core::Currency;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_yaml_config() {
        let file = write_temp(
            ".yaml",
            "range_policy: reject\ncurrency: USD\ndefault_loan_to_value: 60\n",
        );
        let config = read_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.range_policy, RangePolicy::Reject);
        assert_eq!(config.currency, Currency::USD);
        assert_eq!(config.default_loan_to_value, dec!(60));
        assert_eq!(config.default_interest_rate, dec!(5.0));
    }

    #[test]
    fn test_read_json_config() {
        let file = write_temp(".json", r#"{ "default_interest_rate": 4.5 }"#);
        let config = read_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.default_interest_rate, dec!(4.5));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let file = write_temp(".json", r#"{ "default_loan_to_value": 120 }"#);
        assert!(read_config(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(read_config("/definitely/not/here.yaml").is_err());
    }
}
