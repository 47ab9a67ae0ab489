//! Library interface for the shapecheck CLI
//!
//! Loads schema templates and data documents from disk and runs them
//! through the matching engine in `shapecheck-core`.

use anyhow::{Context, Result};
use serde_json::Value;
use shapecheck_core::{any, matches, Error, Schema};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Outcome of checking one data file.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Matched,
    /// Rendered mismatch, or `None` when details were not requested.
    Mismatched(Option<String>),
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: Outcome,
}

impl FileReport {
    pub fn is_match(&self) -> bool {
        self.outcome == Outcome::Matched
    }
}

/// Read a JSON or YAML document, picking the format from the extension.
pub fn load_document(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read document: {}", path.display()))?;

    let is_yaml = path
        .extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml");

    let value = if is_yaml {
        let yaml: serde_yaml::Value = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML: {}", path.display()))?;
        yaml_to_json(yaml, "")
            .with_context(|| format!("YAML has no JSON representation: {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON: {}", path.display()))?
    };
    Ok(value)
}

/// Convert YAML to JSON, refusing values JSON cannot hold.
///
/// `serde_yaml` would otherwise turn `.inf` and `.nan` into `null`.
fn yaml_to_json(value: serde_yaml::Value, path: &str) -> Result<Value> {
    let at = || if path.is_empty() { "<root>" } else { path };

    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                let number = serde_json::Number::from_f64(f)
                    .with_context(|| format!("non-finite number {} at {}", n, at()))?;
                Value::Number(number)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| yaml_to_json(item, &format!("{}[{}]", path, i)))
                .collect::<Result<_>>()?,
        ),
        serde_yaml::Value::Mapping(fields) => {
            let mut object = serde_json::Map::with_capacity(fields.len());
            for (key, item) in fields {
                let key = match key {
                    serde_yaml::Value::String(s) => s,
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => anyhow::bail!("unsupported mapping key {:?} at {}", other, at()),
                };
                let child = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                object.insert(key, yaml_to_json(item, &child)?);
            }
            Value::Object(object)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value, path)?,
    })
}

/// Load a document and interpret it as a schema template.
pub fn load_schema(path: &Path) -> Result<Schema> {
    let template = load_document(path)?;
    debug!("Loaded schema template from {}", path.display());
    Ok(Schema::from_json(&template))
}

/// Check every file against `schema`.
///
/// With `quiet` only the boolean outcome is computed. A malformed schema
/// aborts the whole run.
pub fn check_files(schema: &Schema, files: &[PathBuf], quiet: bool) -> Result<Vec<FileReport>> {
    let is_match = matches(schema.clone());
    let mut reports = Vec::with_capacity(files.len());

    for path in files {
        let data = load_document(path)?;
        let outcome = if quiet {
            if is_match(&data)? {
                Outcome::Matched
            } else {
                Outcome::Mismatched(None)
            }
        } else {
            match schema.validate(data) {
                Ok(_) => Outcome::Matched,
                Err(Error::Validation(e)) => Outcome::Mismatched(Some(e.message)),
                Err(e @ Error::InvalidSchema(_)) => return Err(e.into()),
            }
        };

        info!("{}: {:?}", path.display(), outcome);
        reports.push(FileReport {
            path: path.clone(),
            outcome,
        });
    }

    Ok(reports)
}

/// Check that every file holds nothing but valid JSON values.
pub fn check_json_files(files: &[PathBuf]) -> Result<Vec<FileReport>> {
    check_files(&any(), files, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_document_by_extension() -> Result<()> {
        let dir = tempfile::tempdir()?;

        let json_path = dir.path().join("data.json");
        fs::write(&json_path, r#"{"a": [1, 2]}"#)?;
        assert_eq!(load_document(&json_path)?, serde_json::json!({"a": [1, 2]}));

        let yaml_path = dir.path().join("data.yaml");
        fs::write(&yaml_path, "a:\n  - 1\n  - 2\n")?;
        assert_eq!(load_document(&yaml_path)?, serde_json::json!({"a": [1, 2]}));

        Ok(())
    }

    #[test]
    fn test_yaml_non_finite_numbers_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("data.yaml");
        fs::write(&path, "a:\n  b: [1, .inf]\n")?;

        let err = load_document(&path).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("non-finite number"));
        assert!(message.contains("a.b[1]"));
        Ok(())
    }

    #[test]
    fn test_load_document_reports_path() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("broken.json");
        fs::write(&path, "{")?;

        let err = load_document(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
        Ok(())
    }
}
