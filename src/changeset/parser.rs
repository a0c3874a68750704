//! Change-set parser for loading serialized change records.
//!
//! A change-set document is YAML or JSON with a top-level `changes` list.
//! Each entry names a `resource_type`, an `option` (`create`, `delete` or
//! `update`) and the `old_value` / `value` its option needs.

use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::apisix::{Route, Service};
use crate::change::{Change, Operation, OperationKind};
use crate::error::{ChangeSetError, Result};
use crate::resource::{Resource, ResourceKind, is_addressable_name};

use super::set::{ChangeSet, SkippedChange};

/// Serialized change-set document.
#[derive(Debug, Deserialize)]
struct RawChangeSet {
    #[serde(default)]
    changes: Vec<RawChange>,
}

/// Serialized change record, before its values are typed.
#[derive(Debug, Deserialize)]
struct RawChange {
    resource_type: String,
    option: OperationKind,
    #[serde(default)]
    old_value: Option<serde_json::Value>,
    #[serde(default)]
    value: Option<serde_json::Value>,
}

/// Parser for change-set documents.
#[derive(Debug, Default)]
pub struct ChangeSetParser;

impl ChangeSetParser {
    /// Creates a new change-set parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Loads a change set from a file.
    ///
    /// Files ending in `.json` are parsed as JSON, everything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<ChangeSet> {
        let path = path.as_ref();
        info!("Loading change set from: {}", path.display());

        if !path.exists() {
            return Err(ChangeSetError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ChangeSetError::Parse {
            message: format!("Failed to read file: {e}"),
            location: Some(path.display().to_string()),
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            self.parse_json(&content, Some(path))
        } else {
            self.parse_yaml(&content, Some(path))
        }
    }

    /// Parses a change set from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or an entry cannot be decoded.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<ChangeSet> {
        debug!("Parsing YAML change set");

        let raw: RawChangeSet = serde_yaml::from_str(content).map_err(|e| ChangeSetError::Parse {
            message: format!("YAML parse error: {e}"),
            location: source.map(|p| p.display().to_string()),
        })?;

        Self::decode(raw)
    }

    /// Parses a change set from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or an entry cannot be decoded.
    pub fn parse_json(&self, content: &str, source: Option<&Path>) -> Result<ChangeSet> {
        debug!("Parsing JSON change set");

        let raw: RawChangeSet = serde_json::from_str(content).map_err(|e| ChangeSetError::Parse {
            message: format!("JSON parse error: {e}"),
            location: source.map(|p| p.display().to_string()),
        })?;

        Self::decode(raw)
    }

    fn decode(raw: RawChangeSet) -> Result<ChangeSet> {
        let mut set = ChangeSet::default();

        for (index, entry) in raw.changes.into_iter().enumerate() {
            let Ok(kind) = entry.resource_type.parse::<ResourceKind>() else {
                warn!(
                    "Skipping change #{index}: unsupported resource type \"{}\"",
                    entry.resource_type
                );
                set.skipped.push(SkippedChange {
                    index,
                    resource_type: entry.resource_type,
                });
                continue;
            };

            let change = match kind {
                ResourceKind::Service => Change::from(decode_operation::<Service>(index, entry)?),
                ResourceKind::Route => Change::from(decode_operation::<Route>(index, entry)?),
            };
            set.changes.push(change);
        }

        debug!("Decoded change set: {set}");
        Ok(set)
    }
}

/// Types the values of one entry as `T`.
fn decode_operation<T: Resource>(
    index: usize,
    entry: RawChange,
) -> std::result::Result<Operation<T>, ChangeSetError> {
    let take = |value: Option<serde_json::Value>,
                field: &'static str|
     -> std::result::Result<T, ChangeSetError> {
        let value = value.ok_or(ChangeSetError::MissingValue { index, field })?;
        let resource = serde_json::from_value::<T>(value).map_err(|e| {
            ChangeSetError::InvalidValue {
                index,
                message: e.to_string(),
            }
        })?;

        if resource.name().is_empty() {
            return Err(ChangeSetError::InvalidValue {
                index,
                message: format!("{} name must not be empty", T::KIND),
            });
        }

        if !is_addressable_name(resource.name()) {
            return Err(ChangeSetError::InvalidValue {
                index,
                message: format!("{} name \"{}\" cannot address a resource", T::KIND, resource.name()),
            });
        }

        Ok(resource)
    };

    Ok(match entry.option {
        OperationKind::Create => Operation::Create {
            new: take(entry.value, "value")?,
        },
        OperationKind::Delete => Operation::Delete {
            old: take(entry.old_value, "old_value")?,
        },
        OperationKind::Update => Operation::Update {
            old: take(entry.old_value, "old_value")?,
            new: take(entry.value, "value")?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdcError;
    use std::io::Write as _;

    #[test]
    fn test_parse_yaml_change_set() {
        let yaml = r#"
changes:
  - resource_type: service
    option: create
    value:
      name: svc-a
      upstream:
        nodes:
          - host: httpbin.org
            port: 80
  - resource_type: route
    option: update
    old_value:
      name: r1
      uris: ["/get"]
      upstream_id: "1"
    value:
      name: r1
      uris: ["/get"]
      upstream_id: "2"
  - resource_type: route
    option: delete
    old_value:
      name: r-old
"#;
        let set = ChangeSetParser::new()
            .parse_yaml(yaml, None)
            .expect("change set should parse");

        assert_eq!(set.len(), 3);
        assert!(set.skipped.is_empty());
        assert_eq!(set.changes[0].to_string(), "create service \"svc-a\"");
        assert_eq!(set.changes[1].to_string(), "update route \"r1\"");
        assert_eq!(set.changes[2].to_string(), "delete route \"r-old\"");
        assert_eq!(set.of_kind(ResourceKind::Route).count(), 2);
        assert_eq!(set.to_string(), "1 to create, 1 to update, 1 to delete");
    }

    #[test]
    fn test_unknown_resource_type_is_skipped() {
        let json = r#"{
            "changes": [
                { "resource_type": "upstream", "option": "create", "value": { "name": "u1" } },
                { "resource_type": "service", "option": "delete", "old_value": { "name": "svc-a" } }
            ]
        }"#;
        let set = ChangeSetParser::new()
            .parse_json(json, None)
            .expect("change set should parse");

        assert_eq!(set.len(), 1);
        assert_eq!(
            set.skipped,
            vec![SkippedChange {
                index: 0,
                resource_type: String::from("upstream"),
            }]
        );
    }

    #[test]
    fn test_missing_value_is_rejected() {
        let yaml = r"
changes:
  - resource_type: route
    option: update
    value:
      name: r1
";
        let result = ChangeSetParser::new().parse_yaml(yaml, None);

        assert!(matches!(
            result,
            Err(AdcError::ChangeSet(ChangeSetError::MissingValue {
                index: 0,
                field: "old_value"
            }))
        ));
    }

    #[test]
    fn test_value_must_match_resource_type() {
        let yaml = r"
changes:
  - resource_type: route
    option: create
    value:
      name: r1
      priority: high
";
        let result = ChangeSetParser::new().parse_yaml(yaml, None);

        assert!(matches!(
            result,
            Err(AdcError::ChangeSet(ChangeSetError::InvalidValue { index: 0, .. }))
        ));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let json = r#"{"changes": [{"resource_type": "service", "option": "delete", "old_value": {"name": ""}}]}"#;
        let result = ChangeSetParser::new().parse_json(json, None);

        assert!(matches!(
            result,
            Err(AdcError::ChangeSet(ChangeSetError::InvalidValue { index: 0, ref message }))
                if message == "service name must not be empty"
        ));
    }

    #[test]
    fn test_dot_segment_name_is_rejected() {
        let yaml = r#"
changes:
  - resource_type: route
    option: delete
    old_value:
      name: ".."
"#;
        let result = ChangeSetParser::new().parse_yaml(yaml, None);

        assert!(matches!(
            result,
            Err(AdcError::ChangeSet(ChangeSetError::InvalidValue { index: 0, ref message }))
                if message == "route name \"..\" cannot address a resource"
        ));
    }

    #[test]
    fn test_load_json_file_by_extension() {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .expect("Failed to create temp file");
        write!(
            file,
            r#"{{"changes": [{{"resource_type": "service", "option": "create", "value": {{"name": "svc-a"}}}}]}}"#
        )
        .expect("Failed to write change set");

        let set = ChangeSetParser::new()
            .load_file(file.path())
            .expect("change set should load");

        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let result = ChangeSetParser::new().load_file("/nonexistent/changes.yaml");

        assert!(matches!(
            result,
            Err(AdcError::ChangeSet(ChangeSetError::FileNotFound { .. }))
        ));
    }
}
