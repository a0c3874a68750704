//! Human-readable rendering of changes.
//!
//! Creates and deletes render as a single line. Updates serialize both sides
//! as tab-indented JSON and append a unified diff of the two documents.

use serde::Serialize;
use similar::{Algorithm, TextDiff};

use crate::error::Result;
use crate::resource::Resource;

use super::record::{Change, Operation};

/// Label of the remote (old) side of a diff.
const REMOTE_LABEL: &str = "remote";

/// Label of the local (new) side of a diff.
const LOCAL_LABEL: &str = "local";

/// Unchanged lines kept around each hunk.
const CONTEXT_LINES: usize = 3;

impl<T: Resource> Operation<T> {
    /// Renders this operation for display.
    ///
    /// # Errors
    ///
    /// Returns an error if an update's values cannot be serialized.
    pub fn describe(&self) -> Result<String> {
        let kind = T::KIND;
        let output = match self {
            Self::Create { new } => format!("creating {kind}: \"{}\"", new.name()),
            Self::Delete { old } => format!("deleting {kind}: \"{}\"", old.name()),
            Self::Update { old, new } => {
                let remote = to_indented_json(old)?;
                let local = to_indented_json(new)?;
                format!(
                    "updating {kind}: \"{}\"\n{}",
                    new.name(),
                    unified_diff(&remote, &local)
                )
            }
        };

        Ok(output)
    }
}

impl Change {
    /// Renders this change for display.
    ///
    /// # Errors
    ///
    /// Returns an error if an update's values cannot be serialized.
    pub fn describe(&self) -> Result<String> {
        match self {
            Self::Service(op) => op.describe(),
            Self::Route(op) => op.describe(),
        }
    }
}

/// Serializes `value` as tab-indented JSON with a trailing newline.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn to_indented_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    buf.push(b'\n');

    String::from_utf8(buf)
        .map_err(|e| <serde_json::Error as serde::ser::Error>::custom(e).into())
}

/// Renders a unified diff from `old` (remote) to `new` (local).
///
/// Lines are compared with Myers' algorithm. Returns an empty string when the
/// inputs are equal; otherwise the `--- remote` / `+++ local` header followed
/// by one `@@` hunk per group of changes.
#[must_use]
pub fn unified_diff(old: &str, new: &str) -> String {
    TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_lines(old, new)
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .header(REMOTE_LABEL, LOCAL_LABEL)
        .to_string()
}
