//! Record store: loads newline-delimited JSON record sources.
//!
//! Loading is strict. Blank lines (and lines holding `null` or `{}`) are
//! skipped; every other line must decode into the typed record for its
//! source. The first line that fails aborts the whole load with
//! [`ChainGraphError::Parse`] and the records already read are discarded.

use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::edges::RelationshipRecord;
use crate::errors::{ChainGraphError, Result};
use crate::nodes::EntityRecord;
use crate::schema::{NodeLabel, RelationTemplate, SchemaCatalog};

/// Reads record sources from a data directory.
#[derive(Debug, Clone)]
pub struct RecordStore {
    data_dir: PathBuf,
}

impl RecordStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load every entity record of `label`.
    pub async fn load_entities(
        &self,
        catalog: &SchemaCatalog,
        label: NodeLabel,
    ) -> Result<Vec<EntityRecord>> {
        let path = self.data_dir.join(catalog.entity_source(label));
        self.load(&path, |value| EntityRecord::from_json(label, value))
            .await
    }

    /// Load every relationship record of `template`'s kind.
    pub async fn load_relationships(
        &self,
        template: &RelationTemplate,
    ) -> Result<Vec<RelationshipRecord>> {
        let path = self.data_dir.join(template.source);
        self.load(&path, |value| RelationshipRecord::from_json(template, value))
            .await
    }

    /// Load `path`, decoding each non-blank line with `decode`.
    pub async fn load<T, F>(&self, path: &Path, decode: F) -> Result<Vec<T>>
    where
        F: FnMut(serde_json::Value) -> std::result::Result<T, String>,
    {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| ChainGraphError::io(path, e))?;
        let records = parse_lines(BufReader::new(file), path, decode).await?;
        debug!(path = %path.display(), records = records.len(), "source loaded");
        Ok(records)
    }
}

/// Decode every non-blank line of `reader`.
///
/// `path` only labels errors. Line numbers are 1-based.
pub async fn parse_lines<R, T, F>(reader: R, path: &Path, mut decode: F) -> Result<Vec<T>>
where
    R: AsyncBufRead + Unpin,
    F: FnMut(serde_json::Value) -> std::result::Result<T, String>,
{
    let mut lines = reader.split(b'\n');
    let mut records = Vec::new();
    let mut line_no = 0usize;

    let parse_error = |line: usize, reason: String| ChainGraphError::Parse {
        path: path.to_path_buf(),
        line,
        reason,
    };

    while let Some(bytes) = lines
        .next_segment()
        .await
        .map_err(|e| ChainGraphError::io(path, e))?
    {
        line_no += 1;
        let line = std::str::from_utf8(&bytes).map_err(|e| parse_error(line_no, e.to_string()))?;
        let line = line.trim_start_matches('\u{feff}').trim();
        if line.is_empty() {
            continue;
        }

        let value: serde_json::Value =
            serde_json::from_str(line).map_err(|e| parse_error(line_no, e.to_string()))?;
        if is_empty_record(&value) {
            debug!(path = %path.display(), line = line_no, "skipping empty record");
            continue;
        }

        let record = decode(value).map_err(|reason| parse_error(line_no, reason))?;
        records.push(record);
    }

    Ok(records)
}

fn is_empty_record(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Object(object) => object.is_empty(),
        _ => false,
    }
}
