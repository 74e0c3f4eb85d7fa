//! Dictionary payloads with JSON serialization.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::Value;

use super::{ObjectAdapter, ObjectError};

/// An arbitrary JSON-representable dictionary, e.g. run parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct DictObject {
    /// Dictionary name, used as the export name when settings give none.
    pub name: String,
    /// The payload.
    pub data: Value,
}

impl DictObject {
    /// Build a dictionary object.
    pub fn new(name: impl Into<String>, data: Value) -> Self {
        DictObject {
            name: name.into(),
            data,
        }
    }
}

impl ObjectAdapter for DictObject {
    fn classname(&self) -> &str {
        "dictionary"
    }

    fn efolder(&self) -> &str {
        "dictionaries"
    }

    fn extension(&self) -> &str {
        ".json"
    }

    fn format(&self) -> &str {
        "json"
    }

    fn name_hint(&self) -> Option<&str> {
        (!self.name.is_empty()).then_some(self.name.as_str())
    }

    fn write_to(&self, path: &Path) -> Result<(), ObjectError> {
        let file = File::create(path)?;
        let mut out = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut out, &self.data)?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }
}
