//! Hook invocation boundary.
//! The scaffolding tool runs `hooks/post_gen_project` after rendering and writes a
//! JSON document describing the run to the hook's stdin.

use std::io::Read;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Payload written by the scaffolding tool to the hook's stdin.
#[derive(Debug, Default, Deserialize)]
pub struct HookPayload {
    /// Directory of the template that was rendered
    #[serde(default)]
    pub template_dir: Option<String>,
    /// Directory the project was generated into
    #[serde(default)]
    pub output_dir: Option<String>,
    /// Resolved configuration answers
    #[serde(default = "empty_context")]
    pub context: serde_json::Value,
}

fn empty_context() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl HookPayload {
    /// Parses a payload from its JSON text.
    ///
    /// Empty input yields an empty payload, so the hook can run when invoked
    /// without anything piped in.
    pub fn from_json(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self { context: empty_context(), ..Default::default() });
        }
        let payload: Self = serde_json::from_str(content)
            .map_err(|e| Error::HookError(format!("Failed to parse payload as JSON: {}", e)))?;

        if !payload.context.is_object() && !payload.context.is_null() {
            return Err(Error::HookError("context must be a JSON object".to_string()));
        }
        Ok(payload)
    }

    /// Reads the whole payload from `reader`.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut buf = String::new();
        reader.read_to_string(&mut buf).map_err(Error::IoError)?;
        debug!("Received hook payload: {} bytes", buf.len());
        Self::from_json(&buf)
    }

    /// Configuration selection; a null context is treated as empty.
    pub fn context(&self) -> serde_json::Value {
        if self.context.is_null() {
            empty_context()
        } else {
            self.context.clone()
        }
    }

    pub fn template_dir(&self) -> Option<PathBuf> {
        self.template_dir.as_deref().filter(|d| !d.is_empty()).map(PathBuf::from)
    }

    pub fn output_dir(&self) -> Option<PathBuf> {
        self.output_dir.as_deref().filter(|d| !d.is_empty()).map(PathBuf::from)
    }
}

/// Picks the directory relative targets are resolved against.
///
/// An explicit override wins over the payload, which wins over the current
/// working directory.
pub fn get_base_dir(override_dir: Option<&Path>, payload: &HookPayload) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = payload.output_dir() {
        return Ok(dir);
    }
    std::env::current_dir().map_err(Error::IoError)
}
