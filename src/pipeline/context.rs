use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{LogshipError, LogshipResult};

/// Pipeline context that holds data passed between stages
///
/// The context acts as a shared state container that stages can read from and
/// write to. The runner seeds it with the artifact paths and settings for one
/// run; stages read their inputs from it and record what they produced.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    /// Session ID for this pipeline execution
    session_id: String,

    /// Key-value store for pipeline data
    data: HashMap<String, Value>,

    /// Metadata about the pipeline execution
    metadata: HashMap<String, String>,
}

impl PipelineContext {
    /// Create a new pipeline context
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            data: HashMap::new(),
            metadata: HashMap::new(),
        }
    }

    /// Get the session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Set a value in the context
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.data.insert(key.into(), value);
    }

    /// Get a value from the context
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Get a value from the context or return an error if not found
    pub fn get_required(&self, key: &str) -> LogshipResult<&Value> {
        self.data.get(key).ok_or_else(|| {
            LogshipError::PipelineError(format!("Required context key not found: {}", key))
        })
    }

    /// Set a string value
    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.insert(key.into(), Value::String(value.into()));
    }

    /// Get a string value
    pub fn get_string(&self, key: &str) -> LogshipResult<String> {
        match self.get_required(key)? {
            Value::String(s) => Ok(s.clone()),
            _ => Err(LogshipError::PipelineError(format!(
                "Context key '{}' is not a string",
                key
            ))),
        }
    }

    /// Set a path value
    pub fn set_path(&mut self, key: impl Into<String>, path: PathBuf) {
        self.data.insert(
            key.into(),
            Value::String(path.to_string_lossy().to_string()),
        );
    }

    /// Get a path value
    pub fn get_path(&self, key: &str) -> LogshipResult<PathBuf> {
        let path_str = self.get_string(key)?;
        Ok(PathBuf::from(path_str))
    }

    /// Set a number value
    pub fn set_number(&mut self, key: impl Into<String>, value: f64) {
        if let Some(number) = serde_json::Number::from_f64(value) {
            self.data.insert(key.into(), Value::Number(number));
        }
    }

    /// Get a number value
    pub fn get_number(&self, key: &str) -> LogshipResult<f64> {
        match self.get_required(key)? {
            Value::Number(n) => n.as_f64().ok_or_else(|| {
                LogshipError::PipelineError(format!("Context key '{}' is not a valid number", key))
            }),
            _ => Err(LogshipError::PipelineError(format!(
                "Context key '{}' is not a number",
                key
            ))),
        }
    }

    /// Check if a key exists in the context
    pub fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Set metadata
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Get metadata
    pub fn get_metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(|s| s.as_str())
    }

    /// Get all data keys
    pub fn keys(&self) -> Vec<&String> {
        self.data.keys().collect()
    }
}
