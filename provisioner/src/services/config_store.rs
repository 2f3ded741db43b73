//! JSON-backed configuration store
//!
//! Node attributes arrive as JSON documents. Several documents can be layered;
//! the first layer holding a non-null value for a key wins.

use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::{ProvisionError, ProvisionResult};
use crate::traits::ConfigSource;
use shared::step_debug;

/// A single JSON attribute document
#[derive(Debug, Clone, Default)]
pub struct JsonConfigStore {
    document: Value,
}

impl JsonConfigStore {
    pub fn from_value(document: Value) -> Self {
        Self { document }
    }

    pub fn from_file(path: &Path) -> ProvisionResult<Self> {
        let content = fs::read_to_string(path).map_err(|_| ProvisionError::file_system("read config", path))?;
        let document: Value = serde_json::from_str(&content)?;
        if !document.is_object() {
            return Err(ProvisionError::config(format!("{} is not a JSON object", path.display())));
        }
        step_debug!("📄 Loaded configuration layer {}", path.display());
        Ok(Self { document })
    }
}

impl ConfigSource for JsonConfigStore {
    fn get(&self, key: &str) -> Option<Value> {
        if let Some(value) = self.document.get(key) {
            return Some(value.clone());
        }
        key.split('.')
            .try_fold(&self.document, |node, segment| node.get(segment))
            .cloned()
    }
}

/// Ordered stack of configuration layers, highest priority first
#[derive(Debug, Clone, Default)]
pub struct LayeredConfig {
    layers: Vec<JsonConfigStore>,
}

impl LayeredConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer below the existing ones
    pub fn with_layer(mut self, layer: JsonConfigStore) -> Self {
        self.layers.push(layer);
        self
    }

    /// Load each file in priority order
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> ProvisionResult<Self> {
        paths
            .iter()
            .try_fold(Self::new(), |config, path| Ok(config.with_layer(JsonConfigStore::from_file(path.as_ref())?)))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl ConfigSource for LayeredConfig {
    fn get(&self, key: &str) -> Option<Value> {
        self.layers
            .iter()
            .filter_map(|layer| layer.get(key))
            .find(|value| !value.is_null())
    }
}
