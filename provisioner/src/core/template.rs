//! Template render requests
//!
//! Rendering is done by an external engine. Recipes only decide which
//! template goes where and with which variables.

use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;

use super::command::APP_USER;

/// A request to render `source` into `destination`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateRequest {
    pub source: String,
    pub destination: PathBuf,
    pub owner: String,
    pub group: String,
    /// Octal file mode, e.g. `0o644`; `None` keeps the engine default
    pub mode: Option<u32>,
    pub variables: Map<String, Value>,
}

impl TemplateRequest {
    /// Template owned by the application user
    pub fn app(source: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self::owned_by(source, destination, APP_USER)
    }

    /// Template owned by root
    pub fn root(source: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self::owned_by(source, destination, "root")
    }

    fn owned_by(source: impl Into<String>, destination: impl Into<PathBuf>, owner: &str) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            owner: owner.to_string(),
            group: owner.to_string(),
            mode: None,
            variables: Map::new(),
        }
    }

    pub fn mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn var(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.variables.insert(name.to_string(), value.into());
        self
    }
}

/// Ordered collection of render requests produced by a recipe run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderPlan {
    pub templates: Vec<TemplateRequest>,
}

impl RenderPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, request: TemplateRequest) {
        self.templates.push(request);
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn find(&self, source: &str) -> Option<&TemplateRequest> {
        self.templates.iter().find(|t| t.source == source)
    }
}
