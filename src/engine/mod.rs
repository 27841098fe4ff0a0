//! Template engines under audit.
//!
//! The audit only relies on whether a render succeeds and on the text of the
//! error when it does not; rendering semantics are the engines' business.

use serde_json::{Map, Value};
use thiserror::Error;

pub mod jinja;
pub mod liquid_engine;

pub use jinja::JinjaEngine;
pub use liquid_engine::LiquidEngine;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RenderError { pub message: String }

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self { Self { message: message.into() } }
}

pub trait RenderEngine: Send + Sync {
    fn name(&self) -> &str;
    fn render(&self, template: &str, ctx: &RenderContext) -> Result<String, RenderError>;
}

/// Stand-in page data handed to every render attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext { values: Map<String, Value> }

/// Spelling of the current URL some templates use; neither engine accepts it.
pub const CURRENT_URL_TOKEN: &str = "$currentUrl";

impl RenderContext {
    pub fn fake() -> Self {
        let url = "https://www.example.com/collections/summer-sale?page=2";
        let mut values = Map::new();
        for (key, value) in [
            ("currentUrl", url),
            ("_currentUrl", url),
            ("description", "Light linen shirts and dresses for warm days."),
            ("title", "Summer Sale | Example Store"),
            ("header", "Summer Sale"),
            ("canonicalUrl", "https://www.example.com/collections/summer-sale"),
        ] {
            values.insert(key.to_string(), Value::from(value));
        }
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&Value> { self.values.get(key) }

    pub fn values(&self) -> &Map<String, Value> { &self.values }
}

impl Default for RenderContext {
    fn default() -> Self { Self::fake() }
}
