#![allow(dead_code)]

use async_trait::async_trait;
use template_audit::engine::{RenderContext, RenderEngine, RenderError};
use template_audit::source::{SourceError, SourceText};

/// Mimics the strict engine's wording for the constructs the audit tracks.
pub struct FakeStrict;

impl RenderEngine for FakeStrict {
    fn name(&self) -> &str { "fake-strict" }

    fn render(&self, template: &str, ctx: &RenderContext) -> Result<String, RenderError> {
        if template.contains("$currentUrl") {
            return Err(RenderError::new("undefined variable: $currentUrl, line:1, col:4"));
        }
        for tag in ["elif", "set"] {
            if template.contains(&format!("{{% {tag}")) {
                return Err(RenderError::new(format!("tag \"{tag}\" not found, line:1, col:1")));
            }
        }
        if template.contains("| date \"") {
            return Err(RenderError::new("expected \":\" after filter name, line:1, col:9"));
        }
        if template.contains("{{ missing }}") {
            return Err(RenderError::new("undefined variable: missing"));
        }
        Ok(template.replace("{{ title }}", ctx.get("title").and_then(|v| v.as_str()).unwrap_or_default()))
    }
}

/// Accepts everything except `$` references.
pub struct FakeLenient;

impl RenderEngine for FakeLenient {
    fn name(&self) -> &str { "fake-lenient" }

    fn render(&self, template: &str, _ctx: &RenderContext) -> Result<String, RenderError> {
        if template.contains('$') { Err(RenderError::new("unexpected character `$`")) } else { Ok(template.into()) }
    }
}

pub struct FakeSource { pub text: String }

#[async_trait]
impl SourceText for FakeSource {
    async fn fetch(&self) -> Result<String, SourceError> { Ok(self.text.clone()) }
    fn describe(&self) -> String { "fake".into() }
}

/// Wraps a JSON document the way the export quotes its details column.
pub fn quote_details(json: &str) -> String {
    format!("\"{}\"", json.replace('"', "\"\""))
}

pub fn actions(templates: &[&str]) -> String {
    let actions: Vec<_> = templates
        .iter()
        .map(|t| serde_json::json!({"transformationConfig": {"template": t}}))
        .collect();
    serde_json::json!({ "actions": actions }).to_string()
}
