use super::{RenderContext, RenderEngine, RenderError};
use minijinja::Environment;

/// Engine B: Jinja via minijinja, lenient about undefined values.
pub struct JinjaEngine { env: Environment<'static> }

impl JinjaEngine {
    pub fn new() -> Self { Self { env: Environment::new() } }
}

impl Default for JinjaEngine {
    fn default() -> Self { Self::new() }
}

impl RenderEngine for JinjaEngine {
    fn name(&self) -> &str { "jinja" }

    fn render(&self, template: &str, ctx: &RenderContext) -> Result<String, RenderError> {
        self.env.render_str(template, ctx.values()).map_err(|e| RenderError::new(e.to_string()))
    }
}
