use super::{RenderContext, RenderEngine, RenderError};
use liquid::{Parser, ParserBuilder};

/// Engine A: Liquid with the standard tags and filters.
pub struct LiquidEngine { parser: Parser }

impl LiquidEngine {
    pub fn new() -> Result<Self, RenderError> {
        let parser = ParserBuilder::with_stdlib()
            .build()
            .map_err(|e| RenderError::new(e.to_string()))?;
        Ok(Self { parser })
    }
}

impl RenderEngine for LiquidEngine {
    fn name(&self) -> &str { "liquid" }

    fn render(&self, template: &str, ctx: &RenderContext) -> Result<String, RenderError> {
        let globals = liquid::to_object(ctx.values()).map_err(|e| RenderError::new(e.to_string()))?;
        let tpl = self.parser.parse(template).map_err(|e| RenderError::new(e.to_string()))?;
        tpl.render(&globals).map_err(|e| RenderError::new(e.to_string()))
    }
}
