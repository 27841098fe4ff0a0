use crate::classify::classify_failure;
use crate::engine::{RenderContext, RenderEngine, RenderError};
use crate::types::*;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Outcomes of one template on both engines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVerdict { pub engine_a: Outcome, pub engine_b: Outcome }

fn attempt(engine: &dyn RenderEngine, template: &str, ctx: &RenderContext) -> Result<String, RenderError> {
    match catch_unwind(AssertUnwindSafe(|| engine.render(template, ctx))) {
        Ok(res) => res,
        Err(panic) => {
            let detail = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".into());
            Err(RenderError::new(format!("{} engine panicked: {detail}", engine.name())))
        }
    }
}

/// Renders with both engines independently. Only engine A failures get a category.
pub fn validate_template(
    engine_a: &dyn RenderEngine,
    engine_b: &dyn RenderEngine,
    template: &str,
    ctx: &RenderContext,
) -> TemplateVerdict {
    let engine_a = match attempt(engine_a, template, ctx) {
        Ok(_) => Outcome::Success,
        Err(e) => Outcome::Failure { category: Some(classify_failure(&e.message)), message: e.message },
    };
    let engine_b = match attempt(engine_b, template, ctx) {
        Ok(_) => Outcome::Success,
        Err(e) => Outcome::Failure { category: None, message: e.message },
    };
    TemplateVerdict { engine_a, engine_b }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Result<&'static str, &'static str>);
    impl RenderEngine for Fixed {
        fn name(&self) -> &str { "fixed" }
        fn render(&self, _t: &str, _c: &RenderContext) -> Result<String, RenderError> {
            self.0.map(str::to_string).map_err(RenderError::new)
        }
    }

    struct Panics;
    impl RenderEngine for Panics {
        fn name(&self) -> &str { "panics" }
        fn render(&self, _t: &str, _c: &RenderContext) -> Result<String, RenderError> {
            panic!("boom")
        }
    }

    #[test]
    fn engine_a_failures_are_classified() {
        let ctx = RenderContext::fake();
        let v = validate_template(&Fixed(Err("tag \"set\" not found")), &Fixed(Ok("x")), "t", &ctx);
        assert_eq!(
            v.engine_a,
            Outcome::Failure { category: Some(FailureCategory::UnsupportedSetTag), message: "tag \"set\" not found".into() }
        );
        assert_eq!(v.engine_b, Outcome::Success);
    }

    #[test]
    fn engine_b_failures_are_not_classified() {
        let ctx = RenderContext::fake();
        let v = validate_template(&Fixed(Ok("x")), &Fixed(Err("tag \"elif\" not found")), "t", &ctx);
        assert!(v.engine_a.is_success());
        assert_eq!(v.engine_b, Outcome::Failure { category: None, message: "tag \"elif\" not found".into() });
    }

    #[test]
    fn panic_in_one_engine_does_not_stop_the_other() {
        let ctx = RenderContext::fake();
        let v = validate_template(&Panics, &Fixed(Ok("x")), "t", &ctx);
        match v.engine_a {
            Outcome::Failure { category, message } => {
                assert_eq!(category, Some(FailureCategory::Other));
                assert!(message.contains("panics engine panicked: boom"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(v.engine_b.is_success());
    }
}
