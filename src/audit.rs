use crate::engine::{JinjaEngine, LiquidEngine, RenderContext, RenderEngine};
use crate::extraction::extract_templates;
use crate::records::{parse_records, StripMode};
use crate::report::AuditReport;
use crate::source::SourceText;
use crate::types::*;
use crate::validation::validate_template;
use anyhow::{Context, Result};
use tracing::{debug, info};

pub struct Auditor {
    engine_a: Box<dyn RenderEngine>,
    engine_b: Box<dyn RenderEngine>,
    ctx: RenderContext,
    layout: Layout,
    strip: StripMode,
}

/// Report plus the parser's diagnostics for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRun {
    pub report: AuditReport,
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl Auditor {
    pub fn new(engine_a: Box<dyn RenderEngine>, engine_b: Box<dyn RenderEngine>) -> Self {
        Self { engine_a, engine_b, ctx: RenderContext::fake(), layout: Layout::default(), strip: StripMode::default() }
    }

    /// Liquid as engine A, Jinja as engine B.
    pub fn standard() -> Result<Self> {
        let liquid = LiquidEngine::new().context("building liquid parser")?;
        Ok(Self::new(Box::new(liquid), Box::new(JinjaEngine::new())))
    }

    pub fn with_layout(mut self, layout: Layout) -> Self { self.layout = layout; self }

    pub fn with_strip_mode(mut self, strip: StripMode) -> Self { self.strip = strip; self }

    fn empty_report(&self) -> AuditReport {
        AuditReport::for_engines(self.engine_a.name(), self.engine_b.name())
    }

    /// Counters for one record; never fails.
    pub fn audit_record(&self, rec: &Record) -> AuditReport {
        let mut report = AuditReport { records: 1, ..self.empty_report() };
        let templates = match extract_templates(&rec.details) {
            Ok(t) => t,
            Err(e) => {
                debug!(line = rec.line, site = rec.website(), record = rec.record_id(), error = %e, "no templates");
                report.unextractable_records = 1;
                return report;
            }
        };
        for template in &templates {
            report.templates += 1;
            let verdict = validate_template(self.engine_a.as_ref(), self.engine_b.as_ref(), template, &self.ctx);
            if let Outcome::Failure { category, message } = &verdict.engine_a {
                debug!(site = rec.website(), record = rec.record_id(), engine = self.engine_a.name(), ?category, %message, "render failed");
            }
            if let Outcome::Failure { message, .. } = &verdict.engine_b {
                debug!(site = rec.website(), record = rec.record_id(), engine = self.engine_b.name(), %message, "render failed");
            }
            report.record_engine_a(rec, &verdict.engine_a);
            report.record_engine_b(&verdict.engine_b);
        }
        report
    }

    /// Parse, extract, validate, aggregate. Pure over `text`.
    pub fn audit_text(&self, text: &str) -> AuditRun {
        let parsed = parse_records(text, self.layout, self.strip);
        let mut report = self.empty_report();
        for rec in &parsed.records {
            report.merge(self.audit_record(rec));
        }
        AuditRun { report, diagnostics: parsed.diagnostics }
    }

    /// Only acquisition can fail the run.
    pub async fn run(&self, source: &dyn SourceText) -> Result<AuditRun> {
        info!(source = %source.describe(), "fetching export");
        let text = source.fetch().await.with_context(|| format!("acquiring {}", source.describe()))?;
        let run = self.audit_text(&text);
        info!(
            records = run.report.records,
            templates = run.report.templates,
            engine_a_failures = run.report.engine_a.failures,
            engine_b_failures = run.report.engine_b.failures,
            "audit finished"
        );
        Ok(run)
    }
}
