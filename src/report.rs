use crate::types::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineTally { pub successes: u64, pub failures: u64 }

impl EngineTally {
    fn record(&mut self, outcome: &Outcome) {
        if outcome.is_success() { self.successes += 1 } else { self.failures += 1 }
    }
}

/// Counters for one audit run. Ordered maps keep output stable between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    /// `RenderEngine::name` of engine A and B; empty when unknown.
    pub engine_names: [String; 2],
    pub records: u64,
    pub unextractable_records: u64,
    pub templates: u64,
    pub engine_a: EngineTally,
    pub engine_b: EngineTally,
    pub categories: BTreeMap<FailureCategory, u64>,
    /// website -> record id -> engine A failures
    pub failures_by_site: BTreeMap<String, BTreeMap<String, u64>>,
}

impl Default for AuditReport {
    fn default() -> Self {
        Self {
            engine_names: Default::default(),
            records: 0,
            unextractable_records: 0,
            templates: 0,
            engine_a: EngineTally::default(),
            engine_b: EngineTally::default(),
            categories: FailureCategory::ALL.iter().map(|c| (*c, 0)).collect(),
            failures_by_site: BTreeMap::new(),
        }
    }
}

impl AuditReport {
    pub fn for_engines(engine_a: &str, engine_b: &str) -> Self {
        Self { engine_names: [engine_a.to_string(), engine_b.to_string()], ..Default::default() }
    }

    pub fn record_engine_a(&mut self, rec: &Record, outcome: &Outcome) {
        self.engine_a.record(outcome);
        if let Outcome::Failure { category, .. } = outcome {
            *self.categories.entry(category.unwrap_or(FailureCategory::Other)).or_insert(0) += 1;
            *self
                .failures_by_site
                .entry(rec.website().to_string())
                .or_default()
                .entry(rec.record_id().to_string())
                .or_insert(0) += 1;
        }
    }

    pub fn record_engine_b(&mut self, outcome: &Outcome) { self.engine_b.record(outcome); }

    pub fn merge(&mut self, other: AuditReport) {
        for (mine, theirs) in self.engine_names.iter_mut().zip(other.engine_names) {
            if mine.is_empty() { *mine = theirs; }
        }
        self.records += other.records;
        self.unextractable_records += other.unextractable_records;
        self.templates += other.templates;
        self.engine_a.successes += other.engine_a.successes;
        self.engine_a.failures += other.engine_a.failures;
        self.engine_b.successes += other.engine_b.successes;
        self.engine_b.failures += other.engine_b.failures;
        for (cat, n) in other.categories {
            *self.categories.entry(cat).or_insert(0) += n;
        }
        for (site, recs) in other.failures_by_site {
            let mine = self.failures_by_site.entry(site).or_default();
            for (id, n) in recs {
                *mine.entry(id).or_insert(0) += n;
            }
        }
    }

    pub fn category(&self, cat: FailureCategory) -> u64 {
        self.categories.get(&cat).copied().unwrap_or(0)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "records:               {}", self.records);
        let _ = writeln!(out, "unextractable records: {}", self.unextractable_records);
        let _ = writeln!(out, "templates:             {}", self.templates);
        for (label, name, tally) in [("engine A", &self.engine_names[0], &self.engine_a), ("engine B", &self.engine_names[1], &self.engine_b)] {
            let head = if name.is_empty() { format!("{label}:") } else { format!("{label} ({name}):") };
            let _ = writeln!(out, "{head:<22} {} ok, {} failed", tally.successes, tally.failures);
        }
        let _ = writeln!(out, "engine A failures by category:");
        for (cat, n) in &self.categories {
            let _ = writeln!(out, "  {:<22} {}", cat.label(), n);
        }
        if !self.failures_by_site.is_empty() {
            let _ = writeln!(out, "engine A failures by website:");
            for (site, recs) in &self.failures_by_site {
                let total: u64 = recs.values().sum();
                let _ = writeln!(out, "  {site}: {total}");
                for (id, n) in recs {
                    let _ = writeln!(out, "    {id}: {n}");
                }
            }
        }
        out
    }
}
