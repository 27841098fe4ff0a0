pub mod audit;
pub mod classify;
pub mod engine;
pub mod extraction;
pub mod records;
pub mod report;
pub mod source;
pub mod types;
pub mod validation;

pub use audit::{AuditRun, Auditor};
pub use report::AuditReport;
