mod effort;
mod fix;
mod impact;
mod issue;
mod legal;
mod report;

pub use effort::{Effort, EffortError};
pub use fix::{FixEntry, FixGuidance, Reference, same_platform};
pub use impact::Impact;
pub use issue::{DetectedIssue, IssueLike, ScanResult};
pub use legal::{LegalRisk, LegalRiskAssessment};
pub use report::{PlanItem, PlanSummary, RemediationReport};
