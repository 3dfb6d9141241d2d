use thiserror::Error;

use crate::core::ReportKind;

pub type Result<T> = std::result::Result<T, MatchError>;

/// Failures that abort a comparison. A report that simply differs from what
/// was expected is not an error; see [`crate::matcher::MatchOutcome`].
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("report matcher expects a {expected}, got a {actual}")]
    TypeMismatch {
        expected: ReportKind,
        actual: ReportKind,
    },

    #[error("no kind {kind:?} is registered in the scheme")]
    UnresolvedOwnerKind { kind: String },

    #[error("unknown report kind: {kind:?}")]
    UnknownReportKind { kind: String },

    #[error("scanner table is already installed")]
    ScannerTableInstalled,

    #[error("owner reference policy is already installed")]
    PolicyInstalled,

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl MatchError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::TypeMismatch { .. } => "TYPE_MISMATCH",
            Self::UnresolvedOwnerKind { .. } => "UNRESOLVED_OWNER_KIND",
            Self::UnknownReportKind { .. } => "UNKNOWN_REPORT_KIND",
            Self::ScannerTableInstalled => "SCANNER_TABLE_INSTALLED",
            Self::PolicyInstalled => "POLICY_INSTALLED",
            Self::Json(_) => "JSON_ERROR",
        }
    }
}
