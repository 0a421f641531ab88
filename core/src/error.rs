use std::fmt::Display;

use thiserror::Error;

use crate::parse::ParserError;

// "which statement went wrong", prefixed to every load message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSite {
    pub theorem: String,
    pub step: String,
}

impl Display for ErrorSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Theorem {} Step {}", self.theorem, self.step)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadErrorKind {
    #[error("{site}: a formula is required for a hypothesis step")]
    MissingFormula { site: ErrorSite },
    #[error("{site}: Ref label {label} not found in the database")]
    ReferenceNotFound { site: ErrorSite, label: String },
    #[error("{site}: Ref label {label} is not a logical hypothesis")]
    ReferenceNotLogHyp { site: ErrorSite, label: String },
    #[error("{site}: Ref label {label} is not one of the theorem's logical hypotheses")]
    LogHypMismatch { site: ErrorSite, label: String },
    #[error("{site}: formula does not match the formula of logical hypothesis {label}")]
    HypothesisFormulaMismatch { site: ErrorSite, label: String },
    #[error("{site}: formula does not match any logical hypothesis of the theorem")]
    HypothesisFormulaNotFound { site: ErrorSite },
    #[error(
        "{site}: every logical hypothesis with this formula is already used by an earlier hypothesis step"
    )]
    DuplicateHypothesisFormula { site: ErrorSite },
    #[error("{site}: Ref label {label} is already used by another proof step")]
    DuplicateRefLabel { site: ErrorSite, label: String },
    #[error("{site}: Ref label {label} already exists in the database")]
    LabelAlreadyExists { site: ErrorSite, label: String },
    #[error("{site}: Ref label {label} contains characters not allowed in a label")]
    InvalidLabelCharacters { site: ErrorSite, label: String },
    #[error("{site}: Ref label {label} is on the list of prohibited labels")]
    ProhibitedLabel { site: ErrorSite, label: String },
}

impl LoadErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            LoadErrorKind::MissingFormula { .. } => "MissingFormula",
            LoadErrorKind::ReferenceNotFound { .. } => "ReferenceNotFound",
            LoadErrorKind::ReferenceNotLogHyp { .. } => "ReferenceNotLogHyp",
            LoadErrorKind::LogHypMismatch { .. } => "LogHypMismatch",
            LoadErrorKind::HypothesisFormulaMismatch { .. } => "HypothesisFormulaMismatch",
            LoadErrorKind::HypothesisFormulaNotFound { .. } => "HypothesisFormulaNotFound",
            LoadErrorKind::DuplicateHypothesisFormula { .. } => "DuplicateHypothesisFormula",
            LoadErrorKind::DuplicateRefLabel { .. } => "DuplicateRefLabel",
            LoadErrorKind::LabelAlreadyExists { .. } => "LabelAlreadyExists",
            LoadErrorKind::InvalidLabelCharacters { .. } => "InvalidLabelCharacters",
            LoadErrorKind::ProhibitedLabel { .. } => "ProhibitedLabel",
        }
    }
}

/// A rejected statement, with the caret offset relative to the statement start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (caret {caret})")]
pub struct LoadError {
    pub kind: LoadErrorKind,
    pub caret: usize,
}

/// THEOREM= names a statement of the database that is not a theorem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Theorem {label}: label already used by a statement that is not a theorem")]
pub struct NotATheorem {
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorksheetError {
    #[error("{0}")]
    Parse(#[from] ParserError),
    #[error("{0}")]
    NotATheorem(#[from] NotATheorem),
    #[error("{0}")]
    Load(#[from] LoadError),
}

impl WorksheetError {
    pub fn code(&self) -> &'static str {
        match self {
            WorksheetError::Parse(_) => "Parse",
            WorksheetError::NotATheorem(_) => "NotATheorem",
            WorksheetError::Load(err) => err.kind.code(),
        }
    }
    pub fn caret(&self) -> Option<usize> {
        match self {
            WorksheetError::Parse(_) | WorksheetError::NotATheorem(_) => None,
            WorksheetError::Load(err) => Some(err.caret),
        }
    }
}
