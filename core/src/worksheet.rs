use std::collections::HashMap;

use either::Either;
use tracing::info;

use crate::{
    document::StepDocument,
    error::WorksheetError,
    parse::{MyParser, ParserError, WorksheetDraft},
    resolver::{ResolutionMode, Resolver},
    step::{DerivationStep, ProofStep},
    store::ReferenceStore,
};

pub const HEADER_PREFIX: &str = "$( <MM> <PROOF_ASST>";
pub const FOOTER: &str = "$)";

/// A proof worksheet whose hypothesis steps have all been resolved.
///
/// Worksheets are never patched after a failed load: the text is fixed and loaded again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worksheet {
    mode: ResolutionMode,
    loc_after: Option<String>,
    document: StepDocument,
}

impl Worksheet {
    pub fn load(code: &str, store: &dyn ReferenceStore) -> Result<Self, WorksheetError> {
        let draft = MyParser.parse_worksheet(code)?;
        Self::from_draft(draft, store)
    }

    // resolution phase: strictly in document order, stops at the first failure
    pub fn from_draft(
        draft: WorksheetDraft,
        store: &dyn ReferenceStore,
    ) -> Result<Self, WorksheetError> {
        let WorksheetDraft {
            theorem,
            loc_after,
            steps,
        } = draft;
        let Some(theorem) = theorem else {
            return Err(ParserError::Other("THEOREM= is required in the header".to_string()).into());
        };
        let resolver = Resolver::new(store, ResolutionMode::for_theorem(store, &theorem)?);

        let mut document = StepDocument::new();
        for step in steps {
            let step = match step {
                Either::Left(hyp) => ProofStep::Hypothesis(resolver.resolve(hyp, &document)?),
                Either::Right(drv) => ProofStep::Derivation(DerivationStep::from(drv)),
            };
            document.push(step);
        }

        info!(
            theorem = theorem.as_str(),
            new_theorem = resolver.mode().is_new_theorem(),
            steps = document.len(),
            hyps = document.hypothesis_count(),
            "worksheet loaded"
        );
        Ok(Worksheet {
            mode: resolver.mode().clone(),
            loc_after,
            document,
        })
    }

    pub fn theorem(&self) -> &str {
        self.mode.theorem()
    }
    pub fn mode(&self) -> &ResolutionMode {
        &self.mode
    }
    pub fn is_new_theorem(&self) -> bool {
        self.mode.is_new_theorem()
    }
    pub fn loc_after(&self) -> Option<&str> {
        self.loc_after.as_deref()
    }
    pub fn document(&self) -> &StepDocument {
        &self.document
    }

    pub fn renumber(&mut self, renumber_map: &HashMap<String, String>) {
        self.document.renumber(renumber_map);
    }

    pub fn reformat(&mut self) {
        self.document.reformat();
    }

    pub fn header_line(&self) -> String {
        let mut s = format!("{HEADER_PREFIX} THEOREM={}", self.theorem());
        if let Some(loc) = &self.loc_after {
            s.push_str(&format!(" LOC_AFTER={loc}"));
        }
        s
    }

    // text that loads back into the same worksheet
    pub fn to_text(&self) -> String {
        let mut s = self.header_line();
        s.push_str("\n\n");
        for step in &self.document {
            s.push_str(step.stmt_text());
            s.push('\n');
        }
        s.push('\n');
        s.push_str(FOOTER);
        s.push('\n');
        s
    }
}
