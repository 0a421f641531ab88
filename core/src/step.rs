use std::collections::HashMap;
use std::fmt::Display;

use crate::{
    render::{
        line_count, render_derivation_header, render_header, render_stmt_text, replace_header,
    },
    store::StmtId,
    syntax::{Formula, ParseTree},
};

/// Where the editor cursor should go if this statement is rejected.
/// Both values are character offsets into the worksheet text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaretPosition {
    pub current_char: usize,
    pub line_start: usize,
}

impl CaretPosition {
    // relative to the start of the statement, 1-based
    pub fn offset(&self) -> usize {
        (self.current_char + 1).saturating_sub(self.line_start)
    }
}

/// Hypothesis step as read from text, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDraft {
    pub step: String,
    pub ref_label: Option<String>,
    pub formula: Option<Formula>,
    pub parse_tree: Option<ParseTree>,
    pub caret: CaretPosition,
}

/// Derivation step as read from text. Loaded verbatim, never resolved here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationDraft {
    pub step: String,
    pub hyps: Vec<String>,
    pub ref_label: Option<String>,
    pub formula: Option<Formula>,
    pub caret: CaretPosition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HypothesisStep {
    step: String,
    ref_label: String,
    formula: Formula,
    parse_tree: Option<ParseTree>,
    bound_ref: Option<StmtId>,
    stmt_text: String,
    line_count: usize,
}

impl HypothesisStep {
    // only the resolver builds these
    pub(crate) fn resolved(
        step: String,
        ref_label: String,
        formula: Formula,
        parse_tree: Option<ParseTree>,
        bound_ref: Option<StmtId>,
    ) -> Self {
        let mut s = HypothesisStep {
            step,
            ref_label,
            formula,
            parse_tree,
            bound_ref,
            stmt_text: String::new(),
            line_count: 0,
        };
        s.reformat();
        s
    }

    pub fn step(&self) -> &str {
        &self.step
    }
    pub fn ref_label(&self) -> &str {
        &self.ref_label
    }
    pub fn formula(&self) -> &Formula {
        &self.formula
    }
    pub fn parse_tree(&self) -> Option<&ParseTree> {
        self.parse_tree.as_ref()
    }
    /// The logical hypothesis this step was bound to. `None` for a new theorem.
    pub fn bound_ref(&self) -> Option<StmtId> {
        self.bound_ref
    }
    pub fn stmt_text(&self) -> &str {
        &self.stmt_text
    }
    pub fn line_count(&self) -> usize {
        self.line_count
    }
    pub fn header(&self) -> String {
        render_header(&self.step, Some(&self.ref_label))
    }

    pub fn has_matching_ref_label(&self, label: &str) -> bool {
        self.ref_label == label
    }

    // rebuild the whole text from the fields
    pub fn reformat(&mut self) {
        self.stmt_text = render_stmt_text(&self.header(), Some(&self.formula));
        self.line_count = line_count(&self.stmt_text);
    }

    /// Cosmetic only: nothing is re-validated and the reference is untouched.
    pub fn renumber(&mut self, renumber_map: &HashMap<String, String>) {
        if let Some(new_num) = renumber_map.get(&self.step) {
            let old_header = self.header();
            self.step = new_num.clone();
            self.stmt_text = replace_header(&self.stmt_text, &old_header, &self.header());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationStep {
    step: String,
    hyps: Vec<String>,
    ref_label: Option<String>,
    formula: Option<Formula>,
    stmt_text: String,
    line_count: usize,
}

impl DerivationStep {
    pub fn step(&self) -> &str {
        &self.step
    }
    pub fn hyps(&self) -> &[String] {
        &self.hyps
    }
    pub fn ref_label(&self) -> Option<&str> {
        self.ref_label.as_deref()
    }
    pub fn formula(&self) -> Option<&Formula> {
        self.formula.as_ref()
    }
    pub fn stmt_text(&self) -> &str {
        &self.stmt_text
    }
    pub fn line_count(&self) -> usize {
        self.line_count
    }
    pub fn header(&self) -> String {
        render_derivation_header(&self.step, &self.hyps, self.ref_label())
    }
    pub fn has_matching_ref_label(&self, label: &str) -> bool {
        self.ref_label.as_deref() == Some(label)
    }
    pub fn reformat(&mut self) {
        self.stmt_text = render_stmt_text(&self.header(), self.formula.as_ref());
        self.line_count = line_count(&self.stmt_text);
    }
    // hyp fields point at step numbers, so they follow the map too
    pub fn renumber(&mut self, renumber_map: &HashMap<String, String>) {
        let old_header = self.header();
        let mut changed = false;
        if let Some(new_num) = renumber_map.get(&self.step) {
            self.step = new_num.clone();
            changed = true;
        }
        for hyp in self.hyps.iter_mut() {
            if let Some(new_num) = renumber_map.get(hyp) {
                *hyp = new_num.clone();
                changed = true;
            }
        }
        if changed {
            self.stmt_text = replace_header(&self.stmt_text, &old_header, &self.header());
        }
    }
}

impl From<DerivationDraft> for DerivationStep {
    fn from(value: DerivationDraft) -> Self {
        let DerivationDraft {
            step,
            hyps,
            ref_label,
            formula,
            caret: _,
        } = value;
        let mut s = DerivationStep {
            step,
            hyps,
            ref_label,
            formula,
            stmt_text: String::new(),
            line_count: 0,
        };
        s.reformat();
        s
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofStep {
    Hypothesis(HypothesisStep),
    Derivation(DerivationStep),
}

impl ProofStep {
    pub fn step(&self) -> &str {
        match self {
            ProofStep::Hypothesis(h) => h.step(),
            ProofStep::Derivation(d) => d.step(),
        }
    }
    pub fn ref_label(&self) -> Option<&str> {
        match self {
            ProofStep::Hypothesis(h) => Some(h.ref_label()),
            ProofStep::Derivation(d) => d.ref_label(),
        }
    }
    pub fn formula(&self) -> Option<&Formula> {
        match self {
            ProofStep::Hypothesis(h) => Some(h.formula()),
            ProofStep::Derivation(d) => d.formula(),
        }
    }
    pub fn stmt_text(&self) -> &str {
        match self {
            ProofStep::Hypothesis(h) => h.stmt_text(),
            ProofStep::Derivation(d) => d.stmt_text(),
        }
    }
    pub fn line_count(&self) -> usize {
        match self {
            ProofStep::Hypothesis(h) => h.line_count(),
            ProofStep::Derivation(d) => d.line_count(),
        }
    }
    pub fn has_matching_ref_label(&self, label: &str) -> bool {
        match self {
            ProofStep::Hypothesis(h) => h.has_matching_ref_label(label),
            ProofStep::Derivation(d) => d.has_matching_ref_label(label),
        }
    }
    pub fn as_hypothesis(&self) -> Option<&HypothesisStep> {
        match self {
            ProofStep::Hypothesis(h) => Some(h),
            ProofStep::Derivation(_) => None,
        }
    }
    pub fn is_hypothesis(&self) -> bool {
        matches!(self, ProofStep::Hypothesis(_))
    }
    pub fn renumber(&mut self, renumber_map: &HashMap<String, String>) {
        match self {
            ProofStep::Hypothesis(h) => h.renumber(renumber_map),
            ProofStep::Derivation(d) => d.renumber(renumber_map),
        }
    }
    pub fn reformat(&mut self) {
        match self {
            ProofStep::Hypothesis(h) => h.reformat(),
            ProofStep::Derivation(d) => d.reformat(),
        }
    }
}

impl Display for ProofStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.stmt_text())
    }
}
