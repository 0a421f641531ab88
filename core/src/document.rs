use std::collections::HashMap;

use crate::{
    step::{HypothesisStep, ProofStep},
    store::StmtId,
};

/// Steps of one worksheet in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepDocument(Vec<ProofStep>);

impl StepDocument {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn steps(&self) -> &[ProofStep] {
        &self.0
    }
    pub fn push(&mut self, step: ProofStep) {
        self.0.push(step);
    }

    pub fn hypothesis_steps(&self) -> impl Iterator<Item = &HypothesisStep> {
        self.0.iter().filter_map(|s| s.as_hypothesis())
    }

    pub fn hypothesis_count(&self) -> usize {
        self.hypothesis_steps().count()
    }

    pub fn find_by_step(&self, step: &str) -> Option<&ProofStep> {
        self.0.iter().find(|s| s.step() == step)
    }

    pub fn find_by_ref_label(&self, label: &str) -> Option<&ProofStep> {
        self.0.iter().find(|s| s.has_matching_ref_label(label))
    }

    /// Some step already owns `label` as its ref label.
    pub fn ref_label_claimed(&self, label: &str) -> bool {
        self.find_by_ref_label(label).is_some()
    }

    /// Some hypothesis step is already bound to the statement `id`.
    pub fn log_hyp_claimed(&self, id: StmtId) -> bool {
        self.hypothesis_steps().any(|h| h.bound_ref() == Some(id))
    }

    pub fn renumber(&mut self, renumber_map: &HashMap<String, String>) {
        for step in self.0.iter_mut() {
            step.renumber(renumber_map);
        }
    }

    pub fn reformat(&mut self) {
        for step in self.0.iter_mut() {
            step.reformat();
        }
    }

    // (i, j) with i < j whose ref labels coincide
    pub fn duplicate_ref_labels(&self) -> Vec<(usize, usize)> {
        let mut dups = vec![];
        for (i, s) in self.0.iter().enumerate() {
            let Some(label) = s.ref_label() else {
                continue;
            };
            for (j, t) in self.0.iter().enumerate().skip(i + 1) {
                if t.has_matching_ref_label(label) {
                    dups.push((i, j));
                }
            }
        }
        dups
    }
}

impl<'a> IntoIterator for &'a StepDocument {
    type Item = &'a ProofStep;
    type IntoIter = std::slice::Iter<'a, ProofStep>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
