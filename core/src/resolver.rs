use tracing::debug;

use crate::{
    document::StepDocument,
    error::{ErrorSite, LoadError, LoadErrorKind, NotATheorem},
    label,
    step::{HypothesisStep, StepDraft},
    store::{Assertion, ReferenceStore},
    syntax::{Formula, ParseTree, WFF_SYNTAX_LABEL},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionMode {
    // theorem not in the database yet: labels are reserved, nothing to bind to
    NewTheorem { theorem: String },
    // bind each hypothesis step to one of the theorem's logical hypotheses
    ExistingTheorem { theorem: String },
}

impl ResolutionMode {
    // an axiom or hypothesis label can be neither proved again nor reserved
    pub fn for_theorem(store: &dyn ReferenceStore, theorem: &str) -> Result<Self, NotATheorem> {
        let theorem = theorem.to_string();
        match store.find_assertion(&theorem) {
            None => Ok(ResolutionMode::NewTheorem { theorem }),
            Some(a) if a.is_theorem() => Ok(ResolutionMode::ExistingTheorem { theorem }),
            Some(_) => Err(NotATheorem { label: theorem }),
        }
    }
    pub fn theorem(&self) -> &str {
        match self {
            ResolutionMode::NewTheorem { theorem } => theorem,
            ResolutionMode::ExistingTheorem { theorem } => theorem,
        }
    }
    pub fn is_new_theorem(&self) -> bool {
        matches!(self, ResolutionMode::NewTheorem { .. })
    }
}

/// Binds hypothesis drafts one at a time.
///
/// `document` passed to [`Resolver::resolve`] must hold exactly the steps that precede the
/// draft, already resolved. Steps are expected in the same relative order as the theorem's
/// logical hypotheses when several of them share a formula; a label-less step always takes
/// the first such hypothesis that no earlier step is bound to.
pub struct Resolver<'a> {
    store: &'a dyn ReferenceStore,
    mode: ResolutionMode,
}

// one failing statement: everything needed to build the error
struct Failing<'d> {
    draft: &'d StepDraft,
    theorem: &'d str,
}

impl Failing<'_> {
    fn site(&self) -> ErrorSite {
        ErrorSite {
            theorem: self.theorem.to_string(),
            step: self.draft.step.clone(),
        }
    }
    fn err(&self, kind: LoadErrorKind) -> LoadError {
        LoadError {
            kind,
            caret: self.draft.caret.offset(),
        }
    }
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a dyn ReferenceStore, mode: ResolutionMode) -> Self {
        Self { store, mode }
    }

    pub fn mode(&self) -> &ResolutionMode {
        &self.mode
    }

    pub fn resolve(
        &self,
        draft: StepDraft,
        document: &StepDocument,
    ) -> Result<HypothesisStep, LoadError> {
        let failing = Failing {
            draft: &draft,
            theorem: self.mode.theorem(),
        };
        let Some(formula) = draft.formula.as_ref() else {
            return Err(failing.err(LoadErrorKind::MissingFormula {
                site: failing.site(),
            }));
        };

        let step = match &self.mode {
            ResolutionMode::ExistingTheorem { theorem } => {
                let hyp = match &draft.ref_label {
                    None => {
                        let hyp =
                            self.find_log_hyp_by_formula(&failing, theorem, formula, document)?;
                        check_dup_ref_label(&failing, hyp.label(), document)?;
                        hyp
                    }
                    // a taken label is rejected whatever the formula says
                    Some(label) => {
                        check_dup_ref_label(&failing, label, document)?;
                        self.find_log_hyp_by_label(&failing, theorem, label, formula)?
                    }
                };
                let parse_tree = hyp
                    .parse_tree()
                    .cloned()
                    .or_else(|| draft.parse_tree.clone());
                HypothesisStep::resolved(
                    draft.step.clone(),
                    hyp.label().to_string(),
                    formula.clone(),
                    parse_tree,
                    Some(hyp.id()),
                )
            }
            ResolutionMode::NewTheorem { theorem } => {
                let label = match &draft.ref_label {
                    Some(label) => label.clone(),
                    None => new_hyp_label(theorem, document),
                };
                self.check_new_label(&failing, &label, document)?;
                let parse_tree = draft
                    .parse_tree
                    .clone()
                    .unwrap_or_else(|| ParseTree::flat(WFF_SYNTAX_LABEL, formula));
                HypothesisStep::resolved(
                    draft.step.clone(),
                    label,
                    formula.clone(),
                    Some(parse_tree),
                    None,
                )
            }
        };

        debug!(
            step = step.step(),
            ref_label = step.ref_label(),
            bound = step.bound_ref().is_some(),
            "resolved hypothesis step"
        );
        Ok(step)
    }

    fn find_log_hyp_by_formula(
        &self,
        failing: &Failing,
        theorem: &str,
        formula: &Formula,
        document: &StepDocument,
    ) -> Result<&'a Assertion, LoadError> {
        let mut candidates = self
            .store
            .theorem_log_hyps(theorem)
            .into_iter()
            .filter(|hyp| hyp.formula() == formula)
            .peekable();
        if candidates.peek().is_none() {
            return Err(failing.err(LoadErrorKind::HypothesisFormulaNotFound {
                site: failing.site(),
            }));
        }
        candidates
            .find(|hyp| !document.log_hyp_claimed(hyp.id()))
            .ok_or_else(|| {
                failing.err(LoadErrorKind::DuplicateHypothesisFormula {
                    site: failing.site(),
                })
            })
    }

    fn find_log_hyp_by_label(
        &self,
        failing: &Failing,
        theorem: &str,
        label: &str,
        formula: &Formula,
    ) -> Result<&'a Assertion, LoadError> {
        let Some(hyp) = self.store.find_assertion(label) else {
            return Err(failing.err(LoadErrorKind::ReferenceNotFound {
                site: failing.site(),
                label: label.to_string(),
            }));
        };
        if !hyp.is_log_hyp() {
            return Err(failing.err(LoadErrorKind::ReferenceNotLogHyp {
                site: failing.site(),
                label: label.to_string(),
            }));
        }
        if !self
            .store
            .theorem_log_hyps(theorem)
            .iter()
            .any(|h| h.is_identical(hyp))
        {
            return Err(failing.err(LoadErrorKind::LogHypMismatch {
                site: failing.site(),
                label: label.to_string(),
            }));
        }
        if hyp.formula() != formula {
            return Err(failing.err(LoadErrorKind::HypothesisFormulaMismatch {
                site: failing.site(),
                label: label.to_string(),
            }));
        }
        Ok(hyp)
    }

    fn check_new_label(
        &self,
        failing: &Failing,
        label: &str,
        document: &StepDocument,
    ) -> Result<(), LoadError> {
        check_dup_ref_label(failing, label, document)?;
        let site = failing.site();
        let label = label.to_string();
        if self.store.contains_symbol_or_statement(&label) {
            return Err(failing.err(LoadErrorKind::LabelAlreadyExists { site, label }));
        }
        if !label::is_well_formed(&label) {
            return Err(failing.err(LoadErrorKind::InvalidLabelCharacters { site, label }));
        }
        if label::is_prohibited(&label) {
            return Err(failing.err(LoadErrorKind::ProhibitedLabel { site, label }));
        }
        Ok(())
    }
}

// <theorem>.<n>, n counting this step among the hypothesis steps
pub fn new_hyp_label(theorem: &str, document: &StepDocument) -> String {
    format!("{theorem}.{}", document.hypothesis_count() + 1)
}

fn check_dup_ref_label(
    failing: &Failing,
    label: &str,
    document: &StepDocument,
) -> Result<(), LoadError> {
    if document.ref_label_claimed(label) {
        return Err(failing.err(LoadErrorKind::DuplicateRefLabel {
            site: failing.site(),
            label: label.to_string(),
        }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        step::{CaretPosition, ProofStep},
        store::Database,
    };

    fn foo_db() -> Database {
        let mut db = Database::new();
        db.add_symbol("|-").unwrap();
        db.add_symbol("A").unwrap();
        db.add_log_hyp("foo.a", "|- A".into()).unwrap();
        db.add_log_hyp("foo.b", "|- B".into()).unwrap();
        db.add_log_hyp("bar.a", "|- A".into()).unwrap();
        db.add_axiom("ax-1", "|- A".into()).unwrap();
        db.add_theorem("foo", &["foo.a", "foo.b"], "|- C".into())
            .unwrap();
        db
    }

    fn draft(step: &str, label: Option<&str>, formula: &str) -> StepDraft {
        StepDraft {
            step: step.to_string(),
            ref_label: label.map(|s| s.to_string()),
            formula: Some(formula.into()),
            parse_tree: None,
            caret: CaretPosition {
                current_char: 14,
                line_start: 4,
            },
        }
    }

    fn resolve_all(
        resolver: &Resolver,
        drafts: Vec<StepDraft>,
    ) -> Result<StepDocument, LoadError> {
        let mut doc = StepDocument::new();
        for d in drafts {
            let step = resolver.resolve(d, &doc)?;
            doc.push(ProofStep::Hypothesis(step));
        }
        Ok(doc)
    }

    fn existing(db: &Database) -> Resolver<'_> {
        Resolver::new(db, ResolutionMode::for_theorem(db, "foo").unwrap())
    }

    #[test]
    fn mode_follows_database() {
        let db = foo_db();
        assert!(!ResolutionMode::for_theorem(&db, "foo").unwrap().is_new_theorem());
        assert!(ResolutionMode::for_theorem(&db, "baz").unwrap().is_new_theorem());
        assert_eq!(
            ResolutionMode::for_theorem(&db, "ax-1"),
            Err(NotATheorem {
                label: "ax-1".to_string()
            })
        );
        assert!(ResolutionMode::for_theorem(&db, "foo.a").is_err());
    }

    #[test]
    fn label_less_binds_by_formula() {
        let db = foo_db();
        let resolver = existing(&db);
        let step = resolver
            .resolve(draft("1", None, "|- B"), &StepDocument::new())
            .unwrap();
        assert_eq!(step.ref_label(), "foo.b");
        assert_eq!(step.bound_ref(), Some(db.find_assertion("foo.b").unwrap().id()));
        assert_eq!(step.stmt_text(), "h1::foo.b |- B");
        // parse tree comes from the database
        assert!(step.parse_tree().is_some());
    }

    #[test]
    fn label_less_formula_not_found() {
        let db = foo_db();
        let err = existing(&db)
            .resolve(draft("1", None, "|- Z"), &StepDocument::new())
            .unwrap_err();
        assert!(matches!(
            err.kind,
            LoadErrorKind::HypothesisFormulaNotFound { .. }
        ));
        assert_eq!(err.caret, 11);
    }

    #[test]
    fn explicit_label_failures() {
        let db = foo_db();
        let resolver = existing(&db);
        let doc = StepDocument::new();

        let err = resolver.resolve(draft("1", Some("nope"), "|- A"), &doc);
        assert!(matches!(
            err.unwrap_err().kind,
            LoadErrorKind::ReferenceNotFound { .. }
        ));

        let err = resolver.resolve(draft("1", Some("ax-1"), "|- A"), &doc);
        assert!(matches!(
            err.unwrap_err().kind,
            LoadErrorKind::ReferenceNotLogHyp { .. }
        ));

        let err = resolver.resolve(draft("1", Some("foo"), "|- C"), &doc);
        assert!(matches!(
            err.unwrap_err().kind,
            LoadErrorKind::ReferenceNotLogHyp { .. }
        ));

        let err = resolver.resolve(draft("1", Some("bar.a"), "|- A"), &doc);
        assert!(matches!(
            err.unwrap_err().kind,
            LoadErrorKind::LogHypMismatch { .. }
        ));

        let err = resolver.resolve(draft("1", Some("foo.a"), "|- B"), &doc);
        assert!(matches!(
            err.unwrap_err().kind,
            LoadErrorKind::HypothesisFormulaMismatch { .. }
        ));
    }

    #[test]
    fn missing_formula_comes_first() {
        let db = foo_db();
        let mut d = draft("1", Some("nope"), "");
        d.formula = None;
        let err = existing(&db).resolve(d, &StepDocument::new()).unwrap_err();
        assert_eq!(
            err.kind,
            LoadErrorKind::MissingFormula {
                site: ErrorSite {
                    theorem: "foo".to_string(),
                    step: "1".to_string()
                }
            }
        );
    }

    #[test]
    fn scenario_foo() {
        let db = foo_db();
        let resolver = existing(&db);
        let doc = resolve_all(
            &resolver,
            vec![draft("1", None, "|- B"), draft("2", Some("foo.a"), "|- A")],
        )
        .unwrap();
        let labels: Vec<_> = doc.steps().iter().map(|s| s.ref_label()).collect();
        assert_eq!(labels, vec![Some("foo.b"), Some("foo.a")]);

        // the third one fails whatever its formula is
        for formula in ["|- A", "|- B", "|- Q"] {
            let err = resolver
                .resolve(draft("3", Some("foo.a"), formula), &doc)
                .unwrap_err();
            assert!(
                matches!(err.kind, LoadErrorKind::DuplicateRefLabel { .. }),
                "{err}"
            );
        }
        assert!(doc.duplicate_ref_labels().is_empty());
    }

    #[test]
    fn label_less_twice_is_duplicate_formula() {
        let db = foo_db();
        let err = resolve_all(
            &existing(&db),
            vec![draft("1", None, "|- A"), draft("2", None, "|- A")],
        )
        .unwrap_err();
        assert!(matches!(
            err.kind,
            LoadErrorKind::DuplicateHypothesisFormula { .. }
        ));
    }

    #[test]
    fn repeated_formulas_bind_in_order() {
        let mut db = Database::new();
        db.add_log_hyp("rep.1", "|- A".into()).unwrap();
        db.add_log_hyp("rep.2", "|- B".into()).unwrap();
        db.add_log_hyp("rep.3", "|- A".into()).unwrap();
        db.add_theorem("rep", &["rep.1", "rep.2", "rep.3"], "|- A".into())
            .unwrap();
        let resolver = Resolver::new(&db, ResolutionMode::for_theorem(&db, "rep").unwrap());

        let doc = resolve_all(
            &resolver,
            vec![draft("1", None, "|- A"), draft("2", None, "|- A")],
        )
        .unwrap();
        let labels: Vec<_> = doc.steps().iter().map(|s| s.ref_label()).collect();
        assert_eq!(labels, vec![Some("rep.1"), Some("rep.3")]);

        // explicit label out of order: the label-less step takes what is left
        let doc = resolve_all(
            &resolver,
            vec![draft("1", Some("rep.1"), "|- A"), draft("2", None, "|- A")],
        )
        .unwrap();
        assert_eq!(doc.steps()[1].ref_label(), Some("rep.3"));
        let doc = resolve_all(
            &resolver,
            vec![draft("1", Some("rep.3"), "|- A"), draft("2", None, "|- A")],
        )
        .unwrap();
        assert_eq!(doc.steps()[1].ref_label(), Some("rep.1"));
    }

    #[test]
    fn new_theorem_synthesizes_labels() {
        let db = foo_db();
        let resolver = Resolver::new(&db, ResolutionMode::for_theorem(&db, "baz").unwrap());
        let doc = resolve_all(
            &resolver,
            vec![
                draft("1", None, "|- Q"),
                draft("2", None, "|- Q"),
                draft("3", None, "|- R"),
            ],
        )
        .unwrap();
        let labels: Vec<_> = doc.steps().iter().map(|s| s.ref_label()).collect();
        assert_eq!(labels, vec![Some("baz.1"), Some("baz.2"), Some("baz.3")]);
        assert!(doc.hypothesis_steps().all(|h| h.bound_ref().is_none()));
        let first = doc.hypothesis_steps().next().unwrap();
        assert_eq!(first.parse_tree().unwrap().to_string(), "wff(|- Q)");
    }

    #[test]
    fn new_theorem_label_checks() {
        let db = foo_db();
        let resolver = Resolver::new(&db, ResolutionMode::for_theorem(&db, "baz").unwrap());
        let doc = resolve_all(&resolver, vec![draft("1", Some("baz.x"), "|- Q")]).unwrap();

        let kind = |label: &str| {
            resolver
                .resolve(draft("2", Some(label), "|- Q"), &doc)
                .unwrap_err()
                .kind
                .code()
        };
        assert_eq!(kind("baz.x"), "DuplicateRefLabel");
        assert_eq!(kind("foo.a"), "LabelAlreadyExists");
        assert_eq!(kind("A"), "LabelAlreadyExists");
        assert_eq!(kind("baz:y"), "InvalidLabelCharacters");
        assert_eq!(kind("nul"), "ProhibitedLabel");
    }

    #[test]
    fn new_theorem_auto_label_can_collide() {
        let db = foo_db();
        let resolver = Resolver::new(&db, ResolutionMode::for_theorem(&db, "baz").unwrap());
        // the explicit "baz.2" is taken before the second step would synthesize it
        let err = resolve_all(
            &resolver,
            vec![draft("1", Some("baz.2"), "|- Q"), draft("2", None, "|- R")],
        )
        .unwrap_err();
        assert!(matches!(err.kind, LoadErrorKind::DuplicateRefLabel { .. }));
    }
}
