//! Property tests for hypothesis step resolution


use generators::*;
use proptest::prelude::*;
use std::collections::HashSet;
use stepref::parse::MyParser;
use stepref::render::render_header;
use stepref::store::{Database, ReferenceStore};
use stepref::worksheet::Worksheet;

proptest! {
    /// A rendered header reads back as the same step and label
    #[test]
    fn header_roundtrip(step in arb_step(), label in proptest::option::of(arb_label())) {
        let header = render_header(&step, label.as_deref());
        let parsed = MyParser.parse_header(&header).unwrap();
        prop_assert_eq!(parsed, (step, label));
    }

    /// Label-less steps of a new theorem are named theorem.1, theorem.2, ... in order
    #[test]
    fn new_theorem_labels_count_hypotheses(
        formulas in proptest::collection::vec(arb_formula_text(), 1..8)
    ) {
        let body: Vec<String> = formulas
            .iter()
            .enumerate()
            .map(|(i, f)| format!("h{}:: {f}", i + 1))
            .collect();
        let ws = Worksheet::load(&worksheet_text("thm", &body), &Database::new()).unwrap();
        prop_assert!(ws.is_new_theorem());
        for (i, h) in ws.document().hypothesis_steps().enumerate() {
            let expected = format!("thm.{}", i + 1);
            prop_assert_eq!(h.ref_label(), expected.as_str());
            prop_assert_eq!(h.bound_ref(), None);
        }
    }

    /// Any order of the theorem's hypotheses binds each step to its own logical hypothesis
    #[test]
    fn existing_theorem_binds_each_log_hyp_once(
        (formulas, order) in arb_log_hyp_formulas().prop_flat_map(|fs| {
            let n = fs.len();
            (Just(fs), Just((0..n).collect::<Vec<_>>()).prop_shuffle())
        })
    ) {
        let mut db = Database::new();
        let labels: Vec<String> = (1..=formulas.len()).map(|i| format!("t.{i}")).collect();
        for (label, f) in labels.iter().zip(&formulas) {
            db.add_log_hyp(label, f.as_str().into()).unwrap();
        }
        let label_refs: Vec<&str> = labels.iter().map(|s| s.as_str()).collect();
        db.add_theorem("t", &label_refs, "|- C".into()).unwrap();

        let body: Vec<String> = order
            .iter()
            .enumerate()
            .map(|(i, &k)| format!("h{}:: {}", i + 1, formulas[k]))
            .collect();
        let ws = Worksheet::load(&worksheet_text("t", &body), &db).unwrap();

        let log_hyps = db.theorem_log_hyps("t");
        let mut bound = HashSet::new();
        for h in ws.document().hypothesis_steps() {
            let id = h.bound_ref().unwrap();
            prop_assert!(bound.insert(id));
            let hyp = log_hyps.iter().find(|a| a.id() == id).unwrap();
            prop_assert_eq!(hyp.formula(), h.formula());
        }
        prop_assert_eq!(bound.len(), formulas.len());
        prop_assert!(ws.document().duplicate_ref_labels().is_empty());
    }
}
