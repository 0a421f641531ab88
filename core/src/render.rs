// canonical text of proof steps

use crate::syntax::Formula;

pub const HYP_STEP_PREFIX: &str = "h";
pub const FIELD_DELIMITER: char = ':';

/// `h<step>::<ref>`; the ref field is left empty when there is no label.
pub fn render_header(step: &str, ref_label: Option<&str>) -> String {
    let mut s = String::new();
    s.push_str(HYP_STEP_PREFIX);
    s.push_str(step);
    s.push(FIELD_DELIMITER);
    s.push(FIELD_DELIMITER);
    if let Some(label) = ref_label {
        s.push_str(label);
    }
    s
}

// <step>:<hyp,hyp>:<ref>
pub fn render_derivation_header(step: &str, hyps: &[String], ref_label: Option<&str>) -> String {
    format!(
        "{step}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}",
        hyps.join(","),
        ref_label.unwrap_or("")
    )
}

pub fn render_stmt_text(header: &str, formula: Option<&Formula>) -> String {
    match formula {
        Some(formula) if !formula.is_empty() => format!("{header} {formula}"),
        _ => header.to_string(),
    }
}

pub fn line_count(text: &str) -> usize {
    text.lines().count().max(1)
}

// swaps `old_header` at the front of already rendered text for `header`
pub fn replace_header(stmt_text: &str, old_header: &str, header: &str) -> String {
    match stmt_text.strip_prefix(old_header) {
        Some(rest) => format!("{header}{rest}"),
        None => header.to_string(),
    }
}
