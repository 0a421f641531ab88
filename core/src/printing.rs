use colored::Colorize;

use crate::{command::ShowConfig, step::ProofStep, worksheet::Worksheet};

fn header_string(step: &ProofStep) -> String {
    match step {
        ProofStep::Hypothesis(h) => format!("{}", h.header().green()),
        ProofStep::Derivation(d) => format!("{}", d.header().cyan()),
    }
}

pub fn print_step(step: &ProofStep, config: &ShowConfig) -> String {
    match config {
        ShowConfig::Headers => header_string(step),
        ShowConfig::Full => match step.formula() {
            Some(formula) => format!("{} {formula}", header_string(step)),
            None => header_string(step),
        },
    }
}

pub fn print_worksheet(worksheet: &Worksheet, config: &ShowConfig) -> String {
    let mut lines = vec![];
    if matches!(config, ShowConfig::Full) {
        lines.push(worksheet.header_line());
    }
    for step in worksheet.document() {
        lines.push(print_step(step, config));
    }
    if matches!(config, ShowConfig::Full) {
        lines.push(crate::worksheet::FOOTER.to_string());
    }
    lines.join("\n")
}
