// label syntax of the formal system
// labels double as file names in the surrounding tooling, so device names are reserved

const PROHIBITED_LABELS: [&str; 23] = [
    "CON", "PRN", "AUX", "CLOCK$", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7",
    "COM8", "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

pub fn is_label_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

/// Non-empty and made only of letters, digits, `-`, `_` and `.`.
pub fn is_well_formed(label: &str) -> bool {
    !label.is_empty() && label.chars().all(is_label_char)
}

/// Case-insensitive match against the reserved list.
pub fn is_prohibited(label: &str) -> bool {
    PROHIBITED_LABELS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(label))
}
