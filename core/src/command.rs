use std::fmt::Display;
use std::path::PathBuf;

use crate::{
    export::ExportError, messages::Message, printing::print_worksheet,
    store::DatabaseError, syntax::Formula, worksheet::Worksheet,
};

// commands that grow the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseCommand {
    Symbols(Vec<String>),
    LogHyp {
        label: String,
        formula: Formula,
    },
    Axiom {
        label: String,
        formula: Formula,
    },
    Theorem {
        label: String,
        hyps: Vec<String>,
        formula: Formula,
    },
}

// commands on the current worksheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetCommand {
    Load { path: PathBuf },
    Show { config: ShowConfig },
    Renumber { renumber: Vec<(String, String)> },
    Export { dir: Option<PathBuf> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowConfig {
    #[default]
    Headers,
    Full,
}

#[derive(Debug)]
pub enum CommandResultOk {
    Added { labels: Vec<String> },
    Loaded { worksheet: Worksheet },
    Show { worksheet: Worksheet, config: ShowConfig },
    Renumbered { worksheet: Worksheet },
    Exported { path: PathBuf },
}

#[derive(Debug)]
pub enum CommandResultErr {
    NoWorksheet,
    Database(DatabaseError),
    Read { path: PathBuf, err: std::io::Error },
    Load { messages: Vec<Message> },
    Export(ExportError),
}

impl From<DatabaseError> for CommandResultErr {
    fn from(value: DatabaseError) -> Self {
        CommandResultErr::Database(value)
    }
}

impl Display for DatabaseCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseCommand::Symbols(symbols) => write!(f, "symbol {}", symbols.join(" ")),
            DatabaseCommand::LogHyp { label, formula } => write!(f, "hyp {label} {formula}"),
            DatabaseCommand::Axiom { label, formula } => write!(f, "axiom {label} {formula}"),
            DatabaseCommand::Theorem {
                label,
                hyps,
                formula,
            } => write!(f, "theorem {label} [{}] {formula}", hyps.join(" ")),
        }
    }
}

impl Display for SheetCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetCommand::Load { path } => write!(f, "load {}", path.display()),
            SheetCommand::Show { config } => match config {
                ShowConfig::Headers => write!(f, "show headers"),
                ShowConfig::Full => write!(f, "show full"),
            },
            SheetCommand::Renumber { renumber } => {
                let pairs: Vec<String> = renumber.iter().map(|(a, b)| format!("{a}=>{b}")).collect();
                write!(f, "renumber {}", pairs.join(", "))
            }
            SheetCommand::Export { dir } => match dir {
                Some(dir) => write!(f, "export {}", dir.display()),
                None => write!(f, "export"),
            },
        }
    }
}

impl Display for CommandResultOk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandResultOk::Added { labels } => write!(f, "added {}", labels.join(" ")),
            CommandResultOk::Loaded { worksheet } => write!(
                f,
                "{} theorem {}: {} steps\n{}",
                if worksheet.is_new_theorem() {
                    "new"
                } else {
                    "existing"
                },
                worksheet.theorem(),
                worksheet.document().len(),
                print_worksheet(worksheet, &ShowConfig::Headers)
            ),
            CommandResultOk::Show { worksheet, config } => {
                write!(f, "{}", print_worksheet(worksheet, config))
            }
            CommandResultOk::Renumbered { worksheet } => {
                write!(f, "{}", print_worksheet(worksheet, &ShowConfig::Headers))
            }
            CommandResultOk::Exported { path } => write!(f, "exported to {}", path.display()),
        }
    }
}

impl Display for CommandResultErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandResultErr::NoWorksheet => write!(f, "no worksheet loaded"),
            CommandResultErr::Database(err) => write!(f, "{err}"),
            CommandResultErr::Read { path, err } => {
                write!(f, "cannot read {}: {err}", path.display())
            }
            CommandResultErr::Load { messages } => {
                for m in messages {
                    match m.caret {
                        Some(caret) => writeln!(f, "{m} [caret {caret}]")?,
                        None => writeln!(f, "{m}")?,
                    }
                }
                Ok(())
            }
            CommandResultErr::Export(err) => write!(f, "{err}"),
        }
    }
}
