// "Model A" export: the worksheet text wrapped in a fixed HTML frame

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::{messages::Messages, step::ProofStep, worksheet::Worksheet};

pub const THEOREM_PLACEHOLDER: &str = "{theorem}";

const MODEL_A_PREAMBLE: &str = "<html>\n<head>\n<title>{theorem}</title>\n</head>\n<body>\n<pre>\n";
const MODEL_A_POSTAMBLE: &str = "</pre>\n</body>\n</html>\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub file_type: String,
    // "{theorem}" is replaced by the theorem label
    pub preamble: String,
    pub postamble: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            file_type: ".html".to_string(),
            preamble: MODEL_A_PREAMBLE.to_string(),
            postamble: MODEL_A_POSTAMBLE.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("theorem {theorem}: the worksheet has no proof steps to export")]
    EmptyWorksheet { theorem: String },
    #[error("theorem {theorem} step {step}: the step has no formula")]
    IncompleteStep { theorem: String, step: String },
    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    pub fn code(&self) -> &'static str {
        match self {
            ExportError::EmptyWorksheet { .. } => "EmptyWorksheet",
            ExportError::IncompleteStep { .. } => "IncompleteStep",
            ExportError::Io { .. } => "Io",
        }
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

pub struct ModelAExporter {
    config: ExportConfig,
}

impl ModelAExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    fn append_fragment(&self, buf: &mut String, template: &str, theorem: &str) {
        buf.push_str(&template.replace(THEOREM_PLACEHOLDER, &escape_html(theorem)));
    }

    fn append_step(
        &self,
        buf: &mut String,
        theorem: &str,
        step: &ProofStep,
    ) -> Result<(), ExportError> {
        if let ProofStep::Derivation(d) = step {
            if d.formula().is_none() {
                return Err(ExportError::IncompleteStep {
                    theorem: theorem.to_string(),
                    step: step.step().to_string(),
                });
            }
        }
        buf.push_str(&escape_html(step.stmt_text()));
        buf.push('\n');
        Ok(())
    }

    /// Whole export text, or the first step that could not be exported.
    pub fn build_export_text(&self, worksheet: &Worksheet) -> Result<String, ExportError> {
        let theorem = worksheet.theorem();
        if worksheet.document().is_empty() {
            return Err(ExportError::EmptyWorksheet {
                theorem: theorem.to_string(),
            });
        }
        let mut buf = String::new();
        self.append_fragment(&mut buf, &self.config.preamble, theorem);
        for step in worksheet.document() {
            self.append_step(&mut buf, theorem, step)?;
        }
        self.append_fragment(&mut buf, &self.config.postamble, theorem);
        Ok(buf)
    }

    pub fn output_path(&self, theorem: &str) -> PathBuf {
        self.config
            .output_dir
            .join(format!("{theorem}{}", self.config.file_type))
    }

    /// Writes the export file. On failure nothing is written and the error is also
    /// accumulated into `messages`.
    pub fn export(
        &self,
        worksheet: &Worksheet,
        messages: &mut Messages,
    ) -> Result<PathBuf, ExportError> {
        let result = self.build_export_text(worksheet).and_then(|text| {
            let path = self.output_path(worksheet.theorem());
            fs::write(&path, text).map_err(|source| ExportError::Io {
                path: path.clone(),
                source,
            })?;
            Ok(path)
        });
        match &result {
            Ok(path) => {
                info!(path = %path.display(), "worksheet exported");
                messages.accum_info("Export", format!("exported to {}", path.display()));
            }
            Err(err) => {
                messages.accum_error(err.code(), err.to_string(), None);
            }
        }
        result
    }
}
