use std::fmt::Display;

use crate::error::WorksheetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub severity: Severity,
    pub code: String,
    pub text: String,
    // where the editor cursor should go, relative to the statement start
    pub caret: Option<usize>,
}

impl Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "E",
            Severity::Info => "I",
        };
        write!(f, "{prefix}-{} {}", self.code, self.text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessagesConfig {
    pub max_errors: usize,
    pub max_infos: usize,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            max_errors: 15,
            max_infos: 30,
        }
    }
}

/// Messages accumulated for the user. Anything past the configured limits is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Messages {
    config: MessagesConfig,
    errors: Vec<Message>,
    infos: Vec<Message>,
}

impl Messages {
    pub fn new(config: MessagesConfig) -> Self {
        Self {
            config,
            errors: vec![],
            infos: vec![],
        }
    }

    // false when the message did not fit
    pub fn accum_error(&mut self, code: &str, text: String, caret: Option<usize>) -> bool {
        if self.errors.len() >= self.config.max_errors {
            return false;
        }
        self.errors.push(Message {
            severity: Severity::Error,
            code: code.to_string(),
            text,
            caret,
        });
        true
    }

    pub fn accum_info(&mut self, code: &str, text: String) -> bool {
        if self.infos.len() >= self.config.max_infos {
            return false;
        }
        self.infos.push(Message {
            severity: Severity::Info,
            code: code.to_string(),
            text,
            caret: None,
        });
        true
    }

    pub fn accum_worksheet_error(&mut self, err: &WorksheetError) -> bool {
        self.accum_error(err.code(), err.to_string(), err.caret())
    }

    pub fn errors(&self) -> &[Message] {
        &self.errors
    }
    pub fn infos(&self) -> &[Message] {
        &self.infos
    }
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
    pub fn max_errors_reached(&self) -> bool {
        self.errors.len() >= self.config.max_errors
    }
    // caret of the most recent positioned error
    pub fn last_caret(&self) -> Option<usize> {
        self.errors.iter().rev().find_map(|m| m.caret)
    }

    pub fn clear(&mut self) {
        self.errors.clear();
        self.infos.clear();
    }

    // errors first, then infos; empties the list
    pub fn take_all(&mut self) -> Vec<Message> {
        let mut all = std::mem::take(&mut self.errors);
        all.append(&mut self.infos);
        all
    }
}

impl Display for Messages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for m in self.errors.iter().chain(self.infos.iter()) {
            writeln!(f, "{m}")?;
        }
        Ok(())
    }
}
