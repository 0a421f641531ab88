use std::collections::HashMap;
use std::fs;

use either::Either;

use crate::{
    command::*,
    export::{ExportConfig, ModelAExporter},
    messages::{Messages, MessagesConfig},
    store::Database,
    worksheet::Worksheet,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateInterpreter {
    NoWorksheet,
    Loaded(Worksheet),
}

/// Database plus at most one loaded worksheet.
#[derive(Debug)]
pub struct Interpreter {
    database: Database,
    state: StateInterpreter,
    messages: Messages,
    export_config: ExportConfig,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(Database::new(), MessagesConfig::default(), ExportConfig::default())
    }
}

impl Interpreter {
    pub fn new(database: Database, messages: MessagesConfig, export_config: ExportConfig) -> Self {
        Self {
            database,
            state: StateInterpreter::NoWorksheet,
            messages: Messages::new(messages),
            export_config,
        }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }
    pub fn now_state(&self) -> &StateInterpreter {
        &self.state
    }
    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn command(
        &mut self,
        command: Either<DatabaseCommand, SheetCommand>,
    ) -> Result<CommandResultOk, CommandResultErr> {
        match command {
            Either::Left(command) => self.database_command(command),
            Either::Right(command) => self.sheet_command(command),
        }
    }

    fn database_command(
        &mut self,
        command: DatabaseCommand,
    ) -> Result<CommandResultOk, CommandResultErr> {
        let labels = match command {
            DatabaseCommand::Symbols(symbols) => {
                for s in &symbols {
                    self.database.add_symbol(s)?;
                }
                symbols
            }
            DatabaseCommand::LogHyp { label, formula } => {
                self.database.add_log_hyp(&label, formula)?;
                vec![label]
            }
            DatabaseCommand::Axiom { label, formula } => {
                self.database.add_axiom(&label, formula)?;
                vec![label]
            }
            DatabaseCommand::Theorem {
                label,
                hyps,
                formula,
            } => {
                let hyps: Vec<&str> = hyps.iter().map(|s| s.as_str()).collect();
                self.database.add_theorem(&label, &hyps, formula)?;
                vec![label]
            }
        };
        Ok(CommandResultOk::Added { labels })
    }

    // loading is always from scratch, a failed load drops the previous worksheet too
    pub fn load_text(&mut self, text: &str) -> Result<CommandResultOk, CommandResultErr> {
        self.state = StateInterpreter::NoWorksheet;
        self.messages.clear();
        match Worksheet::load(text, &self.database) {
            Ok(worksheet) => {
                self.state = StateInterpreter::Loaded(worksheet.clone());
                Ok(CommandResultOk::Loaded { worksheet })
            }
            Err(err) => {
                self.messages.accum_worksheet_error(&err);
                Err(CommandResultErr::Load {
                    messages: self.messages.errors().to_vec(),
                })
            }
        }
    }

    fn sheet_command(&mut self, command: SheetCommand) -> Result<CommandResultOk, CommandResultErr> {
        if let SheetCommand::Load { path } = command {
            let text = fs::read_to_string(&path)
                .map_err(|err| CommandResultErr::Read { path, err })?;
            return self.load_text(&text);
        }

        let StateInterpreter::Loaded(ref mut worksheet) = self.state else {
            return Err(CommandResultErr::NoWorksheet);
        };
        match command {
            SheetCommand::Load { .. } => unreachable!("handled above"),
            SheetCommand::Show { config } => Ok(CommandResultOk::Show {
                worksheet: worksheet.clone(),
                config,
            }),
            SheetCommand::Renumber { renumber } => {
                let renumber_map: HashMap<String, String> = renumber.into_iter().collect();
                worksheet.renumber(&renumber_map);
                Ok(CommandResultOk::Renumbered {
                    worksheet: worksheet.clone(),
                })
            }
            SheetCommand::Export { dir } => {
                let mut config = self.export_config.clone();
                if let Some(dir) = dir {
                    config.output_dir = dir;
                }
                let exporter = ModelAExporter::new(config);
                let path = exporter
                    .export(worksheet, &mut self.messages)
                    .map_err(CommandResultErr::Export)?;
                Ok(CommandResultOk::Exported { path })
            }
        }
    }
}
