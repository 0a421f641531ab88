// symbols, formulas, parse trees
pub mod syntax;
// label characters and reserved names
pub mod label;
// database of assertions
pub mod store;
// proof steps and their rendered text
pub mod render;
pub mod step;
pub mod document;
// errors of the resolution phase
pub mod error;
// draft -> resolved hypothesis step
pub mod resolver;
// string -> draft
pub mod parse;
pub mod worksheet;
pub mod messages;
pub mod export;
pub mod command;
// worksheet -> colored string
pub mod printing;
pub mod interpreter;
