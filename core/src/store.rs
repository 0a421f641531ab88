use std::collections::HashSet;
use std::fmt::Display;

use indexmap::IndexMap;
use thiserror::Error;

use crate::syntax::{Formula, ParseTree, Symbol, WFF_SYNTAX_LABEL};

// identity of a statement inside one database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StmtId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionKind {
    LogHyp,
    Axiom,
    Theorem { log_hyps: Vec<StmtId> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assertion {
    id: StmtId,
    label: String,
    formula: Formula,
    parse_tree: Option<ParseTree>,
    kind: AssertionKind,
}

impl Assertion {
    pub fn id(&self) -> StmtId {
        self.id
    }
    pub fn label(&self) -> &str {
        &self.label
    }
    pub fn formula(&self) -> &Formula {
        &self.formula
    }
    pub fn parse_tree(&self) -> Option<&ParseTree> {
        self.parse_tree.as_ref()
    }
    pub fn kind(&self) -> &AssertionKind {
        &self.kind
    }
    pub fn is_log_hyp(&self) -> bool {
        matches!(self.kind, AssertionKind::LogHyp)
    }
    pub fn is_theorem(&self) -> bool {
        matches!(self.kind, AssertionKind::Theorem { .. })
    }
    // same statement, not merely the same content
    pub fn is_identical(&self, other: &Assertion) -> bool {
        self.id == other.id
    }
}

impl Display for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            AssertionKind::LogHyp => "$e",
            AssertionKind::Axiom => "$a",
            AssertionKind::Theorem { .. } => "$p",
        };
        write!(f, "{} {kind} {}", self.label, self.formula)
    }
}

/// Read-only view of the formal-system database used during a load pass.
pub trait ReferenceStore {
    fn find_assertion(&self, label: &str) -> Option<&Assertion>;
    // statement labels and math symbols share one namespace
    fn contains_symbol_or_statement(&self, label: &str) -> bool;
    /// Logical hypotheses of `theorem` in their fixed order. Empty if `theorem` is unknown.
    fn theorem_log_hyps(&self, theorem: &str) -> Vec<&Assertion>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatabaseError {
    #[error("label {0} is already used by a statement")]
    DuplicateStatement(String),
    #[error("label {0} is already used by a math symbol")]
    LabelIsSymbol(String),
    #[error("math symbol {0} is already declared")]
    DuplicateSymbol(String),
    #[error("theorem {theorem} refers to {hyp}, which is not a logical hypothesis")]
    NotLogHyp { theorem: String, hyp: String },
}

/// In-memory statement and symbol tables.
#[derive(Debug, Clone, Default)]
pub struct Database {
    statements: IndexMap<String, Assertion>,
    symbols: HashSet<Symbol>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn statements(&self) -> impl Iterator<Item = &Assertion> {
        self.statements.values()
    }

    pub fn add_symbol(&mut self, symbol: &str) -> Result<(), DatabaseError> {
        if self.statements.contains_key(symbol) {
            return Err(DatabaseError::DuplicateStatement(symbol.to_string()));
        }
        if !self.symbols.insert(Symbol::new(symbol)) {
            return Err(DatabaseError::DuplicateSymbol(symbol.to_string()));
        }
        Ok(())
    }

    pub fn add_log_hyp(&mut self, label: &str, formula: Formula) -> Result<StmtId, DatabaseError> {
        self.push(label, formula, AssertionKind::LogHyp)
    }

    pub fn add_axiom(&mut self, label: &str, formula: Formula) -> Result<StmtId, DatabaseError> {
        self.push(label, formula, AssertionKind::Axiom)
    }

    // hyps must already be in the database as logical hypotheses
    pub fn add_theorem(
        &mut self,
        label: &str,
        hyps: &[&str],
        formula: Formula,
    ) -> Result<StmtId, DatabaseError> {
        let mut log_hyps = vec![];
        for hyp in hyps {
            match self.statements.get(*hyp) {
                Some(a) if a.is_log_hyp() => log_hyps.push(a.id),
                _ => {
                    return Err(DatabaseError::NotLogHyp {
                        theorem: label.to_string(),
                        hyp: hyp.to_string(),
                    });
                }
            }
        }
        self.push(label, formula, AssertionKind::Theorem { log_hyps })
    }

    fn push(
        &mut self,
        label: &str,
        formula: Formula,
        kind: AssertionKind,
    ) -> Result<StmtId, DatabaseError> {
        if self.statements.contains_key(label) {
            return Err(DatabaseError::DuplicateStatement(label.to_string()));
        }
        if self.symbols.contains(&Symbol::new(label)) {
            return Err(DatabaseError::LabelIsSymbol(label.to_string()));
        }
        let id = StmtId(self.statements.len());
        let parse_tree = Some(ParseTree::flat(WFF_SYNTAX_LABEL, &formula));
        self.statements.insert(
            label.to_string(),
            Assertion {
                id,
                label: label.to_string(),
                formula,
                parse_tree,
                kind,
            },
        );
        Ok(id)
    }

    fn get_by_id(&self, id: StmtId) -> Option<&Assertion> {
        self.statements.get_index(id.0).map(|(_, a)| a)
    }
}

impl ReferenceStore for Database {
    fn find_assertion(&self, label: &str) -> Option<&Assertion> {
        self.statements.get(label)
    }

    fn contains_symbol_or_statement(&self, label: &str) -> bool {
        self.statements.contains_key(label) || self.symbols.contains(&Symbol::new(label))
    }

    fn theorem_log_hyps(&self, theorem: &str) -> Vec<&Assertion> {
        match self.statements.get(theorem).map(|a| &a.kind) {
            Some(AssertionKind::Theorem { log_hyps }) => log_hyps
                .iter()
                .filter_map(|id| self.get_by_id(*id))
                .collect(),
            _ => vec![],
        }
    }
}
