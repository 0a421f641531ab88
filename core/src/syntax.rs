use std::fmt::Display;

// a math symbol of the formal system, e.g. "|-", "(", "ph"
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(s: &str) -> Self {
        Symbol(s.to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Symbol::new(value)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sequence of symbols. Two formulas are the same formula iff their symbols are.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Formula(Vec<Symbol>);

impl Formula {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Formula(symbols)
    }
    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

// "|- ( ph -> ps )" => [|-, (, ph, ->, ps, )]
impl From<&str> for Formula {
    fn from(value: &str) -> Self {
        Formula(value.split_whitespace().map(Symbol::new).collect())
    }
}

impl FromIterator<Symbol> for Formula {
    fn from_iter<T: IntoIterator<Item = Symbol>>(iter: T) -> Self {
        Formula(iter.into_iter().collect())
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .0
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{s}")
    }
}

// syntax type of every flat tree built here
pub const WFF_SYNTAX_LABEL: &str = "wff";

/// Parsed structure of a formula.
/// The engine never looks inside; it is carried along and compared as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParseTree {
    Leaf(Symbol),
    Node {
        syntax_label: String,
        children: Vec<ParseTree>,
    },
}

impl ParseTree {
    // flat tree used when no grammar is available: one node whose leaves are the symbols
    pub fn flat(syntax_label: &str, formula: &Formula) -> Self {
        ParseTree::Node {
            syntax_label: syntax_label.to_string(),
            children: formula
                .symbols()
                .iter()
                .cloned()
                .map(ParseTree::Leaf)
                .collect(),
        }
    }
}

impl Display for ParseTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseTree::Leaf(symbol) => write!(f, "{symbol}"),
            ParseTree::Node {
                syntax_label,
                children,
            } => {
                write!(f, "{syntax_label}(")?;
                for (i, child) in children.iter().enumerate() {
                    if i != 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, ")")
            }
        }
    }
}
