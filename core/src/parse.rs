use std::fmt::Display;
use std::path::PathBuf;

use either::Either;
use pest::{Parser, Span, error, iterators::Pair};
use pest_derive::Parser;

use crate::{
    command::{DatabaseCommand, ShowConfig, SheetCommand},
    step::{CaretPosition, DerivationDraft, StepDraft},
    syntax::{Formula, Symbol},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    Parse(Box<error::Error<Rule>>),
    Other(String),
}

impl Display for ParserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ParserError::Parse(error) => format!("{error}"),
            ParserError::Other(err) => err.to_string(),
        };
        write!(f, "{}", s)
    }
}

impl std::error::Error for ParserError {}

impl From<error::Error<Rule>> for ParserError {
    fn from(value: error::Error<Rule>) -> Self {
        ParserError::Parse(Box::new(value))
    }
}

impl From<String> for ParserError {
    fn from(value: String) -> Self {
        ParserError::Other(value)
    }
}

#[derive(Default, Parser)]
#[grammar = "grammar/common.pest"] // relative to src
#[grammar = "grammar/worksheet.pest"]
#[grammar = "grammar/command.pest"]
pub struct MyParser;

/// Output of the parsing phase. Nothing in here has been checked against a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorksheetDraft {
    pub theorem: Option<String>,
    pub loc_after: Option<String>,
    pub steps: Vec<Either<StepDraft, DerivationDraft>>,
}

impl MyParser {
    pub fn parse_worksheet(&self, code: &str) -> Result<WorksheetDraft, ParserError> {
        let mut p = MyParser::parse(Rule::worksheet, code)?;
        take_worksheet(code, expect_pair(p.next())?)
    }
    pub fn parse_header(&self, code: &str) -> Result<(String, Option<String>), ParserError> {
        let mut p = MyParser::parse(Rule::header_only, code)?;
        let header = expect_pair(expect_pair(p.next())?.into_inner().next())?;
        Ok(take_hyp_header(header))
    }
    pub fn parse_command(
        &self,
        code: &str,
    ) -> Result<Either<DatabaseCommand, SheetCommand>, ParserError> {
        let mut p = MyParser::parse(Rule::command, code)?;
        take_command(expect_pair(p.next())?)
    }
}

// the grammar guarantees these; a miss means grammar and code disagree
fn expect_pair(pair: Option<Pair<Rule>>) -> Result<Pair<Rule>, ParserError> {
    pair.ok_or_else(|| ParserError::Other("unexpected end of input".to_string()))
}

// pest positions are bytes, the editor counts characters.
// Statements come in text order, so counting resumes from the last position asked for.
struct CharCounter<'a> {
    code: &'a str,
    byte_pos: usize,
    char_pos: usize,
}

impl<'a> CharCounter<'a> {
    fn new(code: &'a str) -> Self {
        Self {
            code,
            byte_pos: 0,
            char_pos: 0,
        }
    }

    fn char_offset(&mut self, byte_pos: usize) -> usize {
        if byte_pos < self.byte_pos {
            self.byte_pos = 0;
            self.char_pos = 0;
        }
        self.char_pos += self.code[self.byte_pos..byte_pos].chars().count();
        self.byte_pos = byte_pos;
        self.char_pos
    }

    fn caret_of(&mut self, span: Span) -> CaretPosition {
        let line_start = self.char_offset(span.start());
        let current_char = self.char_offset(span.end());
        CaretPosition {
            current_char,
            line_start,
        }
    }
}

fn take_formula(pair: Pair<Rule>) -> Formula {
    debug_assert!(matches!(pair.as_rule(), Rule::formula | Rule::cmd_formula));
    pair.into_inner().map(|p| Symbol::new(p.as_str())).collect()
}

fn take_hyp_header(pair: Pair<Rule>) -> (String, Option<String>) {
    debug_assert_eq!(pair.as_rule(), Rule::hyp_header);
    let mut step = String::new();
    let mut ref_label = None;
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::step_num => step = p.as_str().to_string(),
            Rule::ref_field => ref_label = Some(p.as_str().to_string()),
            _ => unreachable!("hyp_header"),
        }
    }
    (step, ref_label)
}

fn take_worksheet(code: &str, pair: Pair<Rule>) -> Result<WorksheetDraft, ParserError> {
    debug_assert_eq!(pair.as_rule(), Rule::worksheet);
    let mut chars = CharCounter::new(code);
    let mut draft = WorksheetDraft {
        theorem: None,
        loc_after: None,
        steps: vec![],
    };
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::header_line => {
                for field in p.into_inner() {
                    let rule = field.as_rule();
                    let value = field
                        .into_inner()
                        .next()
                        .map(|v| v.as_str().to_string())
                        .filter(|v| !v.is_empty());
                    match rule {
                        Rule::theorem_field => draft.theorem = value,
                        Rule::loc_after_field => draft.loc_after = value,
                        _ => unreachable!("header_line"),
                    }
                }
            }
            Rule::hyp_stmt => {
                let caret = chars.caret_of(p.as_span());
                let mut inner = p.into_inner();
                let (step, ref_label) = take_hyp_header(expect_pair(inner.next())?);
                let formula = inner.next().map(take_formula);
                draft.steps.push(Either::Left(StepDraft {
                    step,
                    ref_label,
                    formula,
                    parse_tree: None,
                    caret,
                }));
            }
            Rule::drv_stmt => {
                let caret = chars.caret_of(p.as_span());
                let mut inner = p.into_inner();
                let header = expect_pair(inner.next())?;
                let mut step = String::new();
                let mut hyps = vec![];
                let mut ref_label = None;
                for h in header.into_inner() {
                    match h.as_rule() {
                        Rule::step_num => step = h.as_str().to_string(),
                        Rule::hyp_list => {
                            hyps = h.into_inner().map(|r| r.as_str().to_string()).collect()
                        }
                        Rule::ref_field => ref_label = Some(h.as_str().to_string()),
                        _ => unreachable!("drv_header"),
                    }
                }
                let formula = inner.next().map(take_formula);
                draft.steps.push(Either::Right(DerivationDraft {
                    step,
                    hyps,
                    ref_label,
                    formula,
                    caret,
                }));
            }
            Rule::comment_stmt | Rule::footer | Rule::EOI => {}
            _ => unreachable!("take worksheet"),
        }
    }
    Ok(draft)
}

fn take_word(pair: Option<Pair<Rule>>) -> Result<String, ParserError> {
    Ok(expect_pair(pair)?.as_str().trim().to_string())
}

fn take_command(pair: Pair<Rule>) -> Result<Either<DatabaseCommand, SheetCommand>, ParserError> {
    debug_assert_eq!(pair.as_rule(), Rule::command);
    let pair = expect_pair(pair.into_inner().next())?;
    let rule = pair.as_rule();
    let mut ps = pair.into_inner();
    let command = match rule {
        Rule::cmd_symbol => Either::Left(DatabaseCommand::Symbols(
            ps.map(|p| p.as_str().to_string()).collect(),
        )),
        Rule::cmd_hyp => {
            let label = take_word(ps.next())?;
            let formula = take_formula(expect_pair(ps.next())?);
            Either::Left(DatabaseCommand::LogHyp { label, formula })
        }
        Rule::cmd_axiom => {
            let label = take_word(ps.next())?;
            let formula = take_formula(expect_pair(ps.next())?);
            Either::Left(DatabaseCommand::Axiom { label, formula })
        }
        Rule::cmd_theorem => {
            let label = take_word(ps.next())?;
            let hyps = expect_pair(ps.next())?
                .into_inner()
                .map(|p| p.as_str().to_string())
                .collect();
            let formula = take_formula(expect_pair(ps.next())?);
            Either::Left(DatabaseCommand::Theorem {
                label,
                hyps,
                formula,
            })
        }
        Rule::cmd_load => Either::Right(SheetCommand::Load {
            path: PathBuf::from(take_word(ps.next())?),
        }),
        Rule::cmd_show => {
            let config = match ps.next().map(|p| p.as_rule()) {
                Some(Rule::show_full) => ShowConfig::Full,
                _ => ShowConfig::Headers,
            };
            Either::Right(SheetCommand::Show { config })
        }
        Rule::cmd_renumber => {
            let mut renumber = vec![];
            for pair in ps {
                let mut p = pair.into_inner();
                let from = take_word(p.next())?;
                let to = take_word(p.next())?;
                renumber.push((from, to));
            }
            Either::Right(SheetCommand::Renumber { renumber })
        }
        Rule::cmd_export => Either::Right(SheetCommand::Export {
            dir: ps.next().map(|p| PathBuf::from(p.as_str().trim())),
        }),
        _ => unreachable!("take command"),
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = concat!(
        "$( <MM> <PROOF_ASST> THEOREM=foo  LOC_AFTER=?\n",
        "\n",
        "* a comment\n",
        "  that goes on\n",
        "h1::foo.a      |- A\n",
        "h2::           |- ( B\n",
        "    -> C )\n",
        "3:1,2:ax-mp    |- C\n",
        "h4::\n",
        "$)\n",
    );

    #[test]
    fn worksheet_steps() {
        let draft = MyParser.parse_worksheet(SHEET).unwrap();
        assert_eq!(draft.theorem.as_deref(), Some("foo"));
        assert_eq!(draft.loc_after.as_deref(), Some("?"));
        assert_eq!(draft.steps.len(), 4);

        let Either::Left(h1) = &draft.steps[0] else {
            panic!("h1 should be a hypothesis");
        };
        assert_eq!(h1.step, "1");
        assert_eq!(h1.ref_label.as_deref(), Some("foo.a"));
        assert_eq!(h1.formula, Some("|- A".into()));

        let Either::Left(h2) = &draft.steps[1] else {
            panic!("h2 should be a hypothesis");
        };
        assert_eq!(h2.ref_label, None);
        assert_eq!(h2.formula, Some("|- ( B -> C )".into()));

        let Either::Right(d3) = &draft.steps[2] else {
            panic!("3 should be a derivation");
        };
        assert_eq!(d3.hyps, vec!["1".to_string(), "2".to_string()]);
        assert_eq!(d3.ref_label.as_deref(), Some("ax-mp"));

        let Either::Left(h4) = &draft.steps[3] else {
            panic!("h4 should be a hypothesis");
        };
        assert_eq!(h4.formula, None);
    }

    #[test]
    fn caret_is_relative_to_statement() {
        let draft = MyParser.parse_worksheet(SHEET).unwrap();
        let Either::Left(h1) = &draft.steps[0] else {
            panic!();
        };
        // "h1::foo.a      |- A" is 19 characters long
        assert_eq!(h1.caret.offset(), 20);
        let start = SHEET.find("h1::").unwrap();
        assert_eq!(h1.caret.line_start, start);
    }

    #[test]
    fn caret_counts_characters() {
        let sheet = "$( <MM> <PROOF_ASST> THEOREM=foo\n* ∀∃\nh1:: |- A\n$)\n";
        let draft = MyParser.parse_worksheet(sheet).unwrap();
        let Either::Left(h1) = &draft.steps[0] else {
            panic!();
        };
        assert_eq!(h1.caret.line_start, 33 + 5);
    }

    #[test]
    fn char_counter_resumes_and_rewinds() {
        let code = "ab∀c∃d";
        let mut chars = CharCounter::new(code);
        assert_eq!(chars.char_offset(2), 2);
        assert_eq!(chars.char_offset(6), 4);
        assert_eq!(chars.char_offset(code.len()), 6);
        assert_eq!(chars.char_offset(5), 3);
    }

    #[test]
    fn rejects_malformed_worksheets() {
        for sheet in [
            "h1:: |- A\n$)\n",
            "$( <MM> <PROOF_ASST> THEOREM=foo\nh1:: |- A\n",
            "$( <MM> <PROOF_ASST> THEOREM=foo\n  h1:: |- A\n$)\n",
        ] {
            assert!(MyParser.parse_worksheet(sheet).is_err(), "{sheet}");
        }
    }

    #[test]
    fn header_fields() {
        assert_eq!(
            MyParser.parse_header("h12::foo.a").unwrap(),
            ("12".to_string(), Some("foo.a".to_string()))
        );
        assert_eq!(
            MyParser.parse_header("h3::").unwrap(),
            ("3".to_string(), None)
        );
        assert!(MyParser.parse_header("3::foo").is_err());
        assert!(MyParser.parse_header("h3:foo").is_err());
    }

    #[test]
    fn commands() {
        let c = MyParser
            .parse_command("theorem foo [foo.a foo.b] |- ( A -> B ) ;")
            .unwrap();
        assert_eq!(
            c,
            Either::Left(DatabaseCommand::Theorem {
                label: "foo".to_string(),
                hyps: vec!["foo.a".to_string(), "foo.b".to_string()],
                formula: "|- ( A -> B )".into(),
            })
        );

        let c = MyParser.parse_command("renumber 2 => 5, 3=>6;").unwrap();
        assert_eq!(
            c,
            Either::Right(SheetCommand::Renumber {
                renumber: vec![
                    ("2".to_string(), "5".to_string()),
                    ("3".to_string(), "6".to_string())
                ]
            })
        );

        let c = MyParser.parse_command("\n show full;").unwrap();
        assert_eq!(
            c,
            Either::Right(SheetCommand::Show {
                config: ShowConfig::Full
            })
        );

        let c = MyParser.parse_command("load  sheets/foo.mmp ;").unwrap();
        assert_eq!(
            c,
            Either::Right(SheetCommand::Load {
                path: PathBuf::from("sheets/foo.mmp")
            })
        );

        assert!(MyParser.parse_command("theorem foo |- A;").is_err());
        assert!(MyParser.parse_command("show").is_err());
    }
}
