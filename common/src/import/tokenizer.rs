//! Splits data lines into positional tokens.

use super::columns::{ColumnMap, Delimiter};
use super::shape::{classify, TokenShape};
use regex::Regex;
use std::sync::LazyLock;

static SPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" {2,}").expect("space run pattern is valid"));

/// A cell value with its shape computed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub shape: TokenShape,
}

impl Token {
    fn new(text: String) -> Self {
        let shape = classify(&text);
        Self { text, shape }
    }
}

/// One data line after splitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedLine {
    /// 1-based line number in the submitted text.
    pub line: usize,
    pub tokens: Vec<Token>,
    /// Delimiter actually used for this line.
    pub delimiter: Delimiter,
    /// The line did not fit the header's delimiter and was split on the
    /// other one.
    pub fell_back: bool,
}

impl TokenizedLine {
    /// Token at `index`, or an empty string past the end of the line.
    pub fn get(&self, index: usize) -> &str {
        self.tokens.get(index).map(|t| t.text.as_str()).unwrap_or("")
    }

    pub fn uses_space_runs(&self) -> bool {
        self.delimiter == Delimiter::SpaceRuns
    }
}

fn normalize(cell: &str) -> String {
    cell.replace('\u{00A0}', " ").trim().to_string()
}

/// Split on literal tabs, keeping empty cells so positions line up.
pub fn split_tabs(line: &str) -> Vec<String> {
    line.trim_end_matches(['\r', '\n'])
        .split('\t')
        .map(normalize)
        .collect()
}

/// Split on runs of two or more spaces. Single spaces stay inside values.
pub fn split_space_runs(line: &str) -> Vec<String> {
    let line = line.replace('\u{00A0}', " ");
    SPACE_RUNS
        .split(line.trim())
        .map(normalize)
        .collect()
}

/// Tokenize a data line following the header's delimiter convention.
pub fn tokenize_mapped(line: usize, raw: &str, map: &ColumnMap) -> TokenizedLine {
    let (cells, delimiter, fell_back) = match map.delimiter {
        Delimiter::SpaceRuns => {
            let cells = split_tabs(raw);
            if cells.len() > 1 {
                (cells, Delimiter::Tab, true)
            } else {
                (split_space_runs(raw), Delimiter::SpaceRuns, false)
            }
        }
        Delimiter::Tab => {
            let cells = split_tabs(raw);
            if cells.len() <= 1 {
                (split_space_runs(raw), Delimiter::SpaceRuns, true)
            } else {
                (cells, Delimiter::Tab, false)
            }
        }
    };
    TokenizedLine {
        line,
        tokens: cells.into_iter().map(Token::new).collect(),
        delimiter,
        fell_back,
    }
}

/// Tokenize a line when no header was recognised. Empty cells are dropped.
pub fn tokenize_unmapped(line: usize, raw: &str) -> TokenizedLine {
    let mut cells = split_tabs(raw);
    let mut delimiter = Delimiter::Tab;
    if cells.len() <= 1 {
        cells = split_space_runs(raw);
        delimiter = Delimiter::SpaceRuns;
    }
    TokenizedLine {
        line,
        tokens: cells
            .into_iter()
            .filter(|c| !c.is_empty())
            .map(Token::new)
            .collect(),
        delimiter,
        fell_back: false,
    }
}
