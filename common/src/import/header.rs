//! Decides whether the first non-blank line of a paste is a header row.

/// Any of these, anywhere in the upper-cased line, marks it as a header.
///
/// A data row holding one of these words as a value is indistinguishable
/// from a header and will be treated as one.
pub const HEADER_KEYWORDS: [&str; 5] = ["SÉRIE", "SERIE", "LOCAL", "ACASALAMENTO", "TOURO"];

pub fn looks_like_header(line: &str) -> bool {
    let upper = line.to_uppercase();
    HEADER_KEYWORDS.iter().any(|k| upper.contains(k))
}
