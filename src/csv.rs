use std::fs::File;
use std::io::{BufWriter, Write};
use std::mem;
use std::path::Path;

use anyhow::{Context, Result};

/// Placeholder answer for questions whose answer markup was not recognized.
pub const NO_ANSWER: &str = "no answer found";

/// Prefix for answers that are images rather than list items.
pub const IMAGE_ANSWER_PREFIX: &str = "IMAGE ANSWER: ";

const HEADER: [&str; 2] = ["question", "answer"];

/// Shortest accepted search query.
pub const MIN_QUERY_LEN: usize = 3;

/// One extracted question with its resolved (or placeholder) answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

impl QaPair {
    pub fn is_unanswered(&self) -> bool {
        self.answer == NO_ANSWER
    }

    pub fn is_image_answer(&self) -> bool {
        self.answer.starts_with(IMAGE_ANSWER_PREFIX)
    }
}

/// Write pairs to `path` as CSV with a `question,answer` header row.
/// An empty slice performs no I/O at all.
pub fn write_pairs(path: &Path, pairs: &[QaPair]) -> Result<()> {
    if pairs.is_empty() {
        return Ok(());
    }
    write_file(path, pairs).with_context(|| format!("failed to write {}", path.display()))
}

fn write_file(path: &Path, pairs: &[QaPair]) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_row(&mut out, &HEADER)?;
    for pair in pairs {
        write_row(&mut out, &[pair.question.as_str(), pair.answer.as_str()])?;
    }
    out.flush()
}

fn write_row<W: Write>(out: &mut W, fields: &[&str]) -> std::io::Result<()> {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.write_all(b",")?;
        }
        if needs_quotes(field) {
            write!(out, "\"{}\"", field.replace('"', "\"\""))?;
        } else {
            out.write_all(field.as_bytes())?;
        }
    }
    out.write_all(b"\n")
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Read pairs back from a file produced by [`write_pairs`]. Skips the header
/// row, drops rows with an empty question, folds surplus unquoted commas
/// into the answer.
pub fn read_pairs(path: &Path) -> Result<Vec<QaPair>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut rows = parse_rows(&text);
    if rows
        .first()
        .is_some_and(|row| row.iter().map(String::as_str).eq(HEADER))
    {
        rows.remove(0);
    }
    Ok(rows
        .into_iter()
        .filter_map(|mut row| {
            if row.len() < 2 {
                return None;
            }
            let question = row.remove(0);
            if question.is_empty() {
                return None;
            }
            Some(QaPair {
                question,
                answer: row.join(","),
            })
        })
        .collect())
}

/// Quote-aware row parser: doubled quotes, CRLF endings, fields spanning
/// lines. Blank lines produce no row.
fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => row.push(mem::take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(mem::take(&mut field));
                if row.len() > 1 || !row[0].is_empty() {
                    rows.push(mem::take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Trailing row without a final newline (or with an unterminated quote).
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}

/// Whether `query` is under [`MIN_QUERY_LEN`] characters (counted by
/// character, not byte).
pub fn query_too_short(query: &str) -> bool {
    query.chars().count() < MIN_QUERY_LEN
}

/// Search hits: at most the requested number of pairs, plus the uncapped
/// match count.
pub struct SearchHits<'a> {
    pub hits: Vec<&'a QaPair>,
    pub total: usize,
}

/// Case-insensitive substring search over question text, in file order,
/// keeping at most `limit` hits.
pub fn search_pairs<'a>(pairs: &'a [QaPair], query: &str, limit: usize) -> SearchHits<'a> {
    let needle = query.to_lowercase();
    let mut hits = Vec::new();
    let mut total = 0;
    for pair in pairs {
        if pair.question.to_lowercase().contains(&needle) {
            total += 1;
            if hits.len() < limit {
                hits.push(pair);
            }
        }
    }
    SearchHits { hits, total }
}
