use crate::error::LyError;
use crate::file::{LyFile, LyMeasure};
use crate::token_parser::parse_ly_token;
use crate::types::event::SourcePosition;
use crate::whitelist::Whitelist;
use anyhow::Result;

#[derive(Debug)]
struct RawToken {
    text: String,
    position: SourcePosition,
}

pub struct LyParser {
    whitelist: Whitelist,
}

/// Parse LilyPond source with the default whitelist.
pub fn parse_ly(content: &str) -> Result<LyFile> {
    LyParser::new().parse(content)
}

impl Default for LyParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LyParser {
    pub fn new() -> Self {
        Self::with_whitelist(Whitelist::default())
    }

    pub fn with_whitelist(whitelist: Whitelist) -> Self {
        Self { whitelist }
    }

    pub fn parse(&self, content: &str) -> Result<LyFile> {
        let source = strip_comments(content)?;
        let mut ly_file = LyFile::new();

        for (idx, segment) in split_measures(&source).into_iter().enumerate() {
            if segment.is_empty() {
                continue;
            }

            let mut measure = LyMeasure::new(idx as u32 + 1);
            for token in segment {
                let event = parse_ly_token(&token.text, &self.whitelist).map_err(|kind| {
                    LyError::Token {
                        line: token.position.line,
                        column: token.position.column,
                        token: token.text.clone(),
                        kind,
                    }
                })?;
                measure.events.push(event);
            }

            measure.check_slurs().map_err(|kind| LyError::Slur {
                measure: measure.number,
                kind,
            })?;
            ly_file.measures.push(measure);
        }

        log::debug!(
            "Parsed {} measures with {} events",
            ly_file.measures.len(),
            ly_file.event_count()
        );
        Ok(ly_file)
    }
}

/// Blank out `%` line comments and `%{ %}` block comments, keeping line and
/// column positions of everything else intact.
fn strip_comments(content: &str) -> Result<String, LyError> {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut line = 1;
    let mut column = 1;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
            continue;
        }

        let (start_line, start_column) = (line, column);
        out.push(' ');
        column += 1;

        if chars.peek() == Some(&'{') {
            let mut prev = ' ';
            let mut closed = false;
            for inner in chars.by_ref() {
                if inner == '\n' {
                    out.push('\n');
                    line += 1;
                    column = 1;
                } else {
                    out.push(' ');
                    column += 1;
                }
                if prev == '%' && inner == '}' {
                    closed = true;
                    break;
                }
                prev = inner;
            }
            if !closed {
                return Err(LyError::UnterminatedComment {
                    line: start_line,
                    column: start_column,
                });
            }
        } else {
            while let Some(&inner) = chars.peek() {
                if inner == '\n' {
                    break;
                }
                out.push(' ');
                column += 1;
                chars.next();
            }
        }
    }
    Ok(out)
}

/// Split on `|` into whitespace-separated tokens, one list per measure segment.
fn split_measures(source: &str) -> Vec<Vec<RawToken>> {
    let mut measures = vec![Vec::new()];
    let mut current: Option<RawToken> = None;
    let mut line = 1;
    let mut column = 1;

    for c in source.chars() {
        if c == '|' || c.is_whitespace() {
            if let Some(token) = current.take() {
                if let Some(measure) = measures.last_mut() {
                    measure.push(token);
                }
            }
            if c == '|' {
                measures.push(Vec::new());
            }
        } else {
            current
                .get_or_insert_with(|| RawToken {
                    text: String::new(),
                    position: SourcePosition { line, column },
                })
                .text
                .push(c);
        }

        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    if let Some(token) = current {
        if let Some(measure) = measures.last_mut() {
            measure.push(token);
        }
    }
    measures
}
