//! Quote-aware comment stripping and tokenisation.
//!
//! Double quotes are the only escape: inside a quoted run neither whitespace
//! nor comment markers have any effect.

/// Removes `//` and `/* ... */` comments from successive lines.
///
/// Block comments may span lines, so one stripper must see a section's lines
/// in order.
#[derive(Debug, Default)]
pub struct CommentStripper {
    in_block: bool,
}

impl CommentStripper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the previous line ended inside an unterminated `/*` comment.
    pub fn in_block_comment(&self) -> bool {
        self.in_block
    }

    /// Returns the non-comment text of `line`, trimmed.
    ///
    /// A removed block comment leaves a single space so that it never glues
    /// two tokens together.
    pub fn strip(&mut self, line: &str) -> String {
        let bytes = line.as_bytes();
        let mut kept = String::with_capacity(line.len());
        let mut in_quotes = false;
        let mut run_start = 0;
        let mut i = 0;

        while i < bytes.len() {
            if self.in_block {
                if bytes[i..].starts_with(b"*/") {
                    self.in_block = false;
                    i += 2;
                    run_start = i;
                } else {
                    i += 1;
                }
                continue;
            }

            match bytes[i] {
                b'"' => in_quotes = !in_quotes,
                b'/' if !in_quotes && bytes.get(i + 1) == Some(&b'/') => {
                    kept.push_str(&line[run_start..i]);
                    return kept.trim().to_owned();
                }
                b'/' if !in_quotes && bytes.get(i + 1) == Some(&b'*') => {
                    kept.push_str(&line[run_start..i]);
                    kept.push(' ');
                    self.in_block = true;
                    i += 2;
                    continue;
                }
                _ => {}
            }
            i += 1;
        }

        if !self.in_block {
            kept.push_str(&line[run_start..]);
        }
        kept.trim().to_owned()
    }
}

/// Number of `"` characters in `line`.
pub fn count_quotes(line: &str) -> usize {
    line.bytes().filter(|&b| b == b'"').count()
}

/// Splits a data line on whitespace, keeping quoted runs (quotes included)
/// inside a single token.
///
/// ```
/// # use matx_text::format::lexer::tokenize;
/// assert_eq!(tokenize(r#"5 "a value with spaces" 1.5"#), vec!["5", r#""a value with spaces""#, "1.5"]);
/// ```
pub fn tokenize(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut in_quotes = false;

    for (i, c) in line.char_indices() {
        if c == '"' {
            in_quotes = !in_quotes;
            start.get_or_insert(i);
        } else if c.is_whitespace() && !in_quotes {
            if let Some(s) = start.take() {
                tokens.push(&line[s..i]);
            }
        } else {
            start.get_or_insert(i);
        }
    }

    if let Some(s) = start {
        tokens.push(&line[s..]);
    }
    tokens
}
