//! Cosmetic pass over rendered SQL: upper-cases keywords and breaks clauses
//! onto their own lines, indenting nested subqueries.
//!
//! Quoted literals and identifiers are copied verbatim, and token order is
//! never changed, so formatting does not alter what the query means.

use lazy_static::lazy_static;
use std::collections::HashSet;

lazy_static! {
    static ref KEYWORDS: HashSet<&'static str> = [
        "SELECT", "DISTINCT", "FROM", "WHERE", "GROUP", "BY", "HAVING", "ORDER", "ASC", "DESC",
        "LIMIT", "OFFSET", "UNION", "ALL", "JOIN", "LEFT", "RIGHT", "INNER", "FULL", "OUTER",
        "CROSS", "ON", "AS", "AND", "OR", "NOT", "IN", "IS", "NULL", "LIKE", "ILIKE", "BETWEEN",
        "CASE", "WHEN", "THEN", "ELSE", "END", "CAST", "EXISTS", "TRUE", "FALSE", "OVER",
        "PARTITION", "SUM", "COUNT", "MIN", "MAX", "AVG", "STDDEV",
    ]
    .into_iter()
    .collect();
}

const CLAUSE_STARTERS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "GROUP", "HAVING", "ORDER", "LIMIT", "OFFSET", "UNION",
];

const JOIN_MODIFIERS: &[&str] = &["LEFT", "RIGHT", "INNER", "FULL", "CROSS"];

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Word,
    Quoted,
    Open,
    Close,
    Symbol,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    text: String,
    space_before: bool,
}

impl Token {
    fn upper(&self) -> Option<String> {
        if self.kind == TokenKind::Word {
            Some(self.text.to_uppercase())
        } else {
            None
        }
    }

    fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Word && self.text.eq_ignore_ascii_case(word)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '$' | '@' | '#')
}

fn tokenize(sql: &str) -> Vec<Token> {
    let chars: Vec<char> = sql.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut space_before = false;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            space_before = true;
            i += 1;
            continue;
        }

        let start = i;
        let kind = if matches!(c, '\'' | '"' | '`') {
            i += 1;
            while i < chars.len() {
                if chars[i] == c {
                    // a doubled quote is an escaped quote
                    if i + 1 < chars.len() && chars[i + 1] == c {
                        i += 2;
                        continue;
                    }
                    break;
                }
                i += 1;
            }
            i = (i + 1).min(chars.len());
            TokenKind::Quoted
        } else if is_word_char(c) {
            while i < chars.len() && is_word_char(chars[i]) {
                i += 1;
            }
            TokenKind::Word
        } else {
            i += 1;
            match c {
                '(' => TokenKind::Open,
                ')' => TokenKind::Close,
                _ => TokenKind::Symbol,
            }
        };

        tokens.push(Token {
            kind,
            text: chars[start..i].iter().collect(),
            space_before,
        });
        space_before = false;
    }

    tokens
}

/// Returns true if the token at `idx` starts a clause that goes on its own line.
fn starts_clause(tokens: &[Token], idx: usize) -> bool {
    let Some(word) = tokens[idx].upper() else {
        return false;
    };

    if CLAUSE_STARTERS.contains(&word.as_str()) {
        return true;
    }

    let next_is = |w: &str| tokens.get(idx + 1).is_some_and(|t| t.is_word(w));

    if JOIN_MODIFIERS.contains(&word.as_str()) {
        return next_is("JOIN") || next_is("OUTER");
    }

    if word == "JOIN" {
        let after_modifier = idx > 0
            && tokens[idx - 1]
                .upper()
                .is_some_and(|prev| JOIN_MODIFIERS.contains(&prev.as_str()) || prev == "OUTER");
        return !after_modifier;
    }

    false
}

fn newline(out: &mut String, depth: usize, indent: usize) {
    out.push('\n');
    out.push_str(&" ".repeat(depth * indent));
}

/// Formats a single-line SQL statement for reading.
pub fn format_sql(sql: &str, indent: usize) -> String {
    let tokens = tokenize(sql);
    let mut out = String::with_capacity(sql.len() + sql.len() / 4);
    // one entry per open parenthesis: true when it opens a subquery
    let mut parens: Vec<bool> = Vec::new();

    for (idx, token) in tokens.iter().enumerate() {
        let depth = parens.iter().filter(|is_subquery| **is_subquery).count();
        let at_clause_level = parens.last().is_none_or(|is_subquery| *is_subquery);

        match token.kind {
            TokenKind::Close => {
                if parens.pop() == Some(true) {
                    newline(&mut out, depth.saturating_sub(1), indent);
                } else if token.space_before {
                    out.push(' ');
                }
                out.push(')');
                continue;
            }
            TokenKind::Open => {
                let is_subquery = tokens.get(idx + 1).is_some_and(|t| t.is_word("SELECT"));
                parens.push(is_subquery);
                if token.space_before && !out.is_empty() {
                    out.push(' ');
                }
                out.push('(');
                continue;
            }
            _ => {}
        }

        if !out.is_empty() {
            if at_clause_level && starts_clause(&tokens, idx) {
                newline(&mut out, depth, indent);
            } else if token.space_before {
                out.push(' ');
            }
        }

        match token.upper() {
            Some(word) if KEYWORDS.contains(word.as_str()) => out.push_str(&word),
            _ => out.push_str(&token.text),
        }
    }

    out
}
