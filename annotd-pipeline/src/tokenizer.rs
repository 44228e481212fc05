//! Tokenization of raw text into offset-annotated tokens
//!
//! Offsets count characters, not bytes, so they stay meaningful for callers
//! that index the original text by character position.

use crate::annotation::Token;

/// Tokenize `text`, either on whitespace alone or with the classic rules
/// (alphanumeric runs, punctuation as single-character tokens).
pub(crate) fn tokenize(text: &str, whitespace_only: bool) -> Vec<Token> {
    if whitespace_only {
        whitespace_tokens(text)
    } else {
        classic_tokens(text)
    }
}

fn whitespace_tokens(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut start = 0;
    let mut pos = 0;
    for ch in text.chars() {
        if ch.is_whitespace() {
            flush(&mut tokens, &mut current, start, pos);
        } else {
            if current.is_empty() {
                start = pos;
            }
            current.push(ch);
        }
        pos += 1;
    }
    flush(&mut tokens, &mut current, start, pos);
    tokens
}

fn classic_tokens(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut start = 0;
    let mut pos = 0;
    for ch in text.chars() {
        if ch.is_whitespace() {
            flush(&mut tokens, &mut current, start, pos);
        } else if ch.is_alphanumeric() || ch == '_' {
            if current.is_empty() {
                start = pos;
            }
            current.push(ch);
        } else {
            flush(&mut tokens, &mut current, start, pos);
            tokens.push(Token {
                word: ch.to_string(),
                begin: pos,
                end: pos + 1,
            });
        }
        pos += 1;
    }
    flush(&mut tokens, &mut current, start, pos);
    tokens
}

fn flush(tokens: &mut Vec<Token>, current: &mut String, start: usize, end: usize) {
    if !current.is_empty() {
        tokens.push(Token {
            word: std::mem::take(current),
            begin: start,
            end,
        });
    }
}
