//! Sentence splitting over token streams

use std::collections::HashSet;
use std::mem;

use crate::annotation::{Sentence, Token};

const TERMINATORS: &[char] = &['.', '!', '?', '。', '！', '？'];

/// Group tokens into sentences, breaking after terminator tokens unless an
/// abbreviation guard suppresses the break.
pub(crate) fn split(tokens: Vec<Token>, abbreviations: &HashSet<String>) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    let mut current = Sentence::default();
    let mut iter = tokens.into_iter().peekable();
    while let Some(token) = iter.next() {
        let boundary = match terminator_of(&token.word) {
            Some('.') => {
                let stem = if token.word == "." {
                    current
                        .tokens
                        .last()
                        .map(|t| t.word.as_str())
                        .unwrap_or("")
                } else {
                    // the trailing '.' is a single byte, so slicing is safe
                    &token.word[..token.word.len() - 1]
                };
                !abbreviations.contains(&stem.to_lowercase())
            }
            Some(_) => true,
            None => false,
        };
        current.tokens.push(token);
        // "?!" and friends stay in one sentence
        let run_continues = iter.peek().is_some_and(|t| is_bare_terminator(&t.word));
        if boundary && !run_continues {
            sentences.push(mem::take(&mut current));
        }
    }
    if !current.tokens.is_empty() {
        sentences.push(current);
    }
    sentences
}

fn terminator_of(word: &str) -> Option<char> {
    word.chars().last().filter(|c| TERMINATORS.contains(c))
}

fn is_bare_terminator(word: &str) -> bool {
    let mut chars = word.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if TERMINATORS.contains(&c))
}
