use crate::utils::prelude::SrcSpan;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexicalErrorType {
    UnrecognizedCharacter { ch: char },
    UnterminatedString,
    UnterminatedCharacter,
    EmptyCharacter,
    UnterminatedEscape,
    IntOutOfRange { literal: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalError {
    pub error: LexicalErrorType,
    pub location: SrcSpan,
}

impl LexicalError {
    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            LexicalErrorType::UnrecognizedCharacter { ch } => {
                ("Unrecognized character", vec![format!("`{ch}` is not part of any Bisaya++ token")])
            },
            LexicalErrorType::UnterminatedString => {
                ("Unterminated string literal", vec!["Expected a closing `\"`".into()])
            },
            LexicalErrorType::UnterminatedCharacter => {
                ("Unterminated character literal", vec!["Expected exactly one character followed by a closing `'`".into()])
            },
            LexicalErrorType::EmptyCharacter => {
                ("Empty character literal", vec![])
            },
            LexicalErrorType::UnterminatedEscape => {
                ("Unterminated `[...]` escape", vec!["Expected a closing `]`".into()])
            },
            LexicalErrorType::IntOutOfRange { literal } => {
                ("Integer literal out of range", vec![format!("`{literal}` does not fit a 32-bit integer")])
            },
        }
    }
}
