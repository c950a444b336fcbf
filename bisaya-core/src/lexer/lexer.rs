use super::error::{LexicalError, LexicalErrorType};
use super::token::{str_to_keyword, Token};
use crate::utils::prelude::SrcSpan;

pub type Spanned = (u32, Token, u32);
pub type LexResult = std::result::Result<Spanned, LexicalError>;

/// Turns a whole source text into its token sequence, ending in `Eof`.
pub fn lex(src: &str) -> Result<Vec<Spanned>, LexicalError> {
    Lexer::new(src).collect()
}

/// Hand-written lexer over an indexed view of the source.
///
/// Several Bisaya++ rules need more lookahead than a sliding character
/// window offers: `[...]` escapes scan ahead for their closing bracket and
/// `&` is dropped entirely when its nearest non-blank neighbour is the `$`
/// newline sentinel. The whole source is therefore kept indexed.
#[derive(Debug)]
pub struct Lexer {
    chars: Vec<(u32, char)>,
    index: usize,
    src_len: u32,
    reached_eof: bool,
}

impl Lexer {
    pub fn new(src: &str) -> Self {
        Self {
            chars: src.char_indices().map(|(i, c)| (i as u32, c)).collect(),
            index: 0,
            src_len: src.len() as u32,
            reached_eof: false,
        }
    }

    pub fn next_token(&mut self) -> LexResult {
        while matches!(self.ch(), Some(' ' | '\t' | '\r')) {
            self.next_char();
        }

        let start = self.cur_pos();

        let ch = match self.ch() {
            Some(ch) => ch,
            None => return Ok((start, Token::Eof, start)),
        };

        match ch {
            '\n' => Ok(self.eat_one_char(Token::Newline)),
            '$' => Ok(self.eat_one_char(Token::Dollar)),
            ':' => Ok(self.eat_one_char(Token::Colon)),
            ',' => Ok(self.eat_one_char(Token::Comma)),
            '(' => Ok(self.eat_one_char(Token::LParen)),
            ')' => Ok(self.eat_one_char(Token::RParen)),
            '{' => Ok(self.eat_one_char(Token::LBrace)),
            '}' => Ok(self.eat_one_char(Token::RBrace)),
            '=' => Ok(self.eat_operator('=', Token::EqualEqual, Token::Assign)),
            '+' => match self.peek(1) {
                Some('+') => Ok(self.eat_two_chars(Token::Increment)),
                Some('=') => Ok(self.eat_two_chars(Token::PlusAssign)),
                _ => Ok(self.eat_one_char(Token::Plus)),
            },
            '-' => match self.peek(1) {
                Some('-') => Ok(self.lex_comment()),
                Some('=') => Ok(self.eat_two_chars(Token::MinusAssign)),
                _ => Ok(self.eat_one_char(Token::Minus)),
            },
            '*' => Ok(self.eat_operator('=', Token::StarAssign, Token::Star)),
            '/' => Ok(self.eat_operator('=', Token::SlashAssign, Token::Slash)),
            '%' => Ok(self.eat_operator('=', Token::PercentAssign, Token::Percent)),
            '>' => Ok(self.eat_operator('=', Token::GreaterEqual, Token::Greater)),
            '<' => match self.peek(1) {
                Some('=') => Ok(self.eat_two_chars(Token::LessEqual)),
                Some('>') => Ok(self.eat_two_chars(Token::NotEqual)),
                _ => Ok(self.eat_one_char(Token::Less)),
            },
            '&' => {
                if self.ampersand_is_swallowed() {
                    self.next_char();
                    self.next_token()
                } else {
                    Ok(self.eat_one_char(Token::Ampersand))
                }
            },
            '[' => self.lex_escape(),
            '"' => self.lex_string(),
            '\'' => self.lex_char(),
            '0'..='9' => self.lex_number(),
            c if c.is_alphabetic() || c == '_' => Ok(self.lex_ident()),
            c => {
                self.next_char();
                Err(LexicalError {
                    error: LexicalErrorType::UnrecognizedCharacter { ch: c },
                    location: SrcSpan::from(start, self.cur_pos()),
                })
            }
        }
    }

    fn ch(&self) -> Option<char> {
        self.chars.get(self.index).map(|(_, c)| *c)
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.index + offset).map(|(_, c)| *c)
    }

    fn cur_pos(&self) -> u32 {
        match self.chars.get(self.index) {
            Some((offset, _)) => *offset,
            None => self.src_len,
        }
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.ch();

        if ch.is_some() {
            self.index += 1;
        }

        ch
    }

    fn eat_one_char(&mut self, token: Token) -> Spanned {
        let start = self.cur_pos();
        self.next_char();

        (start, token, self.cur_pos())
    }

    fn eat_two_chars(&mut self, token: Token) -> Spanned {
        let start = self.cur_pos();
        self.next_char();
        self.next_char();

        (start, token, self.cur_pos())
    }

    fn eat_operator(&mut self, second: char, double: Token, single: Token) -> Spanned {
        if self.peek(1) == Some(second) {
            self.eat_two_chars(double)
        } else {
            self.eat_one_char(single)
        }
    }

    // `--` opens a line comment that swallows everything up to and including
    // the line feed, standing in for the newline it consumed.
    fn lex_comment(&mut self) -> Spanned {
        let start = self.cur_pos();

        while let Some(ch) = self.next_char() {
            if ch == '\n' {
                break;
            }
        }

        (start, Token::Newline, self.cur_pos())
    }

    // `&` is syntactic glue when it sits next to the `$` newline sentinel;
    // the token is dropped so `"a" & $ & "b"` lexes the same as `"a" $ "b"`.
    fn ampersand_is_swallowed(&self) -> bool {
        let before = self.chars[..self.index]
            .iter()
            .rev()
            .map(|(_, c)| *c)
            .find(|c| !matches!(c, ' ' | '\t' | '\r'));

        let after = self.chars[self.index + 1..]
            .iter()
            .map(|(_, c)| *c)
            .find(|c| !matches!(c, ' ' | '\t' | '\r'));

        before == Some('$') || after == Some('$')
    }

    // A `[...]` escape yields its raw content as a string literal. The
    // content runs to the last `]` seen before the next `[` that follows a
    // `]`, or end of input; a `[` seen before any `]` is ordinary content.
    // That keeps `[[]` as the one-character string `[` and `[]]` as `]`.
    fn lex_escape(&mut self) -> LexResult {
        let start = self.cur_pos();
        self.next_char();

        let content_start = self.index;
        let mut last_close = None;

        let mut cursor = self.index;
        while let Some((_, ch)) = self.chars.get(cursor) {
            match ch {
                ']' => last_close = Some(cursor),
                '[' if last_close.is_some() => break,
                _ => {}
            }

            cursor += 1;
        }

        let close = match last_close {
            Some(close) => close,
            None => {
                return Err(LexicalError {
                    error: LexicalErrorType::UnterminatedEscape,
                    location: SrcSpan::from(start, self.src_len),
                })
            }
        };

        let content = self.chars[content_start..close]
            .iter()
            .map(|(_, c)| *c)
            .collect::<String>();

        while self.index <= close {
            self.next_char();
        }

        Ok((start, Token::Str(content), self.cur_pos()))
    }

    // Boolean literals are written as quoted words: text containing `OO`
    // lexes as true, text containing `DILI` as false. The raw text is kept
    // so the parser can reject initializers that are not spelled exactly.
    fn lex_string(&mut self) -> LexResult {
        let start = self.cur_pos();
        self.next_char();

        let mut value = String::new();

        loop {
            match self.next_char() {
                None => {
                    return Err(LexicalError {
                        error: LexicalErrorType::UnterminatedString,
                        location: SrcSpan::from(start, self.src_len),
                    })
                },
                Some('"') => break,
                Some('\\') if self.ch() == Some('"') => {
                    self.next_char();
                    value.push('"');
                },
                Some(ch) => value.push(ch),
            }
        }

        let end = self.cur_pos();

        let token = if value.contains("OO") {
            Token::True(value)
        } else if value.contains("DILI") {
            Token::False(value)
        } else {
            Token::Str(value)
        };

        Ok((start, token, end))
    }

    fn lex_char(&mut self) -> LexResult {
        let start = self.cur_pos();
        self.next_char();

        let value = match self.next_char() {
            None => {
                return Err(LexicalError {
                    error: LexicalErrorType::UnterminatedCharacter,
                    location: SrcSpan::from(start, self.src_len),
                })
            },
            Some('\'') => {
                return Err(LexicalError {
                    error: LexicalErrorType::EmptyCharacter,
                    location: SrcSpan::from(start, self.cur_pos()),
                })
            },
            Some(ch) => ch,
        };

        match self.next_char() {
            Some('\'') => Ok((start, Token::Char(value), self.cur_pos())),
            _ => Err(LexicalError {
                error: LexicalErrorType::UnterminatedCharacter,
                location: SrcSpan::from(start, self.cur_pos()),
            }),
        }
    }

    // A run of digits; one embedded dot turns it into a float and a second
    // dot ends the number.
    fn lex_number(&mut self) -> LexResult {
        let start = self.cur_pos();

        let mut value = String::new();
        let mut has_period = false;

        loop {
            match self.ch() {
                Some(ch) if ch.is_ascii_digit() => {
                    value.push(ch);
                    self.next_char();
                },
                Some('.') if !has_period => {
                    has_period = true;
                    value.push('.');
                    self.next_char();
                },
                _ => break,
            }
        }

        let end = self.cur_pos();

        let token = if has_period {
            value.parse::<f32>().map(Token::Float).map_err(|_| ())
        } else {
            value.parse::<i32>().map(Token::Int).map_err(|_| ())
        };

        match token {
            Ok(token) => Ok((start, token, end)),
            Err(_) => Err(LexicalError {
                error: LexicalErrorType::IntOutOfRange { literal: value },
                location: SrcSpan::from(start, end),
            }),
        }
    }

    fn lex_ident(&mut self) -> Spanned {
        let start = self.cur_pos();
        let mut ident = String::new();

        while let Some(ch) = self.ch() {
            if ch.is_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.next_char();
            } else {
                break;
            }
        }

        let end = self.cur_pos();

        match str_to_keyword(&ident) {
            Some(token) => (start, token, end),
            None => (start, Token::Ident(ident), end),
        }
    }
}

impl Iterator for Lexer {
    type Item = LexResult;

    fn next(&mut self) -> Option<Self::Item> {
        if self.reached_eof {
            return None;
        }

        let result = self.next_token();

        if let Ok((_, Token::Eof, _)) = result {
            self.reached_eof = true;
        }

        Some(result)
    }
}
