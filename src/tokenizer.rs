// WHY: Single forward pass with greedy run extension; no backtracking means
// tokenization cost is exactly one classification per byte

use serde::{Deserialize, Serialize};

use crate::byte_class::ByteClassifier;

/// Token classification, decided after a run is delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenType {
    Word,
    Number,
    Date,
    Email,
    Currency,
    Punctuation,
    Whitespace,
    Unknown,
}

/// A typed span borrowed from the tokenized text.
///
/// Tokens are non-overlapping and cover the input exactly: concatenating
/// `text` for every token in order reconstructs the original input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Token<'a> {
    pub text: &'a str,
    pub token_type: TokenType,
    pub start: usize,
    pub end: usize,
}

/// Segments raw text into typed spans using byte classification plus
/// lightweight lookahead.
///
/// Word-like runs admit `@`, `.`, `/`, `-`, `$`, and `,` mid-token so that
/// emails, dates, and amounts survive as single tokens and can be
/// reclassified by shape afterwards.
pub struct Tokenizer {
    classes: ByteClassifier,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            classes: ByteClassifier::new(),
        }
    }

    /// Tokenize `text` into an ordered, exactly-covering span sequence.
    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();

        if text.is_empty() {
            return tokens;
        }

        let bytes = text.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            let b = bytes[i];

            if self.classes.is_whitespace(b) {
                let ws_start = i;
                while i < bytes.len() && self.classes.is_whitespace(bytes[i]) {
                    i += 1;
                }
                tokens.push(Token {
                    text: &text[ws_start..i],
                    token_type: TokenType::Whitespace,
                    start: ws_start,
                    end: i,
                });
            } else if self.classes.is_word_byte(b) || b == b'@' || b == b'.' || b == b'$' {
                let tok_start = i;
                while i < bytes.len() && self.is_token_byte(bytes[i]) {
                    i += 1;
                }
                let tok = &text[tok_start..i];
                tokens.push(Token {
                    text: tok,
                    token_type: self.classify(tok),
                    start: tok_start,
                    end: i,
                });
            } else {
                // One whole character per token: multi-byte characters stay
                // intact so every span is a valid UTF-8 slice boundary.
                let ch_len = text[i..]
                    .chars()
                    .next()
                    .map(char::len_utf8)
                    .unwrap_or(1);
                tokens.push(Token {
                    text: &text[i..i + ch_len],
                    token_type: TokenType::Punctuation,
                    start: i,
                    end: i + ch_len,
                });
                i += ch_len;
            }
        }

        tokens
    }

    /// Derived view over `tokenize`: only the Word-typed span texts.
    pub fn split_words<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.tokenize(text)
            .into_iter()
            .filter(|tok| tok.token_type == TokenType::Word)
            .map(|tok| tok.text)
            .collect()
    }

    /// Bytes that extend a word-like run once one has started. The extra
    /// connectors keep emails, dates, and amounts in one token.
    #[inline]
    fn is_token_byte(&self, b: u8) -> bool {
        self.classes.is_word_byte(b)
            || matches!(b, b'@' | b'.' | b'/' | b'-' | b'$' | b',')
    }

    /// Reclassify a delimited word-like run by its shape.
    fn classify(&self, token: &str) -> TokenType {
        let bytes = token.as_bytes();
        if bytes.is_empty() {
            return TokenType::Unknown;
        }

        if token.contains('@') && token.contains('.') {
            return TokenType::Email;
        }

        // 0xE2 is the lead byte of the common currency signs (euro, pound
        // sign variants) in UTF-8.
        if bytes[0] == b'$' || bytes[0] == 0xE2 {
            return TokenType::Currency;
        }

        let mut has_digit = false;
        let mut has_alpha = false;
        let mut has_date_sep = false;

        for &b in bytes {
            if self.classes.is_digit(b) {
                has_digit = true;
            } else if b.is_ascii_alphabetic() {
                has_alpha = true;
            }
            if b == b'/' || b == b'-' {
                has_date_sep = true;
            }
        }

        if has_digit && has_date_sep && !has_alpha {
            return TokenType::Date;
        }
        if has_digit && !has_alpha {
            return TokenType::Number;
        }
        if has_alpha {
            return TokenType::Word;
        }
        if self.classes.is_whitespace(bytes[0]) {
            return TokenType::Whitespace;
        }

        TokenType::Punctuation
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}
