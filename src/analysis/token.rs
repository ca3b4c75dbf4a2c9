//! Token classification.
//!
//! Tokenizers split text into segments and decide which tree node each
//! segment becomes. The renderer reuses the same classification to keep
//! numerals and CJK text out of the English vocabulary.
//!
//! # Examples
//!
//! ```
//! use readmark::analysis::token::{TokenType, is_numeral_or_cjk};
//!
//! assert_eq!(TokenType::detect("hello"), TokenType::Alphanum);
//! assert_eq!(TokenType::detect("2024"), TokenType::Num);
//! assert!(is_numeral_or_cjk("你好"));
//! assert!(!is_numeral_or_cjk("hello"));
//! ```

use serde::{Deserialize, Serialize};

/// Token type classification for different kinds of segments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    /// Alphanumeric text (English, Latin scripts)
    Alphanum,
    /// Numeric values
    Num,
    /// CJK (Chinese, Japanese, Korean) characters
    Cjk,
    /// Punctuation marks
    Punctuation,
    /// Whitespace
    Whitespace,
    /// Other/unknown token types
    Other,
}

impl TokenType {
    /// Detect token type based on character content.
    ///
    /// - Empty → Other
    /// - All whitespace → Whitespace
    /// - All numeric → Num
    /// - Contains CJK → Cjk
    /// - Contains a letter or digit → Alphanum
    /// - Punctuation and symbols → Punctuation
    /// - Contains control characters → Other
    pub fn detect(segment: &str) -> TokenType {
        if segment.is_empty() {
            return TokenType::Other;
        }

        if segment.chars().all(char::is_whitespace) {
            return TokenType::Whitespace;
        }

        if segment.chars().all(|c| c.is_numeric()) {
            return TokenType::Num;
        }

        if segment.chars().any(is_cjk_char) {
            return TokenType::Cjk;
        }

        if segment.chars().any(|c| c.is_alphanumeric()) {
            return TokenType::Alphanum;
        }

        if segment.chars().all(|c| !c.is_control()) {
            return TokenType::Punctuation;
        }

        TokenType::Other
    }

    /// Whether a segment of this type becomes a word node.
    pub fn is_word(self) -> bool {
        matches!(self, TokenType::Alphanum | TokenType::Num | TokenType::Cjk)
    }
}

/// Whether a character is a CJK ideograph.
pub fn is_cjk_char(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}' |  // CJK Unified Ideographs
        '\u{3400}'..='\u{4DBF}' |  // CJK Extension A
        '\u{20000}'..='\u{2A6DF}' | // CJK Extension B
        '\u{2A700}'..='\u{2B73F}' | // CJK Extension C
        '\u{2B740}'..='\u{2B81F}' | // CJK Extension D
        '\u{2B820}'..='\u{2CEAF}'   // CJK Extension E
    )
}

/// Whether a word contains an ASCII digit or a common CJK ideograph
/// (U+4E00..=U+9FA5).
///
/// Such words are never treated as English vocabulary: they render with the
/// `other` class and are left out of word counts. Extension blocks and the
/// late additions at the end of the unified block are not covered.
pub fn is_numeral_or_cjk(word: &str) -> bool {
    word.chars()
        .any(|c| c.is_ascii_digit() || ('\u{4E00}'..='\u{9FA5}').contains(&c))
}
