//! # Lexer for ByteVM Assembly Language
//!
//! Source text is tokenized eagerly into a [`TokenStream`]. Every token
//! carries the [`Position`] of its first character.

use crate::error::LexError;
use logos::Logos;
use std::fmt;

/// Source location: 1-based line and column, 0-based byte offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub const START: Position = Position::new(1, 1, 0);

    pub const fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Assembly token
///
/// The tokenizer only produces `Identifier`, `IntegerLiteral` and punctuation.
/// The sized literal variants exist for callers building token streams by hand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    Identifier(String),
    IntegerLiteral(i32),
    ByteLiteral(u8),
    ShortLiteral(i16),
    LongLiteral(i64),
    Comma,
    LBracket,
    RBracket,
    Colon,
    LParen,
    RParen,
    Plus,
    Minus,
}

impl Token {
    /// Numeric value of any literal variant
    pub fn integer_value(&self) -> Option<i64> {
        match self {
            Token::IntegerLiteral(v) => Some(i64::from(*v)),
            Token::ByteLiteral(v) => Some(i64::from(*v)),
            Token::ShortLiteral(v) => Some(i64::from(*v)),
            Token::LongLiteral(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Token::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Case-insensitive keyword match
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.as_identifier()
            .is_some_and(|name| name.eq_ignore_ascii_case(keyword))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(name) => write!(f, "identifier `{name}`"),
            Token::IntegerLiteral(v) => write!(f, "integer `{v}`"),
            Token::ByteLiteral(v) => write!(f, "integer `{v}`"),
            Token::ShortLiteral(v) => write!(f, "integer `{v}`"),
            Token::LongLiteral(v) => write!(f, "integer `{v}`"),
            Token::Comma => write!(f, "`,`"),
            Token::LBracket => write!(f, "`[`"),
            Token::RBracket => write!(f, "`]`"),
            Token::Colon => write!(f, "`:`"),
            Token::LParen => write!(f, "`(`"),
            Token::RParen => write!(f, "`)`"),
            Token::Plus => write!(f, "`+`"),
            Token::Minus => write!(f, "`-`"),
        }
    }
}

/// Token plus the position of its first character
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpannedToken {
    pub token: Token,
    pub position: Position,
}

impl SpannedToken {
    pub fn new(token: Token, position: Position) -> Self {
        Self { token, position }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r";[^\n]*")]
enum RawToken {
    #[regex(r"[A-Za-z][A-Za-z0-9_]*")]
    Identifier,

    #[regex(r"[0-9]+")]
    Integer,

    #[token(",")]
    Comma,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(":")]
    Colon,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,
}

/// Byte offsets of line starts, for offset -> line/column lookup
struct LineIndex<'a> {
    source: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { source, starts }
    }

    fn position(&self, offset: usize) -> Position {
        let line = match self.starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let start = self.starts[line];
        let column = self.source[start..offset].chars().count() + 1;
        Position::new(line + 1, column, offset)
    }
}

/// Tokenize assembly source
pub fn tokenize(source: &str) -> Result<TokenStream, LexError> {
    let index = LineIndex::new(source);
    let mut lexer = RawToken::lexer(source);
    let mut tokens = Vec::new();

    while let Some(raw) = lexer.next() {
        let position = index.position(lexer.span().start);
        let token = match raw {
            Ok(RawToken::Identifier) => Token::Identifier(lexer.slice().to_string()),
            Ok(RawToken::Integer) => {
                let text = lexer.slice();
                let value = text.parse::<i32>().map_err(|_| LexError::IntegerOutOfRange {
                    position,
                    text: text.to_string(),
                })?;
                Token::IntegerLiteral(value)
            }
            Ok(RawToken::Comma) => Token::Comma,
            Ok(RawToken::LBracket) => Token::LBracket,
            Ok(RawToken::RBracket) => Token::RBracket,
            Ok(RawToken::Colon) => Token::Colon,
            Ok(RawToken::LParen) => Token::LParen,
            Ok(RawToken::RParen) => Token::RParen,
            Ok(RawToken::Plus) => Token::Plus,
            Ok(RawToken::Minus) => Token::Minus,
            Err(()) => {
                return Err(LexError::UnexpectedCharacter {
                    position,
                    character: lexer.slice().chars().next().unwrap_or('\0'),
                });
            }
        };
        tokens.push(SpannedToken::new(token, position));
    }

    Ok(TokenStream::new(tokens, index.position(source.len())))
}

/// Finite, restartable token sequence with a cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<SpannedToken>,
    cursor: usize,
    end: Position,
}

impl TokenStream {
    /// Create a stream whose end-of-input position is `end`
    pub fn new(tokens: Vec<SpannedToken>, end: Position) -> Self {
        Self { tokens, cursor: 0, end }
    }

    /// Create a stream from hand-built tokens. End of input is reported one
    /// column past the last token.
    pub fn from_tokens(tokens: Vec<SpannedToken>) -> Self {
        let end = tokens
            .last()
            .map(|t| Position::new(t.position.line, t.position.column + 1, t.position.offset + 1))
            .unwrap_or_default();
        Self::new(tokens, end)
    }

    /// Take the next token and advance
    pub fn next_token(&mut self) -> Option<SpannedToken> {
        let token = self.tokens.get(self.cursor).cloned();
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    pub fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.cursor)
    }

    /// Move the cursor back to the first token
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    /// Position of the next token, or the end-of-input position
    pub fn position(&self) -> Position {
        self.peek().map(|t| t.position).unwrap_or(self.end)
    }

    pub fn end_position(&self) -> Position {
        self.end
    }

    pub fn tokens(&self) -> &[SpannedToken] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .tokens()
            .iter()
            .map(|t| t.token.clone())
            .collect()
    }

    #[test]
    fn test_lexer_instruction() {
        assert_eq!(
            kinds("MOV 0, WORD 300"),
            vec![
                Token::Identifier("MOV".to_string()),
                Token::IntegerLiteral(0),
                Token::Comma,
                Token::Identifier("WORD".to_string()),
                Token::IntegerLiteral(300),
            ]
        );
    }

    #[test]
    fn test_lexer_punctuation() {
        assert_eq!(
            kinds("[ ] : ( ) + -"),
            vec![
                Token::LBracket,
                Token::RBracket,
                Token::Colon,
                Token::LParen,
                Token::RParen,
                Token::Plus,
                Token::Minus,
            ]
        );
    }

    #[test]
    fn test_lexer_comments() {
        assert_eq!(
            kinds("PUSH 5 ; push five\n; whole line\nPOP"),
            vec![
                Token::Identifier("PUSH".to_string()),
                Token::IntegerLiteral(5),
                Token::Identifier("POP".to_string()),
            ]
        );
    }

    #[test]
    fn test_lexer_positions() {
        let stream = tokenize("PUSH 5\n  POP").unwrap();
        let positions: Vec<_> = stream.tokens().iter().map(|t| t.position).collect();
        assert_eq!(
            positions,
            vec![
                Position::new(1, 1, 0),
                Position::new(1, 6, 5),
                Position::new(2, 3, 9),
            ]
        );
        assert_eq!(stream.end_position(), Position::new(2, 6, 12));
    }

    #[test]
    fn test_lexer_unexpected_character() {
        assert_eq!(
            tokenize("PUSH #5"),
            Err(LexError::UnexpectedCharacter {
                position: Position::new(1, 6, 5),
                character: '#',
            })
        );
    }

    #[test]
    fn test_lexer_integer_out_of_range() {
        let err = tokenize("PUSH 99999999999").unwrap_err();
        assert!(matches!(err, LexError::IntegerOutOfRange { ref text, .. } if text == "99999999999"));
        assert_eq!(err.position(), Position::new(1, 6, 5));
    }

    #[test]
    fn test_lexer_max_i32() {
        assert_eq!(kinds("2147483647"), vec![Token::IntegerLiteral(i32::MAX)]);
    }

    #[test]
    fn test_token_stream_cursor() {
        let mut stream = tokenize("PUSH 1").unwrap();
        assert_eq!(stream.peek().map(|t| &t.token), Some(&Token::Identifier("PUSH".to_string())));
        assert!(stream.next_token().is_some());
        assert!(stream.next_token().is_some());
        assert!(stream.next_token().is_none());
        assert!(stream.is_exhausted());
        assert_eq!(stream.position(), Position::new(1, 7, 6));
        stream.reset();
        assert_eq!(stream.position(), Position::START);
    }

    #[test]
    fn test_keyword_matching() {
        assert!(Token::Identifier("top".to_string()).is_keyword("TOP"));
        assert!(!Token::IntegerLiteral(1).is_keyword("TOP"));
        assert_eq!(Token::ShortLiteral(-3).integer_value(), Some(-3));
    }
}
