use pddl_common::{Token, TokenKind};

use crate::cursor::Cursor;

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Tokenizes PDDL surface syntax one token at a time.
///
/// Calling [`Lexer::next_token`] past the end of input keeps returning an
/// `Eof` token rather than panicking. The token buffer's bounded lookahead
/// relies on this to peek past the real end of the stream.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    line: u32,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self { cursor: Cursor::new(source), line: 1 }
    }

    /// Current line number (1-based), for stamping the next token produced.
    pub fn line(&self) -> u32 {
        self.line
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.cursor.advance();
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    /// Skip whitespace and `;`-to-end-of-line comments, alternating between
    /// the two until neither applies.
    fn skip_trivia(&mut self) {
        loop {
            let mut progressed = false;
            while matches!(self.cursor.peek(), Some(c) if c.is_whitespace()) {
                self.bump();
                progressed = true;
            }
            if self.cursor.peek() == Some(';') {
                while !matches!(self.cursor.peek(), None | Some('\n')) {
                    self.bump();
                }
                progressed = true;
            }
            if !progressed {
                break;
            }
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();
        let line = self.line;
        match self.cursor.peek() {
            None => Token::new(TokenKind::Eof, "", line),
            Some('(') => {
                self.bump();
                Token::new(TokenKind::Open, "(", line)
            }
            Some(')') => {
                self.bump();
                Token::new(TokenKind::Close, ")", line)
            }
            Some('=') => {
                self.bump();
                Token::new(TokenKind::Equal, "=", line)
            }
            Some('-') => self.lex_minus_or_number(),
            Some('?') => self.lex_prefixed('?', TokenKind::VariableName),
            Some(':') => self.lex_prefixed(':', TokenKind::CategoryName),
            Some(c) if c.is_ascii_digit() => self.lex_number(),
            Some(c) if is_name_start(c) => self.lex_name(),
            Some(c) => {
                self.bump();
                Token::new(TokenKind::Error, format!("unexpected character: {c:?}"), line)
            }
        }
    }

    /// A leading `-` immediately followed by a digit or another `-` begins a
    /// NUMBER; otherwise it's a standalone MINUS token.
    fn lex_minus_or_number(&mut self) -> Token {
        let line = self.line;
        match self.cursor.peek_next() {
            Some(c) if c.is_ascii_digit() || c == '-' => self.lex_number(),
            _ => {
                self.bump();
                Token::new(TokenKind::Minus, "-", line)
            }
        }
    }

    fn lex_number(&mut self) -> Token {
        let line = self.line;
        let mut text = String::new();

        while self.cursor.peek() == Some('-') {
            text.push(self.bump().unwrap());
        }
        while matches!(self.cursor.peek(), Some(c) if c.is_ascii_digit()) {
            text.push(self.bump().unwrap());
        }
        if self.cursor.peek() == Some('.') {
            text.push(self.bump().unwrap());
            while matches!(self.cursor.peek(), Some(c) if c.is_ascii_digit()) {
                text.push(self.bump().unwrap());
            }
        }
        if matches!(self.cursor.peek(), Some('e') | Some('E')) {
            text.push(self.bump().unwrap());
            if matches!(self.cursor.peek(), Some('+') | Some('-')) {
                text.push(self.bump().unwrap());
            }
            while matches!(self.cursor.peek(), Some(c) if c.is_ascii_digit()) {
                text.push(self.bump().unwrap());
            }
        }

        Token::new(TokenKind::Number, text, line)
    }

    fn lex_name(&mut self) -> Token {
        let line = self.line;
        let mut text = String::new();
        text.push(self.bump().unwrap());
        while matches!(self.cursor.peek(), Some(c) if is_ident_continue(c)) {
            text.push(self.bump().unwrap());
        }
        Token::new(TokenKind::Name, text, line)
    }

    fn lex_prefixed(&mut self, prefix: char, kind: TokenKind) -> Token {
        let line = self.line;
        let mut text = String::new();
        text.push(self.bump().unwrap());
        debug_assert_eq!(text.chars().next(), Some(prefix));
        while matches!(self.cursor.peek(), Some(c) if is_ident_continue(c)) {
            text.push(self.bump().unwrap());
        }
        Token::new(kind, text, line)
    }
}

/// Scan every token in `source`, including the terminal `Eof`.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let tok = lexer.next_token();
        let is_eof = tok.kind == TokenKind::Eof;
        tokens.push(tok);
        if is_eof {
            break;
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_input_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn whitespace_and_comment_only_is_just_eof() {
        assert_eq!(kinds("   \n\t ; a comment\n  "), vec![TokenKind::Eof]);
    }

    #[test]
    fn punctuation_tokens() {
        assert_eq!(
            kinds("( ) - ="),
            vec![
                TokenKind::Open,
                TokenKind::Close,
                TokenKind::Minus,
                TokenKind::Equal,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn name_with_hyphen_and_underscore() {
        let toks = tokenize("physobj-type_2");
        assert_eq!(toks[0].kind, TokenKind::Name);
        assert_eq!(toks[0].text, "physobj-type_2");
    }

    #[test]
    fn variable_name_token() {
        let toks = tokenize("?block1");
        assert_eq!(toks[0].kind, TokenKind::VariableName);
        assert_eq!(toks[0].text, "?block1");
    }

    #[test]
    fn category_name_token() {
        let toks = tokenize(":typing");
        assert_eq!(toks[0].kind, TokenKind::CategoryName);
        assert_eq!(toks[0].text, ":typing");
    }

    #[test]
    fn bare_minus_is_not_a_number() {
        let toks = tokenize("(- x)");
        assert_eq!(toks[1].kind, TokenKind::Minus);
    }

    #[test]
    fn negative_number() {
        let toks = tokenize("-5");
        assert_eq!(toks[0].kind, TokenKind::Number);
        assert_eq!(toks[0].text, "-5");
    }

    #[test]
    fn double_minus_starts_a_number() {
        let toks = tokenize("--5");
        assert_eq!(toks[0].kind, TokenKind::Number);
        assert_eq!(toks[0].text, "--5");
    }

    #[test]
    fn decimal_and_exponent_number() {
        let toks = tokenize("3.25e-2");
        assert_eq!(toks[0].kind, TokenKind::Number);
        assert_eq!(toks[0].text, "3.25e-2");
    }

    #[test]
    fn line_numbers_advance_on_newline() {
        let toks = tokenize("(foo\n bar)");
        assert_eq!(toks[0].line, 1); // (
        assert_eq!(toks[1].line, 1); // foo
        assert_eq!(toks[2].line, 2); // bar
        assert_eq!(toks[3].line, 2); // )
    }

    #[test]
    fn line_comment_does_not_consume_newline() {
        let toks = tokenize("(a ; comment\n b)");
        assert_eq!(toks[0].line, 1);
        assert_eq!(toks[1].line, 1); // a
        assert_eq!(toks[2].line, 2); // b
    }

    #[test]
    fn unrecognized_byte_is_error_token() {
        let toks = tokenize("@");
        assert_eq!(toks[0].kind, TokenKind::Error);
    }

    #[test]
    fn repeated_eof_after_exhaustion() {
        let mut lexer = Lexer::new("(");
        assert_eq!(lexer.next_token().kind, TokenKind::Open);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }
}
