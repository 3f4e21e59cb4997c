use pddl_common::{Diagnostic, Location, Token, TokenKind};
use pddl_lexer::Lexer;

/// Bounded lookahead over a [`Lexer`]'s token stream.
///
/// `max_peek` (default 2) bounds how far `peek_nth` may look ahead; asking
/// for more is a programmer error in the parser, not a malformed-input
/// condition, so it panics rather than returning a diagnostic.
pub struct TokenBuffer<'src> {
    lexer: Lexer<'src>,
    path: String,
    pending: Vec<Token>,
    max_peek: usize,
}

impl<'src> TokenBuffer<'src> {
    pub fn new(path: impl Into<String>, source: &'src str) -> Self {
        Self::with_max_peek(path, source, 2)
    }

    pub fn with_max_peek(path: impl Into<String>, source: &'src str, max_peek: usize) -> Self {
        Self { lexer: Lexer::new(source), path: path.into(), pending: Vec::new(), max_peek }
    }

    /// The line the parser should stamp onto a node it is about to start
    /// building: the line of the next unconsumed token.
    pub fn line(&mut self) -> u32 {
        self.peek().line
    }

    pub fn location(&mut self) -> Location {
        Location::new(self.path.clone(), self.line())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn fill(&mut self, n: usize) {
        while self.pending.len() < n {
            self.pending.push(self.lexer.next_token());
        }
    }

    /// View the next token without consuming it.
    pub fn peek(&mut self) -> &Token {
        self.peek_nth(1)
    }

    /// View the `n`th upcoming token (1-based) without consuming anything.
    ///
    /// # Panics
    /// Panics if `n` exceeds the configured maximum peek depth.
    pub fn peek_nth(&mut self, n: usize) -> &Token {
        assert!(n >= 1 && n <= self.max_peek, "peek_nth({n}) exceeds max_peek({})", self.max_peek);
        self.fill(n);
        &self.pending[n - 1]
    }

    /// Consume and return the next token.
    pub fn next(&mut self) -> Token {
        if self.pending.is_empty() {
            self.lexer.next_token()
        } else {
            self.pending.remove(0)
        }
    }

    /// Consume and discard `n` tokens.
    pub fn junk(&mut self, n: usize) {
        for _ in 0..n {
            self.next();
        }
    }

    /// If the upcoming `n` tokens' texts match `texts` exactly, consume
    /// them and return `true`. Otherwise consume nothing and return
    /// `false`.
    pub fn accept(&mut self, texts: &[&str]) -> bool {
        assert!(texts.len() <= self.max_peek, "accept() window exceeds max_peek");
        for (i, text) in texts.iter().enumerate() {
            if self.peek_nth(i + 1).text != *text {
                return false;
            }
        }
        self.junk(texts.len());
        true
    }

    /// If the next token has kind `kind`, consume and return it.
    pub fn accept_kind(&mut self, kind: TokenKind) -> Option<Token> {
        if self.peek().kind == kind {
            Some(self.next())
        } else {
            None
        }
    }

    /// Like [`Self::accept`], but produces a diagnostic describing what was
    /// expected if the upcoming tokens do not match.
    pub fn expect(&mut self, texts: &[&str]) -> Result<(), Diagnostic> {
        for text in texts {
            let tok = self.next();
            if tok.text != *text {
                return Err(Diagnostic::new(
                    Location::new(self.path.clone(), tok.line),
                    format!("expected [{text}], got [{}]", tok.text),
                ));
            }
        }
        Ok(())
    }

    /// Like [`Self::accept_kind`], but produces a diagnostic if the next
    /// token is not of `kind`.
    pub fn expect_kind(&mut self, kind: TokenKind) -> Result<Token, Diagnostic> {
        let tok = self.next();
        if tok.kind != kind {
            return Err(Diagnostic::new(
                Location::new(self.path.clone(), tok.line),
                format!("expected {kind:?}, got {:?} [{}]", tok.kind, tok.text),
            ));
        }
        Ok(tok)
    }
}
