use crate::compiler::lexer::tokens::{Lex, Token};
use crate::diagnostics::config::TracingConfig;

use super::ParserError;

pub struct TokenStream<'a> {
    tokens: &'a Vec<Token>,
    index: usize,
    tracing: TracingConfig,
    composite_allowed: bool,
}

impl<'a> TokenStream<'a> {
    pub fn new(tokens: &'a Vec<Token>) -> TokenStream<'a> {
        TokenStream {
            tokens,
            index: 0,
            tracing: TracingConfig::Off,
            composite_allowed: true,
        }
    }

    pub fn set_tracing(&mut self, config: TracingConfig) {
        self.tracing = config;
    }

    pub fn tracing(&self) -> TracingConfig {
        self.tracing
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set_index(&mut self, i: usize) {
        self.index = i;
    }

    /// Composite literals (`T{...}`) are not allowed directly inside the
    /// header of an `if` or `for`, where `{` opens the body. Returns the
    /// previous setting so it can be restored.
    pub fn allow_composite(&mut self, allowed: bool) -> bool {
        std::mem::replace(&mut self.composite_allowed, allowed)
    }

    pub fn composite_allowed(&self) -> bool {
        self.composite_allowed
    }

    /// Line of the current token, or of the last token once the stream is
    /// exhausted.
    pub fn line(&self) -> u32 {
        self.peek()
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.l)
    }

    pub fn current_token(&self) -> Option<&Lex> {
        self.peek().map(|t| &t.s)
    }

    /// Text used in error messages for whatever is at the cursor.
    pub fn found(&self) -> String {
        match self.peek() {
            Some(t) => format!("{}", t.s),
            None => "EOF".into(),
        }
    }

    pub fn next(&mut self) -> Option<Token> {
        if self.index >= self.tokens.len() {
            None
        } else {
            self.index += 1;
            Some(self.tokens[self.index - 1].clone())
        }
    }

    pub fn next_if(&mut self, test: &Lex) -> Option<Token> {
        if self.test_if(test) {
            self.next()
        } else {
            None
        }
    }

    pub fn next_if_id(&mut self) -> Option<(u32, String)> {
        match self.next_if(&Lex::Identifier("".into())) {
            Some(Token {
                l,
                s: Lex::Identifier(id),
            }) => Some((l, id)),
            _ => None,
        }
    }

    pub fn next_must_be(&mut self, test: &Lex) -> Result<Token, ParserError> {
        let line = self.line();
        let found = self.found();
        self.next_if(test)
            .ok_or(ParserError::ExpectedButFound(line, test.clone(), found))
    }

    pub fn next_if_one_of(&mut self, set: Vec<Lex>) -> Option<Token> {
        if self.test_if_one_of(set) {
            self.next()
        } else {
            None
        }
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    pub fn peek_at(&self, i: usize) -> Option<&Token> {
        self.tokens.get(self.index + i)
    }

    pub fn test_if(&self, test: &Lex) -> bool {
        match self.peek() {
            None => false,
            Some(t) => t.token_eq(test),
        }
    }

    pub fn test_ifn(&self, test: Vec<Lex>) -> bool {
        for i in 0..test.len() {
            match self.peek_at(i) {
                None => return false,
                Some(token) => {
                    if !token.token_eq(&test[i]) {
                        return false;
                    }
                }
            }
        }

        true
    }

    pub fn test_if_one_of(&self, set: Vec<Lex>) -> bool {
        match self.peek() {
            None => false,
            Some(t) => set.iter().any(|l| t.token_eq(l)),
        }
    }
}

#[cfg(test)]
mod test_tokenstream {
    use super::TokenStream;
    use crate::compiler::lexer::tokens::{Lex, Token};
    use crate::compiler::lexer::Lexer;
    use crate::compiler::parser::ParserError;

    fn tokens(text: &str) -> Vec<Token> {
        Lexer::new(text)
            .tokenize()
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_peek() {
        let tokens = tokens("(2 + 4) * 3");
        let ts = TokenStream::new(&tokens);
        assert_eq!(*ts.peek().unwrap(), Token::new(1, Lex::LParen));
        assert_eq!(ts.peek_at(1).unwrap().s, Lex::Integer(2));
    }

    #[test]
    fn test_next_must_be() {
        let tokens = tokens("x )");
        let mut ts = TokenStream::new(&tokens);
        assert!(ts.next_must_be(&Lex::Identifier("".into())).is_ok());
        assert_eq!(
            ts.next_must_be(&Lex::LBrace),
            Err(ParserError::ExpectedButFound(1, Lex::LBrace, ")".into()))
        );
        assert_eq!(ts.index(), 1);
    }

    #[test]
    fn test_ifn() {
        let tokens = tokens("p.x = 3");
        let mut ts = TokenStream::new(&tokens);
        assert!(ts.test_ifn(vec![
            Lex::Identifier("".into()),
            Lex::MemberAccess,
            Lex::Identifier("".into())
        ]));
        assert!(!ts.test_ifn(vec![Lex::Identifier("".into()), Lex::Assign]));
        assert_eq!(ts.next_if_id(), Some((1, "p".into())));
        assert!(ts.next_if_one_of(vec![Lex::Comma, Lex::MemberAccess]).is_some());
    }
}
