// Lexer - converts source text into the Token stream consumed by the parser
use crate::diagnostics::config::TracingConfig;
use crate::trace;

use super::tokens::{Lex, Token};
use super::{LexerError, LexerResult};
use Lex::*;

struct LexerBranch<'a> {
    lexer: &'a mut Lexer,
    index: usize,
    line: u32,
}

impl<'a> LexerBranch<'a> {
    pub fn from(l: &mut Lexer) -> LexerBranch {
        LexerBranch {
            index: l.index,
            line: l.line,
            lexer: l,
        }
    }

    /// Accepts everything this branch consumed: moves the source lexer's
    /// cursor up to the branch and returns the consumed text.
    pub fn merge(&mut self) -> String {
        let s = self.lexer.chars[self.lexer.index..self.index].iter().collect();

        self.lexer.index = self.index;
        self.lexer.line = self.line;

        s
    }

    pub fn next(&mut self) -> Option<char> {
        if self.index < self.lexer.chars.len() {
            let c = self.lexer.chars[self.index];
            self.index += 1;
            if c == '\n' {
                self.line += 1;
            }
            Some(c)
        } else {
            None
        }
    }

    pub fn next_if(&mut self, t: char) -> bool {
        match self.peek() {
            Some(c) if c == t => self.next().is_some(),
            _ => false,
        }
    }

    pub fn next_ifn(&mut self, t: &str) -> bool {
        if self.peek_ifn(t) {
            for _ in 0..t.chars().count() {
                self.next();
            }
            true
        } else {
            false
        }
    }

    pub fn peek(&self) -> Option<char> {
        self.lexer.chars.get(self.index).copied()
    }

    pub fn peek_ifn(&self, t: &str) -> bool {
        let tc: Vec<char> = t.chars().collect();
        self.lexer.chars[self.index..].starts_with(&tc)
    }
}

pub struct Lexer {
    chars: Vec<char>,
    index: usize,
    line: u32,
    tracing: TracingConfig,
}

impl Lexer {
    pub fn new(text: &str) -> Lexer {
        Lexer {
            chars: text.chars().collect(),
            index: 0,
            line: 1,
            tracing: TracingConfig::Off,
        }
    }

    pub fn set_tracing(&mut self, config: TracingConfig) {
        self.tracing = config;
    }

    pub fn tracing(&self) -> TracingConfig {
        self.tracing
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn current_token(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    /// Converts the source text into tokens, inserting a `;` wherever a line
    /// ends after a token that can end a statement. Tokenizing stops at the
    /// first error, which is the last element of the result.
    pub fn tokenize(&mut self) -> Vec<LexerResult<Token>> {
        let mut tokens: Vec<LexerResult<Token>> = vec![];
        let mut last: Option<Token> = None;

        loop {
            let newline = match self.consume_blank() {
                Ok(nl) => nl,
                Err(e) => {
                    tokens.push(Err(e));
                    break;
                }
            };

            let at_end = self.index >= self.chars.len();
            if newline || at_end {
                if let Some(t) = last.take() {
                    if t.s.ends_statement() {
                        tokens.push(Ok(Token::new(t.l, Semicolon)));
                    }
                }
            }

            if at_end {
                break;
            }

            let prev_index = self.index;
            match self.next_token() {
                Ok(Some(t)) => {
                    last = Some(t.clone());
                    tokens.push(Ok(t));
                }
                Ok(None) => (),
                Err(e) => {
                    tokens.push(Err(e));
                    break;
                }
            }

            // Can no longer consume the input text
            if prev_index == self.index {
                tokens.push(Err(LexerError::Locked(self.line, self.chars[self.index])));
                break;
            }
        }

        tokens
    }

    fn next_token(&mut self) -> LexerResult<Option<Token>> {
        match self.consume_literal()? {
            Some(i) => Ok(Some(i)),
            None => match self.consume_identifier() {
                Some(id) => Ok(Some(self.if_keyword_map(self.if_boolean_map(id)))),
                None => Ok(self.consume_operator()),
            },
        }
    }

    /// Skips whitespace and comments. Returns true if a line break was
    /// crossed, including one inside a block comment.
    fn consume_blank(&mut self) -> LexerResult<bool> {
        let mut newline = false;
        loop {
            let start = self.index;
            newline |= self.consume_whitespace();
            self.consume_line_comment();
            newline |= self.consume_block_comment()?;
            if start == self.index {
                return Ok(newline);
            }
        }
    }

    fn consume_literal(&mut self) -> LexerResult<Option<Token>> {
        trace!(self);
        match self.consume_integer()? {
            Some(i) => Ok(Some(i)),
            None => self.consume_string_literal(),
        }
    }

    fn consume_whitespace(&mut self) -> bool {
        trace!(self);
        let mut newline = false;
        while self.index < self.chars.len() && self.chars[self.index].is_whitespace() {
            if self.chars[self.index] == '\n' {
                self.line += 1;
                newline = true;
            }
            self.index += 1;
        }
        newline
    }

    fn consume_identifier(&mut self) -> Option<Token> {
        trace!(self);
        let line = self.line;
        let mut branch = LexerBranch::from(self);
        if branch.peek().map_or(false, |c| c.is_alphabetic() || c == '_') {
            while branch
                .peek()
                .map_or(false, |c| c.is_alphanumeric() || c == '_')
            {
                branch.next();
            }
        }

        let id = branch.merge();
        if id.is_empty() {
            None
        } else {
            Some(Token::new(line, Identifier(id)))
        }
    }

    fn consume_string_literal(&mut self) -> LexerResult<Option<Token>> {
        trace!(self);
        let line = self.line;
        let mut branch = LexerBranch::from(self);

        if !branch.next_if('"') {
            return Ok(None);
        }

        let mut s = String::new();
        loop {
            match branch.next() {
                None | Some('\n') => return Err(LexerError::UnterminatedString(line)),
                Some('"') => break,
                Some('\\') => match branch.next() {
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some('"') => s.push('"'),
                    Some('\\') => s.push('\\'),
                    Some(c) => return Err(LexerError::InvalidEscapeSequence(line, c)),
                    None => return Err(LexerError::UnterminatedString(line)),
                },
                Some(c) => s.push(c),
            }
        }
        branch.merge();

        Ok(Some(Token::new(line, StringLiteral(s))))
    }

    fn consume_integer(&mut self) -> LexerResult<Option<Token>> {
        trace!(self);
        let line = self.line;
        let mut branch = LexerBranch::from(self);

        if !branch.peek().map_or(false, |c| c.is_ascii_digit()) {
            return Ok(None);
        }

        while let Some(c) = branch.peek() {
            if !c.is_ascii_digit() {
                if c.is_alphabetic() || c == '_' {
                    return Err(LexerError::InvalidInteger(line));
                } else {
                    break;
                }
            }
            branch.next();
        }

        let num = branch.merge();
        num.parse::<i64>()
            .map(|i| Some(Token::new(line, Integer(i))))
            .map_err(|_| LexerError::InvalidInteger(line))
    }

    fn consume_operator(&mut self) -> Option<Token> {
        trace!(self);
        let line = self.line;
        let mut branch = LexerBranch::from(self);
        let mut operators = vec![
            ("&&", BAnd),
            ("||", BOr),
            (":=", Define),
            ("!=", NEq),
            ("==", Eq),
            (">=", GrEq),
            ("<=", LsEq),
            ("+=", AddAssign),
            ("-=", SubAssign),
            ("*=", MulAssign),
            ("/=", DivAssign),
            ("%=", ModAssign),
            ("++", Inc),
            ("--", Dec),
            ("(", LParen),
            (")", RParen),
            ("{", LBrace),
            ("}", RBrace),
            ("[", LBracket),
            ("]", RBracket),
            ("*", Mul),
            ("/", Div),
            ("%", Mod),
            ("+", Add),
            ("-", Minus),
            ("!", Not),
            ("=", Assign),
            (";", Semicolon),
            (":", Colon),
            (",", Comma),
            (".", MemberAccess),
            (">", Gr),
            ("<", Ls),
        ];
        operators.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let mut token = None;
        for (op, t) in operators.into_iter() {
            if branch.next_ifn(op) {
                token = Some(Token::new(line, t));
                break;
            }
        }
        branch.merge();
        token
    }

    /// Consumes a `//` comment up to, but not including, the line break so
    /// that the break is still seen by semicolon insertion.
    fn consume_line_comment(&mut self) {
        trace!(self);
        let mut branch = LexerBranch::from(self);
        if branch.next_ifn("//") {
            while branch.peek().map_or(false, |c| c != '\n') {
                branch.next();
            }
        }
        branch.merge();
    }

    fn consume_block_comment(&mut self) -> LexerResult<bool> {
        trace!(self);
        let line = self.line;
        let mut branch = LexerBranch::from(self);
        if branch.next_ifn("/*") {
            while !branch.next_ifn("*/") {
                if branch.next().is_none() {
                    return Err(LexerError::UnterminatedComment(line));
                }
            }
        }
        let crossed = branch.line > line;
        branch.merge();
        Ok(crossed)
    }

    fn if_boolean_map(&self, token: Token) -> Token {
        match &token.s {
            Identifier(id) => match id.as_str() {
                "true" => Token::new(token.l, Bool(true)),
                "false" => Token::new(token.l, Bool(false)),
                _ => token,
            },
            _ => token,
        }
    }

    fn if_keyword_map(&self, token: Token) -> Token {
        let keyword = match &token.s {
            Identifier(id) => match id.as_str() {
                "package" => Package,
                "import" => Import,
                "func" => Func,
                "var" => Var,
                "type" => Type,
                "struct" => Struct,
                "if" => If,
                "else" => Else,
                "for" => For,
                "return" => Return,
                _ => return token,
            },
            _ => return token,
        };
        Token::new(token.l, keyword)
    }
}
