use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Lex {
    Integer(i64),
    Bool(bool),
    Identifier(String),
    StringLiteral(String),

    Package,
    Import,
    Func,
    Var,
    Type,
    Struct,
    If,
    Else,
    For,
    Return,

    Add,
    Minus,
    Mul,
    Div,
    Mod,
    Not,
    BAnd,
    BOr,
    Eq,
    NEq,
    Ls,
    LsEq,
    Gr,
    GrEq,
    Assign,
    Define,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    Inc,
    Dec,

    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Colon,
    MemberAccess,
}

impl Lex {
    pub fn get_str(&self) -> Option<String> {
        match self {
            Lex::StringLiteral(s) | Lex::Identifier(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// A newline directly after one of these tokens ends the statement.
    pub fn ends_statement(&self) -> bool {
        use Lex::*;
        matches!(
            self,
            Integer(_)
                | Bool(_)
                | Identifier(_)
                | StringLiteral(_)
                | Return
                | Inc
                | Dec
                | RParen
                | RBracket
                | RBrace
        )
    }
}

impl std::fmt::Display for Lex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Lex::*;
        match self {
            Integer(i) => f.write_str(&format!("literal {}", i)),
            Bool(b) => f.write_str(&format!("literal {}", b)),
            Identifier(id) => f.write_str(&format!("identifier {}", id)),
            StringLiteral(str) => f.write_str(&format!("literal {:?}", str)),
            Package => f.write_str("package"),
            Import => f.write_str("import"),
            Func => f.write_str("func"),
            Var => f.write_str("var"),
            Type => f.write_str("type"),
            Struct => f.write_str("struct"),
            If => f.write_str("if"),
            Else => f.write_str("else"),
            For => f.write_str("for"),
            Return => f.write_str("return"),
            Add => f.write_str("+"),
            Minus => f.write_str("-"),
            Mul => f.write_str("*"),
            Div => f.write_str("/"),
            Mod => f.write_str("%"),
            Not => f.write_str("!"),
            BAnd => f.write_str("&&"),
            BOr => f.write_str("||"),
            Eq => f.write_str("=="),
            NEq => f.write_str("!="),
            Ls => f.write_str("<"),
            LsEq => f.write_str("<="),
            Gr => f.write_str(">"),
            GrEq => f.write_str(">="),
            Assign => f.write_str("="),
            Define => f.write_str(":="),
            AddAssign => f.write_str("+="),
            SubAssign => f.write_str("-="),
            MulAssign => f.write_str("*="),
            DivAssign => f.write_str("/="),
            ModAssign => f.write_str("%="),
            Inc => f.write_str("++"),
            Dec => f.write_str("--"),
            LParen => f.write_str("("),
            RParen => f.write_str(")"),
            LBrace => f.write_str("{"),
            RBrace => f.write_str("}"),
            LBracket => f.write_str("["),
            RBracket => f.write_str("]"),
            Comma => f.write_str(","),
            Semicolon => f.write_str(";"),
            Colon => f.write_str(":"),
            MemberAccess => f.write_str("."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub l: u32,
    pub s: Lex,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("L{}: {}", self.l, self.s))
    }
}

impl Token {
    pub fn new(l: u32, s: Lex) -> Token {
        Token { l, s }
    }

    /// Compares only the kind of token, ignoring any value it carries.
    pub fn token_eq(&self, a: &Lex) -> bool {
        match self.s {
            Lex::Integer(_) => matches!(a, Lex::Integer(_)),
            Lex::Bool(_) => matches!(a, Lex::Bool(_)),
            Lex::Identifier(_) => matches!(a, Lex::Identifier(_)),
            Lex::StringLiteral(_) => matches!(a, Lex::StringLiteral(_)),
            _ => *a == self.s,
        }
    }
}
