use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Expression {
    Integer(i64),
    Boolean(bool),
    StringLiteral(String),
    Identifier(String),
    FieldAccess(Box<Expression>, String),
    Index {
        array: Box<Expression>,
        index: Box<Expression>,
    },
    Slice {
        array: Box<Expression>,
        low: Option<Box<Expression>>,
        high: Option<Box<Expression>>,
    },
    /// A call on a plain or dotted name (`add`, `fmt.Println`).
    Call(String, Vec<Expression>),
    StructLiteral(String, Vec<FieldInit>),

    BinaryOp(BinaryOperator, Box<Expression>, Box<Expression>),
    UnaryOp(UnaryOperator, Box<Expression>),
}

impl Expression {
    pub fn binary(op: BinaryOperator, l: Expression, r: Expression) -> Expression {
        Expression::BinaryOp(op, Box::new(l), Box::new(r))
    }

    pub fn unary(op: UnaryOperator, operand: Expression) -> Expression {
        Expression::UnaryOp(op, Box::new(operand))
    }

    pub fn field(base: Expression, field: &str) -> Expression {
        Expression::FieldAccess(Box::new(base), field.into())
    }

    pub fn id(name: &str) -> Expression {
        Expression::Identifier(name.into())
    }

    pub fn root_str(&self) -> String {
        use Expression::*;
        match self {
            Integer(i) => format!("{}", i),
            Boolean(b) => format!("{}", b),
            StringLiteral(s) => format!("{:?}", s),
            Identifier(id) => id.clone(),
            FieldAccess(base, field) => format!("{}.{}", base.root_str(), field),
            Index { array, .. } => format!("{}[]", array.root_str()),
            Slice { array, .. } => format!("{}[:]", array.root_str()),
            Call(name, ..) => format!("{}(..)", name),
            StructLiteral(name, ..) => format!("{}{{..}}", name),
            BinaryOp(op, ..) => format!("{}", op),
            UnaryOp(op, ..) => format!("{}", op),
        }
    }
}

/// One entry of a composite literal: keyed (`x: 3`) or positional (`3`).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldInit {
    pub name: Option<String>,
    pub value: Expression,
}

impl FieldInit {
    pub fn positional(value: Expression) -> FieldInit {
        FieldInit { name: None, value }
    }

    pub fn keyed(name: &str, value: Expression) -> FieldInit {
        FieldInit {
            name: Some(name.into()),
            value,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BAnd,
    BOr,
    Eq,
    NEq,
    Ls,
    LsEq,
    Gr,
    GrEq,
}

impl BinaryOperator {
    pub fn is_comparison(&self) -> bool {
        use BinaryOperator::*;
        matches!(self, Eq | NEq | Ls | LsEq | Gr | GrEq)
    }

    pub fn is_arithmetic(&self) -> bool {
        use BinaryOperator::*;
        matches!(self, Add | Sub | Mul | Div | Mod)
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        use BinaryOperator::*;
        match self {
            Add => f.write_str("+"),
            Sub => f.write_str("-"),
            Mul => f.write_str("*"),
            Div => f.write_str("/"),
            Mod => f.write_str("%"),
            BAnd => f.write_str("&&"),
            BOr => f.write_str("||"),
            Eq => f.write_str("=="),
            NEq => f.write_str("!="),
            Ls => f.write_str("<"),
            LsEq => f.write_str("<="),
            Gr => f.write_str(">"),
            GrEq => f.write_str(">="),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum UnaryOperator {
    Plus,
    Negate,
    Not,
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        use UnaryOperator::*;
        match self {
            Plus => f.write_str("+"),
            Negate => f.write_str("-"),
            Not => f.write_str("!"),
        }
    }
}
