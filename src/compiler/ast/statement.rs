use serde::Serialize;

use super::{expression::Expression, ty::Type};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Statement {
    Expression(Expression),
    Assign {
        target: Expression,
        op: AssignOperator,
        value: Expression,
    },
    /// `a, b := e1, e2`
    ShortVarDecl {
        names: Vec<String>,
        values: Vec<Expression>,
    },
    VarDecl(VarDecl),
    IncDec {
        target: Expression,
        increment: bool,
    },
    If {
        cond: Expression,
        then_block: Block,
        else_block: Option<Block>,
    },
    For {
        init: Option<Box<Statement>>,
        cond: Option<Expression>,
        post: Option<Box<Statement>>,
        body: Block,
    },
    Return(Option<Expression>),
    Block(Block),
}

impl Statement {
    pub fn root_str(&self) -> String {
        use Statement::*;
        match self {
            Expression(e) => e.root_str(),
            Assign { target, op, .. } => format!("{} {}", target.root_str(), op),
            ShortVarDecl { names, .. } => format!("{} :=", names.join(", ")),
            VarDecl(decl) => format!("var {}", decl.names.join(", ")),
            IncDec { target, increment } => {
                format!("{}{}", target.root_str(), if *increment { "++" } else { "--" })
            }
            If { .. } => "if".into(),
            For { .. } => "for".into(),
            Return(_) => "return".into(),
            Block(_) => "{..}".into(),
        }
    }

    /// True if control can never run past the end of this statement: a
    /// `return`, a block ending in one, an `if` whose branches both
    /// terminate, or a `for` without a condition.
    pub fn terminates(&self) -> bool {
        match self {
            Statement::Return(_) => true,
            Statement::Block(b) => b.terminates(),
            Statement::If {
                then_block,
                else_block: Some(else_block),
                ..
            } => then_block.terminates() && else_block.terminates(),
            Statement::For { cond: None, .. } => true,
            _ => false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Block {
    pub statements: Vec<Statement>,
}

impl Block {
    pub fn new(statements: Vec<Statement>) -> Block {
        Block { statements }
    }

    pub fn get_statements(&self) -> &Vec<Statement> {
        &self.statements
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn terminates(&self) -> bool {
        self.statements.last().map_or(false, |s| s.terminates())
    }
}

/// `var a, b T = e1, e2`: the type and the values are each optional, but
/// not both.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VarDecl {
    pub names: Vec<String>,
    pub ty: Option<Type>,
    pub values: Vec<Expression>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum AssignOperator {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
}

impl AssignOperator {
    /// The arithmetic operator a compound assignment applies, if any.
    pub fn binary(&self) -> Option<super::BinaryOperator> {
        use super::BinaryOperator;
        use AssignOperator::*;
        match self {
            Assign => None,
            AddAssign => Some(BinaryOperator::Add),
            SubAssign => Some(BinaryOperator::Sub),
            MulAssign => Some(BinaryOperator::Mul),
            DivAssign => Some(BinaryOperator::Div),
            ModAssign => Some(BinaryOperator::Mod),
        }
    }
}

impl std::fmt::Display for AssignOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        use AssignOperator::*;
        match self {
            Assign => f.write_str("="),
            AddAssign => f.write_str("+="),
            SubAssign => f.write_str("-="),
            MulAssign => f.write_str("*="),
            DivAssign => f.write_str("/="),
            ModAssign => f.write_str("%="),
        }
    }
}
