use crate::{
    compiler::{
        ast::*,
        lexer::tokens::{Lex, Token},
    },
    trace,
};

use super::{tokenstream::TokenStream, ParserError, ParserResult};

/*
    EXPRESSION := LOGICAL_OR
    LOGICAL_OR := LOGICAL_AND [|| LOGICAL_AND]*
    LOGICAL_AND := COMPARISON [&& COMPARISON]*
    COMPARISON := SUM [(== | != | < | <= | > | >=) SUM]*
    SUM := TERM [(+ | -) TERM]*
    TERM := UNARY [(* | / | %) UNARY]*
    UNARY := (+ | - | !) UNARY | PRIMARY
    PRIMARY := OPERAND [. IDENTIFIER | [EXPRESSION] | [EXPRESSION? : EXPRESSION?] | (EXP_LIST?) | {FIELDS}]*
    OPERAND := INTEGER | BOOL | STRING | IDENTIFIER | ( EXPRESSION )
*/

pub(super) fn expression(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    logical_or(stream)
}

pub(super) fn expression_list(stream: &mut TokenStream) -> ParserResult<Vec<Expression>> {
    trace!(stream);
    let first = match expression(stream)? {
        Some(e) => e,
        None => return Ok(None),
    };

    let mut exps = vec![first];
    while let Some(token) = stream.next_if(&Lex::Comma) {
        exps.push(
            expression(stream)?
                .ok_or(ParserError::ExpectedExpressionAfter(token.l, ",".into()))?,
        );
    }
    Ok(Some(exps))
}

/// Parses a left associative chain of binary operators from `ops`, with
/// operands parsed by `operand`.
fn binary_chain(
    stream: &mut TokenStream,
    ops: &[Lex],
    operand: fn(&mut TokenStream) -> ParserResult<Expression>,
) -> ParserResult<Expression> {
    let mut left = match operand(stream)? {
        Some(l) => l,
        None => return Ok(None),
    };

    while let Some(op) = stream.next_if_one_of(ops.to_vec()) {
        let right = operand(stream)?
            .ok_or(ParserError::ExpectedExpressionAfter(op.l, format!("{}", op.s)))?;
        left = binary_op(&op, left, right)?;
    }
    Ok(Some(left))
}

fn logical_or(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    binary_chain(stream, &[Lex::BOr], logical_and)
}

fn logical_and(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    binary_chain(stream, &[Lex::BAnd], comparison)
}

fn comparison(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    binary_chain(
        stream,
        &[Lex::Eq, Lex::NEq, Lex::Ls, Lex::LsEq, Lex::Gr, Lex::GrEq],
        sum,
    )
}

fn sum(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    binary_chain(stream, &[Lex::Add, Lex::Minus], term)
}

fn term(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    binary_chain(stream, &[Lex::Mul, Lex::Div, Lex::Mod], unary)
}

fn unary(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    match stream.next_if_one_of(vec![Lex::Add, Lex::Minus, Lex::Not]) {
        Some(op) => {
            let operand = unary(stream)?
                .ok_or(ParserError::ExpectedExpressionAfter(op.l, format!("{}", op.s)))?;
            let op = match op.s {
                Lex::Add => UnaryOperator::Plus,
                Lex::Minus => UnaryOperator::Negate,
                _ => UnaryOperator::Not,
            };
            Ok(Some(Expression::unary(op, operand)))
        }
        None => primary(stream),
    }
}

fn binary_op(op: &Token, left: Expression, right: Expression) -> Result<Expression, ParserError> {
    let bop = match op.s {
        Lex::Add => BinaryOperator::Add,
        Lex::Minus => BinaryOperator::Sub,
        Lex::Mul => BinaryOperator::Mul,
        Lex::Div => BinaryOperator::Div,
        Lex::Mod => BinaryOperator::Mod,
        Lex::BAnd => BinaryOperator::BAnd,
        Lex::BOr => BinaryOperator::BOr,
        Lex::Eq => BinaryOperator::Eq,
        Lex::NEq => BinaryOperator::NEq,
        Lex::Ls => BinaryOperator::Ls,
        Lex::LsEq => BinaryOperator::LsEq,
        Lex::Gr => BinaryOperator::Gr,
        Lex::GrEq => BinaryOperator::GrEq,
        _ => {
            return Err(ParserError::ExpectedExpressionAfter(
                op.l,
                format!("{}", op.s),
            ))
        }
    };
    Ok(Expression::binary(bop, left, right))
}

fn primary(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    let mut exp = match operand(stream)? {
        Some(exp) => exp,
        None => return Ok(None),
    };

    loop {
        if let Some(token) = stream.next_if(&Lex::MemberAccess) {
            let (_, field) = stream
                .next_if_id()
                .ok_or(ParserError::ExpectedIdentifierAfter(token.l, ".".into()))?;
            exp = Expression::field(exp, &field);
        } else if let Some(token) = stream.next_if(&Lex::LBracket) {
            exp = index_or_slice(stream, token.l, exp)?;
        } else if let Some(token) = stream.next_if(&Lex::LParen) {
            let name = callee_name(&exp).ok_or(ParserError::InvalidCallee(token.l))?;
            let args = call_arguments(stream)?;
            exp = Expression::Call(name, args);
        } else if stream.composite_allowed() && stream.test_if(&Lex::LBrace) {
            match exp {
                Expression::Identifier(ref name) => {
                    let name = name.clone();
                    exp = struct_literal(stream, &name)?;
                }
                _ => break,
            }
        } else {
            break;
        }
    }

    Ok(Some(exp))
}

fn operand(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    match stream.peek().map(|t| t.s.clone()) {
        Some(Lex::Integer(i)) => {
            stream.next();
            Ok(Some(Expression::Integer(i)))
        }
        Some(Lex::Bool(b)) => {
            stream.next();
            Ok(Some(Expression::Boolean(b)))
        }
        Some(Lex::StringLiteral(s)) => {
            stream.next();
            Ok(Some(Expression::StringLiteral(s)))
        }
        Some(Lex::Identifier(id)) => {
            stream.next();
            Ok(Some(Expression::Identifier(id)))
        }
        Some(Lex::LParen) => {
            let token = stream.next_must_be(&Lex::LParen)?;
            let prev = stream.allow_composite(true);
            let exp = expression(stream)?;
            stream.allow_composite(prev);
            let exp = exp.ok_or(ParserError::ExpectedExpressionAfter(token.l, "(".into()))?;
            stream.next_must_be(&Lex::RParen)?;
            Ok(Some(exp))
        }
        _ => Ok(None),
    }
}

fn index_or_slice(
    stream: &mut TokenStream,
    line: u32,
    array: Expression,
) -> Result<Expression, ParserError> {
    let low = expression(stream)?;
    let exp = if stream.next_if(&Lex::Colon).is_some() {
        let high = expression(stream)?;
        Expression::Slice {
            array: Box::new(array),
            low: low.map(Box::new),
            high: high.map(Box::new),
        }
    } else {
        let index = low.ok_or(ParserError::ExpectedExpressionAfter(line, "[".into()))?;
        Expression::Index {
            array: Box::new(array),
            index: Box::new(index),
        }
    };
    stream.next_must_be(&Lex::RBracket)?;
    Ok(exp)
}

/// Calls are made on a plain name or a dotted name such as `fmt.Println`.
fn callee_name(exp: &Expression) -> Option<String> {
    match exp {
        Expression::Identifier(id) => Some(id.clone()),
        Expression::FieldAccess(base, field) => {
            callee_name(base).map(|base| format!("{}.{}", base, field))
        }
        _ => None,
    }
}

fn call_arguments(stream: &mut TokenStream) -> Result<Vec<Expression>, ParserError> {
    trace!(stream);
    let prev = stream.allow_composite(true);
    let mut args = vec![];
    while stream.next_if(&Lex::RParen).is_none() {
        let line = stream.line();
        let arg = expression(stream)?
            .ok_or(ParserError::ExpectedButFound(line, Lex::RParen, stream.found()))?;
        args.push(arg);

        if stream.next_if(&Lex::Comma).is_none() {
            stream.next_must_be(&Lex::RParen)?;
            break;
        }
    }
    stream.allow_composite(prev);
    Ok(args)
}

fn struct_literal(stream: &mut TokenStream, name: &str) -> Result<Expression, ParserError> {
    trace!(stream);
    let open = stream.next_must_be(&Lex::LBrace)?;
    let prev = stream.allow_composite(true);

    let mut fields = vec![];
    while stream.next_if(&Lex::RBrace).is_none() {
        let field = if stream.test_ifn(vec![Lex::Identifier("".into()), Lex::Colon]) {
            let (line, key) = stream.next_if_id().ok_or(ParserError::ExpectedIdentifierAfter(
                open.l,
                "{".into(),
            ))?;
            stream.next_must_be(&Lex::Colon)?;
            let value = expression(stream)?
                .ok_or(ParserError::ExpectedExpressionAfter(line, format!("{}:", key)))?;
            FieldInit::keyed(&key, value)
        } else {
            let line = stream.line();
            let value = expression(stream)?
                .ok_or(ParserError::ExpectedButFound(line, Lex::RBrace, stream.found()))?;
            FieldInit::positional(value)
        };
        fields.push(field);

        if stream.next_if(&Lex::Comma).is_none() {
            stream.next_must_be(&Lex::RBrace)?;
            break;
        }
    }
    stream.allow_composite(prev);

    let keyed = fields.iter().filter(|f| f.name.is_some()).count();
    if keyed != 0 && keyed != fields.len() {
        return Err(ParserError::MixedFieldInit(open.l, name.into()));
    }

    Ok(Expression::StructLiteral(name.into(), fields))
}
