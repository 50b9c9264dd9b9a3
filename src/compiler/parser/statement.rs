use crate::{
    compiler::{ast::*, lexer::tokens::Lex},
    trace,
};

use super::{
    expression::{expression, expression_list},
    parser::{consume_type, end_of_decl, identifier_list, var_decl},
    tokenstream::TokenStream,
    ParserError, ParserResult,
};

pub(super) fn block(stream: &mut TokenStream) -> ParserResult<Block> {
    trace!(stream);
    if stream.next_if(&Lex::LBrace).is_none() {
        return Ok(None);
    }

    // the body of a block may hold composite literals even inside an if header
    let prev = stream.allow_composite(true);
    let mut stmts = vec![];
    while stream.next_if(&Lex::RBrace).is_none() {
        if stream.next_if(&Lex::Semicolon).is_some() {
            continue;
        }
        if stream.peek().is_none() {
            return Err(ParserError::ExpectedButFound(
                stream.line(),
                Lex::RBrace,
                "EOF".into(),
            ));
        }

        let mut stm = statement(stream)?
            .ok_or(ParserError::ExpectedStatement(stream.line(), stream.found()))?;
        stmts.append(&mut stm);
        end_of_decl(stream)?;
    }
    stream.allow_composite(prev);

    Ok(Some(Block::new(stmts)))
}

/// Parses one statement. A grouped `var (...)` yields one statement per line of the group.
pub(super) fn statement(stream: &mut TokenStream) -> ParserResult<Vec<Statement>> {
    trace!(stream);
    if let Some(decls) = var_decl(stream)? {
        return Ok(Some(decls.into_iter().map(Statement::VarDecl).collect()));
    }

    let stm = match return_stmt(stream)? {
        Some(r) => Some(r),
        None => match if_stmt(stream)? {
            Some(i) => Some(i),
            None => match for_stmt(stream)? {
                Some(f) => Some(f),
                None => match block(stream)? {
                    Some(b) => Some(Statement::Block(b)),
                    None => simple_statement(stream)?,
                },
            },
        },
    };

    Ok(stm.map(|s| vec![s]))
}

pub(super) fn var_spec(stream: &mut TokenStream) -> Result<VarDecl, ParserError> {
    trace!(stream);
    let line = stream.line();
    let names = identifier_list(stream)?;
    let ty = if stream.test_if(&Lex::Assign) {
        None
    } else {
        Some(
            consume_type(stream)?
                .ok_or(ParserError::ExpectedTypeAfter(line, names.join(", ")))?,
        )
    };

    let values = match stream.next_if(&Lex::Assign) {
        Some(token) => expression_list(stream)?
            .ok_or(ParserError::ExpectedExpressionAfter(token.l, "=".into()))?,
        None => vec![],
    };

    Ok(VarDecl { names, ty, values })
}

fn return_stmt(stream: &mut TokenStream) -> ParserResult<Statement> {
    trace!(stream);
    match stream.next_if(&Lex::Return) {
        Some(_) => {
            let exp = expression(stream)?;
            Ok(Some(Statement::Return(exp)))
        }
        None => Ok(None),
    }
}

fn if_stmt(stream: &mut TokenStream) -> ParserResult<Statement> {
    trace!(stream);
    let token = match stream.next_if(&Lex::If) {
        Some(token) => token,
        None => return Ok(None),
    };

    let prev = stream.allow_composite(false);
    let cond = expression(stream)?;
    stream.allow_composite(prev);
    let cond = cond.ok_or(ParserError::ExpectedExpressionAfter(token.l, "if".into()))?;

    let then_block = block(stream)?.ok_or(ParserError::ExpectedButFound(
        stream.line(),
        Lex::LBrace,
        stream.found(),
    ))?;

    let else_block = match stream.next_if(&Lex::Else) {
        Some(else_tok) => match if_stmt(stream)? {
            Some(else_if) => Some(Block::new(vec![else_if])),
            None => Some(block(stream)?.ok_or(ParserError::ExpectedButFound(
                else_tok.l,
                Lex::LBrace,
                stream.found(),
            ))?),
        },
        None => None,
    };

    Ok(Some(Statement::If {
        cond,
        then_block,
        else_block,
    }))
}

/// `for {}`, `for cond {}` and `for init; cond; post {}`.
fn for_stmt(stream: &mut TokenStream) -> ParserResult<Statement> {
    trace!(stream);
    let token = match stream.next_if(&Lex::For) {
        Some(token) => token,
        None => return Ok(None),
    };

    let prev = stream.allow_composite(false);
    let header = for_header(stream);
    stream.allow_composite(prev);
    let (init, cond, post) = header?;

    let body = block(stream)?.ok_or(ParserError::ExpectedButFound(
        token.l,
        Lex::LBrace,
        stream.found(),
    ))?;

    Ok(Some(Statement::For {
        init: init.map(Box::new),
        cond,
        post: post.map(Box::new),
        body,
    }))
}

type ForHeader = (Option<Statement>, Option<Expression>, Option<Statement>);

fn for_header(stream: &mut TokenStream) -> Result<ForHeader, ParserError> {
    if stream.test_if(&Lex::LBrace) {
        return Ok((None, None, None));
    }

    let init = if stream.test_if(&Lex::Semicolon) {
        None
    } else {
        let stm = simple_statement(stream)?.ok_or(ParserError::ExpectedStatement(
            stream.line(),
            stream.found(),
        ))?;

        // `for cond {`
        if stream.test_if(&Lex::LBrace) {
            return match stm {
                Statement::Expression(cond) => Ok((None, Some(cond), None)),
                _ => Err(ParserError::ExpectedButFound(
                    stream.line(),
                    Lex::Semicolon,
                    stream.found(),
                )),
            };
        }
        Some(stm)
    };

    stream.next_must_be(&Lex::Semicolon)?;
    let cond = if stream.test_if(&Lex::Semicolon) {
        None
    } else {
        expression(stream)?
    };
    stream.next_must_be(&Lex::Semicolon)?;

    let post = if stream.test_if(&Lex::LBrace) {
        None
    } else {
        simple_statement(stream)?
    };

    Ok((init, cond, post))
}

/// Expression statements, `:=`, `=`, `op=`, `++` and `--`.
pub(super) fn simple_statement(stream: &mut TokenStream) -> ParserResult<Statement> {
    trace!(stream);
    let line = stream.line();
    let mut lhs = match expression_list(stream)? {
        Some(lhs) => lhs,
        None => return Ok(None),
    };

    if let Some(token) = stream.next_if(&Lex::Define) {
        let names = lhs
            .into_iter()
            .map(|e| match e {
                Expression::Identifier(name) => Ok(name),
                _ => Err(ParserError::NonNameOnLhs(token.l)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let values = expression_list(stream)?
            .ok_or(ParserError::ExpectedExpressionAfter(token.l, ":=".into()))?;
        return Ok(Some(Statement::ShortVarDecl { names, values }));
    }

    if lhs.len() != 1 {
        return Err(ParserError::MultipleAssignment(line));
    }
    let target = lhs.remove(0);

    if let Some(token) = stream.next_if_one_of(vec![Lex::Inc, Lex::Dec]) {
        return Ok(Some(Statement::IncDec {
            target,
            increment: token.s == Lex::Inc,
        }));
    }

    let assign_ops = vec![
        Lex::Assign,
        Lex::AddAssign,
        Lex::SubAssign,
        Lex::MulAssign,
        Lex::DivAssign,
        Lex::ModAssign,
    ];
    match stream.next_if_one_of(assign_ops) {
        Some(token) => {
            let op = match token.s {
                Lex::AddAssign => AssignOperator::AddAssign,
                Lex::SubAssign => AssignOperator::SubAssign,
                Lex::MulAssign => AssignOperator::MulAssign,
                Lex::DivAssign => AssignOperator::DivAssign,
                Lex::ModAssign => AssignOperator::ModAssign,
                _ => AssignOperator::Assign,
            };
            let mut values = expression_list(stream)?
                .ok_or(ParserError::ExpectedExpressionAfter(token.l, format!("{}", op)))?;
            if values.len() != 1 {
                return Err(ParserError::MultipleAssignment(token.l));
            }
            Ok(Some(Statement::Assign {
                target,
                op,
                value: values.remove(0),
            }))
        }
        None => Ok(Some(Statement::Expression(target))),
    }
}
