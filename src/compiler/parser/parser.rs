use log::debug;

use crate::{
    compiler::{
        ast::*,
        lexer::tokens::{Lex, Token},
    },
    diagnostics::config::TracingConfig,
    trace,
};

use super::{
    statement::{block, var_spec},
    tokenstream::TokenStream,
    ParserError, ParserResult,
};

/*
    Grammar
    PROGRAM := package IDENTIFIER ; [IMPORT ;]* [TOP_DECL ;]*
    IMPORT := import STRING | import ( [STRING ;]* )
    TOP_DECL := FUNC | VAR_DECL | TYPE_DECL
    FUNC := func IDENTIFIER ( [PARAMS] ) [TYPE] BLOCK
    PARAMS := ID_LIST TYPE [, ID_LIST TYPE]*
    TYPE_DECL := type IDENTIFIER TYPE
    TYPE := IDENTIFIER | struct { [ID_LIST TYPE ;]* }
    VAR_DECL := var VAR_SPEC | var ( [VAR_SPEC ;]* )
    VAR_SPEC := ID_LIST TYPE [= EXP_LIST] | ID_LIST = EXP_LIST
    BLOCK := { [STATEMENT ;]* }
*/

pub fn parse(tokens: Vec<Token>) -> Result<Program, ParserError> {
    parse_traced(tokens, TracingConfig::Off)
}

/// Parses a whole source file, printing a trace of each parsing function
/// entered on a line covered by `tracing`.
pub fn parse_traced(tokens: Vec<Token>, tracing: TracingConfig) -> Result<Program, ParserError> {
    let mut stream = TokenStream::new(&tokens);
    stream.set_tracing(tracing);

    let mut program = package(&mut stream)?;
    imports(&mut stream, &mut program)?;

    while stream.peek().is_some() {
        if stream.next_if(&Lex::Semicolon).is_some() {
            continue;
        }

        let start_index = stream.index();
        top_level_decl(&mut stream, &mut program)?;

        if stream.index() == start_index {
            return Err(ParserError::ExpectedDeclaration(
                stream.line(),
                stream.found(),
            ));
        }

        end_of_decl(&mut stream)?;
    }

    debug!(
        "Parsed package {}: {} globals, {} types, {} functions",
        program.package,
        program.globals.len(),
        program.types.len(),
        program.functions.len()
    );
    Ok(program)
}

fn package(stream: &mut TokenStream) -> Result<Program, ParserError> {
    trace!(stream);
    let line = stream.line();
    match stream.next_if(&Lex::Package) {
        Some(token) => {
            let (_, name) = stream
                .next_if_id()
                .ok_or(ParserError::ExpectedIdentifierAfter(token.l, "package".into()))?;
            end_of_decl(stream)?;
            Ok(Program::new(&name))
        }
        None => Err(ParserError::MissingPackage(line)),
    }
}

fn imports(stream: &mut TokenStream, program: &mut Program) -> Result<(), ParserError> {
    trace!(stream);
    while let Some(token) = stream.next_if(&Lex::Import) {
        if stream.next_if(&Lex::LParen).is_some() {
            while stream.next_if(&Lex::RParen).is_none() {
                if stream.next_if(&Lex::Semicolon).is_some() {
                    continue;
                }
                program.imports.push(import_path(stream, token.l)?);
            }
        } else {
            program.imports.push(import_path(stream, token.l)?);
        }
        end_of_decl(stream)?;
    }
    Ok(())
}

fn import_path(stream: &mut TokenStream, line: u32) -> Result<Import, ParserError> {
    match stream.next_if(&Lex::StringLiteral("".into())) {
        Some(Token {
            s: Lex::StringLiteral(path),
            ..
        }) => Ok(Import { path }),
        _ => Err(ParserError::ExpectedButFound(
            line,
            Lex::StringLiteral("".into()),
            stream.found(),
        )),
    }
}

fn top_level_decl(stream: &mut TokenStream, program: &mut Program) -> Result<(), ParserError> {
    trace!(stream);
    if let Some(f) = function_def(stream)? {
        program.functions.push(f);
    } else if let Some(t) = type_decl(stream)? {
        program.types.push(t);
    } else if let Some(mut vars) = var_decl(stream)? {
        program.globals.append(&mut vars);
    }
    Ok(())
}

/// Declarations and statements end in `;` unless they are the last thing
/// before a closing `)` or `}`, or the end of the file.
pub(super) fn end_of_decl(stream: &mut TokenStream) -> Result<(), ParserError> {
    if stream.next_if(&Lex::Semicolon).is_some()
        || stream.peek().is_none()
        || stream.test_if_one_of(vec![Lex::RParen, Lex::RBrace])
    {
        Ok(())
    } else {
        Err(ParserError::ExpectedButFound(
            stream.line(),
            Lex::Semicolon,
            stream.found(),
        ))
    }
}

fn function_def(stream: &mut TokenStream) -> ParserResult<FuncDecl> {
    trace!(stream);
    let fn_line = match stream.next_if(&Lex::Func) {
        Some(token) => token.l,
        None => return Ok(None),
    };

    let (_, fn_name) = stream
        .next_if_id()
        .ok_or(ParserError::ExpectedIdentifierAfter(fn_line, "func".into()))?;

    stream.next_must_be(&Lex::LParen)?;
    let params = parameter_list(stream)?;
    stream.next_must_be(&Lex::RParen)?;

    let ret_ty = if stream.test_if(&Lex::LBrace) {
        None
    } else {
        Some(consume_type(stream)?.ok_or(ParserError::ExpectedTypeAfter(
            stream.line(),
            format!("parameters of {}", fn_name),
        ))?)
    };

    let body = block(stream)?.ok_or(ParserError::ExpectedButFound(
        stream.line(),
        Lex::LBrace,
        stream.found(),
    ))?;

    Ok(Some(FuncDecl::new(&fn_name, params, ret_ty, body)))
}

fn parameter_list(stream: &mut TokenStream) -> Result<Vec<Parameter>, ParserError> {
    trace!(stream);
    let mut params = vec![];
    if stream.test_if(&Lex::RParen) {
        return Ok(params);
    }

    loop {
        for (name, ty) in id_declaration_list(stream)? {
            params.push(Parameter::new(&name, &ty));
        }
        if stream.next_if(&Lex::Comma).is_none() || stream.test_if(&Lex::RParen) {
            break;
        }
    }
    Ok(params)
}

/// Parses `a, b, c T` into one `(name, T)` pair per name.
pub(super) fn id_declaration_list(
    stream: &mut TokenStream,
) -> Result<Vec<(String, Type)>, ParserError> {
    trace!(stream);
    let names = identifier_list(stream)?;
    let ty = consume_type(stream)?.ok_or(ParserError::ExpectedTypeAfter(
        stream.line(),
        names.join(", "),
    ))?;
    Ok(names.into_iter().map(|n| (n, ty.clone())).collect())
}

pub(super) fn identifier_list(stream: &mut TokenStream) -> Result<Vec<String>, ParserError> {
    let line = stream.line();
    let mut names = vec![];
    loop {
        let (_, name) = stream.next_if_id().ok_or(ParserError::ExpectedButFound(
            line,
            Lex::Identifier("".into()),
            stream.found(),
        ))?;
        names.push(name);

        // a comma followed by a name continues the list; anything else ends it
        if stream.test_ifn(vec![Lex::Comma, Lex::Identifier("".into())]) {
            stream.next();
        } else {
            break;
        }
    }
    Ok(names)
}

fn type_decl(stream: &mut TokenStream) -> ParserResult<TypeDecl> {
    trace!(stream);
    match stream.next_if(&Lex::Type) {
        Some(token) => {
            let (_, name) = stream
                .next_if_id()
                .ok_or(ParserError::ExpectedIdentifierAfter(token.l, "type".into()))?;
            let ty = consume_type(stream)?
                .ok_or(ParserError::ExpectedTypeAfter(token.l, name.clone()))?;
            Ok(Some(TypeDecl::new(&name, ty)))
        }
        None => Ok(None),
    }
}

pub(super) fn consume_type(stream: &mut TokenStream) -> ParserResult<Type> {
    trace!(stream);
    if let Some((_, name)) = stream.next_if_id() {
        return Ok(Some(Type::from_name(&name)));
    }

    match stream.next_if(&Lex::Struct) {
        Some(_) => {
            stream.next_must_be(&Lex::LBrace)?;
            let mut fields = vec![];
            while stream.next_if(&Lex::RBrace).is_none() {
                if stream.next_if(&Lex::Semicolon).is_some() {
                    continue;
                }
                fields.append(&mut id_declaration_list(stream)?);
                end_of_decl(stream)?;
            }
            Ok(Some(Type::Struct(fields)))
        }
        None => Ok(None),
    }
}

pub(super) fn var_decl(stream: &mut TokenStream) -> ParserResult<Vec<VarDecl>> {
    trace!(stream);
    match stream.next_if(&Lex::Var) {
        Some(_) => {
            let mut specs = vec![];
            if stream.next_if(&Lex::LParen).is_some() {
                while stream.next_if(&Lex::RParen).is_none() {
                    if stream.next_if(&Lex::Semicolon).is_some() {
                        continue;
                    }
                    specs.push(var_spec(stream)?);
                    end_of_decl(stream)?;
                }
            } else {
                specs.push(var_spec(stream)?);
            }
            Ok(Some(specs))
        }
        None => Ok(None),
    }
}
