//! Assembly parser
//!
//! Turns a token stream into one [`Statement`] at a time. Operand encoding
//! choices (which literal becomes a tagged immediate, which stays a raw byte)
//! are made here so the encoder only has to lay bytes out.

use crate::error::{AssemblerError, Result};
use crate::lexer::{tokenize, Position, SpannedToken, Token, TokenStream};
use bytevm_isa::{Instruction, Opcode, Operand, Tag, Value, Width};

/// One parsed line item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub position: Position,
    pub kind: StatementKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    /// `name:`
    Label(String),
    Instruction(Instruction),
}

/// How a bare integer is encoded in a given operand slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LiteralMode {
    /// Raw byte in the first slot; must not collide with TOP or REF
    Leading,
    /// MOVB/MOVW/MOVD/MOVQ source: always tagged with the move width
    Sized(Width),
    /// MOV source: tagged with the narrowest width that holds the literal
    Inferred,
    /// Any other trailing slot: raw byte, tagged only when it collides with a tag
    Raw,
}

impl LiteralMode {
    fn for_slot(opcode: Opcode, index: usize) -> Self {
        if index == 0 {
            LiteralMode::Leading
        } else if let Some(width) = opcode.move_width() {
            LiteralMode::Sized(width)
        } else if opcode == Opcode::Move {
            LiteralMode::Inferred
        } else {
            LiteralMode::Raw
        }
    }
}

/// Parse a single instruction from assembly text
pub fn parse_instruction(text: &str) -> Result<Instruction> {
    let mut tokens = tokenize(text)?;
    let statement = parse_statement(&mut tokens)?.ok_or_else(|| AssemblerError::SyntaxError {
        position: tokens.position(),
        expected: "instruction".to_string(),
        found: "end of input".to_string(),
    })?;

    if let Some(extra) = tokens.peek() {
        return Err(unexpected(extra, "end of input"));
    }

    match statement.kind {
        StatementKind::Instruction(instr) => Ok(instr),
        StatementKind::Label(_) => Err(AssemblerError::SyntaxError {
            position: statement.position,
            expected: "instruction".to_string(),
            found: "label definition".to_string(),
        }),
    }
}

/// Parse the next statement, `None` at end of input
pub fn parse_statement(tokens: &mut TokenStream) -> Result<Option<Statement>> {
    let Some(SpannedToken { token, position }) = tokens.next_token() else {
        return Ok(None);
    };

    let name = match token {
        Token::Identifier(name) => name,
        other => {
            return Err(AssemblerError::SyntaxError {
                position,
                expected: "instruction".to_string(),
                found: other.to_string(),
            })
        }
    };

    if matches!(tokens.peek().map(|t| &t.token), Some(Token::Colon)) {
        tokens.next_token();
        return Ok(Some(Statement {
            position,
            kind: StatementKind::Label(name),
        }));
    }

    let opcode = Opcode::from_mnemonic(&name)
        .ok_or(AssemblerError::UnknownInstruction { position, mnemonic: name })?;

    let mut operands = Vec::with_capacity(opcode.arity());
    for index in 0..opcode.arity() {
        if index > 0 {
            expect(tokens, &Token::Comma, "`,`")?;
        }
        operands.push(parse_operand(tokens, opcode, index)?);
    }

    Ok(Some(Statement {
        position,
        kind: StatementKind::Instruction(Instruction::new(opcode, operands)),
    }))
}

fn parse_operand(tokens: &mut TokenStream, opcode: Opcode, index: usize) -> Result<Operand> {
    let SpannedToken { token, position } = next_or_eof(tokens, "operand")?;
    let mode = LiteralMode::for_slot(opcode, index);

    match token {
        Token::LBracket => parse_reference(tokens),
        Token::Identifier(name) => parse_keyword_operand(tokens, opcode, mode, &name, position),
        Token::Minus => Err(negative_literal(position)),
        other => match other.integer_value() {
            Some(value) => encode_literal(literal_magnitude(value, position)?, mode, position),
            None => Err(AssemblerError::SyntaxError {
                position,
                expected: "operand".to_string(),
                found: other.to_string(),
            }),
        },
    }
}

/// `[n]`, opening bracket already consumed
fn parse_reference(tokens: &mut TokenStream) -> Result<Operand> {
    let (address, position) = expect_integer(tokens)?;
    let address = u8::try_from(address).map_err(|_| AssemblerError::UnsupportedOperand {
        position,
        reason: format!("memory address {address} does not fit in a byte"),
    })?;
    expect(tokens, &Token::RBracket, "`]`")?;
    Ok(Operand::Reference(Value::Byte(address)))
}

fn parse_keyword_operand(
    tokens: &mut TokenStream,
    opcode: Opcode,
    mode: LiteralMode,
    name: &str,
    position: Position,
) -> Result<Operand> {
    if name.eq_ignore_ascii_case("TOP") {
        if mode == LiteralMode::Leading && opcode.writes_destination() {
            return Err(AssemblerError::UnsupportedOperand {
                position,
                reason: "TOP cannot be a destination; use PUSH instead".to_string(),
            });
        }
        return Ok(Operand::Top);
    }

    let Some(width) = Width::from_keyword(name) else {
        return Err(AssemblerError::UnimplementedFeature {
            position,
            name: "labels".to_string(),
        });
    };

    match mode {
        LiteralMode::Leading => {
            return Err(AssemblerError::UnsupportedOperand {
                position,
                reason: format!("{width} immediates are only allowed after the first operand"),
            })
        }
        LiteralMode::Sized(required) if required != width => {
            return Err(AssemblerError::UnsupportedOperand {
                position,
                reason: format!("{opcode} takes a {required} operand, found {width}"),
            })
        }
        _ => {}
    }

    let (literal, literal_position) = expect_integer(tokens)?;
    sized_immediate(width, literal, literal_position)
}

fn encode_literal(literal: u64, mode: LiteralMode, position: Position) -> Result<Operand> {
    match mode {
        LiteralMode::Leading => {
            let byte = literal as u8;
            if let Some(tag) = Tag::from_u8(byte).filter(|_| Tag::shadows_leading_literal(byte)) {
                return Err(AssemblerError::UnsupportedOperand {
                    position,
                    reason: format!("literal {literal} collides with the {tag} tag byte"),
                });
            }
            Ok(Operand::Literal(byte))
        }
        LiteralMode::Sized(width) => sized_immediate(width, literal, position),
        LiteralMode::Inferred => sized_immediate(Width::narrowest(literal), literal, position),
        LiteralMode::Raw => {
            let byte = literal as u8;
            if Tag::shadows_trailing_literal(byte) {
                Ok(Operand::Immediate(Value::Byte(byte)))
            } else {
                Ok(Operand::Literal(byte))
            }
        }
    }
}

fn sized_immediate(width: Width, literal: u64, position: Position) -> Result<Operand> {
    if !width.fits(literal) {
        return Err(AssemblerError::UnsupportedOperand {
            position,
            reason: format!("literal {literal} does not fit in {width}"),
        });
    }
    Ok(Operand::Immediate(Value::from_u64(width, literal)))
}

fn literal_magnitude(value: i64, position: Position) -> Result<u64> {
    u64::try_from(value).map_err(|_| negative_literal(position))
}

fn negative_literal(position: Position) -> AssemblerError {
    AssemblerError::UnsupportedOperand {
        position,
        reason: "negative literals are not supported".to_string(),
    }
}

fn expect_integer(tokens: &mut TokenStream) -> Result<(u64, Position)> {
    let spanned = next_or_eof(tokens, "integer")?;
    if spanned.token == Token::Minus {
        return Err(negative_literal(spanned.position));
    }
    match spanned.token.integer_value() {
        Some(value) => Ok((literal_magnitude(value, spanned.position)?, spanned.position)),
        None => Err(unexpected(&spanned, "integer")),
    }
}

fn expect(tokens: &mut TokenStream, expected: &Token, description: &str) -> Result<()> {
    let spanned = next_or_eof(tokens, description)?;
    if &spanned.token == expected {
        Ok(())
    } else {
        Err(unexpected(&spanned, description))
    }
}

fn next_or_eof(tokens: &mut TokenStream, expected: &str) -> Result<SpannedToken> {
    let position = tokens.position();
    tokens.next_token().ok_or_else(|| AssemblerError::SyntaxError {
        position,
        expected: expected.to_string(),
        found: "end of input".to_string(),
    })
}

fn unexpected(spanned: &SpannedToken, expected: &str) -> AssemblerError {
    AssemblerError::SyntaxError {
        position: spanned.position,
        expected: expected.to_string(),
        found: spanned.token.to_string(),
    }
}
