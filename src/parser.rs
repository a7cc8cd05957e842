//! Lexical recognizer for the nine VM command kinds.
//!
//! Each source line is classified into a tagged [`Command`] value with its
//! arguments extracted by value, so later stages never depend on parser
//! match state. Comments (`//` to end of line) and blank lines map to
//! `Ok(None)`.

use crate::error::{Result, VMError};

/// Arithmetic and logical operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

/// Virtual memory segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Argument,
    Local,
    Static,
    Constant,
    This,
    That,
    Pointer,
    Temp,
}

/// A parsed VM command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Arithmetic(ArithmeticOp),
    Push { segment: Segment, index: u16 },
    Pop { segment: Segment, index: u16 },
    Label { name: String },
    Goto { label: String },
    IfGoto { label: String },
    Function { name: String, num_locals: u16 },
    Call { name: String, num_args: u16 },
    Return,
}

/// Parse one source line.
///
/// Returns `Ok(None)` for blank lines and comment-only lines,
/// `Ok(Some(cmd))` for a well-formed command, and `Err` otherwise.
/// `line_num` is 1-based.
pub fn parse_line(line: &str, line_num: usize, filename: &str) -> Result<Option<Command>> {
    let code = line.split("//").next().unwrap_or("").trim();
    if code.is_empty() {
        return Ok(None);
    }

    let tokens: Vec<&str> = code.split_whitespace().collect();

    // A lone arithmetic mnemonic is never an identifier: try these first.
    if let Some(op) = arithmetic_op(tokens[0]) {
        expect_arity(&tokens, 1, line_num, filename, code)?;
        return Ok(Some(Command::Arithmetic(op)));
    }

    match tokens[0] {
        "push" => parse_push(&tokens, line_num, filename, code),
        "pop" => parse_pop(&tokens, line_num, filename, code),
        "label" | "goto" | "if-goto" => parse_flow(&tokens, line_num, filename, code),
        "function" => parse_function(&tokens, line_num, filename, code),
        "call" => parse_call(&tokens, line_num, filename, code),
        "return" => {
            expect_arity(&tokens, 1, line_num, filename, code)?;
            Ok(Some(Command::Return))
        }
        _ => Err(VMError::UnknownCommand {
            line: line_num,
            file: filename.to_string(),
            text: code.to_string(),
        }),
    }
}

fn arithmetic_op(mnemonic: &str) -> Option<ArithmeticOp> {
    match mnemonic {
        "add" => Some(ArithmeticOp::Add),
        "sub" => Some(ArithmeticOp::Sub),
        "neg" => Some(ArithmeticOp::Neg),
        "eq" => Some(ArithmeticOp::Eq),
        "gt" => Some(ArithmeticOp::Gt),
        "lt" => Some(ArithmeticOp::Lt),
        "and" => Some(ArithmeticOp::And),
        "or" => Some(ArithmeticOp::Or),
        "not" => Some(ArithmeticOp::Not),
        _ => None,
    }
}

fn parse_push(
    tokens: &[&str],
    line_num: usize,
    filename: &str,
    code: &str,
) -> Result<Option<Command>> {
    expect_arity(tokens, 3, line_num, filename, code)?;
    let segment = parse_segment(tokens[1], line_num, filename)?;
    let index = parse_index(tokens[2], line_num, filename)?;
    validate_index(segment, index, line_num, filename)?;
    Ok(Some(Command::Push { segment, index }))
}

fn parse_pop(
    tokens: &[&str],
    line_num: usize,
    filename: &str,
    code: &str,
) -> Result<Option<Command>> {
    expect_arity(tokens, 3, line_num, filename, code)?;
    let segment = parse_segment(tokens[1], line_num, filename)?;

    // The destination of a pop must be writable.
    if segment == Segment::Constant {
        return Err(VMError::PopToConstant {
            line: line_num,
            file: filename.to_string(),
        });
    }

    let index = parse_index(tokens[2], line_num, filename)?;
    validate_index(segment, index, line_num, filename)?;
    Ok(Some(Command::Pop { segment, index }))
}

fn parse_flow(
    tokens: &[&str],
    line_num: usize,
    filename: &str,
    code: &str,
) -> Result<Option<Command>> {
    expect_arity(tokens, 2, line_num, filename, code)?;
    let name = parse_name(tokens[1], line_num, filename)?;
    Ok(Some(match tokens[0] {
        "label" => Command::Label { name },
        "goto" => Command::Goto { label: name },
        _ => Command::IfGoto { label: name },
    }))
}

fn parse_function(
    tokens: &[&str],
    line_num: usize,
    filename: &str,
    code: &str,
) -> Result<Option<Command>> {
    expect_arity(tokens, 3, line_num, filename, code)?;
    let name = parse_name(tokens[1], line_num, filename)?;
    let num_locals = parse_index(tokens[2], line_num, filename)?;
    Ok(Some(Command::Function { name, num_locals }))
}

fn parse_call(
    tokens: &[&str],
    line_num: usize,
    filename: &str,
    code: &str,
) -> Result<Option<Command>> {
    expect_arity(tokens, 3, line_num, filename, code)?;
    let name = parse_name(tokens[1], line_num, filename)?;
    let num_args = parse_index(tokens[2], line_num, filename)?;
    Ok(Some(Command::Call { name, num_args }))
}

fn expect_arity(
    tokens: &[&str],
    expected: usize,
    line_num: usize,
    filename: &str,
    code: &str,
) -> Result<()> {
    if tokens.len() < expected {
        return Err(VMError::MissingArgument {
            line: line_num,
            file: filename.to_string(),
            command: tokens[0].to_string(),
        });
    }
    if tokens.len() > expected {
        return Err(VMError::TrailingTokens {
            line: line_num,
            file: filename.to_string(),
            text: code.to_string(),
        });
    }
    Ok(())
}

fn parse_segment(name: &str, line_num: usize, filename: &str) -> Result<Segment> {
    match name {
        "argument" => Ok(Segment::Argument),
        "local" => Ok(Segment::Local),
        "static" => Ok(Segment::Static),
        "constant" => Ok(Segment::Constant),
        "this" => Ok(Segment::This),
        "that" => Ok(Segment::That),
        "pointer" => Ok(Segment::Pointer),
        "temp" => Ok(Segment::Temp),
        _ => Err(VMError::UnknownSegment {
            line: line_num,
            file: filename.to_string(),
            segment: name.to_string(),
        }),
    }
}

fn parse_index(text: &str, line_num: usize, filename: &str) -> Result<u16> {
    text.parse::<u16>().map_err(|_| VMError::InvalidIndex {
        line: line_num,
        file: filename.to_string(),
        value: text.to_string(),
    })
}

/// Label and function names: a non-digit from `[A-Za-z_.:]` followed by
/// any of `[A-Za-z0-9_.:]`.
fn parse_name(name: &str, line_num: usize, filename: &str) -> Result<String> {
    let mut chars = name.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '.' || c == ':');
    let tail_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == ':');

    if head_ok && tail_ok {
        Ok(name.to_string())
    } else {
        Err(VMError::InvalidName {
            line: line_num,
            file: filename.to_string(),
            name: name.to_string(),
        })
    }
}

fn validate_index(segment: Segment, index: u16, line_num: usize, filename: &str) -> Result<()> {
    match segment {
        Segment::Pointer if index > 1 => Err(VMError::PointerIndexRange {
            line: line_num,
            file: filename.to_string(),
            index,
        }),
        Segment::Temp if index > 7 => Err(VMError::TempIndexRange {
            line: line_num,
            file: filename.to_string(),
            index,
        }),
        _ => Ok(()),
    }
}
