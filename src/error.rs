//! Error types for VM translation.
//!
//! Parse errors carry the source file name, 1-based line number and the
//! offending text so messages point straight at the broken line.

use thiserror::Error;

/// VM translation error with full source context.
#[derive(Error, Debug)]
pub enum VMError {
    // Syntax errors
    #[error("syntax error in line {line} of {file}: {text}")]
    UnknownCommand {
        line: usize,
        file: String,
        text: String,
    },

    #[error("{file}:{line}: {command} is missing an argument")]
    MissingArgument {
        line: usize,
        file: String,
        command: String,
    },

    #[error("{file}:{line}: unexpected trailing tokens: {text}")]
    TrailingTokens {
        line: usize,
        file: String,
        text: String,
    },

    #[error("{file}:{line}: unknown segment: {segment}")]
    UnknownSegment {
        line: usize,
        file: String,
        segment: String,
    },

    #[error("{file}:{line}: expected a non-negative 16-bit integer, got: {value}")]
    InvalidIndex {
        line: usize,
        file: String,
        value: String,
    },

    #[error("{file}:{line}: invalid label or function name: {name}")]
    InvalidName {
        line: usize,
        file: String,
        name: String,
    },

    #[error("{file}:{line}: cannot pop into the constant segment")]
    PopToConstant { line: usize, file: String },

    #[error("{file}:{line}: pointer index {index} out of range (must be 0 or 1)")]
    PointerIndexRange {
        line: usize,
        file: String,
        index: u16,
    },

    #[error("{file}:{line}: temp index {index} out of range (must be 0-7)")]
    TempIndexRange {
        line: usize,
        file: String,
        index: u16,
    },

    // I/O and argument errors
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no .vm files found in directory: {path}")]
    NoVmFiles { path: String },

    #[error("'{path}' is not a .vm file or a directory")]
    InvalidPath { path: String },
}

/// Result type alias for VM translation.
pub type Result<T> = std::result::Result<T, VMError>;
