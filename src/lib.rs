//! Stack VM to Hack assembly translator for the nand2tetris platform.
//!
//! Translates VM programs (a single `.vm` file or a directory of `.vm`
//! files) into one Hack assembly file. Every output starts with the
//! bootstrap prologue, so separately translated files link into a single
//! program through the `Sys.init` entry point and the shared calling
//! convention.
//!
//! # Usage
//!
//! - Single source: [`translate`] / [`translate_file`]
//! - Whole program: [`translate_directory`]

pub mod bootstrap;
pub mod codegen;
pub mod error;
pub mod memory;
pub mod parser;

use std::fs;
use std::path::{Path, PathBuf};

use crate::codegen::CodeWriter;
pub use crate::error::{Result, VMError};
use crate::parser::parse_line;

/// Translate a single VM source string into a complete Hack program.
pub fn translate(source: &str, unit: &str) -> Result<String> {
    let mut writer = CodeWriter::new();
    let mut output = String::with_capacity(source.lines().count() * 40 + 256);
    bootstrap::write_bootstrap(&mut output);
    translate_unit(source, unit, unit, &mut writer, &mut output)?;
    Ok(output)
}

/// Translate one source unit into the shared output.
///
/// `unit` namespaces static symbols; `display_name` is what error
/// messages cite (the file name, where one exists).
fn translate_unit(
    source: &str,
    unit: &str,
    display_name: &str,
    writer: &mut CodeWriter,
    output: &mut String,
) -> Result<()> {
    writer.set_unit(unit);
    for (idx, line) in source.lines().enumerate() {
        if let Some(cmd) = parse_line(line, idx + 1, display_name)? {
            writer.translate(&cmd, output);
        }
    }
    Ok(())
}

/// Translate a single `.vm` file into a complete Hack program.
pub fn translate_file(path: &Path) -> Result<String> {
    let source = read_source(path)?;
    translate(&source, unit_name(path))
}

/// Translate every `.vm` file directly inside a directory (non-recursive)
/// into one Hack program. Files are processed in sorted order so the
/// output is deterministic; the writer is shared across files and only
/// the unit name changes between them.
pub fn translate_directory(dir_path: &Path) -> Result<String> {
    let mut vm_files: Vec<PathBuf> = fs::read_dir(dir_path)
        .map_err(|e| VMError::FileRead {
            path: dir_path.display().to_string(),
            source: e,
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "vm"))
        .collect();

    if vm_files.is_empty() {
        return Err(VMError::NoVmFiles {
            path: dir_path.display().to_string(),
        });
    }
    vm_files.sort();

    let mut writer = CodeWriter::new();
    let mut output = String::with_capacity(vm_files.len() * 4096);
    bootstrap::write_bootstrap(&mut output);

    for vm_file in &vm_files {
        let source = read_source(vm_file)?;
        let display = vm_file
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("Unknown.vm");
        translate_unit(&source, unit_name(vm_file), display, &mut writer, &mut output)?;
    }

    Ok(output)
}

/// Where the output for a given input belongs.
///
/// - `Foo.vm` -> `Foo.asm` (sibling)
/// - `dir/` -> `dir/dir.asm`
pub fn output_path(input: &Path) -> PathBuf {
    if input.is_dir() {
        let dir_name = input
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        input.join(format!("{}.asm", dir_name))
    } else {
        input.with_extension("asm")
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| VMError::FileRead {
        path: path.display().to_string(),
        source: e,
    })
}

/// Base name without extension, used to namespace statics.
fn unit_name(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("Unknown")
}
