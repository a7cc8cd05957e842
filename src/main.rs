//! Command-line front end for the VM translator.
//!
//! # Usage
//!
//! ```bash
//! # Single file: Foo.vm -> Foo.asm
//! vm2hack Foo.vm
//!
//! # Directory: dir/ -> dir/dir.asm, one program from all .vm files
//! vm2hack dir/
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use vm2hack::{VMError, output_path, translate_directory, translate_file};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("vm2hack v{} - VM to Hack assembly translator", env!("CARGO_PKG_VERSION"));
        eprintln!();
        eprintln!("Usage: vm2hack <file.vm | directory> [-v]");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  -v, --verbose    Show detailed progress");
        process::exit(1);
    }

    let verbose = args.iter().any(|a| a == "-v" || a == "--verbose");
    let input_path = Path::new(&args[1]);

    if !input_path.exists() {
        eprintln!("Error: path not found: {}", input_path.display());
        process::exit(1);
    }

    let start = Instant::now();

    let result = if input_path.is_dir() {
        run_directory(input_path, verbose)
    } else if input_path.extension().is_some_and(|ext| ext == "vm") {
        run_file(input_path, verbose)
    } else {
        Err(VMError::InvalidPath {
            path: input_path.display().to_string(),
        })
    };

    match result {
        Ok(output_file) => {
            if verbose {
                let elapsed = start.elapsed();
                eprintln!(
                    "Translated in {:.2}ms",
                    elapsed.as_secs_f64() * 1000.0
                );
            }
            println!("{}", output_file.display());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run_file(input: &Path, verbose: bool) -> Result<PathBuf, VMError> {
    if verbose {
        eprintln!("Translating file: {}", input.display());
    }
    let asm = translate_file(input)?;
    write_output(&output_path(input), &asm, verbose)
}

fn run_directory(input: &Path, verbose: bool) -> Result<PathBuf, VMError> {
    if verbose {
        eprintln!("Translating directory: {}", input.display());
    }
    let asm = translate_directory(input)?;
    write_output(&output_path(input), &asm, verbose)
}

fn write_output(output: &Path, asm: &str, verbose: bool) -> Result<PathBuf, VMError> {
    if output.exists() {
        println!("overwriting {}", output.display());
    }
    fs::write(output, asm).map_err(|e| VMError::FileWrite {
        path: output.display().to_string(),
        source: e,
    })?;

    if verbose {
        eprintln!("Wrote {} lines of assembly", asm.lines().count());
    }
    Ok(output.to_path_buf())
}
