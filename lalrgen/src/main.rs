use clap::crate_authors;
use structopt::StructOpt;

use std::{
    fs,
    io::prelude::*,
    path::{Path, PathBuf},
};

fn with_changed_extension(path: &Path, new_extension: &str) -> PathBuf {
    let mut new_path = PathBuf::new();
    if let Some(dir) = path.parent() {
        new_path.push(dir);
    }
    new_path.push(path.file_stem().unwrap());
    new_path.set_extension(new_extension);
    new_path
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "lalrgen",
    about = "Lexer and LALR(1) parser table generator",
    author = crate_authors!(),
)]
struct CLOptions {
    /// Overwrite the output file (if it exists)
    #[structopt(short, long)]
    force: bool,
    /// Total number of shift/reduce and/or reduce/reduce conflicts that are expected.
    #[structopt(short, long)]
    expect: Option<usize>,
    /// The path of the JSON file containing the grammar specification.
    #[structopt(parse(from_os_str))]
    specification: PathBuf,
}

fn main() {
    env_logger::init();
    let cl_options = CLOptions::from_args();
    let output_path = with_changed_extension(&cl_options.specification, "json");
    if output_path == cl_options.specification {
        writeln!(std::io::stderr(), "refusing to overwrite the input specification").unwrap();
        std::process::exit(1);
    }
    if output_path.exists() && !cl_options.force {
        writeln!(
            std::io::stderr(),
            "{}: output file already exists",
            output_path.to_string_lossy()
        )
        .unwrap();
        std::process::exit(1);
    }
    let expected_number_of_conflicts = cl_options.expect.unwrap_or(0);

    let text = match fs::read_to_string(&cl_options.specification) {
        Ok(text) => text,
        Err(error) => {
            writeln!(std::io::stderr(), "Error reading specification file: {:?}", error).unwrap();
            std::process::exit(2);
        }
    };

    let spec: lalrgen::GrammarSpec = match serde_json::from_str(&text) {
        Ok(spec) => spec,
        Err(error) => {
            writeln!(std::io::stderr(), "Error parsing specification: {:?}", error).unwrap();
            std::process::exit(3);
        }
    };

    let language_data = match lalrgen::compile(&spec) {
        Ok(data) => data,
        Err(lalrgen::CoreError::Conflict(conflicts)) => {
            if conflicts.len() == expected_number_of_conflicts {
                writeln!(
                    std::io::stderr(),
                    "Note: {} expected conflict(s) present; aborting output anyway \
                     (no partial LanguageData is ever emitted).",
                    conflicts.len()
                )
                .unwrap();
            } else {
                writeln!(std::io::stderr(), "Unexpected conflicts ({}):", conflicts.len()).unwrap();
                for conflict in &conflicts {
                    writeln!(std::io::stderr(), "  {}", conflict).unwrap();
                }
            }
            std::process::exit(5);
        }
        Err(error) => {
            writeln!(std::io::stderr(), "Compilation failed: {}", error).unwrap();
            std::process::exit(4);
        }
    };

    let mut file = match fs::File::create(&output_path) {
        Ok(file) => file,
        Err(error) => {
            writeln!(
                std::io::stderr(),
                "{}: problems writing file: {:?}.",
                output_path.to_string_lossy(),
                error
            )
            .unwrap();
            std::process::exit(6);
        }
    };
    if let Err(error) = serde_json::to_writer_pretty(&mut file, &language_data) {
        writeln!(std::io::stderr(), "{}: problems serializing output: {:?}.", output_path.to_string_lossy(), error)
            .unwrap();
        std::process::exit(6);
    }
}
