//! tdat - a command line tool for handling TDAT files.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};

use tdat::{Builder, Model, Result};

/// A tool for validating and converting TDAT files
#[derive(Parser, Debug)]
#[command(name = "tdat")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse and validate a TDAT model
    ///
    /// Prints nothing and exits with code 0 if the model is valid,
    /// otherwise prints an error to stderr and exits with code 1.
    Validate {
        /// Read from the specified file instead of stdin
        #[arg(long = "in", value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// Parse and validate a TDAT model and convert it to JSON
    Json {
        /// Read from the specified file instead of stdin
        #[arg(long = "in", value_name = "FILE")]
        input: Option<PathBuf>,

        /// Write to the specified file instead of stdout
        #[arg(long = "out", value_name = "FILE")]
        output: Option<PathBuf>,

        /// Indent pattern for multi-line JSON; single-line if empty
        #[arg(long, value_name = "PATTERN", default_value = "")]
        indent: String,
    },
    /// Parse and validate a TDAT model and convert it to CSV
    Csv {
        /// Read from the specified file instead of stdin
        #[arg(long = "in", value_name = "FILE")]
        input: Option<PathBuf>,

        /// Write to the specified file instead of stdout
        #[arg(long = "out", value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Print a sample TDAT document
    Sample,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Validate { input } => {
            read_model(&input)?;
            Ok(())
        }
        Command::Json {
            input,
            output,
            indent,
        } => {
            let model = read_model(&input)?;
            let mut writer = open_output(&output)?;
            if indent.is_empty() {
                tdat::to_json_writer(&model, &mut writer)?;
            } else {
                tdat::to_json_writer_pretty(&model, &indent, &mut writer)?;
            }
            writeln!(writer)?;
            writer.flush()?;
            Ok(())
        }
        Command::Csv { input, output } => {
            let model = read_model(&input)?;
            let mut writer = open_output(&output)?;
            tdat::to_csv_writer(&model, &mut writer)?;
            writer.flush()?;
            Ok(())
        }
        Command::Sample => {
            print!("{}", sample()?);
            Ok(())
        }
    }
}

fn read_model(input: &Option<PathBuf>) -> Result<Model> {
    let model = match input {
        Some(path) => tdat::parse_file(path)?,
        None => tdat::parse_reader(io::stdin().lock())?,
    };
    tdat::validate_model(&model)?;
    Ok(model)
}

fn open_output(output: &Option<PathBuf>) -> Result<Box<dyn Write>> {
    match output {
        Some(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn sample() -> Result<String> {
    let mut builder = Builder::new();
    let table = builder.add_table("products");
    table
        .add_int_column("id")
        .add_float_column("rating")
        .add_bool_column("in_stock")
        .add_string_column("name")
        .add_time_column("date_of_entry");
    table
        .add_row()
        .add_int(Some(1))
        .add_float(Some(112.13))
        .add_bool(Some(true))
        .add_string(Some("a book"))
        .add_time(Some(Utc::now() - Duration::hours(10_000)));
    let model = builder.build()?;
    tdat::render_to_string(&model, 15)
}
