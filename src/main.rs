//! twsql CLI - expand two-way SQL templates

use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use twsql::cli::{describe_error, discover_sql_files, Cli, Commands, NewlineArg, RenderArgs};
use twsql::{Options, Params};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => run_render(&args),
        Commands::Check { paths, newline } => run_check(&paths, newline),
    }
}

/// Run the render command
fn run_render(args: &RenderArgs) -> ExitCode {
    let options = match args.options() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };
    let params = match args.load_params() {
        Ok(params) => params,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    let source = match read_template(&args.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{}: {}", args.file.display(), e);
            return ExitCode::from(2);
        }
    };

    match twsql::parse_template(&source, &params, &options) {
        Ok((sql, parameters)) => {
            if args.json {
                print_json(&sql, &parameters)
            } else {
                print!("{}", sql);
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("{}: {}", args.file.display(), describe_error(&source, &e));
            ExitCode::from(2)
        }
    }
}

fn print_json(sql: &str, parameters: &Params) -> ExitCode {
    let output = serde_json::json!({
        "sql": sql,
        "parameters": parameters,
    });
    match serde_json::to_string_pretty(&output) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

/// Template text from stdin (`-`) or through the file loader
fn read_template(path: &Path) -> twsql::Result<String> {
    if path == Path::new("-") {
        let mut contents = String::new();
        io::stdin().read_to_string(&mut contents)?;
        return Ok(contents);
    }
    Ok(fs::read_to_string(path)?)
}

/// Run the check command
fn run_check(paths: &[PathBuf], newline: NewlineArg) -> ExitCode {
    let options = Options::default().with_newline(newline.as_str());
    let mut has_problems = false;
    let mut had_errors = false;

    for path in paths {
        let files = discover_sql_files(path);
        if files.is_empty() {
            eprintln!("{}: no SQL files found", path.display());
            had_errors = true;
        }

        for file in files {
            let source = match fs::read_to_string(&file) {
                Ok(source) => source,
                Err(e) => {
                    eprintln!("{}: {}", file.display(), e);
                    had_errors = true;
                    continue;
                }
            };
            if let Err(e) = twsql::check_template(&source, &options) {
                eprintln!("{}: {}", file.display(), describe_error(&source, &e));
                has_problems = true;
            }
        }
    }

    if had_errors {
        ExitCode::from(2)
    } else if has_problems {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
