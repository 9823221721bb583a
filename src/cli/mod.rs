//! CLI argument parsing and file discovery

use crate::error::{format_parse_error, Error, Result};
use crate::options::{Options, ParamStyle, TempNames};
use crate::value::Params;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// twsql - expand two-way SQL templates
#[derive(Parser, Debug)]
#[command(name = "twsql")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Expand a template and print the resulting SQL
    Render(RenderArgs),
    /// Check that templates are well formed (exit code 1 if not)
    Check {
        /// Files, directories or glob patterns
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Line terminator used by the templates
        #[arg(long, value_enum, default_value_t = NewlineArg::Lf)]
        newline: NewlineArg,
    },
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Template file (use - for stdin)
    pub file: PathBuf,

    /// JSON file holding an object of parameters
    #[arg(short, long)]
    pub params: Option<PathBuf>,

    /// Keep ordinary comments in the output
    #[arg(long)]
    pub keep_comments: bool,

    /// Line terminator used by the template
    #[arg(long, value_enum, default_value_t = NewlineArg::Lf)]
    pub newline: NewlineArg,

    /// Placeholder style: named (:name) or pyformat (%(name)s)
    #[arg(long, default_value = "named")]
    pub style: String,

    /// Name loop parameters <STEM>0, <STEM>1, ... instead of random names
    #[arg(long, value_name = "STEM")]
    pub temp_prefix: Option<String>,

    /// Print {"sql": ..., "parameters": ...} instead of bare SQL
    #[arg(long)]
    pub json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewlineArg {
    Lf,
    Crlf,
    Cr,
}

impl NewlineArg {
    pub fn as_str(self) -> &'static str {
        match self {
            NewlineArg::Lf => "\n",
            NewlineArg::Crlf => "\r\n",
            NewlineArg::Cr => "\r",
        }
    }
}

impl RenderArgs {
    pub fn options(&self) -> Result<Options> {
        let mut options = Options::default()
            .with_newline(self.newline.as_str())
            .with_param_style(self.style.parse::<ParamStyle>()?);
        if self.keep_comments {
            options = options.keep_comments();
        }
        if let Some(stem) = &self.temp_prefix {
            options = options.with_temp_names(TempNames::Sequential(stem.clone()));
        }
        options.validate()?;
        Ok(options)
    }

    /// Parameters from `--params`, empty when not given
    pub fn load_params(&self) -> Result<Params> {
        let Some(path) = &self.params else {
            return Ok(Params::new());
        };
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| Error::Validation {
            message: format!("{}: invalid parameters: {}", path.display(), e),
        })
    }
}

/// Expand template files, directories and glob patterns into `.sql` files
pub fn discover_sql_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    if path.is_dir() {
        let mut files: Vec<PathBuf> = WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| is_sql(p))
            .collect();
        files.sort();
        return files;
    }

    match glob::glob(&path.to_string_lossy()) {
        Ok(paths) => paths
            .filter_map(|p| p.ok())
            .filter(|p| p.is_file() && is_sql(p))
            .collect(),
        Err(_) => Vec::new(),
    }
}

fn is_sql(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "sql")
}

/// One-line error report for `source`, with a line/column excerpt for
/// parse errors
pub fn describe_error(source: &str, err: &Error) -> String {
    match err {
        Error::Parse {
            message,
            span: Some((offset, _)),
        } => format_parse_error(source, *offset, message),
        other => other.to_string(),
    }
}
