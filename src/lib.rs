//! twsql - two-way SQL templates
//!
//! A two-way SQL template is plain, runnable SQL whose dynamic parts live
//! in comments:
//!
//! ```sql
//! select * from /*$table*/users
//! where id = /*:id*/1
//! /*%if name*/
//!   and name = /*:name*/'example'
//! /*end*/
//! ```
//!
//! [`parse_template`] expands the directives against a parameter map and
//! returns SQL with bound placeholders plus the parameters to execute it
//! with.

pub mod cli;
pub mod directive;
pub mod error;
pub mod expr;
pub mod loader;
pub mod options;
pub mod scanner;
pub mod scope;
pub mod value;

pub use error::{Error, ErrorKind, Result};
pub use loader::TemplateLoader;
pub use options::{Options, ParamStyle, TempNames};
pub use value::{Params, Value};

use scanner::Scanner;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

static DEFAULT_LOADER: LazyLock<TemplateLoader> = LazyLock::new(TemplateLoader::from_env);

/// Expand `text` against `params`.
///
/// Returns the SQL and a new parameter map: a copy of `params` plus every
/// loop variable that a rendered bind directive referenced, under its
/// generated name.
pub fn parse_template(text: &str, params: &Params, options: &Options) -> Result<(String, Params)> {
    options.validate()?;
    debug!(
        len = text.len(),
        style = %options.param_style,
        params = params.len(),
        "parse template"
    );

    let (sql, bound) = Scanner::new(text, options).render(params)?;

    debug!(
        len = sql.len(),
        bound = bound.len() - params.len(),
        "template rendered"
    );
    Ok((sql, bound))
}

/// Alias of [`parse_template`]
pub fn parse_sql(text: &str, params: &Params, options: &Options) -> Result<(String, Params)> {
    parse_template(text, params, options)
}

/// Check that `text` is well formed without evaluating any directive:
/// every block comment is closed and every `if`/`for` expression parses.
pub fn check_template(text: &str, options: &Options) -> Result<()> {
    options.validate()?;
    Scanner::new(text, options).measure()
}

/// Load a template through the shared [`TemplateLoader`] and expand it
pub fn parse_file(path: &Path, params: &Params, options: &Options) -> Result<(String, Params)> {
    DEFAULT_LOADER.parse_file(path, params, options)
}
