//! Rendering of command results: a plain-text report, or with `--json` one
//! `todo.v1` envelope on stdout.
//!
//! Success envelope: `{schema_version, command, status: "success", data,
//! warnings?, next_steps?}`. Error envelope: `{schema_version, command,
//! status: "error", error: {message, code, kind, details?, hint?}}`.

use std::fmt::Write as _;

use serde::Serialize;

use crate::error::{exit_codes, Error, Result};

pub const SCHEMA_VERSION: &str = "todo.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

/// Text report for one command: a header line, `key: value` summary rows,
/// then optional bullet sections.
#[derive(Debug, Clone, Default)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    details: Vec<String>,
    warnings: Vec<String>,
    next_steps: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            ..Self::default()
        }
    }

    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    pub fn push_detail(&mut self, value: impl Into<String>) {
        self.details.push(value.into());
    }

    pub fn push_warning(&mut self, value: impl Into<String>) {
        self.warnings.push(value.into());
    }

    pub fn push_next_step(&mut self, value: impl Into<String>) {
        self.next_steps.push(value.into());
    }
}

#[derive(Serialize)]
struct SuccessEnvelope<'a, T: Serialize> {
    schema_version: &'static str,
    command: &'a str,
    status: &'static str,
    data: &'a T,
    #[serde(skip_serializing_if = "no_items")]
    warnings: &'a [String],
    #[serde(skip_serializing_if = "no_items")]
    next_steps: &'a [String],
}

fn no_items(items: &&[String]) -> bool {
    items.is_empty()
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    schema_version: &'static str,
    command: &'a str,
    status: &'static str,
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    code: i32,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

/// Print a command result. `--quiet` silences the text report only.
pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        let (warnings, next_steps) = match human {
            Some(h) => (h.warnings.as_slice(), h.next_steps.as_slice()),
            None => (&[][..], &[][..]),
        };
        let envelope = SuccessEnvelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data,
            warnings,
            next_steps,
        };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else if let (false, Some(human)) = (options.quiet, human) {
        println!("{}", format_human(human));
    }
    Ok(())
}

/// Report a failed command: the envelope on stdout with `--json`, otherwise
/// `error:` and `hint:` lines on stderr.
pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let hint = error_hint(err);
    if !json {
        eprintln!("error: {err}");
        if let Some(hint) = hint {
            eprintln!("hint: {hint}");
        }
        return Ok(());
    }

    let envelope = ErrorEnvelope {
        schema_version: SCHEMA_VERSION,
        command,
        status: "error",
        error: ErrorBody {
            message: err.to_string(),
            code: err.exit_code(),
            kind: error_kind(err),
            details: err.details(),
            hint,
        },
    };
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

pub fn format_human(output: &HumanOutput) -> String {
    let mut text = output.header.clone();

    if !output.summary.is_empty() {
        text.push_str("\n\nSummary:");
        for (key, value) in &output.summary {
            if value.is_empty() {
                let _ = write!(text, "\n- {key}");
            } else {
                let _ = write!(text, "\n- {key}: {value}");
            }
        }
    }
    for (title, items) in [
        ("Details", &output.details),
        ("Warnings", &output.warnings),
        ("Next steps", &output.next_steps),
    ] {
        if items.is_empty() {
            continue;
        }
        let _ = write!(text, "\n\n{title}:");
        for item in items {
            let _ = write!(text, "\n- {item}");
        }
    }

    text
}

/// Global flags that consume the following argument
const VALUE_FLAGS: [&str; 5] = ["--home", "--user", "-u", "--password", "-p"];

/// Command name for error envelopes, worked out before clap parses so that
/// parse failures are still attributed. `config` keeps its subcommand.
pub fn infer_command_name_from_args() -> String {
    command_name_from(std::env::args().skip(1))
}

fn command_name_from(mut args: impl Iterator<Item = String>) -> String {
    let mut words = Vec::with_capacity(2);
    while let Some(arg) = args.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            args.next();
        } else if !arg.starts_with('-') {
            words.push(arg);
            let nested = words.len() == 1 && words[0] == "config";
            if !nested {
                break;
            }
        }
    }

    if words.is_empty() {
        "todo".to_string()
    } else {
        words.join(" ")
    }
}

fn error_kind(err: &Error) -> &'static str {
    if err.exit_code() == exit_codes::USER_ERROR {
        "user_error"
    } else if err.is_storage() {
        "storage_error"
    } else {
        "operation_failed"
    }
}

fn error_hint(err: &Error) -> Option<String> {
    let hint = match err {
        Error::AuthFailed(_) => "todo register --user <name> --password <pw>".to_string(),
        Error::TaskNotFound(_) => "todo list".to_string(),
        Error::InvalidConfig(_) => "fix .todo.toml or run `todo config init --force`".to_string(),
        Error::LockFailed(path) => format!(
            "another todo process holds {}; retry shortly",
            path.display()
        ),
        Error::Json(_) => "inspect the data files in the todo home directory".to_string(),
        _ => return None,
    };
    Some(hint)
}
