use crate::cli::Command;
use checkcode_core::{Code, UniquenessGuard};
use checkcode_generator::{issue_unique, CodeScheme};
use serde::Serialize;
use std::io::Write;
use tracing::info;

/// A batch of freshly issued codes, as printed by `generate --json`.
#[derive(Debug, Serialize)]
struct GeneratedBatch<'a> {
    scheme: &'a str,
    code_length: usize,
    space: u128,
    codes: Vec<Code>,
}

/// Runs one subcommand against a configured scheme and guard.
///
/// Returns `false` when `validate` rejected at least one code.
pub async fn execute<S, G>(
    command: &Command,
    scheme_name: &str,
    scheme: &S,
    guard: &G,
    max_attempts: u32,
    out: &mut impl Write,
) -> anyhow::Result<bool>
where
    S: CodeScheme,
    G: UniquenessGuard + ?Sized,
{
    match command {
        Command::Space => {
            writeln!(
                out,
                "A code of {} characters including a check digit has space of {}",
                scheme.code_length(),
                group_thousands(scheme.space())
            )?;
            Ok(true)
        }
        Command::Generate { count, json } => {
            let mut codes = Vec::new();
            for _ in 0..*count {
                codes.push(issue_unique(scheme, guard, max_attempts).await?);
            }
            info!(count = codes.len(), scheme = scheme_name, "generated codes");

            if *json {
                let batch = GeneratedBatch {
                    scheme: scheme_name,
                    code_length: scheme.code_length(),
                    space: scheme.space(),
                    codes,
                };
                serde_json::to_writer_pretty(&mut *out, &batch)?;
                writeln!(out)?;
            } else {
                for code in &codes {
                    writeln!(out, "{code}")?;
                }
            }
            Ok(true)
        }
        Command::Validate { codes, normalize } => {
            let mut all_valid = true;
            for input in codes {
                let candidate = if *normalize {
                    input.trim().to_uppercase()
                } else {
                    input.clone()
                };
                let validation = scheme.validate(&candidate);
                match validation.reason() {
                    None => writeln!(out, "{candidate}: valid")?,
                    Some(reason) => {
                        all_valid = false;
                        writeln!(out, "{candidate}: invalid: {reason}")?;
                    }
                }
            }
            Ok(all_valid)
        }
    }
}

/// Formats `value` with comma thousands separators, e.g. `6,436,343`.
fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
