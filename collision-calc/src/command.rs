use collision_estimator::{DomainError, Mode, sanitize_digits};

use crate::error::Error;

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Recalculate with new raw bucket and hash inputs.
    Calculate { buckets: String, hashes: String },
    SetPrecision(usize),
    SetCutoff(u64),
    SetBucketMode(Mode),
    SetHashMode(Mode),
    Show,
    Quit,
    /// Blank line.
    Empty,
}

/// Parses an interactive line.
///
/// Lines starting with `:` are settings commands, anything else is a pair of raw
/// inputs separated by whitespace. Raw inputs are not validated here; they go through
/// the same sanitization as one-shot arguments.
pub fn parse_line(line: &str) -> Result<Command, Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Empty);
    }

    if let Some(rest) = line.strip_prefix(':') {
        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let argument = parts.next();

        return match name {
            "precision" | "p" => Ok(Command::SetPrecision(parse_number(
                require(name, argument)?,
                "decimal precision",
            )?)),
            "cutoff" | "c" => {
                Ok(Command::SetCutoff(parse_number(require(name, argument)?, "exact cutoff")?))
            }
            "bucket-mode" | "bm" => Ok(Command::SetBucketMode(require(name, argument)?.parse()?)),
            "hash-mode" | "hm" => Ok(Command::SetHashMode(require(name, argument)?.parse()?)),
            "show" => Ok(Command::Show),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            other => Err(Error::UnknownCommand(other.to_string())),
        };
    }

    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(buckets), Some(hashes), None) => {
            Ok(Command::Calculate { buckets: buckets.to_string(), hashes: hashes.to_string() })
        }
        _ => Err(Error::MalformedLine),
    }
}

fn require<'a>(command: &str, argument: Option<&'a str>) -> Result<&'a str, Error> {
    argument.ok_or_else(|| Error::MissingArgument { command: command.to_string() })
}

fn parse_number<T: std::str::FromStr>(raw: &str, field: &'static str) -> Result<T, DomainError> {
    let digits = sanitize_digits(raw);
    if digits.is_empty() {
        return Err(DomainError::InvalidInput { field, reason: "no digits".to_string() });
    }
    digits.parse().map_err(|_| DomainError::Overflow { field, limit: "a machine integer".to_string() })
}
