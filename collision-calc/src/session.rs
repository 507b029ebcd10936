use std::collections::BTreeMap;
use std::io::Write;

use collision_estimator::{Outcome, Recalculator, estimate_specs};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinHandle;

use crate::command::{Command, parse_line};
use crate::error::Error;
use crate::report::{OutputFormat, Report, write_report};
use crate::settings::{Settings, describe};

/// Reads commands line by line and prints every published result.
///
/// Each input or settings change submits a new calculation; results of calculations
/// superseded before they finish are never printed. On end of input or `:quit` the
/// most recent calculation is awaited and printed.
pub async fn run_interactive<R, W>(
    input: R,
    out: &mut W,
    mut settings: Settings,
    format: OutputFormat,
    raw: bool,
) -> Result<(), Error>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let (recalculator, mut rx) = Recalculator::new();
    let mut lines = input.lines();

    let mut labels: BTreeMap<u64, (String, String)> = BTreeMap::new();
    let mut last_inputs: Option<(String, String)> = None;
    let mut last_printed = 0u64;
    let mut pending: Option<JoinHandle<bool>> = None;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };

                let command = match parse_line(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        writeln!(out, "error: {e}")?;
                        continue;
                    }
                };

                let recalculate = match command {
                    Command::Empty => false,
                    Command::Quit => break,
                    Command::Show => {
                        writeln!(out, "{}", settings.summary())?;
                        false
                    }
                    Command::Calculate { buckets, hashes } => {
                        last_inputs = Some((buckets, hashes));
                        true
                    }
                    other => match settings.apply(&other) {
                        Ok(changed) => changed,
                        Err(e) => {
                            writeln!(out, "error: {e}")?;
                            false
                        }
                    },
                };

                if let (true, Some((buckets, hashes))) = (recalculate, &last_inputs) {
                    pending = Some(submit(&recalculator, settings, buckets, hashes));
                    labels.insert(
                        recalculator.latest_sequence(),
                        (describe(settings.bucket_mode, buckets), describe(settings.hash_mode, hashes)),
                    );
                }
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let outcome = rx.borrow_and_update().clone();
                if let Some(outcome) = outcome.filter(|o| o.sequence > last_printed) {
                    print_outcome(out, &outcome, &mut labels, format, raw)?;
                    last_printed = outcome.sequence;
                }
            }
        }
    }

    if let Some(handle) = pending.take() {
        handle.await?;
    }
    let outcome = rx.borrow_and_update().clone();
    if let Some(outcome) = outcome.filter(|o| o.sequence > last_printed) {
        print_outcome(out, &outcome, &mut labels, format, raw)?;
    }

    Ok(())
}

fn submit(
    recalculator: &Recalculator,
    settings: Settings,
    buckets: &str,
    hashes: &str,
) -> JoinHandle<bool> {
    let buckets = buckets.to_string();
    let hashes = hashes.to_string();
    tracing::debug!(%buckets, %hashes, "submitting recalculation");

    recalculator.submit_with(move || {
        let (buckets, hashes) = settings.specs(&buckets, &hashes)?;
        estimate_specs(&buckets, &hashes, &settings.policy)
    })
}

fn print_outcome<W: Write>(
    out: &mut W,
    outcome: &Outcome,
    labels: &mut BTreeMap<u64, (String, String)>,
    format: OutputFormat,
    raw: bool,
) -> Result<(), Error> {
    let (buckets, hashes) = labels.remove(&outcome.sequence).unwrap_or_default();
    // Labels of older submissions will never be printed.
    *labels = labels.split_off(&(outcome.sequence + 1));

    if format == OutputFormat::Text {
        writeln!(out, "[{}] {} buckets, {} hashes", outcome.sequence, buckets, hashes)?;
    }
    let report = Report::new(buckets, hashes, &outcome.result);
    write_report(out, format, &report, &outcome.result, raw)
}
