//! Text rendering of the wizard screen.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::banner::Banner;
use crate::schedule;
use crate::types::{Domain, Frequency, Identity, MetricId};
use crate::util::truncate_chars;
use crate::wizard::{ChartMode, ChartSlot, Step, Wizard};

/// Longest banner text shown before truncation.
const BANNER_MAX_CHARS: usize = 200;

fn stepper_cell(wizard: &Wizard, step: Step, mark: &str) -> String {
    let cursor = if step == wizard.step { ">" } else { " " };
    format!("{}{} {}", cursor, mark, step.label())
}

/// One-line progress bar: `[x]` complete, `[ ]` not, `>` marks the current step.
/// The send step has no completion flag and always shows `[>]`.
pub fn stepper(wizard: &Wizard) -> String {
    let done = wizard.completion();
    let mut cells: Vec<String> = Step::TRACKED
        .iter()
        .zip(done)
        .map(|(step, complete)| stepper_cell(wizard, *step, if complete { "[x]" } else { "[ ]" }))
        .collect();
    cells.push(stepper_cell(wizard, Step::SendNow, "[>]"));
    cells.join("  ")
}

pub fn banner(banner: &Banner) -> String {
    format!(
        "*** {}: {} ***  (type `dismiss` to close)",
        banner.severity.title(),
        truncate_chars(&banner.message, BANNER_MAX_CHARS)
    )
}

fn value_or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn chart_body(out: &mut String, wizard: &Wizard, slot: ChartSlot) {
    let chart = wizard.chart(slot);
    let mode = match chart.mode {
        Some(ChartMode::List) => "list",
        Some(ChartMode::Equation) => "equation",
        None => "not chosen",
    };
    let _ = writeln!(out, "{} mode: {}", slot.label(), mode);

    match chart.mode {
        Some(ChartMode::List) => {
            let cells: Vec<String> = MetricId::CATALOGUE
                .iter()
                .map(|id| {
                    let tick = if chart.is_selected(*id) { "*" } else { " " };
                    format!("[{}]{}", tick, id)
                })
                .collect();
            let _ = writeln!(out, "  {}", cells.join(" "));
        }
        Some(ChartMode::Equation) => {
            let _ = writeln!(out, "  equation: {}", value_or_dash(&chart.equation));
        }
        None => {
            let _ = writeln!(out, "  type `list` or `equation`");
        }
    }
}

/// Body of the current step, including its inline error.
pub fn step_body(wizard: &Wizard, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let errors = wizard.errors();

    let error = match wizard.step {
        Step::DaysBack => {
            let _ = writeln!(out, "Days back: {}", value_or_dash(&wizard.days_back));
            errors.days_back
        }
        Step::Time => {
            let _ = writeln!(out, "Send time (HH:MM): {}", value_or_dash(&wizard.time));
            errors.time
        }
        Step::Frequency => {
            let frequency = wizard.frequency.map(|f| f.as_str()).unwrap_or("-");
            let _ = writeln!(out, "Frequency: {}   Day: {}", frequency, value_or_dash(&wizard.day));
            let options: Vec<&str> = Frequency::ALL.iter().map(|f| f.as_str()).collect();
            let _ = writeln!(out, "  Options: {}", options.join(" | "));
            let settings = wizard.to_settings();
            let _ = writeln!(out, "  {}", schedule::describe(&settings));
            if let Some(next) = schedule::preview(&settings, now) {
                let _ = writeln!(out, "  Next send: {}", next);
            }
            errors.day
        }
        Step::MailingList => {
            let recipients = &wizard.recipients;
            if recipients.addresses.is_empty() {
                let _ = writeln!(out, "Recipients: none");
            } else {
                let _ = writeln!(out, "Recipients:");
                for address in &recipients.addresses {
                    let _ = writeln!(out, "  - {}", address);
                }
            }
            let domains: Vec<&str> = Domain::ALL.iter().map(|d| d.suffix()).collect();
            let _ = writeln!(
                out,
                "Adding under {} (available: {})",
                recipients.domain,
                domains.join(", ")
            );
            recipients.error
        }
        Step::LineChart => {
            chart_body(&mut out, wizard, ChartSlot::Line);
            errors.line_equation
        }
        Step::BarChart => {
            chart_body(&mut out, wizard, ChartSlot::Bar);
            errors.bar_equation
        }
        Step::SendNow => {
            let _ = writeln!(out, "Type `send` to email the report now.");
            None
        }
    };

    if let Some(error) = error {
        let _ = writeln!(out, "  ! {}", error);
    }
    out
}

/// Full screen: header, progress, current step, alert, status note.
pub fn screen(
    wizard: &Wizard,
    identity: &Identity,
    alert: Option<&Banner>,
    note: Option<&str>,
    now: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "Report settings ({})", identity.email);
    let _ = writeln!(out, "{}", stepper(wizard));
    let _ = writeln!(
        out,
        "Step {} of {}: {}",
        wizard.step.index() + 1,
        Step::ALL.len(),
        wizard.step
    );
    out.push_str(&step_body(wizard, now));
    if let Some(alert) = alert {
        let _ = writeln!(out, "{}", banner(alert));
    }
    if let Some(note) = note {
        let _ = writeln!(out, "{}", note);
    }
    out
}
