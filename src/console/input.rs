//! Line parser for the interactive wizard.
//!
//! A line is either a global command (`next`, `save`, `send`, ...) or, failing
//! that, input for the field on the current step.

use crate::types::{Domain, Frequency, MetricId};
use crate::wizard::{ChartMode, Message, Step, Wizard};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Edit(Vec<Message>),
    Save,
    Send,
    Export,
    Schedule,
    Dismiss,
    Help,
    Logout,
    Quit,
    Redraw,
}

pub const HELP: &str = "\
Commands:
  next | back | goto <1-7>   move between steps
  save                       write pending changes now
  send                       email the report to yourself
  export                     build the slide deck on the server
  schedule                   re-install the server send schedule
  dismiss                    close the alert
  logout | quit
Field input:
  days back, time            type the value, or `clear`
  frequency                  daily | weekly | monthly, then the day (Mon or 15)
  mailing list               <username> to add, `domain gmail.com`, `rm <address>`
  charts                     list | equation, then kpi numbers to toggle or the equation
";

/// Parse one line typed while `wizard` is showing.
pub fn parse(line: &str, wizard: &Wizard) -> Result<Command, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Redraw);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let global = match (word.to_ascii_lowercase().as_str(), rest.is_empty()) {
        ("next" | "n", true) => Some(Command::Edit(vec![Message::Next])),
        ("back" | "b", true) => Some(Command::Edit(vec![Message::Back])),
        ("goto" | "g", false) => Some(Command::Edit(vec![Message::GoTo(parse_step(rest)?)])),
        ("save", true) => Some(Command::Save),
        ("send", true) => Some(Command::Send),
        ("export", true) => Some(Command::Export),
        ("schedule", true) => Some(Command::Schedule),
        ("dismiss" | "x", true) => Some(Command::Dismiss),
        ("help" | "?", true) => Some(Command::Help),
        ("logout", true) => Some(Command::Logout),
        ("quit" | "q" | "exit", true) => Some(Command::Quit),
        _ => None,
    };
    if let Some(command) = global {
        return Ok(command);
    }

    field_input(line, word, rest, wizard).map(Command::Edit)
}

fn parse_step(text: &str) -> Result<Step, String> {
    if let Ok(number) = text.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(Step::from_index)
            .ok_or_else(|| format!("No step {}; steps are 1-7", number));
    }
    let wanted = text.to_ascii_lowercase();
    Step::ALL
        .into_iter()
        .find(|step| step.label().to_ascii_lowercase() == wanted)
        .ok_or_else(|| format!("Unknown step '{}'", text))
}

fn field_input(
    line: &str,
    word: &str,
    rest: &str,
    wizard: &Wizard,
) -> Result<Vec<Message>, String> {
    let clear = line.eq_ignore_ascii_case("clear");

    match wizard.step {
        Step::DaysBack if clear => Ok(vec![Message::SetDaysBack(String::new())]),
        Step::DaysBack => Ok(vec![Message::SetDaysBack(line.to_string())]),
        Step::Time if clear => Ok(vec![Message::SetTime(String::new())]),
        Step::Time => Ok(vec![Message::SetTime(line.to_string())]),
        Step::Frequency => {
            if clear {
                return Ok(vec![Message::SetDay(String::new())]);
            }
            if let Ok(frequency) = line.parse::<Frequency>() {
                return Ok(vec![Message::SetFrequency(frequency)]);
            }
            let day = if word.eq_ignore_ascii_case("day") { rest } else { line };
            Ok(vec![Message::SetDay(day.to_string())])
        }
        Step::MailingList => match word.to_ascii_lowercase().as_str() {
            "domain" => {
                let domain: Domain = rest.parse()?;
                Ok(vec![Message::SetDomain(domain)])
            }
            "rm" | "remove" if !rest.is_empty() => {
                Ok(vec![Message::RemoveRecipient(rest.to_string())])
            }
            "add" if !rest.is_empty() => Ok(add_recipient(rest)),
            _ => Ok(add_recipient(line)),
        },
        Step::LineChart | Step::BarChart => {
            let slot = wizard
                .step
                .chart_slot()
                .ok_or_else(|| "Not a chart step".to_string())?;
            match line.to_ascii_lowercase().as_str() {
                "list" => return Ok(vec![Message::SetChartMode(slot, ChartMode::List)]),
                "equation" => return Ok(vec![Message::SetChartMode(slot, ChartMode::Equation)]),
                _ => {}
            }
            match wizard.chart(slot).mode {
                Some(ChartMode::List) => line
                    .split(|c: char| c.is_whitespace() || c == ',')
                    .filter(|token| !token.is_empty())
                    .map(|token| parse_metric(token).map(|id| Message::ToggleMetric(slot, id)))
                    .collect(),
                Some(ChartMode::Equation) if clear => {
                    Ok(vec![Message::SetEquation(slot, String::new())])
                }
                Some(ChartMode::Equation) => Ok(vec![Message::SetEquation(slot, line.to_string())]),
                None => Err("Choose `list` or `equation` first".to_string()),
            }
        }
        Step::SendNow => Err(format!("Unknown command '{}'; type `send` or `help`", word)),
    }
}

fn add_recipient(username: &str) -> Vec<Message> {
    vec![
        Message::SetRecipientInput(username.to_string()),
        Message::AddRecipient,
    ]
}

/// `kpi004` or just `4`.
fn parse_metric(token: &str) -> Result<MetricId, String> {
    token
        .parse::<u8>()
        .ok()
        .and_then(MetricId::new)
        .map(Ok)
        .unwrap_or_else(|| token.to_ascii_lowercase().parse())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::ChartSlot;

    fn at(step: Step) -> Wizard {
        let mut wizard = Wizard::default();
        wizard.update(Message::GoTo(step));
        wizard
    }

    fn kpi(n: u8) -> MetricId {
        MetricId::new(n).unwrap()
    }

    #[test]
    fn test_global_commands() {
        let wizard = Wizard::default();
        assert_eq!(parse("next", &wizard), Ok(Command::Edit(vec![Message::Next])));
        assert_eq!(parse("  SAVE ", &wizard), Ok(Command::Save));
        assert_eq!(parse("", &wizard), Ok(Command::Redraw));
        assert_eq!(
            parse("goto 5", &wizard),
            Ok(Command::Edit(vec![Message::GoTo(Step::LineChart)]))
        );
        assert_eq!(
            parse("goto mailing list", &wizard),
            Ok(Command::Edit(vec![Message::GoTo(Step::MailingList)]))
        );
        assert!(parse("goto 9", &wizard).is_err());
    }

    #[test]
    fn test_text_fields_take_the_whole_line() {
        assert_eq!(
            parse("09:30", &at(Step::Time)),
            Ok(Command::Edit(vec![Message::SetTime("09:30".into())]))
        );
        assert_eq!(
            parse("clear", &at(Step::DaysBack)),
            Ok(Command::Edit(vec![Message::SetDaysBack(String::new())]))
        );
    }

    #[test]
    fn test_frequency_step() {
        let wizard = at(Step::Frequency);
        assert_eq!(
            parse("Weekly", &wizard),
            Ok(Command::Edit(vec![Message::SetFrequency(Frequency::Weekly)]))
        );
        assert_eq!(
            parse("day 15", &wizard),
            Ok(Command::Edit(vec![Message::SetDay("15".into())]))
        );
        assert_eq!(
            parse("Mon", &wizard),
            Ok(Command::Edit(vec![Message::SetDay("Mon".into())]))
        );
    }

    #[test]
    fn test_mailing_list_step() {
        let wizard = at(Step::MailingList);
        assert_eq!(
            parse("alice", &wizard),
            Ok(Command::Edit(vec![
                Message::SetRecipientInput("alice".into()),
                Message::AddRecipient
            ]))
        );
        assert_eq!(
            parse("domain gmail.com", &wizard),
            Ok(Command::Edit(vec![Message::SetDomain(Domain::Gmail)]))
        );
        assert_eq!(
            parse("rm alice@nokia.com", &wizard),
            Ok(Command::Edit(vec![Message::RemoveRecipient("alice@nokia.com".into())]))
        );
        assert!(parse("domain example.org", &wizard).is_err());
    }

    #[test]
    fn test_chart_step_depends_on_mode() {
        let mut wizard = at(Step::BarChart);
        assert!(parse("kpi001", &wizard).is_err());

        wizard.update(Message::SetChartMode(ChartSlot::Bar, ChartMode::List));
        assert_eq!(
            parse("kpi001, 3", &wizard),
            Ok(Command::Edit(vec![
                Message::ToggleMetric(ChartSlot::Bar, kpi(1)),
                Message::ToggleMetric(ChartSlot::Bar, kpi(3)),
            ]))
        );
        assert!(parse("kpi010", &wizard).is_err());

        wizard.update(Message::SetChartMode(ChartSlot::Bar, ChartMode::Equation));
        assert_eq!(
            parse("kpi002 - kpi003", &wizard),
            Ok(Command::Edit(vec![Message::SetEquation(
                ChartSlot::Bar,
                "kpi002 - kpi003".into()
            )]))
        );
    }

    #[test]
    fn test_send_step_rejects_free_text() {
        assert!(parse("hello", &at(Step::SendNow)).is_err());
        assert_eq!(parse("send", &at(Step::SendNow)), Ok(Command::Send));
    }
}
