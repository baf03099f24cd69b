//! Field validators for the settings wizard.
//!
//! Every check is pure and total: it returns `Ok(())` or a `ValidationError`
//! whose message is shown inline next to the field. Empty input means "unset"
//! and is accepted everywhere except the recipient username.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Three-letter weekday tokens accepted for weekly schedules.
pub const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("must be a positive integer")]
    DaysBack,
    #[error("must be at most 4294967295")]
    DaysBackTooLarge,
    #[error("invalid time (use HH:MM, 24h)")]
    Time,
    #[error("use 3-letter abbreviations (Mon, Tue, Wed, Thu, Fri, Sat, Sun)")]
    Weekday,
    #[error("must be a day of the month between 1 and 31")]
    MonthDay,
    #[error("invalid equation")]
    Equation,
    #[error("invalid email username")]
    LocalPart,
}

pub type Verdict = Result<(), ValidationError>;

fn time_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("time regex"))
}

/// operand := `(`* integer | kpi00[1-9] `)`*, joined by one of `+ - * /`.
/// Whitespace may sit between any two tokens, parentheses included.
fn equation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let operand = r"(?:\(\s*)*(?:kpi00[1-9]|[0-9]+)(?:\s*\))*";
        Regex::new(&format!(r"^\s*{operand}(?:\s*[-+*/]\s*{operand})*\s*$"))
            .expect("equation regex")
    })
}

fn local_part_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9._%+-]+$").expect("local part regex"))
}

/// Lookback window in days. Stored as `u32`, so larger values are rejected
/// with their own message.
pub fn validate_days_back(text: &str) -> Verdict {
    if text.is_empty() {
        return Ok(());
    }
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::DaysBack);
    }
    match text.parse::<u32>() {
        Ok(0) => Err(ValidationError::DaysBack),
        Ok(_) => Ok(()),
        Err(_) => Err(ValidationError::DaysBackTooLarge),
    }
}

pub fn validate_time(text: &str) -> Verdict {
    if text.is_empty() || time_regex().is_match(text) {
        Ok(())
    } else {
        Err(ValidationError::Time)
    }
}

pub fn validate_weekday(text: &str) -> Verdict {
    if text.is_empty() || WEEKDAYS.contains(&text) {
        Ok(())
    } else {
        Err(ValidationError::Weekday)
    }
}

pub fn validate_month_day(text: &str) -> Verdict {
    if text.is_empty() {
        return Ok(());
    }
    match text.parse::<u8>() {
        Ok(day) if (1..=31).contains(&day) => Ok(()),
        _ => Err(ValidationError::MonthDay),
    }
}

/// Syntactic check only; nothing is evaluated and parentheses are not balanced.
pub fn validate_equation(text: &str) -> Verdict {
    if text.is_empty() || equation_regex().is_match(text) {
        Ok(())
    } else {
        Err(ValidationError::Equation)
    }
}

/// Username part of a recipient address. Unlike the other fields, empty is rejected.
pub fn validate_local_part(text: &str) -> Verdict {
    if local_part_regex().is_match(text) {
        Ok(())
    } else {
        Err(ValidationError::LocalPart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_back_accepts_positive_integers() {
        for n in [1u32, 7, 30, 365, 10_000, u32::MAX] {
            assert_eq!(validate_days_back(&n.to_string()), Ok(()), "n = {n}");
        }
        assert_eq!(validate_days_back(""), Ok(()));
    }

    #[test]
    fn test_days_back_rejects_zero_negative_and_text() {
        for text in ["0", "-1", "-30", "abc", "7.5", "1e3", " 7"] {
            assert_eq!(
                validate_days_back(text),
                Err(ValidationError::DaysBack),
                "text = {text:?}"
            );
        }
    }

    #[test]
    fn test_days_back_above_u32_has_its_own_message() {
        for text in ["4294967296", "99999999999999999999999"] {
            assert_eq!(
                validate_days_back(text),
                Err(ValidationError::DaysBackTooLarge),
                "text = {text:?}"
            );
        }
        assert_eq!(
            ValidationError::DaysBackTooLarge.to_string(),
            "must be at most 4294967295"
        );
    }

    #[test]
    fn test_time_accepts_every_valid_minute() {
        for h in 0..24 {
            for m in 0..60 {
                let text = format!("{h:02}:{m:02}");
                assert_eq!(validate_time(&text), Ok(()), "{text}");
            }
        }
        assert_eq!(validate_time(""), Ok(()));
    }

    #[test]
    fn test_time_rejects_out_of_range() {
        for text in ["24:00", "23:60", "99:99", "9:30", "09:3", "0930", "09:30:00", "ab:cd"] {
            assert_eq!(validate_time(text), Err(ValidationError::Time), "{text}");
        }
    }

    #[test]
    fn test_weekday_exact_tokens_only() {
        for day in WEEKDAYS {
            assert_eq!(validate_weekday(day), Ok(()));
        }
        assert_eq!(validate_weekday(""), Ok(()));
        for text in ["mon", "MON", "Monday", "Mo", "Fri "] {
            assert_eq!(validate_weekday(text), Err(ValidationError::Weekday), "{text}");
        }
    }

    #[test]
    fn test_month_day_range() {
        assert_eq!(validate_month_day("1"), Ok(()));
        assert_eq!(validate_month_day("31"), Ok(()));
        assert_eq!(validate_month_day(""), Ok(()));
        assert_eq!(validate_month_day("0"), Err(ValidationError::MonthDay));
        assert_eq!(validate_month_day("32"), Err(ValidationError::MonthDay));
        assert_eq!(validate_month_day("Mon"), Err(ValidationError::MonthDay));
    }

    #[test]
    fn test_equation_accepts_grammar() {
        for text in [
            "kpi001 + kpi002",
            "(kpi003)",
            "12 * kpi004",
            "kpi009",
            "0",
            "((kpi001 - kpi002)) / 100",
            "  kpi005*kpi006-3  ",
            "( (kpi001) )",
            "( ( kpi001 + kpi002 ) )",
            "(kpi001 ) )",
            "",
        ] {
            assert_eq!(validate_equation(text), Ok(()), "{text:?}");
        }
    }

    #[test]
    fn test_equation_rejects_bad_input() {
        for text in [
            "kpi010",
            "kpi1",
            "kpi001 ++ kpi002",
            "kpi001 &",
            "kpi001 +",
            "* kpi001",
            "kpi0011",
            "-3",
            "kpi001 kpi002",
        ] {
            assert_eq!(
                validate_equation(text),
                Err(ValidationError::Equation),
                "{text:?}"
            );
        }
    }

    #[test]
    fn test_local_part_character_class() {
        assert_eq!(validate_local_part("alice"), Ok(()));
        assert_eq!(validate_local_part("a.l_i%c+e-1"), Ok(()));
        assert_eq!(validate_local_part("a!ice"), Err(ValidationError::LocalPart));
        assert_eq!(validate_local_part("al ice"), Err(ValidationError::LocalPart));
        assert_eq!(validate_local_part("alice@x"), Err(ValidationError::LocalPart));
        assert_eq!(validate_local_part(""), Err(ValidationError::LocalPart));
    }
}
