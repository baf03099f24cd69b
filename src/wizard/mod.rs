//! Report settings wizard.
//!
//! A seven-step state container. Field edits arrive as [`Message`]s; after
//! each one the container re-derives field errors and step completion with
//! the pure functions [`derive_errors`] and [`completion`], and reports
//! whether the persisted [`Settings`] projection changed so the caller can
//! hand it to the sync worker.
//!
//! Steps are freely navigable. Completion flags are progress hints only.

pub mod chart;
pub mod recipients;

use std::fmt;

use crate::types::{Domain, Frequency, MailingList, MetricId, Settings};
use crate::validate::{
    validate_days_back, validate_month_day, validate_time, validate_weekday, ValidationError,
};

pub use chart::{ChartEditor, ChartMode, ChartSlot};
pub use recipients::RecipientEditor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    DaysBack,
    Time,
    Frequency,
    MailingList,
    LineChart,
    BarChart,
    SendNow,
}

impl Step {
    pub const ALL: [Step; 7] = [
        Step::DaysBack,
        Step::Time,
        Step::Frequency,
        Step::MailingList,
        Step::LineChart,
        Step::BarChart,
        Step::SendNow,
    ];

    /// Steps that carry a completion flag (all but the send action).
    pub const TRACKED: [Step; 6] = [
        Step::DaysBack,
        Step::Time,
        Step::Frequency,
        Step::MailingList,
        Step::LineChart,
        Step::BarChart,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Step> {
        Step::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Step::DaysBack => "Days Back",
            Step::Time => "Time",
            Step::Frequency => "Frequency",
            Step::MailingList => "Mailing List",
            Step::LineChart => "Line Chart",
            Step::BarChart => "Bar Chart",
            Step::SendNow => "Send Now",
        }
    }

    pub fn next(self) -> Step {
        Step::from_index(self.index() + 1).unwrap_or(Step::SendNow)
    }

    pub fn prev(self) -> Step {
        self.index()
            .checked_sub(1)
            .and_then(Step::from_index)
            .unwrap_or(Step::DaysBack)
    }

    pub fn chart_slot(self) -> Option<ChartSlot> {
        match self {
            Step::LineChart => Some(ChartSlot::Line),
            Step::BarChart => Some(ChartSlot::Bar),
            _ => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Next,
    Back,
    GoTo(Step),
    SetDaysBack(String),
    SetTime(String),
    SetFrequency(Frequency),
    SetDay(String),
    SetRecipientInput(String),
    SetDomain(Domain),
    AddRecipient,
    RemoveRecipient(String),
    SetChartMode(ChartSlot, ChartMode),
    ToggleMetric(ChartSlot, MetricId),
    SetEquation(ChartSlot, String),
}

/// Inline messages for fields whose current text is invalid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub days_back: Option<ValidationError>,
    pub time: Option<ValidationError>,
    pub day: Option<ValidationError>,
    pub line_equation: Option<ValidationError>,
    pub bar_equation: Option<ValidationError>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        *self == FieldErrors::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wizard {
    pub step: Step,
    pub days_back: String,
    pub time: String,
    pub frequency: Option<Frequency>,
    pub day: String,
    pub recipients: RecipientEditor,
    pub line: ChartEditor,
    pub bar: ChartEditor,
    errors: FieldErrors,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new(Domain::default())
    }
}

impl Wizard {
    pub fn new(domain: Domain) -> Self {
        Self {
            step: Step::DaysBack,
            days_back: String::new(),
            time: String::new(),
            frequency: None,
            day: String::new(),
            recipients: RecipientEditor::new(Vec::new(), domain),
            line: ChartEditor::default(),
            bar: ChartEditor::default(),
            errors: FieldErrors::default(),
        }
    }

    /// Populate every field from the stored record. Absent values become
    /// their empty representation; chart modes come from the `type` tag.
    pub fn from_settings(settings: &Settings, domain: Domain) -> Self {
        let mut wizard = Self {
            days_back: settings.days_back.map(|n| n.to_string()).unwrap_or_default(),
            time: settings.time.clone(),
            frequency: settings.frequency,
            day: settings.days.first().cloned().unwrap_or_default(),
            recipients: RecipientEditor::new(settings.mailing_list.0.clone(), domain),
            line: ChartEditor::from_spec(settings.line_chart.as_ref()),
            bar: ChartEditor::from_spec(settings.bar_chart.as_ref()),
            ..Self::new(domain)
        };
        wizard.errors = derive_errors(&wizard);
        wizard
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn chart(&self, slot: ChartSlot) -> &ChartEditor {
        match slot {
            ChartSlot::Line => &self.line,
            ChartSlot::Bar => &self.bar,
        }
    }

    fn chart_mut(&mut self, slot: ChartSlot) -> &mut ChartEditor {
        match slot {
            ChartSlot::Line => &mut self.line,
            ChartSlot::Bar => &mut self.bar,
        }
    }

    /// Apply one message. Returns true when the persisted projection changed.
    pub fn update(&mut self, message: Message) -> bool {
        let before = self.to_settings();

        match message {
            Message::Next => self.step = self.step.next(),
            Message::Back => self.step = self.step.prev(),
            Message::GoTo(step) => self.step = step,
            Message::SetDaysBack(text) => self.days_back = text,
            Message::SetTime(text) => self.time = text,
            Message::SetFrequency(frequency) => self.frequency = Some(frequency),
            Message::SetDay(text) => self.day = text,
            Message::SetRecipientInput(text) => self.recipients.input = text,
            Message::SetDomain(domain) => self.recipients.domain = domain,
            Message::AddRecipient => {
                self.recipients.add();
            }
            Message::RemoveRecipient(address) => {
                self.recipients.remove(&address);
            }
            Message::SetChartMode(slot, mode) => self.chart_mut(slot).mode = Some(mode),
            Message::ToggleMetric(slot, metric) => self.chart_mut(slot).toggle(metric),
            Message::SetEquation(slot, text) => self.chart_mut(slot).equation = text,
        }

        self.errors = derive_errors(self);
        self.to_settings() != before
    }

    /// Project field state onto the persisted record.
    pub fn to_settings(&self) -> Settings {
        let days = match self.frequency {
            Some(frequency) if frequency.needs_day() && !self.day.is_empty() => {
                vec![self.day.clone()]
            }
            _ => Vec::new(),
        };

        Settings {
            days_back: self.days_back.parse::<u32>().ok().filter(|n| *n > 0),
            frequency: self.frequency,
            days,
            time: self.time.clone(),
            mailing_list: MailingList(self.recipients.addresses.clone()),
            line_chart: self.line.to_spec(),
            bar_chart: self.bar.to_spec(),
        }
    }

    /// The record to push to the store, or `None` while any field is invalid.
    pub fn syncable_settings(&self) -> Option<Settings> {
        self.errors.is_empty().then(|| self.to_settings())
    }

    pub fn completion(&self) -> [bool; 6] {
        completion(self)
    }
}

fn day_rule(frequency: Option<Frequency>, day: &str) -> Result<(), ValidationError> {
    match frequency {
        Some(Frequency::Weekly) => validate_weekday(day),
        Some(Frequency::Monthly) => validate_month_day(day),
        Some(Frequency::Daily) | None => Ok(()),
    }
}

/// Inline errors for the current field text.
pub fn derive_errors(wizard: &Wizard) -> FieldErrors {
    FieldErrors {
        days_back: validate_days_back(&wizard.days_back).err(),
        time: validate_time(&wizard.time).err(),
        day: day_rule(wizard.frequency, &wizard.day).err(),
        line_equation: wizard.line.error(),
        bar_equation: wizard.bar.error(),
    }
}

/// Per-step completion, in [`Step::TRACKED`] order.
pub fn completion(wizard: &Wizard) -> [bool; 6] {
    let frequency_done = match wizard.frequency {
        Some(frequency) if frequency.needs_day() => {
            !wizard.day.is_empty() && day_rule(Some(frequency), &wizard.day).is_ok()
        }
        Some(_) => true,
        None => false,
    };

    [
        !wizard.days_back.is_empty() && validate_days_back(&wizard.days_back).is_ok(),
        !wizard.time.is_empty() && validate_time(&wizard.time).is_ok(),
        frequency_done,
        !wizard.recipients.addresses.is_empty(),
        wizard.line.is_complete(),
        wizard.bar.is_complete(),
    ]
}
