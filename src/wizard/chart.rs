//! Chart editor for the line and bar chart steps.

use crate::types::{ChartSpec, MetricId};
use crate::validate::{validate_equation, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartMode {
    List,
    Equation,
}

/// Which of the two charts a message targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartSlot {
    Line,
    Bar,
}

impl ChartSlot {
    pub fn label(self) -> &'static str {
        match self {
            ChartSlot::Line => "Line Chart",
            ChartSlot::Bar => "Bar Chart",
        }
    }
}

/// Both modes keep their last input; only the active one is persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartEditor {
    pub mode: Option<ChartMode>,
    pub members: Vec<MetricId>,
    pub equation: String,
}

impl ChartEditor {
    pub fn from_spec(spec: Option<&ChartSpec>) -> Self {
        match spec {
            Some(ChartSpec::List(members)) => Self {
                mode: Some(ChartMode::List),
                members: members.clone(),
                equation: String::new(),
            },
            Some(ChartSpec::Equation(expr)) => Self {
                mode: Some(ChartMode::Equation),
                members: Vec::new(),
                equation: expr.clone(),
            },
            None => Self::default(),
        }
    }

    /// Click-to-toggle membership; new members go to the end.
    pub fn toggle(&mut self, metric: MetricId) {
        if let Some(pos) = self.members.iter().position(|m| *m == metric) {
            self.members.remove(pos);
        } else {
            self.members.push(metric);
        }
    }

    pub fn is_selected(&self, metric: MetricId) -> bool {
        self.members.contains(&metric)
    }

    /// The equation error only counts while equation mode is active.
    pub fn error(&self) -> Option<ValidationError> {
        match self.mode {
            Some(ChartMode::Equation) => validate_equation(&self.equation).err(),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        match self.mode {
            Some(ChartMode::List) => !self.members.is_empty(),
            Some(ChartMode::Equation) => !self.equation.is_empty() && self.error().is_none(),
            None => false,
        }
    }

    pub fn to_spec(&self) -> Option<ChartSpec> {
        match self.mode? {
            ChartMode::List => Some(ChartSpec::List(self.members.clone())),
            ChartMode::Equation => Some(ChartSpec::Equation(self.equation.clone())),
        }
    }
}
