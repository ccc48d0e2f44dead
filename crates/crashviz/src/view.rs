//! View state shared between the controller and the renderer.

use serde::{Deserialize, Serialize};

use crate::aggregate::YearRange;

/// Which of the two charts is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Crash counts per year.
    #[default]
    Aggregate,
    /// Fatalities per operator for one year.
    DrillDown,
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Aggregate => write!(f, "aggregate"),
            Self::DrillDown => write!(f, "drill-down"),
        }
    }
}

/// Identifies the bar a pointer action hit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarKey {
    /// A bar of the yearly chart.
    Year(i32),
    /// A bar of the operator chart.
    Operator(String),
}

impl BarKey {
    /// Interpret free text as a key: integers are years, anything else an
    /// operator name.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        text.parse()
            .map_or_else(|_| Self::Operator(text.to_string()), Self::Year)
    }
}

impl std::fmt::Display for BarKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Year(year) => write!(f, "{year}"),
            Self::Operator(name) => write!(f, "{name}"),
        }
    }
}

/// Everything that decides what the next render draws.
///
/// Only the controller mutates this.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewState {
    /// Current chart.
    pub mode: ViewMode,
    /// Year being drilled into; set only in [`ViewMode::DrillDown`].
    pub selected_year: Option<i32>,
    /// Last-applied year filter of the yearly chart.
    pub year_range: YearRange,
    /// Operator under the pointer; set only in [`ViewMode::DrillDown`].
    pub hovered: Option<String>,
}

impl ViewState {
    /// Initial state: the unfiltered yearly chart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the yearly chart is showing.
    #[must_use]
    pub fn is_aggregate(&self) -> bool {
        self.mode == ViewMode::Aggregate
    }

    /// Switch to the operator chart for `year`.
    pub fn drill_down(&mut self, year: i32) {
        self.mode = ViewMode::DrillDown;
        self.selected_year = Some(year);
        self.hovered = None;
    }

    /// Return to the yearly chart, keeping the year filter.
    pub fn back(&mut self) {
        self.mode = ViewMode::Aggregate;
        self.selected_year = None;
        self.hovered = None;
    }
}
