//! Interaction controller.
//!
//! All user actions arrive as [`Command`] values and go through
//! [`Controller::dispatch`]. The controller owns the [`ViewState`] and the
//! [`Renderer`]; it recomputes aggregates from the full dataset on every
//! render.
//!
//! A controller can only be built from a loaded [`Dataset`], so no command
//! can reach it before the initial load has finished.

use tracing::{debug, info};

use crate::aggregate::{aggregate_by_operator, aggregate_by_year, YearRange};
use crate::dataset::Dataset;
use crate::render::{render, ChartData, DrawCommand, RenderOptions, Renderer, Surface};
use crate::view::{BarKey, ViewMode, ViewState};

/// A user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Apply the year range inputs (raw text, as typed).
    RangeUpdate {
        /// Start-year input.
        start: String,
        /// End-year input.
        end: String,
    },
    /// Clear the year range and show every year.
    Reset,
    /// A bar was clicked.
    BarClicked(BarKey),
    /// The pointer entered an operator bar.
    BarHovered(String),
    /// The pointer left the hovered bar.
    HoverEnded,
    /// Return from the operator chart to the yearly chart.
    Back,
}

/// What a dispatched command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// State changed and the chart was redrawn.
    Rendered,
    /// The command does not apply in the current view.
    Ignored(&'static str),
}

impl Outcome {
    /// Whether the chart was redrawn.
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered)
    }
}

/// Routes commands to state changes and re-renders.
#[derive(Debug)]
pub struct Controller<S> {
    dataset: Dataset,
    options: RenderOptions,
    state: ViewState,
    renderer: Renderer<S>,
    frame: Vec<DrawCommand>,
}

impl<S: Surface> Controller<S> {
    /// Take over a loaded dataset and draw the initial yearly chart.
    pub fn start(dataset: Dataset, options: RenderOptions, surface: S) -> Self {
        let mut controller = Self {
            dataset,
            options,
            state: ViewState::new(),
            renderer: Renderer::new(surface),
            frame: Vec::new(),
        };
        controller.redraw();
        controller
    }

    /// Handle one command.
    pub fn dispatch(&mut self, command: Command) -> Outcome {
        debug!(?command, mode = %self.state.mode, "Dispatching command");
        match command {
            Command::RangeUpdate { start, end } => {
                self.state.back();
                self.state.year_range = YearRange::parse(&start, &end);
            }
            Command::Reset => {
                self.state.back();
                self.state.year_range = YearRange::unbounded();
            }
            Command::BarClicked(key) => {
                if self.state.mode != ViewMode::Aggregate {
                    return Outcome::Ignored("bars are only clickable on the yearly chart");
                }
                let BarKey::Year(year) = key else {
                    return Outcome::Ignored("not a year bar");
                };
                self.state.drill_down(year);
            }
            Command::BarHovered(operator) => {
                if self.state.mode != ViewMode::DrillDown {
                    return Outcome::Ignored("tooltips are only shown on the operator chart");
                }
                self.state.hovered = Some(operator);
            }
            Command::HoverEnded => {
                if self.state.hovered.take().is_none() {
                    return Outcome::Ignored("no tooltip showing");
                }
            }
            Command::Back => {
                if self.state.mode != ViewMode::DrillDown {
                    return Outcome::Ignored("already on the yearly chart");
                }
                self.state.back();
            }
        }
        self.redraw();
        Outcome::Rendered
    }

    /// Current view state.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// The shared dataset.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Commands of the most recent render.
    pub fn frame(&self) -> &[DrawCommand] {
        &self.frame
    }

    /// The drawing surface.
    pub fn surface(&self) -> &S {
        self.renderer.surface()
    }

    fn redraw(&mut self) {
        let records = self.dataset.records();
        let data = match (self.state.mode, self.state.selected_year) {
            (ViewMode::DrillDown, Some(year)) => ChartData::Operators {
                year,
                operators: aggregate_by_operator(records, year),
            },
            _ => {
                let range = self.state.year_range;
                ChartData::Years(aggregate_by_year(records, range.start, range.end))
            }
        };
        let commands = render(&self.state, &data, &self.options);
        self.renderer.present(&commands);
        info!(
            mode = %self.state.mode,
            year = ?self.state.selected_year,
            commands = commands.len(),
            "Rendered chart"
        );
        self.frame = commands;
    }
}
