//! `crashviz` - Bar charts of the airplane crash record
//!
//! This library loads crash records, aggregates them per year or per
//! operator, and renders either view as draw commands that a surface (SVG by
//! default) turns into a picture. User actions are dispatched as commands to
//! a [`Controller`].

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod controller;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod record;
pub mod render;
pub mod scale;
pub mod source;
pub mod view;

pub use aggregate::{OperatorAggregate, YearAggregate, YearRange};
pub use config::Config;
pub use controller::{Command, Controller, Outcome};
pub use dataset::Dataset;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::CrashRecord;
pub use render::{DrawCommand, Renderer, SvgSurface};
pub use source::{load_dataset, CsvFileSource, RecordSource};
pub use view::{BarKey, ViewMode, ViewState};
