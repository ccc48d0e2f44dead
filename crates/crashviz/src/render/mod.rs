//! Chart rendering.
//!
//! Rendering is split in two:
//!
//! - [`render`] is a pure function from view state and aggregates to an
//!   ordered list of [`DrawCommand`]s. It never touches a drawing surface.
//! - [`Renderer`] owns a [`Surface`] and is the only thing that clears it and
//!   draws commands onto it.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use crashviz::aggregate::aggregate_by_year;
//! use crashviz::render::{render, ChartData, Renderer, RenderOptions, SvgSurface};
//! use crashviz::{Config, CrashRecord, ViewState};
//!
//! let records = vec![CrashRecord::new(
//!     NaiveDate::from_ymd_opt(1908, 9, 17).unwrap(),
//!     "Military - U.S. Army",
//!     1,
//!     "Crashed during a demonstration flight.",
//! )];
//! let options = RenderOptions::from_config(&Config::default());
//! let data = ChartData::Years(aggregate_by_year(&records, None, None));
//! let commands = render(&ViewState::new(), &data, &options);
//!
//! let mut renderer = Renderer::new(SvgSurface::new(&options.layout));
//! renderer.present(&commands);
//! assert!(renderer.surface().document().starts_with("<svg"));
//! ```

mod svg;

pub use svg::SvgSurface;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::aggregate::{top_n, OperatorAggregate, YearAggregate};
use crate::config::Config;
use crate::error::Result;
use crate::scale::{BandScale, LinearScale};
use crate::view::{BarKey, ViewState};

/// Approximate number of ticks on value axes.
const VALUE_TICKS: usize = 10;

/// Horizontal distance between ranked-operator annotations.
const RANK_SPACING: f64 = 200.0;

/// Space reserved around the drawing area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    /// Space above the drawing area.
    pub top: f64,
    /// Space right of the drawing area.
    pub right: f64,
    /// Space below the drawing area (axis labels live here).
    pub bottom: f64,
    /// Space left of the drawing area.
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 30.0,
            bottom: 180.0,
            left: 60.0,
        }
    }
}

/// Canvas geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Layout {
    /// Full canvas width.
    pub canvas_width: f64,
    /// Full canvas height.
    pub canvas_height: f64,
    /// Margins around the drawing area.
    pub margin: Margin,
    /// Drawing-area width.
    pub width: f64,
    /// Drawing-area height.
    pub height: f64,
    /// Band padding.
    pub padding: f64,
}

impl Layout {
    /// Derive the drawing area from the canvas size and margins.
    #[must_use]
    pub fn new(canvas_width: f64, canvas_height: f64, margin: Margin, padding: f64) -> Self {
        Self {
            canvas_width,
            canvas_height,
            margin,
            width: canvas_width - margin.left - margin.right,
            height: canvas_height - margin.top - margin.bottom,
            padding,
        }
    }
}

/// Everything `render` needs besides state and data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderOptions {
    /// Canvas geometry.
    pub layout: Layout,
    /// Label only years divisible by this on the yearly axis.
    pub year_tick_interval: i32,
    /// Number of ranked operators to annotate.
    pub top_operators: usize,
    /// Year marked "Start Year" on the yearly chart.
    pub start_annotation_year: i32,
    /// Year marked "End Year" on the yearly chart.
    pub end_annotation_year: i32,
}

impl RenderOptions {
    /// Build options from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            layout: config.layout(),
            year_tick_interval: config.chart.year_tick_interval,
            top_operators: config.chart.top_operators,
            start_annotation_year: config.annotations.start_year,
            end_annotation_year: config.annotations.end_year,
        }
    }
}

/// Aggregated data for one render.
#[derive(Debug, Clone)]
pub enum ChartData<'a> {
    /// Crash counts per year.
    Years(Vec<YearAggregate>),
    /// Per-operator totals for one year.
    Operators {
        /// The selected year.
        year: i32,
        /// One entry per operator.
        operators: Vec<OperatorAggregate<'a>>,
    },
}

/// What a pointer action on a bar does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarAction {
    /// Clicking drills into the bar's year.
    DrillDown,
    /// Hovering shows the bar's tooltip.
    Tooltip,
}

/// Axis placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisOrient {
    /// Horizontal axis below the bars.
    Bottom,
    /// Vertical axis left of the bars.
    Left,
}

/// One labelled tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    /// Offset along the axis.
    pub position: f64,
    /// Label text.
    pub label: String,
}

/// Axis title, positioned relative to the axis origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitle {
    /// Title text.
    pub text: String,
    /// X offset (in the rotated frame when `rotation` is set).
    pub x: f64,
    /// Y offset (in the rotated frame when `rotation` is set).
    pub y: f64,
    /// Rotation in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

/// An axis with its ticks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    /// Which side the axis sits on.
    pub orient: AxisOrient,
    /// Origin x in drawing-area coordinates.
    pub x: f64,
    /// Origin y in drawing-area coordinates.
    pub y: f64,
    /// Length of the axis line.
    pub length: f64,
    /// Labelled ticks.
    pub ticks: Vec<Tick>,
    /// Rotation of tick labels in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_rotation: Option<f64>,
    /// Optional title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<AxisTitle>,
}

/// Styling group of an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    /// Start/end markers on the yearly chart.
    Marker,
    /// Ranked operator notes on the drill-down chart.
    Ranked,
    /// The "Current Year" label.
    YearLabel,
}

/// A textual note anchored at a point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    /// Styling group. Serialized as `style`; `kind` names the command.
    #[serde(rename = "style")]
    pub kind: AnnotationKind,
    /// Anchor x.
    pub x: f64,
    /// Anchor y.
    pub y: f64,
    /// Note offset from the anchor, x.
    pub dx: f64,
    /// Note offset from the anchor, y.
    pub dy: f64,
    /// Bold first line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Body lines.
    pub lines: Vec<String>,
    /// Draw a line from the anchor to the note.
    pub connector: bool,
}

/// One `label: value` row of a tooltip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TooltipLine {
    /// Bold label.
    pub label: String,
    /// Value text.
    pub value: String,
}

/// A single drawing instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Remove everything drawn so far.
    Clear,
    /// A bar.
    Bar {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Bar width.
        width: f64,
        /// Bar height.
        height: f64,
        /// Data key the bar represents.
        key: BarKey,
        /// Value the bar encodes.
        value: f64,
        /// Pointer behaviour.
        action: BarAction,
    },
    /// An axis.
    Axis(Axis),
    /// Free text.
    Text {
        /// Anchor x.
        x: f64,
        /// Anchor y.
        y: f64,
        /// The text.
        text: String,
        /// CSS class.
        class: String,
    },
    /// An annotation.
    Annotation(Annotation),
    /// A tooltip box.
    Tooltip {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Rows.
        lines: Vec<TooltipLine>,
    },
    /// Which host controls are visible with this chart.
    Controls {
        /// Year range inputs with update/reset triggers.
        range_controls: bool,
        /// The back trigger.
        back_button: bool,
    },
}

/// A drawing target.
pub trait Surface {
    /// Apply one command.
    fn apply(&mut self, command: &DrawCommand);
}

/// Owns a surface and redraws it from command lists.
#[derive(Debug)]
pub struct Renderer<S> {
    surface: S,
    frames: u64,
}

impl<S: Surface> Renderer<S> {
    /// Take ownership of `surface`.
    pub fn new(surface: S) -> Self {
        Self { surface, frames: 0 }
    }

    /// Clear the surface and draw `commands` on it.
    pub fn present(&mut self, commands: &[DrawCommand]) {
        if commands.first() != Some(&DrawCommand::Clear) {
            self.surface.apply(&DrawCommand::Clear);
        }
        for command in commands {
            self.surface.apply(command);
        }
        self.frames += 1;
        trace!(frame = self.frames, commands = commands.len(), "Presented frame");
    }

    /// The surface, for reading back what was drawn.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Number of frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Turn state and aggregates into draw commands.
///
/// The first command is always [`DrawCommand::Clear`].
#[must_use]
pub fn render(state: &ViewState, data: &ChartData<'_>, options: &RenderOptions) -> Vec<DrawCommand> {
    let mut commands = vec![DrawCommand::Clear];
    match data {
        ChartData::Years(years) => render_years(&mut commands, years, options),
        ChartData::Operators { year, operators } => render_operators(
            &mut commands,
            *year,
            operators,
            state.hovered.as_deref(),
            options,
        ),
    }
    commands
}

/// Serialize a frame as pretty-printed JSON, one object per command.
///
/// # Errors
///
/// Returns [`crate::Error::Json`] if serialization fails.
pub fn to_json(commands: &[DrawCommand]) -> Result<String> {
    Ok(serde_json::to_string_pretty(commands)?)
}

#[allow(clippy::cast_precision_loss)]
fn render_years(out: &mut Vec<DrawCommand>, years: &[YearAggregate], options: &RenderOptions) {
    let layout = &options.layout;

    let mut sorted = years.to_vec();
    sorted.sort_by_key(|y| y.year);

    let x = BandScale::new(sorted.iter().map(|y| y.year), (0.0, layout.width), layout.padding);
    let max = sorted.iter().map(|y| y.crash_count).max().unwrap_or(0);
    let y = LinearScale::for_values(max as f64, layout.height);

    for agg in &sorted {
        let Some(left) = x.map(&agg.year) else {
            continue;
        };
        let value = agg.crash_count as f64;
        let top = y.map(value);
        out.push(DrawCommand::Bar {
            x: left,
            y: top,
            width: x.bandwidth(),
            height: layout.height - top,
            key: BarKey::Year(agg.year),
            value,
            action: BarAction::DrillDown,
        });
    }

    // A non-positive interval labels every year
    let interval = options.year_tick_interval.max(1);
    let ticks = x
        .domain()
        .iter()
        .filter(|year| year.rem_euclid(interval) == 0)
        .filter_map(|year| {
            x.center(year).map(|position| Tick {
                position,
                label: year.to_string(),
            })
        })
        .collect();
    out.push(DrawCommand::Axis(Axis {
        orient: AxisOrient::Bottom,
        x: 0.0,
        y: layout.height,
        length: layout.width,
        ticks,
        label_rotation: None,
        title: Some(AxisTitle {
            text: "Year".to_string(),
            x: layout.width / 2.0,
            y: layout.margin.bottom - 50.0,
            rotation: None,
        }),
    }));
    out.push(value_axis(&y, layout, "Airplane Crashes", 20.0));

    let markers = [
        (options.start_annotation_year, "Start Year", false),
        (options.end_annotation_year, "End Year", true),
    ];
    for (year, label, at_end) in markers {
        let Some(left) = x.map(&year) else {
            debug!(year, "Annotated year not in view, skipping marker");
            continue;
        };
        let (anchor, dx) = if at_end {
            (left + x.bandwidth(), -100.0)
        } else {
            (left + x.bandwidth() / 2.0, 0.0)
        };
        out.push(DrawCommand::Annotation(Annotation {
            kind: AnnotationKind::Marker,
            x: anchor,
            y: layout.height,
            dx,
            dy: 40.0,
            title: None,
            lines: vec![format!("{label}: {year}")],
            connector: true,
        }));
    }

    out.push(DrawCommand::Controls {
        range_controls: true,
        back_button: false,
    });
}

#[allow(clippy::cast_precision_loss)]
fn render_operators(
    out: &mut Vec<DrawCommand>,
    year: i32,
    operators: &[OperatorAggregate<'_>],
    hovered: Option<&str>,
    options: &RenderOptions,
) {
    let layout = &options.layout;

    // Bars are drawn in rank order, highest total first
    let ranked = top_n(operators, operators.len());

    let x = BandScale::new(
        ranked.iter().map(|o| o.operator.clone()),
        (0.0, layout.width),
        layout.padding,
    );
    let max = ranked.first().map_or(0, |o| o.total_fatalities);
    let y = LinearScale::for_values(max as f64, layout.height);

    for agg in &ranked {
        let Some(left) = x.map(&agg.operator) else {
            continue;
        };
        let value = agg.total_fatalities as f64;
        let top = y.map(value);
        out.push(DrawCommand::Bar {
            x: left,
            y: top,
            width: x.bandwidth(),
            height: layout.height - top,
            key: BarKey::Operator(agg.operator.clone()),
            value,
            action: BarAction::Tooltip,
        });
    }

    let ticks = x
        .domain()
        .iter()
        .filter_map(|name| {
            x.center(name).map(|position| Tick {
                position,
                label: name.clone(),
            })
        })
        .collect();
    out.push(DrawCommand::Axis(Axis {
        orient: AxisOrient::Bottom,
        x: 0.0,
        y: layout.height,
        length: layout.width,
        ticks,
        label_rotation: Some(-45.0),
        title: None,
    }));
    out.push(value_axis(&y, layout, "Fatalities", 25.0));
    out.push(DrawCommand::Text {
        x: layout.width / 2.0,
        y: layout.height + layout.margin.bottom - 5.0,
        text: "Operator".to_string(),
        class: "axis-label".to_string(),
    });

    for (i, agg) in ranked.iter().take(options.top_operators).enumerate() {
        out.push(DrawCommand::Annotation(Annotation {
            kind: AnnotationKind::Ranked,
            x: layout.width / 2.0 - 100.0 + i as f64 * RANK_SPACING,
            y: -10.0,
            dx: 0.0,
            dy: 20.0,
            title: Some(rank_title(i + 1)),
            lines: vec![
                format!("Operator: {}", agg.operator),
                format!("Fatalities: {}", agg.total_fatalities),
                format!("Crashes: {}", agg.crash_count),
            ],
            connector: false,
        }));
    }

    out.push(DrawCommand::Annotation(Annotation {
        kind: AnnotationKind::YearLabel,
        x: layout.width - 120.0,
        y: 200.0,
        dx: 0.0,
        dy: 0.0,
        title: None,
        lines: vec![format!("Current Year: {year}")],
        connector: false,
    }));

    if let Some(name) = hovered {
        match ranked.iter().find(|o| o.operator == name) {
            Some(agg) => {
                let left = x.map(&agg.operator).unwrap_or(0.0);
                let top = y.map(agg.total_fatalities as f64);
                out.push(DrawCommand::Tooltip {
                    x: left + x.bandwidth() / 2.0 + 5.0,
                    y: top - 28.0,
                    lines: tooltip_lines(agg),
                });
            }
            None => debug!(operator = name, "Hovered operator not in view"),
        }
    }

    out.push(DrawCommand::Controls {
        range_controls: false,
        back_button: true,
    });
}

fn value_axis(y: &LinearScale, layout: &Layout, title: &str, title_inset: f64) -> DrawCommand {
    let ticks = y
        .ticks(VALUE_TICKS)
        .into_iter()
        .map(|v| Tick {
            position: y.map(v),
            label: format_tick(v),
        })
        .collect();
    DrawCommand::Axis(Axis {
        orient: AxisOrient::Left,
        x: 0.0,
        y: 0.0,
        length: layout.height,
        ticks,
        label_rotation: None,
        title: Some(AxisTitle {
            text: title.to_string(),
            x: -layout.height / 2.0,
            y: -layout.margin.left + title_inset,
            rotation: Some(-90.0),
        }),
    })
}

/// Tooltip rows for an operator bar.
#[must_use]
pub fn tooltip_lines(agg: &OperatorAggregate<'_>) -> Vec<TooltipLine> {
    let crash = agg.deadliest_crash;
    vec![
        TooltipLine {
            label: "Operator".to_string(),
            value: agg.operator.clone(),
        },
        TooltipLine {
            label: "Biggest Crash".to_string(),
            value: format!("occurred on {} - {}", crash.display_date(), crash.summary),
        },
        TooltipLine {
            label: "Number of Crashes".to_string(),
            value: agg.crash_count.to_string(),
        },
    ]
}

/// Title of the annotation for the operator ranked `rank` (1-based).
#[must_use]
pub fn rank_title(rank: usize) -> String {
    if rank == 1 {
        "Most Fatalities".to_string()
    } else {
        format!("{rank}{} Most Fatalities", ordinal_suffix(rank))
    }
}

fn ordinal_suffix(n: usize) -> &'static str {
    if (11..=13).contains(&(n % 100)) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

#[allow(clippy::cast_possible_truncation)]
fn format_tick(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{aggregate_by_operator, aggregate_by_year};
    use crate::record::CrashRecord;
    use chrono::NaiveDate;

    fn rec(year: i32, operator: &str, fatalities: u32) -> CrashRecord {
        CrashRecord::new(
            NaiveDate::from_ymd_opt(year, 6, 15).unwrap(),
            operator,
            fatalities,
            format!("{operator} accident"),
        )
    }

    fn records() -> Vec<CrashRecord> {
        vec![
            rec(1908, "Military - U.S. Army", 1),
            rec(1912, "Military - U.S. Navy", 5),
            rec(1972, "Aeroflot", 100),
            rec(1972, "Pan Am", 20),
            rec(1972, "Aeroflot", 74),
            rec(1972, "KLM", 30),
            rec(1972, "Lufthansa", 20),
            rec(2009, "Air France", 228),
        ]
    }

    fn options() -> RenderOptions {
        RenderOptions::from_config(&Config::default())
    }

    fn bars(commands: &[DrawCommand]) -> Vec<&DrawCommand> {
        commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Bar { .. }))
            .collect()
    }

    fn annotations(commands: &[DrawCommand]) -> Vec<&Annotation> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Annotation(a) => Some(a),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_years_render_starts_with_clear() {
        let records = records();
        let data = ChartData::Years(aggregate_by_year(&records, None, None));
        let commands = render(&ViewState::new(), &data, &options());
        assert_eq!(commands.first(), Some(&DrawCommand::Clear));
    }

    #[test]
    fn test_years_one_bar_per_year_sorted() {
        let records = records();
        let data = ChartData::Years(aggregate_by_year(&records, None, None));
        let commands = render(&ViewState::new(), &data, &options());

        let keys: Vec<BarKey> = bars(&commands)
            .into_iter()
            .filter_map(|c| match c {
                DrawCommand::Bar { key, action, .. } => {
                    assert_eq!(*action, BarAction::DrillDown);
                    Some(key.clone())
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            keys,
            vec![
                BarKey::Year(1908),
                BarKey::Year(1912),
                BarKey::Year(1972),
                BarKey::Year(2009)
            ]
        );
    }

    #[test]
    fn test_years_tallest_bar_fills_height() {
        let records = records();
        let data = ChartData::Years(aggregate_by_year(&records, None, None));
        let commands = render(&ViewState::new(), &data, &options());
        let height = options().layout.height;

        let tallest = bars(&commands)
            .into_iter()
            .find_map(|c| match c {
                DrawCommand::Bar {
                    key: BarKey::Year(1972),
                    y,
                    height: h,
                    ..
                } => Some((*y, *h)),
                _ => None,
            })
            .unwrap();
        assert!(tallest.0.abs() < 1e-9);
        assert!((tallest.1 - height).abs() < 1e-9);
    }

    #[test]
    fn test_years_two_fixed_markers() {
        let records = records();
        let data = ChartData::Years(aggregate_by_year(&records, None, None));
        let commands = render(&ViewState::new(), &data, &options());

        let notes = annotations(&commands);
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].lines, vec!["Start Year: 1908".to_string()]);
        assert_eq!(notes[1].lines, vec!["End Year: 2009".to_string()]);
        assert!(notes.iter().all(|a| a.kind == AnnotationKind::Marker));
    }

    #[test]
    fn test_years_markers_skipped_outside_range() {
        let records = records();
        let data = ChartData::Years(aggregate_by_year(&records, Some(1950), Some(1980)));
        let commands = render(&ViewState::new(), &data, &options());
        assert!(annotations(&commands).is_empty());
    }

    #[test]
    fn test_years_axis_ticks_every_interval() {
        let records: Vec<CrashRecord> = (1915..=1945).map(|y| rec(y, "A", 1)).collect();
        let data = ChartData::Years(aggregate_by_year(&records, None, None));
        let commands = render(&ViewState::new(), &data, &options());

        let bottom = commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Axis(axis) if axis.orient == AxisOrient::Bottom => Some(axis),
                _ => None,
            })
            .unwrap();
        let labels: Vec<&str> = bottom.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["1920", "1940"]);
        assert_eq!(bottom.title.as_ref().unwrap().text, "Year");
    }

    #[test]
    fn test_years_shows_range_controls() {
        let data = ChartData::Years(Vec::new());
        let commands = render(&ViewState::new(), &data, &options());
        assert_eq!(
            commands.last(),
            Some(&DrawCommand::Controls {
                range_controls: true,
                back_button: false
            })
        );
    }

    #[test]
    fn test_empty_years_render() {
        let data = ChartData::Years(Vec::new());
        let commands = render(&ViewState::new(), &data, &options());
        assert!(bars(&commands).is_empty());
        for command in &commands {
            if let DrawCommand::Axis(axis) = command {
                assert!(axis.ticks.iter().all(|t| t.position.is_finite()));
            }
        }
    }

    #[test]
    fn test_operators_ranked_bars_and_annotations() {
        let records = records();
        let mut state = ViewState::new();
        state.drill_down(1972);
        let data = ChartData::Operators {
            year: 1972,
            operators: aggregate_by_operator(&records, 1972),
        };
        let commands = render(&state, &data, &options());

        let keys: Vec<String> = bars(&commands)
            .into_iter()
            .filter_map(|c| match c {
                DrawCommand::Bar {
                    key: BarKey::Operator(name),
                    action: BarAction::Tooltip,
                    ..
                } => Some(name.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(keys, vec!["Aeroflot", "KLM", "Pan Am", "Lufthansa"]);

        let notes = annotations(&commands);
        let ranked: Vec<&&Annotation> = notes
            .iter()
            .filter(|a| a.kind == AnnotationKind::Ranked)
            .collect();
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].title.as_deref(), Some("Most Fatalities"));
        assert_eq!(ranked[1].title.as_deref(), Some("2nd Most Fatalities"));
        assert_eq!(ranked[2].title.as_deref(), Some("3rd Most Fatalities"));
        assert_eq!(
            ranked[0].lines,
            vec![
                "Operator: Aeroflot".to_string(),
                "Fatalities: 174".to_string(),
                "Crashes: 2".to_string()
            ]
        );

        let label = notes
            .iter()
            .find(|a| a.kind == AnnotationKind::YearLabel)
            .unwrap();
        assert_eq!(label.lines, vec!["Current Year: 1972".to_string()]);
    }

    #[test]
    fn test_operators_fewer_than_three() {
        let records = records();
        let data = ChartData::Operators {
            year: 2009,
            operators: aggregate_by_operator(&records, 2009),
        };
        let commands = render(&ViewState::new(), &data, &options());
        let ranked = annotations(&commands)
            .into_iter()
            .filter(|a| a.kind == AnnotationKind::Ranked)
            .count();
        assert_eq!(ranked, 1);
    }

    #[test]
    fn test_operators_all_zero_is_flat() {
        let records = vec![rec(1930, "A", 0), rec(1930, "B", 0)];
        let data = ChartData::Operators {
            year: 1930,
            operators: aggregate_by_operator(&records, 1930),
        };
        let commands = render(&ViewState::new(), &data, &options());

        for bar in bars(&commands) {
            if let DrawCommand::Bar { x, y, height, .. } = bar {
                assert!(x.is_finite());
                assert!(y.is_finite());
                assert!(height.abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_operators_tooltip_on_hover() {
        let records = records();
        let mut state = ViewState::new();
        state.drill_down(1972);
        state.hovered = Some("Aeroflot".to_string());
        let data = ChartData::Operators {
            year: 1972,
            operators: aggregate_by_operator(&records, 1972),
        };
        let commands = render(&state, &data, &options());

        let lines = commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Tooltip { lines, .. } => Some(lines),
                _ => None,
            })
            .unwrap();
        assert_eq!(lines[0].value, "Aeroflot");
        assert_eq!(lines[1].value, "occurred on 6/15/1972 - Aeroflot accident");
        assert_eq!(lines[2].value, "2");
    }

    #[test]
    fn test_operators_no_tooltip_for_unknown_operator() {
        let records = records();
        let mut state = ViewState::new();
        state.drill_down(1972);
        state.hovered = Some("Nobody".to_string());
        let data = ChartData::Operators {
            year: 1972,
            operators: aggregate_by_operator(&records, 1972),
        };
        let commands = render(&state, &data, &options());
        assert!(!commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Tooltip { .. })));
    }

    #[test]
    fn test_operators_shows_back_button() {
        let data = ChartData::Operators {
            year: 1900,
            operators: Vec::new(),
        };
        let commands = render(&ViewState::new(), &data, &options());
        assert_eq!(
            commands.last(),
            Some(&DrawCommand::Controls {
                range_controls: false,
                back_button: true
            })
        );
    }

    #[test]
    fn test_rank_title() {
        assert_eq!(rank_title(1), "Most Fatalities");
        assert_eq!(rank_title(2), "2nd Most Fatalities");
        assert_eq!(rank_title(3), "3rd Most Fatalities");
        assert_eq!(rank_title(4), "4th Most Fatalities");
        assert_eq!(rank_title(11), "11th Most Fatalities");
        assert_eq!(rank_title(22), "22nd Most Fatalities");
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(20.0), "20");
        assert_eq!(format_tick(0.5), "0.5");
    }

    #[derive(Debug, Default)]
    struct CountingSurface {
        clears: usize,
        drawn: usize,
    }

    impl Surface for CountingSurface {
        fn apply(&mut self, command: &DrawCommand) {
            if *command == DrawCommand::Clear {
                self.clears += 1;
                self.drawn = 0;
            } else {
                self.drawn += 1;
            }
        }
    }

    #[test]
    fn test_renderer_clears_before_drawing() {
        let mut renderer = Renderer::new(CountingSurface::default());
        renderer.present(&[DrawCommand::Text {
            x: 0.0,
            y: 0.0,
            text: "hello".to_string(),
            class: "note".to_string(),
        }]);
        assert_eq!(renderer.surface().clears, 1);
        assert_eq!(renderer.surface().drawn, 1);

        renderer.present(&[DrawCommand::Clear]);
        assert_eq!(renderer.surface().clears, 2);
        assert_eq!(renderer.surface().drawn, 0);
        assert_eq!(renderer.frames(), 2);
    }

    #[test]
    fn test_draw_commands_serialize() {
        let json = serde_json::to_string(&DrawCommand::Controls {
            range_controls: true,
            back_button: false,
        })
        .unwrap();
        assert!(json.contains(r#""kind":"controls""#));
    }

    #[test]
    fn test_to_json_frame() {
        let records = records();
        let data = ChartData::Years(aggregate_by_year(&records, None, None));
        let commands = render(&ViewState::new(), &data, &options());

        let json = to_json(&commands).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        let frame = v.as_array().unwrap();
        assert_eq!(frame.len(), commands.len());
        assert_eq!(frame[0]["kind"], "clear");
        assert!(frame
            .iter()
            .filter(|c| c["kind"] == "annotation")
            .all(|c| c["style"] == "marker"));
    }

    #[test]
    fn test_annotation_command_keeps_its_kind() {
        let command = DrawCommand::Annotation(Annotation {
            kind: AnnotationKind::Ranked,
            x: 0.0,
            y: 0.0,
            dx: 0.0,
            dy: 20.0,
            title: Some(rank_title(1)),
            lines: vec!["Operator: Aeroflot".to_string()],
            connector: false,
        });
        let json = serde_json::to_string(&command).unwrap();
        assert_eq!(json.matches(r#""kind""#).count(), 1);

        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["kind"], "annotation");
        assert_eq!(v["style"], "ranked");
    }

    #[test]
    fn test_years_zero_tick_interval_labels_every_year() {
        let records: Vec<CrashRecord> = (1915..=1918).map(|y| rec(y, "A", 1)).collect();
        let data = ChartData::Years(aggregate_by_year(&records, None, None));
        let mut opts = options();
        opts.year_tick_interval = 0;
        let commands = render(&ViewState::new(), &data, &opts);

        let bottom = commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Axis(axis) if axis.orient == AxisOrient::Bottom => Some(axis),
                _ => None,
            })
            .unwrap();
        let labels: Vec<&str> = bottom.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["1915", "1916", "1917", "1918"]);
    }
}
