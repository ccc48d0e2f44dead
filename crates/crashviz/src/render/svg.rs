//! SVG drawing surface.

use std::fmt::Write;

use super::{
    Annotation, AnnotationKind, Axis, AxisOrient, BarAction, DrawCommand, Layout, Surface,
    TooltipLine,
};

const STYLE: &str = "\
.bar { fill: steelblue; }
.bar:hover { fill: darkorange; }
.axis path, .axis line { fill: none; stroke: #000; shape-rendering: crispEdges; }
.axis text { font: 10px sans-serif; }
.axis-title, .axis-label { font: 12px sans-serif; text-anchor: middle; }
.annotation line { stroke: #333; }
.annotation text { font: 12px sans-serif; }
.annotation .note-title { font-weight: bold; }
.annotation.year-label text { font-size: 20px; font-weight: bold; }
.tooltip rect { fill: #fff; stroke: #999; opacity: 0.9; }
.tooltip text { font: 12px sans-serif; }
";

/// Line height used for multi-line notes and tooltips.
const LINE_HEIGHT: f64 = 16.0;

/// Collects drawn elements and serializes them as a standalone SVG document.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    layout: Layout,
    elements: Vec<String>,
    range_controls: bool,
    back_button: bool,
}

impl SvgSurface {
    /// Create an empty surface with the given geometry.
    #[must_use]
    pub fn new(layout: &Layout) -> Self {
        Self {
            layout: *layout,
            elements: Vec::new(),
            range_controls: false,
            back_button: false,
        }
    }

    /// Number of top-level elements currently drawn.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Render the current contents as an SVG document.
    ///
    /// Control visibility is exposed as `data-` attributes on the root element
    /// for the host to read.
    #[must_use]
    pub fn document(&self) -> String {
        let layout = &self.layout;
        let mut doc = String::with_capacity(4096 + self.elements.len() * 160);
        let _ = writeln!(
            doc,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}" data-range-controls="{}" data-back-button="{}">"#,
            num(layout.canvas_width),
            num(layout.canvas_height),
            num(layout.canvas_width),
            num(layout.canvas_height),
            self.range_controls,
            self.back_button,
        );
        let _ = writeln!(doc, "<style>\n{STYLE}</style>");
        let _ = writeln!(
            doc,
            r#"<g transform="translate({},{})">"#,
            num(layout.margin.left),
            num(layout.margin.top)
        );
        for element in &self.elements {
            doc.push_str(element);
            doc.push('\n');
        }
        doc.push_str("</g>\n</svg>\n");
        doc
    }

    fn draw_bar(&mut self, command: &DrawCommand) {
        if let DrawCommand::Bar {
            x,
            y,
            width,
            height,
            key,
            value,
            action,
        } = command
        {
            let action = match action {
                BarAction::DrillDown => "drill-down",
                BarAction::Tooltip => "tooltip",
            };
            self.elements.push(format!(
                r#"<rect class="bar" x="{}" y="{}" width="{}" height="{}" data-key="{}" data-value="{}" data-action="{action}"/>"#,
                num(*x),
                num(*y),
                num(*width),
                num(*height),
                escape(&key.to_string()),
                num(*value),
            ));
        }
    }

    fn draw_axis(&mut self, axis: &Axis) {
        let class = match axis.orient {
            AxisOrient::Bottom => "x axis",
            AxisOrient::Left => "y axis",
        };
        let mut g = format!(
            r#"<g class="{class}" transform="translate({},{})">"#,
            num(axis.x),
            num(axis.y)
        );
        let domain = match axis.orient {
            AxisOrient::Bottom => format!("M0.5,6V0.5H{}V6", num(axis.length + 0.5)),
            AxisOrient::Left => format!("M-6,{}H0.5V0.5H-6", num(axis.length + 0.5)),
        };
        let _ = write!(g, r#"<path class="domain" d="{domain}"/>"#);

        for tick in &axis.ticks {
            let label = escape(&tick.label);
            match (axis.orient, axis.label_rotation) {
                (AxisOrient::Bottom, None) => {
                    let _ = write!(
                        g,
                        r#"<g class="tick" transform="translate({},0)"><line y2="6"/><text y="9" dy="0.71em" text-anchor="middle">{label}</text></g>"#,
                        num(tick.position)
                    );
                }
                (AxisOrient::Bottom, Some(angle)) => {
                    let _ = write!(
                        g,
                        r#"<g class="tick" transform="translate({},0)"><line y2="6"/><text y="9" dy="0.71em" transform="rotate({})" text-anchor="end" style="font-size: 12px">{label}</text></g>"#,
                        num(tick.position),
                        num(angle)
                    );
                }
                (AxisOrient::Left, _) => {
                    let _ = write!(
                        g,
                        r#"<g class="tick" transform="translate(0,{})"><line x2="-6"/><text x="-9" dy="0.32em" text-anchor="end">{label}</text></g>"#,
                        num(tick.position)
                    );
                }
            }
        }

        if let Some(title) = &axis.title {
            let rotate = title
                .rotation
                .map(|r| format!(r#" transform="rotate({})""#, num(r)))
                .unwrap_or_default();
            let _ = write!(
                g,
                r##"<text class="axis-title"{rotate} x="{}" y="{}" fill="#000">{}</text>"##,
                num(title.x),
                num(title.y),
                escape(&title.text)
            );
        }

        g.push_str("</g>");
        self.elements.push(g);
    }

    fn draw_annotation(&mut self, note: &Annotation) {
        let class = match note.kind {
            AnnotationKind::Marker => "annotation marker",
            AnnotationKind::Ranked => "annotation ranked",
            AnnotationKind::YearLabel => "annotation year-label",
        };
        let mut g = format!(
            r#"<g class="{class}" transform="translate({},{})">"#,
            num(note.x),
            num(note.y)
        );
        if note.connector {
            let _ = write!(
                g,
                r#"<line x1="0" y1="0" x2="{}" y2="{}"/>"#,
                num(note.dx),
                num(note.dy)
            );
        }

        let _ = write!(
            g,
            r#"<g class="note" transform="translate({},{})">"#,
            num(note.dx),
            num(note.dy)
        );
        let mut line_y = 0.0;
        if let Some(title) = &note.title {
            let _ = write!(
                g,
                r#"<text class="note-title" y="{}">{}</text>"#,
                num(line_y),
                escape(title)
            );
            line_y += LINE_HEIGHT;
        }
        for line in &note.lines {
            let _ = write!(
                g,
                r#"<text class="note-label" y="{}">{}</text>"#,
                num(line_y),
                escape(line)
            );
            line_y += LINE_HEIGHT;
        }
        g.push_str("</g></g>");
        self.elements.push(g);
    }

    #[allow(clippy::cast_precision_loss)]
    fn draw_tooltip(&mut self, x: f64, y: f64, lines: &[TooltipLine]) {
        let height = LINE_HEIGHT * lines.len() as f64 + 8.0;
        let mut g = format!(
            r#"<g class="tooltip" transform="translate({},{})"><rect width="320" height="{}" rx="4"/>"#,
            num(x),
            num(y),
            num(height)
        );
        for (i, line) in lines.iter().enumerate() {
            let _ = write!(
                g,
                r#"<text x="6" y="{}"><tspan font-weight="bold">{}:</tspan> {}</text>"#,
                num(LINE_HEIGHT * (i as f64 + 1.0)),
                escape(&line.label),
                escape(&line.value)
            );
        }
        g.push_str("</g>");
        self.elements.push(g);
    }
}

impl Surface for SvgSurface {
    fn apply(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::Clear => {
                self.elements.clear();
                self.range_controls = false;
                self.back_button = false;
            }
            DrawCommand::Bar { .. } => self.draw_bar(command),
            DrawCommand::Axis(axis) => self.draw_axis(axis),
            DrawCommand::Text { x, y, text, class } => {
                self.elements.push(format!(
                    r#"<text class="{}" x="{}" y="{}" text-anchor="middle">{}</text>"#,
                    escape(class),
                    num(*x),
                    num(*y),
                    escape(text)
                ));
            }
            DrawCommand::Annotation(note) => self.draw_annotation(note),
            DrawCommand::Tooltip { x, y, lines } => self.draw_tooltip(*x, *y, lines),
            DrawCommand::Controls {
                range_controls,
                back_button,
            } => {
                self.range_controls = *range_controls;
                self.back_button = *back_button;
            }
        }
    }
}

/// Format a coordinate with at most two decimals.
fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.abs() < f64::EPSILON {
        // Avoid "-0"
        return "0".to_string();
    }
    format!("{rounded}")
}

/// Escape text for use in SVG content and attribute values.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
