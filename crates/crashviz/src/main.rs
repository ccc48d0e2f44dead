//! `crashviz` - CLI for the crash chart
//!
//! This binary loads the crash CSV, renders the yearly or operator chart,
//! and drives interactive sessions.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use crashviz::aggregate::{aggregate_by_operator, aggregate_by_year, top_n};
use crashviz::cli::interactive::run_session;
use crashviz::cli::{
    Cli, Command, ConfigCommand, InteractiveCommand, OutputFormat, RenderCommand, SummaryCommand,
};
use crashviz::render::{self, RenderOptions};
use crashviz::{
    init_logging, load_dataset, BarKey, Config, Controller, CsvFileSource, Dataset, Outcome,
    SvgSurface, YearRange,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    if !cli.command.needs_data() {
        if let Command::Config(config_cmd) = cli.command {
            return handle_config(cli.config, config_cmd);
        }
        return Ok(());
    }

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;
    let dataset = load(&config, cli.data).await?;

    match cli.command {
        Command::Render(cmd) => handle_render(dataset, &config, cmd).await,
        Command::Summary(cmd) => handle_summary(&dataset, &cmd),
        Command::Interactive(cmd) => handle_interactive(dataset, &config, &cmd).await,
        Command::Config(_) => Ok(()),
    }
}

async fn load(config: &Config, data: Option<PathBuf>) -> anyhow::Result<Dataset> {
    let path = config.data_path(data)?;
    let source = CsvFileSource::new(&path);
    load_dataset(&source, &config.data.date_format)
        .await
        .with_context(|| format!("failed to load crash data from {}", path.display()))
}

fn start_controller(dataset: Dataset, config: &Config) -> Controller<SvgSurface> {
    let options = RenderOptions::from_config(config);
    let surface = SvgSurface::new(&options.layout);
    Controller::start(dataset, options, surface)
}

fn report(outcome: Outcome) {
    if let Outcome::Ignored(reason) = outcome {
        warn!(reason, "Command had no effect");
    }
}

async fn handle_render(dataset: Dataset, config: &Config, cmd: RenderCommand) -> anyhow::Result<()> {
    let mut controller = start_controller(dataset, config);

    if cmd.start.is_some() || cmd.end.is_some() {
        report(controller.dispatch(crashviz::Command::RangeUpdate {
            start: cmd.start.unwrap_or_default(),
            end: cmd.end.unwrap_or_default(),
        }));
    }
    if let Some(year) = cmd.year {
        report(controller.dispatch(crashviz::Command::BarClicked(BarKey::Year(year))));
    }
    if let Some(operator) = cmd.hover {
        report(controller.dispatch(crashviz::Command::BarHovered(operator)));
    }

    let text = match cmd.format {
        OutputFormat::Svg => controller.surface().document(),
        OutputFormat::Json => render::to_json(controller.frame())?,
    };
    write_output(cmd.output.as_deref(), &text).await
}

async fn write_output(path: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            tokio::fs::write(path, text)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{text}")?;
        }
    }
    Ok(())
}

fn handle_summary(dataset: &Dataset, cmd: &SummaryCommand) -> anyhow::Result<()> {
    let records = dataset.records();

    if let Some(year) = cmd.year {
        let operators = aggregate_by_operator(records, year);
        let ranked = top_n(&operators, cmd.top.unwrap_or(operators.len()));

        if cmd.json {
            println!("{}", serde_json::to_string_pretty(&ranked)?);
            return Ok(());
        }

        println!("Operators in {year}");
        println!("=================");
        if ranked.is_empty() {
            println!("No crashes recorded.");
        }
        for (i, agg) in ranked.iter().enumerate() {
            println!(
                "{:>3}. {:<40} {:>6} fatalities  {:>3} crashes  deadliest {}",
                i + 1,
                agg.operator,
                agg.total_fatalities,
                agg.crash_count,
                agg.deadliest_crash.display_date()
            );
        }
        return Ok(());
    }

    let range = YearRange::parse(
        cmd.start.as_deref().unwrap_or_default(),
        cmd.end.as_deref().unwrap_or_default(),
    );
    let mut years = aggregate_by_year(records, range.start, range.end);
    years.sort_by_key(|y| y.year);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&years)?);
        return Ok(());
    }

    println!("Year  Crashes");
    println!("----  -------");
    for agg in &years {
        println!("{:<4}  {:>7}", agg.year, agg.crash_count);
    }
    let total: usize = years.iter().map(|y| y.crash_count).sum();
    println!();
    println!("{} years, {total} crashes", years.len());
    Ok(())
}

async fn handle_interactive(
    dataset: Dataset,
    config: &Config,
    cmd: &InteractiveCommand,
) -> anyhow::Result<()> {
    let mut controller = start_controller(dataset, config);
    let output = cmd.output.clone();
    write_output(Some(&output), &controller.surface().document()).await?;

    eprintln!(
        "Chart at {}. Commands: range S E, reset, click YEAR, hover OPERATOR, leave, back, show, quit",
        output.display()
    );

    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();
    run_session(&mut controller, stdin, stdout, |c| {
        std::fs::write(&output, c.surface().document())?;
        Ok(())
    })?;
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Data]");
                match &config.data.path {
                    Some(path) => println!("  Path:               {}", path.display()),
                    None => println!("  Path:               (not set)"),
                }
                println!("  Date format:        {}", config.data.date_format);
                println!();
                println!("[Chart]");
                println!(
                    "  Canvas:             {}x{}",
                    config.chart.width, config.chart.height
                );
                let m = config.chart.margin;
                println!(
                    "  Margins:            top {} right {} bottom {} left {}",
                    m.top, m.right, m.bottom, m.left
                );
                println!("  Padding:            {}", config.chart.padding);
                println!(
                    "  Year tick interval: {}",
                    config.chart.year_tick_interval
                );
                println!("  Top operators:      {}", config.chart.top_operators);
                println!();
                println!("[Annotations]");
                println!("  Start year:         {}", config.annotations.start_year);
                println!("  End year:           {}", config.annotations.end_year);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::validate_file(&path)
                .with_context(|| format!("{} is not a valid configuration", path.display()))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
