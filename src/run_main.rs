use std::io;

use super::{
    args::Args,
    figure::Figure,
    output::OutputLayout,
    plot::render_svg,
    result::{FigureReport, RenderReport},
    settings::Settings,
    table::BenchmarkTable,
};
use crate::init_logger;
use clap::{Command, CommandFactory};
use clap_complete::Generator;
use eyre::{Context, Result};
use tracing::{debug, info, Level};

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    clap_complete::generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

pub fn main(args: Args) -> Result<RenderReport> {
    init_logger();
    let start_time = std::time::Instant::now();
    if let Some(generator) = args.generator {
        let mut cmd = Args::command();
        eprintln!("Generating completion file for {:?}...", generator);
        print_completions(generator, &mut cmd);
        return Ok(RenderReport::default());
    }
    debug!("{:?}", args);

    let mut settings =
        Settings::new(&args.config_file).wrap_err("fail to create Setting object")?;
    if let Some(input) = args.input {
        settings.csv_file = input;
    }
    if let Some(output) = args.output {
        settings.output_dir = output;
    }
    settings.validate()?;
    debug!("{:?}", settings);
    let figures = Figure::resolve(&args.figures)?;

    let report = render_all(&settings, &figures)?;
    if let Some(report_file) = &settings.report_file {
        report
            .save_to_file(report_file)
            .wrap_err("fail to save report")?;
        info!("report saved to {:?}", report_file);
    }
    info!(
        "running time: {:?}'s",
        std::time::Instant::now()
            .duration_since(start_time)
            .as_secs_f64()
    );
    Ok(report)
}

/// load the table once, then draw and save every figure in order
pub fn render_all(settings: &Settings, figures: &[&Figure]) -> Result<RenderReport> {
    info!("loading {:?}", settings.csv_file);
    let table = BenchmarkTable::from_path(&settings.csv_file)?;
    info!("{} benchmark rows", table.len());
    let layout = OutputLayout::prepare(settings)?;

    let mut report = RenderReport {
        input: settings.csv_file.clone(),
        rows: table.len(),
        figures: Vec::with_capacity(figures.len()),
    };
    for figure in figures {
        let span = tracing::span!(Level::INFO, "figure", index = figure.index);
        let _entered = span.enter();
        let rendered = render_svg(&table, figure, settings)
            .wrap_err(format!("fail to draw figure {}", figure.index))?;
        let files = layout.write(figure.name, &rendered.svg)?;
        info!(
            points = rendered.points,
            highlighted = rendered.highlighted,
            "finished {}",
            figure.name
        );
        report.figures.push(FigureReport {
            index: figure.index,
            name: figure.name.to_string(),
            title: figure.title.to_string(),
            points: rendered.points,
            highlighted: rendered.highlighted,
            files,
        });
    }
    Ok(report)
}
