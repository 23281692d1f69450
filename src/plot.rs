use eyre::Result;
use plotters::{
    coord::ranged1d::{Ranged, ValueFormatter},
    prelude::*,
    series::DashedLineSeries,
    style::FontStyle,
};
use tracing::{debug, Level};

use crate::{
    figure::{Figure, Group, Marker, ReferenceLine, Scale},
    settings::Settings,
    table::BenchmarkTable,
};

/// marker half width in pixels
const MARKER_SIZE: i32 = 7;
/// half width of the square drawn around IMC processors
const RING_SIZE: i32 = 12;
const GRID_ALPHA: f64 = 0.4;
/// 1.5pt at 100 dpi, plotters strokes are whole pixels
const RING_STROKE: u32 = 2;
const FONT: &str = "sans-serif";

#[derive(Debug, Clone)]
pub struct RenderedFigure {
    pub svg: String,
    pub points: usize,
    pub highlighted: usize,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

struct Series<'a> {
    group: Group<'a>,
    points: Vec<(f64, f64)>,
    ringed: Vec<(f64, f64)>,
}

/// the drawn interval of one axis
pub fn axis_range(scale: Scale, values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .into_iter()
        .filter(|&v| scale.accepts(v))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        return match scale {
            Scale::Log => (1.0, 10.0),
            Scale::Linear => (0.0, 1.0),
        };
    }
    match scale {
        Scale::Log => {
            // decades past the f64 range round to 0 or inf
            let lo = 10f64.powf(min.log10().floor()).max(f64::MIN_POSITIVE);
            let hi = 10f64.powf(max.log10().ceil()).min(f64::MAX);
            if hi <= lo {
                (lo, (lo * 10.0).min(f64::MAX))
            } else {
                (lo, hi)
            }
        }
        Scale::Linear => {
            let span = max - min;
            let pad = if span > 0.0 {
                span * 0.05
            } else {
                (max.abs() * 0.05).max(0.5)
            };
            (min - pad, max + pad)
        }
    }
}

/// draw one figure into an svg document
pub fn render_svg(
    table: &BenchmarkTable,
    figure: &Figure,
    settings: &Settings,
) -> Result<RenderedFigure> {
    let span = tracing::span!(Level::DEBUG, "render_svg", figure = figure.name);
    let _entered = span.enter();

    let highlight = settings.highlight(figure.index);
    let series = figure
        .groups(settings)
        .into_iter()
        .map(|group| {
            let points = figure.points(table, &group, false);
            let ringed = if highlight {
                figure.points(table, &group, true)
            } else {
                vec![]
            };
            Series {
                group,
                points,
                ringed,
            }
        })
        .collect::<Vec<_>>();
    let points = series.iter().map(|s| s.points.len()).sum();
    let highlighted = series.iter().map(|s| s.ringed.len()).sum();
    debug!(points, highlighted, "series collected");

    let guide = figure
        .reference
        .iter()
        .flat_map(|line| [line.from, line.to])
        .collect::<Vec<_>>();
    let x_range = axis_range(
        figure.x.scale,
        series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.0))
            .chain(guide.iter().copied()),
    );
    let y_range = axis_range(
        figure.y.scale,
        series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.1))
            .chain(guide.iter().copied()),
    );
    debug!(?x_range, ?y_range);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, settings.figure_size()).into_drawing_area();
        root.fill(&WHITE)?;
        let mut builder = ChartBuilder::on(&root);
        builder
            .caption(
                figure.title,
                (FONT, 22).into_font().style(FontStyle::Bold),
            )
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(80);

        let (x0, x1) = x_range;
        let (y0, y1) = y_range;
        match (figure.x.scale, figure.y.scale) {
            (Scale::Linear, Scale::Linear) => {
                let mut chart = builder.build_cartesian_2d(x0..x1, y0..y1)?;
                draw_chart(&mut chart, figure, &series)?;
            }
            (Scale::Linear, Scale::Log) => {
                let mut chart = builder.build_cartesian_2d(x0..x1, (y0..y1).log_scale())?;
                draw_chart(&mut chart, figure, &series)?;
            }
            (Scale::Log, Scale::Linear) => {
                let mut chart = builder.build_cartesian_2d((x0..x1).log_scale(), y0..y1)?;
                draw_chart(&mut chart, figure, &series)?;
            }
            (Scale::Log, Scale::Log) => {
                let mut chart =
                    builder.build_cartesian_2d((x0..x1).log_scale(), (y0..y1).log_scale())?;
                draw_chart(&mut chart, figure, &series)?;
            }
        }
        // To avoid the IO failure being ignored silently, we manually call the present function
        root.present()?;
    }

    Ok(RenderedFigure {
        svg,
        points,
        highlighted,
        x_range,
        y_range,
    })
}

fn grid_style() -> ShapeStyle {
    BLACK.mix(GRID_ALPHA).stroke_width(1)
}

fn ring_style() -> ShapeStyle {
    RED.stroke_width(RING_STROKE)
}

fn draw_chart<'a, X, Y>(
    chart: &mut ChartContext<'a, SVGBackend<'a>, Cartesian2d<X, Y>>,
    figure: &Figure,
    series: &[Series],
) -> Result<()>
where
    X: Ranged<ValueType = f64> + ValueFormatter<f64>,
    Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    chart
        .configure_mesh()
        .x_desc(figure.x.metric.label())
        .y_desc(figure.y.metric.label())
        .axis_desc_style((FONT, 20))
        .label_style((FONT, 14))
        .bold_line_style(grid_style())
        .light_line_style(grid_style())
        .draw()?;

    for s in series {
        let label = s.group.label.as_str();
        let style = s.group.color.filled();
        match s.group.marker {
            Marker::Circle => {
                chart
                    .draw_series(s.points.iter().map(|&c| Circle::new(c, MARKER_SIZE, style)))?
                    .label(label)
                    .legend(move |(x, y)| Circle::new((x, y), MARKER_SIZE, style));
            }
            Marker::Square => {
                chart
                    .draw_series(s.points.iter().map(|&c| {
                        EmptyElement::at(c)
                            + Rectangle::new(
                                [(-MARKER_SIZE, -MARKER_SIZE), (MARKER_SIZE, MARKER_SIZE)],
                                style,
                            )
                    }))?
                    .label(label)
                    .legend(move |(x, y)| {
                        Rectangle::new(
                            [
                                (x - MARKER_SIZE, y - MARKER_SIZE),
                                (x + MARKER_SIZE, y + MARKER_SIZE),
                            ],
                            style,
                        )
                    });
            }
            Marker::Diamond => {
                let d = MARKER_SIZE + 1;
                chart
                    .draw_series(s.points.iter().map(|&c| {
                        EmptyElement::at(c)
                            + Polygon::new(vec![(0, -d), (d, 0), (0, d), (-d, 0)], style)
                    }))?
                    .label(label)
                    .legend(move |(x, y)| {
                        Polygon::new(vec![(x, y - d), (x + d, y), (x, y + d), (x - d, y)], style)
                    });
            }
        }
        if !s.ringed.is_empty() {
            chart.draw_series(s.ringed.iter().map(|&c| {
                EmptyElement::at(c)
                    + Rectangle::new(
                        [(-RING_SIZE, -RING_SIZE), (RING_SIZE, RING_SIZE)],
                        ring_style(),
                    )
            }))?;
        }
    }

    if let Some(line) = &figure.reference {
        draw_guide(chart, line)?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .label_font((FONT, 16))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

/// dashed y = x from `line.from` to `line.to`
fn draw_guide<'a, X, Y>(
    chart: &mut ChartContext<'a, SVGBackend<'a>, Cartesian2d<X, Y>>,
    line: &ReferenceLine,
) -> Result<()>
where
    X: Ranged<ValueType = f64>,
    Y: Ranged<ValueType = f64>,
{
    let style = BLACK.stroke_width(2);
    chart
        .draw_series(DashedLineSeries::new(
            vec![(line.from, line.from), (line.to, line.to)],
            10,
            6,
            style,
        ))?
        .label(line.label)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    Ok(())
}
