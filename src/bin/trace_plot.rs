use clap::{Parser, ValueEnum};
use csv::ReaderBuilder;
use dragstrip_export::trace::COLUMNS;
use plotters::prelude::*;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Plot a run trace CSV (speed, rpm, acceleration, or distance vs time)"
)]
struct Cli {
    #[arg(long)]
    input: String,
    #[arg(long, default_value = "artifacts/trace.png")]
    output: PathBuf,
    #[arg(long, value_enum, default_value_t = Metric::Speed)]
    metric: Metric,
    #[arg(long, default_value_t = 1200)]
    width: u32,
    #[arg(long, default_value_t = 800)]
    height: u32,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum Metric {
    Speed,
    Rpm,
    Accel,
    Distance,
}

impl Metric {
    fn column(self) -> &'static str {
        match self {
            Metric::Speed => "v_mph",
            Metric::Rpm => "rpm",
            Metric::Accel => "a_g",
            Metric::Distance => "s_ft",
        }
    }

    fn axis_label(self) -> &'static str {
        match self {
            Metric::Speed => "Speed (mph)",
            Metric::Rpm => "Engine speed (rpm)",
            Metric::Accel => "Acceleration (g)",
            Metric::Distance => "Distance (ft)",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Point {
    t_s: f64,
    value: f64,
    gear: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let points = read_points(&cli.input, cli.metric)?;
    if points.len() < 2 {
        return Err(anyhow::anyhow!(
            "Trace CSV needs at least two samples to plot"
        ));
    }

    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let output_str = cli
        .output
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Output path contains invalid UTF-8"))?;
    let root = BitMapBackend::new(output_str, (cli.width, cli.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let t_max = points.iter().map(|p| p.t_s).fold(0.0_f64, f64::max);
    let mut v_min = points.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
    let mut v_max = points
        .iter()
        .map(|p| p.value)
        .fold(f64::NEG_INFINITY, f64::max);
    if (v_max - v_min).abs() < f64::EPSILON {
        v_min -= 1.0;
        v_max += 1.0;
    }
    let pad = 0.05 * (v_max - v_min);

    let font_family = select_font_family();
    let caption_font = FontDesc::new(font_family, 24.0, FontStyle::Bold);
    let label_font = FontDesc::new(font_family, 18.0, FontStyle::Normal);

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(format!("Run trace: {}", cli.metric.column()), caption_font)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(0.0..t_max.max(1e-3), (v_min - pad)..(v_max + pad))?;

    chart
        .configure_mesh()
        .x_desc("Time since launch (s)")
        .y_desc(cli.metric.axis_label())
        .label_style(label_font.clone())
        .x_labels(8)
        .y_labels(8)
        .draw()?;

    let top_gear = points.iter().map(|p| p.gear).max().unwrap_or(1).max(1);
    for segment in gear_segments(&points) {
        let gear = segment[0].gear;
        let color = gear_color(gear, top_gear);
        chart
            .draw_series(LineSeries::new(
                segment.iter().map(|p| (p.t_s, p.value)),
                ShapeStyle::from(&color).stroke_width(2),
            ))?
            .label(format!("gear {gear}"))
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    // shift markers
    for pair in points.windows(2) {
        if pair[1].gear != pair[0].gear {
            let t = pair[1].t_s;
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(t, v_min - pad), (t, v_max + pad)],
                ShapeStyle::from(&BLACK.mix(0.3)).stroke_width(1),
            )))?;
        }
    }

    chart
        .configure_series_labels()
        .label_font(label_font)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn select_font_family() -> FontFamily<'static> {
    if cfg!(target_os = "macos") {
        FontFamily::Name("Helvetica")
    } else if cfg!(target_os = "windows") {
        FontFamily::Name("Arial")
    } else {
        FontFamily::Name("DejaVu Sans")
    }
}

fn read_points(path: &str, metric: Metric) -> anyhow::Result<Vec<Point>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "CSV missing '{}' column (expected {})",
                    name,
                    COLUMNS.join(",")
                )
            })
    };
    let t_idx = column("t_s")?;
    let value_idx = column(metric.column())?;
    let gear_idx = column("gear")?;

    let mut points = Vec::new();
    for rec in rdr.records() {
        let r = rec?;
        let t_s: f64 = r.get(t_idx).unwrap_or("").parse().unwrap_or(f64::NAN);
        let value: f64 = r.get(value_idx).unwrap_or("").parse().unwrap_or(f64::NAN);
        let gear: usize = r.get(gear_idx).unwrap_or("").parse().unwrap_or(1);
        if t_s.is_finite() && value.is_finite() {
            points.push(Point { t_s, value, gear });
        }
    }
    Ok(points)
}

/// Split the trace into runs of constant gear, each sharing its first point with the
/// previous run so the line stays continuous across shifts.
fn gear_segments(points: &[Point]) -> Vec<Vec<Point>> {
    let mut segments: Vec<Vec<Point>> = Vec::new();
    for &p in points {
        match segments.last_mut() {
            Some(current) if current[0].gear == p.gear => current.push(p),
            Some(current) => {
                let joint = Point {
                    gear: p.gear,
                    ..current[current.len() - 1]
                };
                segments.push(vec![joint, p]);
            }
            None => segments.push(vec![p]),
        }
    }
    segments
}

fn gear_color(gear: usize, top_gear: usize) -> RGBColor {
    let t = if top_gear <= 1 {
        0.0
    } else {
        (gear.saturating_sub(1)) as f64 / (top_gear - 1) as f64
    };
    jet_color(t)
}

fn jet_color(t_in: f64) -> RGBColor {
    let t = t_in.clamp(0.0, 1.0);
    fn comp(v: f64) -> f64 {
        (1.0 - (v - 1.0).abs()).clamp(0.0, 1.0)
    }
    let r = comp(1.5 - 4.0 * (t - 0.75).abs());
    let g = comp(1.5 - 4.0 * (t - 0.5).abs());
    let b = comp(1.5 - 4.0 * (t - 0.25).abs());
    RGBColor((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}
