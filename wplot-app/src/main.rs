mod plot_spec;

use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use clap::Parser;
use tracing::{debug, info};

use wplot_core::{Builtin, Complex64, Projection, Viewport};
use wplot_render::{
    colorize_worker, evaluation_worker, export_png, ColorMode, ColorRequest, DomainStyle,
    EvalRequest, ExportMetadata, RenderBuffer, ValueBuffer,
};

use plot_spec::PlotSpec;

type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "wplot", about = "Domain-coloring plots of complex-valued functions")]
struct Cli {
    /// Builtin function to plot (see --list)
    #[arg(short, long, default_value = "demo")]
    function: String,

    /// Colorization mode: magnitude, realPart, imaginaryPart, phase
    #[arg(short, long, default_value = "magnitude")]
    mode: String,

    /// Domain-coloring style for the magnitude mode: conformal, value
    #[arg(long, default_value = "conformal")]
    style: String,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 800)]
    height: u32,

    /// Top-left viewport corner as "re,im"
    #[arg(long, value_parser = parse_point, default_value = "-2,-2", allow_hyphen_values = true)]
    top_left: (f64, f64),

    /// Bottom-right viewport corner as "re,im"
    #[arg(long, value_parser = parse_point, default_value = "2,2", allow_hyphen_values = true)]
    bottom_right: (f64, f64),

    /// Load the whole request from a JSON plot-spec file instead of flags
    #[arg(long)]
    spec: Option<PathBuf>,

    /// Worker threads (default: available parallelism)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// List builtin functions and exit
    #[arg(long)]
    list: bool,

    /// Output PNG path
    #[arg(short, long, default_value = "wplot.png")]
    output: PathBuf,
}

/// Everything one render needs, resolved from flags or a spec file.
struct PlotJob {
    expr: Builtin,
    projection: Projection,
    mode: ColorMode,
    viewport: Viewport,
}

fn parse_point(s: &str) -> Result<(f64, f64), String> {
    let (re, im) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"re,im\", got {s:?}"))?;
    let re: f64 = re.trim().parse().map_err(|e| format!("bad real part: {e}"))?;
    let im: f64 = im.trim().parse().map_err(|e| format!("bad imaginary part: {e}"))?;
    Ok((re, im))
}

/// Split `height` rows into at most `parts` contiguous bands.
fn split_rows(height: u32, parts: usize) -> Vec<(u32, u32)> {
    let parts = (parts as u32).clamp(1, height);
    let base = height / parts;
    let rem = height % parts;
    let mut bands = Vec::with_capacity(parts as usize);
    let mut start = 0;
    for i in 0..parts {
        let rows = base + u32::from(i < rem);
        bands.push((start, rows));
        start += rows;
    }
    bands
}

fn job_from_cli(cli: &Cli) -> AppResult<PlotJob> {
    if let Some(path) = &cli.spec {
        let spec = PlotSpec::load(path)?;
        let style = spec
            .colorization_function
            .unwrap_or(DomainStyle::ConformalThin);
        return Ok(PlotJob {
            expr: spec.expression.parse()?,
            projection: spec.colorization_mode,
            mode: ColorMode::for_projection(spec.colorization_mode, style),
            viewport: Viewport::new(
                Complex64::new(spec.pt_top_left[0], spec.pt_top_left[1]),
                Complex64::new(spec.pt_bottom_right[0], spec.pt_bottom_right[1]),
                spec.width,
                spec.height,
            )?,
        });
    }

    let projection: Projection = cli.mode.parse()?;
    let style: DomainStyle = cli.style.parse()?;
    Ok(PlotJob {
        expr: cli.function.parse()?,
        projection,
        mode: ColorMode::for_projection(projection, style),
        viewport: Viewport::new(
            Complex64::new(cli.top_left.0, cli.top_left.1),
            Complex64::new(cli.bottom_right.0, cli.bottom_right.1),
            cli.width,
            cli.height,
        )?,
    })
}

/// Evaluate the frame as row bands across a pool of evaluation workers,
/// returning the per-band results tagged with their top row.
fn evaluate_banded(job: &PlotJob, jobs: usize) -> AppResult<Vec<(u32, ValueBuffer)>> {
    let bands = split_rows(job.viewport.height, jobs);
    let (tx_resp, rx_resp) = mpsc::channel();

    let mut senders = Vec::new();
    let mut handles = Vec::new();
    for _ in 0..bands.len().min(jobs) {
        let (tx_req, rx_req) = mpsc::channel();
        let tx_resp = tx_resp.clone();
        handles.push(thread::spawn(move || evaluation_worker(rx_req, tx_resp)));
        senders.push(tx_req);
    }
    drop(tx_resp);

    let expr: Arc<dyn wplot_core::Expression + Send + Sync> = Arc::new(job.expr);
    for (index, &(top, rows)) in bands.iter().enumerate() {
        let req = EvalRequest {
            index,
            pixel_top: top,
            expr: Arc::clone(&expr),
            projection: job.projection,
            viewport: job.viewport,
            rows: top..top + rows,
        };
        if senders[index % senders.len()].send(req).is_err() {
            return Err("evaluation worker exited early".into());
        }
    }
    drop(senders);

    let mut results = Vec::with_capacity(bands.len());
    for _ in 0..bands.len() {
        let resp = rx_resp
            .recv()
            .map_err(|_| "evaluation workers hung up before finishing")?;
        results.push((resp.pixel_top, resp.result?));
    }
    for handle in handles {
        let _ = handle.join();
    }
    Ok(results)
}

/// Colorize the bands across a pool of colorization workers and reassemble
/// the full RGBA frame by each band's top row.
fn colorize_banded(
    job: &PlotJob,
    jobs: usize,
    mut bands: Vec<(u32, ValueBuffer)>,
) -> AppResult<RenderBuffer> {
    // The colorizer rescales against the frame-global extrema, not each
    // band's local ones.
    let (min, max) = bands.iter().fold(None, |acc, (_, band)| match acc {
        None => Some((band.min, band.max)),
        Some((lo, hi)) => Some((f64::min(lo, band.min), f64::max(hi, band.max))),
    })
    .unwrap_or((0.0, 0.0));
    for (_, band) in &mut bands {
        band.min = min;
        band.max = max;
    }
    debug!(min, max, "Frame extrema merged");

    let (tx_resp, rx_resp) = mpsc::channel();
    let mut senders = Vec::new();
    let mut handles = Vec::new();
    for _ in 0..bands.len().min(jobs) {
        let (tx_req, rx_req) = mpsc::channel();
        let tx_resp = tx_resp.clone();
        handles.push(thread::spawn(move || colorize_worker(rx_req, tx_resp)));
        senders.push(tx_req);
    }
    drop(tx_resp);

    let band_count = bands.len();
    for (index, (top, values)) in bands.into_iter().enumerate() {
        let req = ColorRequest {
            index,
            pixel_top: top,
            buffer: RenderBuffer::new(values.width, values.height),
            values,
            mode: job.mode,
        };
        if senders[index % senders.len()].send(req).is_err() {
            return Err("colorize worker exited early".into());
        }
    }
    drop(senders);

    let mut frame = RenderBuffer::new(job.viewport.width, job.viewport.height);
    for _ in 0..band_count {
        let resp = rx_resp
            .recv()
            .map_err(|_| "colorize workers hung up before finishing")?;
        frame.blit_rows(resp.pixel_top, &resp.buffer);
    }
    for handle in handles {
        let _ = handle.join();
    }
    Ok(frame)
}

fn run(cli: Cli) -> AppResult<()> {
    if cli.list {
        for &b in Builtin::ALL {
            println!("{b}");
        }
        return Ok(());
    }

    let job = job_from_cli(&cli)?;
    let jobs = cli
        .jobs
        .unwrap_or_else(|| thread::available_parallelism().map_or(1, |n| n.get()));

    info!(
        function = %job.expr,
        mode = %job.projection,
        width = job.viewport.width,
        height = job.viewport.height,
        jobs,
        "Starting plot"
    );

    let bands = evaluate_banded(&job, jobs)?;
    let frame = colorize_banded(&job, jobs, bands)?;

    export_png(
        &frame.pixels,
        frame.width,
        frame.height,
        &cli.output,
        &ExportMetadata {
            expression: job.expr.to_string(),
            mode: job.projection.to_string(),
            top_left: (job.viewport.top_left.re, job.viewport.top_left.im),
            bottom_right: (job.viewport.bottom_right.re, job.viewport.bottom_right.im),
            width: frame.width,
            height: frame.height,
        },
    )?;

    info!(output = %cli.output.display(), "Plot written");
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("wplot: {e}");
        std::process::exit(1);
    }
}
