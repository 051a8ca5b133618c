use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use gridviz_core::{
    compare_latest, render_png, view_latest, Colormap, CompareConfig, FieldName, PlotField,
    RenderOptions,
};

/// Structured-grid snapshot comparison and visualization
#[derive(Parser, Debug)]
#[command(name = "gridviz")]
#[command(about = "Compare structured-grid solver snapshots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare the latest snapshots of two output directories
    Diff(DiffArgs),
    /// Render the latest snapshot of a single output directory
    View(ViewArgs),
}

#[derive(Args, Debug)]
struct DiffArgs {
    /// Directory holding the reference solution snapshots
    #[arg(long)]
    reference_dir: Option<PathBuf>,

    /// Directory holding the current solution snapshots
    #[arg(long)]
    current_dir: Option<PathBuf>,

    /// Field to compare (u, v, p, abs_vel)
    #[arg(short, long, default_value = "abs_vel")]
    field: String,

    /// JSON config file replacing the directory and field flags
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    render: RenderArgs,
}

#[derive(Args, Debug)]
struct ViewArgs {
    /// Directory holding the solution snapshots
    #[arg(long)]
    dir: PathBuf,

    /// Field to render (u, v, p, abs_vel)
    #[arg(short, long, default_value = "abs_vel")]
    field: String,

    #[command(flatten)]
    render: RenderArgs,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Output image path
    #[arg(short, long, default_value = "field.png")]
    output: PathBuf,

    /// Colormap (viridis, grayscale)
    #[arg(long, default_value = "viridis")]
    colormap: String,

    /// Output image width in pixels
    #[arg(long, default_value_t = 900)]
    width: u32,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Diff(args) => diff(args),
        Command::View(args) => view(args),
    }
}

fn diff(args: DiffArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = match args.config {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .map_err(|e| format!("cannot read config '{}': {e}", path.display()))?;
            serde_json::from_str::<CompareConfig>(&text)
                .map_err(|e| format!("cannot parse config '{}': {e}", path.display()))?
        }
        None => CompareConfig {
            reference_dir: args
                .reference_dir
                .ok_or("either --config or --reference-dir is required")?,
            current_dir: args
                .current_dir
                .ok_or("either --config or --current-dir is required")?,
            field: args.field.parse::<FieldName>()?,
        },
    };

    let plot = compare_latest(&config)?;
    let options = RenderOptions::new(
        format!("{}: reference vs current", config.field),
        format!("abs difference of {}", config.field),
    );
    render(&plot, &args.render, options)
}

fn view(args: ViewArgs) -> Result<(), Box<dyn std::error::Error>> {
    let field = args.field.parse::<FieldName>()?;
    let plot = view_latest(&args.dir, field)?;
    let options = RenderOptions::new(format!("latest snapshot: {field}"), field.to_string());
    render(&plot, &args.render, options)
}

fn render(
    plot: &PlotField,
    args: &RenderArgs,
    options: RenderOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let colormap = args.colormap.parse::<Colormap>()?;
    render_png(&args.output, plot, &options.with_colormap(colormap), args.width)?;
    println!("wrote {}", args.output.display());
    Ok(())
}
