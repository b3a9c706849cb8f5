// ./src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use fault_plot::{FaultPlotFile, SimpleFaultSource, get_fault_plot_with};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Zeichnet die Bruchflächen einer einfachen Störungsquelle, eine SVG-Figur je Magnitude.
#[derive(Parser, Debug)]
#[command(name = "fault_plot", version, about)]
struct Cli {
    /// TOML-Datei mit [source], optional [plot] und [basemap]
    #[arg(short, long)]
    source: PathBuf,

    /// Zielverzeichnis für die Figuren
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Überschreibt den Kartenpuffer in km
    #[arg(long)]
    buffer_km: Option<f64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let file = FaultPlotFile::load(&cli.source)
        .with_context(|| format!("loading {}", cli.source.display()))?;
    let mut plot_config = file.plot.clone();
    if let Some(buffer_km) = cli.buffer_km {
        plot_config = plot_config.with_buffer_km(buffer_km);
    }

    let source = SimpleFaultSource::new(file.source.clone()).context("building fault source")?;
    let figures =
        get_fault_plot_with(&source, &plot_config, &file.basemap).context("rendering figures")?;

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("creating {}", cli.out_dir.display()))?;
    for figure in &figures {
        let path = cli
            .out_dir
            .join(format!("{}_M{:?}.svg", file.source.source_id, figure.magnitude()));
        figure
            .save(&path)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    info!(figures = figures.len(), out_dir = %cli.out_dir.display(), "done");
    Ok(())
}
