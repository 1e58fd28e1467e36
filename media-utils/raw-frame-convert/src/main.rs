use clap::Parser;
use color_eyre::eyre;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

use raw_frame_convert::{run_cli, Cli};

/// Log to the console, filtered by `RUST_LOG` (default `info`).
fn init_logging() -> eyre::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let collector = tracing_subscriber::registry()
        .with(fmt::layer().with_file(true).with_line_number(true))
        .with(filter);
    tracing::subscriber::set_global_default(collector)?;
    Ok(())
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    init_logging()?;
    let cli = Cli::parse();
    run_cli(cli)?;
    Ok(())
}
