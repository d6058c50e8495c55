//! Face-avoiding pan/tilt controller: steers a servo mount away from faces.

use anyhow::Result;
use clap::Parser;
use log::info;
use pan_tilt_avoider::{
    app::{AppConfig, AvoiderApp, LinkTarget},
    config::{Config, EXAMPLE_CONFIG},
};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Serial device the servo board is attached to
    #[arg(short, long, conflicts_with_all = ["auto_port", "dry_run"])]
    device: Option<PathBuf>,

    /// Pick the servo board from the ports found in --ports-dir
    #[arg(long)]
    auto_port: bool,

    /// Directory searched by --auto-port
    #[arg(long, default_value = "/dev")]
    ports_dir: PathBuf,

    /// Log commands instead of sending them
    #[arg(long)]
    dry_run: bool,

    /// Detection timeline to replay (YAML format)
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Override the loop rate
    #[arg(long)]
    fps: Option<u32>,

    /// Stop after this many seconds
    #[arg(long)]
    duration: Option<f64>,

    /// Enable debug output
    #[arg(short = 'D', long)]
    debug: bool,

    /// Print an example configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Pan/tilt face avoider");

    // Load configuration if provided
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    if let Some(fps) = args.fps {
        config.display.target_fps = fps;
    }
    config.validate()?;

    let link = if args.dry_run {
        LinkTarget::DryRun
    } else if let Some(device) = args.device.or_else(|| config.link.device.clone()) {
        LinkTarget::Device(device)
    } else if args.auto_port {
        LinkTarget::AutoDiscover(args.ports_dir)
    } else {
        log::warn!("No device given; use --device, --auto-port or --dry-run. Running dry.");
        LinkTarget::DryRun
    };

    let duration = match args.duration {
        Some(secs) if secs.is_finite() && secs > 0.0 => Some(Duration::from_secs_f64(secs)),
        Some(secs) => anyhow::bail!("Duration must be a positive number of seconds, got {secs}"),
        None => None,
    };

    // Create and run application
    let mut app = AvoiderApp::new(AppConfig {
        config,
        link,
        script: args.script,
        duration,
    })?;
    app.run()?;

    Ok(())
}
