use std::net::{Ipv4Addr, SocketAddr};

use clap::Parser;
use itom_monitor::{
    actors::monitor::MonitorHandle,
    api::{ApiConfig, ApiState, spawn_api_server},
    config::{Config, read_config_file},
    util::{get_addr, get_cors, get_port},
};
use tracing::{debug, info, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file
    #[arg(short, long)]
    file: Option<String>,

    /// Address to bind to (overrides ITOM_ADDR)
    #[arg(long)]
    addr: Option<Ipv4Addr>,

    /// Port to listen on (overrides ITOM_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Seconds between background sampling passes
    #[arg(long)]
    interval: Option<u64>,

    /// Disable CORS headers
    #[arg(long)]
    no_cors: bool,

    /// Log everything down to trace level
    #[arg(short, long)]
    verbose: bool,
}

fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::TRACE
    } else {
        LevelFilter::INFO
    };
    let filter = filter::Targets::new().with_targets(vec![
        ("itom_monitor", level),
        ("itom_hub", level),
        ("tower_http", level),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.file {
        Some(path) => read_config_file(path)?,
        None => Config::default(),
    };

    if let Some(interval) = args.interval {
        config.interval = interval;
        config.validate()?;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init(args.verbose);
    trace!("started with args: {args:?}");

    let config = load_config(&args)?;
    debug!(
        "monitoring {} hosts every {}s",
        config.hosts.len(),
        config.interval
    );

    let monitor = MonitorHandle::spawn(&config);

    let api_config = ApiConfig {
        bind_addr: SocketAddr::from((
            args.addr.unwrap_or_else(get_addr),
            args.port.unwrap_or_else(get_port),
        )),
        enable_cors: !args.no_cors && get_cors(),
    };
    let addr = spawn_api_server(api_config, ApiState::new(monitor.clone())).await?;
    info!("hub ready on http://{addr}");

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    monitor.shutdown().await?;

    Ok(())
}
