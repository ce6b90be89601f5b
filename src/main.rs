use clap::Parser;
use tokio_util::sync::CancellationToken;

use flv_stream_server::config::{self, Config};
use flv_stream_server::error::BoxError;
use flv_stream_server::{logger, server};

/// Serve an FLV file over HTTP with byte-range support
#[derive(Debug, Parser)]
#[command(name = "flv-stream-server", version, about)]
struct Cli {
    /// Configuration file, the extension may be omitted
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: String,
}

fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let cfg = Config::load_from(&cli.config)?;
    let _log_guards = logger::init(&cfg.logging)?;

    // Worker threads follow the configuration, CPU cores otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), BoxError> {
    let shutdown = CancellationToken::new();
    server::signal::start_signal_handler(shutdown.clone())?;
    server::run(cfg, shutdown).await
}
