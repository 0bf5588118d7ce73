use clap::Parser;
use pixpack_core::Config;

#[derive(Parser, Debug)]
#[command(name = "pixpack-api", about = "Batch image conversion, compression and resizing")]
struct Args {
    /// Port to listen on (overrides SERVER_PORT / PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::from_env()?;
    if let Some(port) = args.port {
        config = config.with_port(port);
    }

    let (_state, router) = pixpack_api::setup::initialize_app(config.clone())?;

    pixpack_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
