//! Pulse a Wiz light until interrupted.
//!
//! Connects to the light, blinks it with a red/green tint and turns it off
//! again on Ctrl-C.
//!
//! Run with: cargo run --example wizctl -- --addr 192.168.1.100

use std::net::{IpAddr, SocketAddr};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use log::{error, info};
use wiz_pulse::{Colors, Light, LightConfig};

#[derive(Parser)]
#[command(name = "wizctl")]
#[command(about = "Pulse a Wiz light until interrupted", long_about = None)]
struct Cli {
    /// Address of the wiz light device
    #[arg(long, default_value = "127.0.0.1")]
    addr: IpAddr,

    /// Port of the wiz light device
    #[arg(long, default_value_t = Light::PORT)]
    port: u16,

    /// Timeout for each request in milliseconds
    #[arg(long, default_value_t = 1000)]
    timeout_ms: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("wiz_pulse=debug,wizctl=info"),
    )
    .init();

    let cli = Cli::parse();
    let addr = SocketAddr::new(cli.addr, cli.port);
    let config = LightConfig::default().with_timeout(Duration::from_millis(cli.timeout_ms));

    let light = match Light::connect(addr, config).await {
        Ok(light) => Arc::new(light),
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let pulse = Arc::clone(&light).spawn_pulse(Colors {
        white: 0,
        red: 255,
        blue: 0,
        green: 100,
    });

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("unable to listen for interrupt: {}", e);
    }
    pulse.stop().await;

    if let Err(e) = light.turn_off().await {
        error!("{}", e);
        return ExitCode::FAILURE;
    }

    info!("received interrupt, shutting down");
    ExitCode::SUCCESS
}
