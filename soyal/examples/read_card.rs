//! Read and print one card record
//!
//! `SOYAL_HOST=192.168.1.127 cargo run --example read_card -- 12`

use soyal::Device;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let host = std::env::var("SOYAL_HOST").unwrap_or_else(|_| "192.168.1.127".to_string());
    let port = std::env::var("SOYAL_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(1621);
    let node = std::env::var("SOYAL_NODE").ok().and_then(|n| n.parse().ok()).unwrap_or(1);
    let address: u16 = std::env::args().nth(1).unwrap_or_else(|| "0".into()).parse()?;

    let mut device = Device::new(host, port).with_node_id(node);
    device.connect().await?;

    let time = device.get_time().await?;
    println!("Device time: {}", time);

    let card = device.get_card(address).await?;
    println!("{}", card);

    device.disconnect().await?;

    Ok(())
}
