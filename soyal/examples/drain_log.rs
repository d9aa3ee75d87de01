//! Sync the clock, then read and delete event log entries until empty

use soyal::Device;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    let host = std::env::var("SOYAL_HOST").unwrap_or_else(|_| "192.168.1.127".to_string());
    let node = std::env::var("SOYAL_NODE").ok().and_then(|n| n.parse().ok()).unwrap_or(1);

    let mut device = Device::with_host(host).with_node_id(node);
    device.connect().await?;

    device.sync_time().await?;

    let mut count = 0;
    while let Some(log) = device.get_oldest_log().await? {
        println!("{}", log);
        device.delete_oldest_log().await?;
        count += 1;
    }
    println!("Drained {} entries", count);

    device.disconnect().await?;

    Ok(())
}
