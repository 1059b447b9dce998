//! Serve command implementation.

use sealsync_protocol::Record;
use sealsync_server::{ServerConfig, SyncServer};
use std::net::SocketAddr;
use tracing::info;

/// Runs the record server until interrupted.
pub fn run(bind: SocketAddr, initial: String) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::new(bind).with_initial_record(Record::new(initial));
    let server = SyncServer::new(config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    info!(%bind, initial = %server.record().data, "starting record server");
    println!("Serving on http://{bind}");
    runtime.block_on(server.run())?;
    Ok(())
}
