use clap::Parser;
use partitioned_kv::config::NodeConfig;
use partitioned_kv::logging::init_tracing;
use partitioned_kv::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = NodeConfig::parse();
    init_tracing(config.log_level);

    let node = config.build_node()?;

    tracing::info!("Starting node {} on {}", node.id, config.bind);
    tracing::info!(
        "Store: {:?} (partitions={}, virtual_nodes={}, replication_factor={})",
        config.store,
        config.partitions,
        config.virtual_nodes,
        config.replication_factor
    );
    if node.peer_count() > 0 {
        for peer in node.peers() {
            tracing::info!("  - peer {} at {}", peer.id, peer.address);
        }
    } else {
        tracing::info!("No peers configured, running standalone");
    }

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!("Press Ctrl+C to shutdown");

    tokio::select! {
        result = server::serve(listener, node) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
        }
    }

    Ok(())
}
