use clap::{Args, Parser, Subcommand};
use partitioned_kv::client::KvClient;
use partitioned_kv::logging::{init_tracing, LogLevel};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(about = "Talks to a partitioned-kv node", version)]
struct Cli {
    /// Node to talk to, as `host:port` or a full URL.
    #[arg(long, short = 'n', env = "NODE_URL", default_value = "127.0.0.1:9090")]
    node: String,

    /// Request timeout in milliseconds.
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,

    #[arg(long, value_enum, default_value_t = LogLevel::Warn, env = "KV_LOG_LEVEL")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Command {
    #[command(about = "Prints the value stored under a key.")]
    Get { key: String },
    #[command(about = "Stores a value under a key.")]
    Set { key: String, value: String },
    #[command(about = "Deletes a key.")]
    Delete { key: String },
    #[command(about = "Manages the node's replication peers.", subcommand)]
    Peer(PeerCommand),
    #[command(about = "Shows node id, peer count and per-partition entry counts.")]
    Stats,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum PeerCommand {
    #[command(about = "Lists registered peers.")]
    List,
    #[command(about = "Registers a peer the node will replicate to.")]
    Add(AddPeerArgs),
    #[command(about = "Removes a peer.")]
    Remove { id: String },
}

#[derive(Args, Debug)]
struct AddPeerArgs {
    id: String,
    /// Peer HTTP address, `host:port`.
    address: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    let client = KvClient::new(&cli.node).with_timeout(Duration::from_millis(cli.timeout_ms));
    tracing::debug!("Using node {}", client.base_url());

    match cli.command {
        Command::Get { key } => match client.get(&key).await? {
            Some(value) => println!("{}", value),
            None => {
                eprintln!("Key not found: {}", key);
                std::process::exit(1);
            }
        },
        Command::Set { key, value } => {
            client.set(&key, &value).await?;
            println!("OK");
        }
        Command::Delete { key } => {
            if client.delete(&key).await? {
                println!("OK");
            } else {
                eprintln!("Key not found: {}", key);
                std::process::exit(1);
            }
        }
        Command::Peer(PeerCommand::List) => {
            for peer in client.peers().await? {
                println!("{}\t{}", peer.id, peer.address);
            }
        }
        Command::Peer(PeerCommand::Add(args)) => {
            client.add_peer(&args.id, &args.address).await?;
            println!("OK");
        }
        Command::Peer(PeerCommand::Remove { id }) => {
            if client.remove_peer(&id).await? {
                println!("OK");
            } else {
                eprintln!("Unknown peer: {}", id);
                std::process::exit(1);
            }
        }
        Command::Stats => {
            let stats = client.stats().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}
