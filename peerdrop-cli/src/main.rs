use anyhow::{Context, Result};
use bytes::Bytes;
use clap::{Args, Parser, Subcommand};
use colored::*;
use dialoguer::Password;
use peerdrop::client::{ClientConfig, ManagerEvent, PeerSessionManager, TransportConfig};
use peerdrop::server::{RelayConfig, serve};
use peerdrop::{ApplicationMessage, FileMeta, PeerId, RoomId};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "peerdrop")]
#[command(about = "Share text, passwords and files directly between peers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling relay.
    Relay {
        #[arg(long, env = "PEERDROP_BIND", default_value = "0.0.0.0:3001")]
        bind: SocketAddr,
    },

    /// Join (or create) a room and print whatever arrives.
    Listen {
        #[command(flatten)]
        peer: PeerArgs,

        /// Room to join. A new one is created when omitted.
        #[arg(long)]
        room: Option<String>,

        /// Directory received files are written to.
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// Print received passwords instead of masking them.
        #[arg(long)]
        reveal: bool,
    },

    /// Send a text message to a room.
    SendText {
        #[command(flatten)]
        peer: PeerArgs,

        #[arg(long)]
        room: String,

        text: String,
    },

    /// Prompt for a password and send it to a room.
    SendPassword {
        #[command(flatten)]
        peer: PeerArgs,

        #[arg(long)]
        room: String,
    },

    /// Send a file to every connected peer in a room.
    SendFile {
        #[command(flatten)]
        peer: PeerArgs,

        #[arg(long)]
        room: String,

        path: PathBuf,

        #[arg(long, default_value = "application/octet-stream")]
        mime: String,
    },
}

#[derive(Args)]
struct PeerArgs {
    /// Relay WebSocket endpoint.
    #[arg(long, env = "PEERDROP_RELAY", default_value = "ws://127.0.0.1:3001/ws")]
    relay: String,

    /// Skip STUN and use host candidates only.
    #[arg(long)]
    host_only: bool,

    /// Seconds to wait for a direct channel before giving up on it.
    #[arg(long, default_value_t = 15)]
    wait: u64,

    /// Close sessions that have not connected after this many seconds.
    #[arg(long)]
    negotiation_timeout: Option<u64>,
}

impl PeerArgs {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(self.relay.clone());
        if self.host_only {
            config = config.with_transport(TransportConfig::host_only());
        }
        if let Some(secs) = self.negotiation_timeout {
            config = config.with_negotiation_timeout(Duration::from_secs(secs));
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Relay { bind } => {
            println!("{} {}", "Relay listening on".green().bold(), bind);
            serve(RelayConfig { bind }).await?;
        }

        Commands::Listen {
            peer,
            room,
            out,
            reveal,
        } => listen(peer, room, out, reveal).await?,

        Commands::SendText { peer, room, text } => {
            send_message(&peer, room, ApplicationMessage::text(text)).await?;
        }

        Commands::SendPassword { peer, room } => {
            let password = Password::new()
                .with_prompt("Password to share")
                .interact()
                .context("Failed to read password")?;
            send_message(&peer, room, ApplicationMessage::password(password)).await?;
        }

        Commands::SendFile {
            peer,
            room,
            path,
            mime,
        } => send_file(&peer, room, &path, mime).await?,
    }

    Ok(())
}

async fn listen(peer: PeerArgs, room: Option<String>, out: PathBuf, reveal: bool) -> Result<()> {
    let (manager, mut events) = PeerSessionManager::connect(peer.client_config())
        .await
        .context("Failed to connect to relay")?;

    let room_id = match room {
        Some(room) => {
            let room_id = RoomId::from(room);
            manager.join_room(room_id.clone()).await?;
            room_id
        }
        None => manager.create_room().await?,
    };
    println!(
        "{} {} {} {}",
        "Joined room".green().bold(),
        room_id.as_str().bold(),
        "as".green(),
        manager.local_id().short()
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => {
                let Some(event) = event else {
                    println!("{}", "Relay connection closed".red());
                    break;
                };
                print_event(event, &out, reveal).await;
            }
        }
    }

    manager.close().await?;
    Ok(())
}

async fn print_event(event: ManagerEvent, out: &Path, reveal: bool) {
    match event {
        ManagerEvent::PeerJoined(id) => println!("{} {}", "+".green(), id.short()),
        ManagerEvent::PeerLeft(id) => println!("{} {}", "-".red(), id.short()),
        ManagerEvent::ConnectionStateChanged(open) => {
            if open {
                println!("{}", "Direct channel open".green());
            } else {
                println!("{}", "No direct channel".yellow());
            }
        }
        ManagerEvent::MessageReceived { from, message } => match message {
            ApplicationMessage::Text { content } => {
                println!("[{}] {}", tag(&from), content);
            }
            ApplicationMessage::Password { content } => {
                let shown = if reveal {
                    content
                } else {
                    "*".repeat(content.chars().count())
                };
                println!("[{}] {} {}", tag(&from), "password:".magenta(), shown);
            }
            ApplicationMessage::FileMeta(meta) => {
                println!(
                    "[{}] incoming {} ({} bytes, {})",
                    tag(&from),
                    meta.name.as_str().bold(),
                    meta.size,
                    meta.mime_type
                );
            }
            ApplicationMessage::FileData(data) => {
                println!("[{}] {} raw bytes", tag(&from), data.len());
            }
        },
        ManagerEvent::FileReceived { from, meta, data } => {
            match save_file(out, &from, &meta, &data).await {
                Ok(path) => println!(
                    "[{}] {} {}",
                    tag(&from),
                    "saved".green(),
                    path.display()
                ),
                Err(e) => warn!("Failed to save {}: {:?}", meta.name, e),
            }
        }
    }
}

fn tag(id: &PeerId) -> ColoredString {
    id.short().as_str().cyan()
}

async fn save_file(out: &Path, from: &PeerId, meta: &FileMeta, data: &Bytes) -> Result<PathBuf> {
    let name = Path::new(&meta.name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("file-{}", from.short()));
    let path = out.join(name);

    tokio::fs::create_dir_all(out)
        .await
        .with_context(|| format!("Failed to create {}", out.display()))?;
    tokio::fs::write(&path, data)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Join `room` and wait up to `--wait` seconds for a direct channel.
async fn join_and_wait(
    peer: &PeerArgs,
    room: String,
) -> Result<(PeerSessionManager, UnboundedReceiver<ManagerEvent>, bool)> {
    let (manager, mut events) = PeerSessionManager::connect(peer.client_config())
        .await
        .context("Failed to connect to relay")?;
    manager.join_room(RoomId::from(room)).await?;

    println!("{}", "Waiting for a peer...".cyan());
    let wait = Duration::from_secs(peer.wait);
    let connected = tokio::time::timeout(wait, async {
        while let Some(event) = events.recv().await {
            if event == ManagerEvent::ConnectionStateChanged(true) {
                return true;
            }
        }
        false
    })
    .await
    .unwrap_or(false);

    Ok((manager, events, connected))
}

/// Closing right after a send can cut off frames still queued in SCTP.
async fn finish(manager: PeerSessionManager) -> Result<()> {
    tokio::time::sleep(Duration::from_millis(500)).await;
    manager.close().await?;
    Ok(())
}

async fn send_message(peer: &PeerArgs, room: String, message: ApplicationMessage) -> Result<()> {
    let (manager, _events, connected) = join_and_wait(peer, room).await?;
    if !connected {
        println!("{}", "No direct channel, using the relay".yellow());
    }

    let kind = message.kind();
    if manager.send_message(message).await? {
        println!("{} {}", "Sent".green().bold(), kind);
    } else {
        println!("{} {} {}", "Relayed".yellow().bold(), kind, "(live peers only)");
    }

    finish(manager).await
}

async fn send_file(peer: &PeerArgs, room: String, path: &Path, mime: String) -> Result<()> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_owned());
    let meta = FileMeta {
        name,
        size: data.len() as u64,
        mime_type: mime,
    };

    let (manager, _events, connected) = join_and_wait(peer, room).await?;
    if !connected {
        manager.close().await?;
        anyhow::bail!("No peer connected within {}s; files are never relayed", peer.wait);
    }

    let delivered = manager.send_file(meta, Bytes::from(data)).await?;
    println!(
        "{} {} {}",
        "Sent file to".green().bold(),
        delivered,
        if delivered == 1 { "peer" } else { "peers" }
    );

    finish(manager).await
}
