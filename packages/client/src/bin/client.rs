//! Terminal chat client for Charla rooms.
//!
//! Logs a user into a room over STOMP/WebSocket, replays the room history
//! and sends every entered line as a chat message. Room owners can switch the
//! write permission with `/toggle`.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin charla-client -- --user alice --room room1
//! cargo run --bin charla-client -- -u alice --create-room --transcript chat.html
//! ```

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use charla_client::{
    ClientConfig, LoginForm,
    config::{DEFAULT_SERVER_URL, DEFAULT_WS_PATH},
};
use charla_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "charla-client")]
#[command(about = "Chat client for Charla rooms over STOMP/WebSocket", long_about = None)]
struct Args {
    /// User name shown to the room
    #[arg(short = 'u', long)]
    user: String,

    /// Room to join
    #[arg(short = 'r', long, required_unless_present = "create_room", conflicts_with = "create_room")]
    room: Option<String>,

    /// Join as the room owner (enables '/toggle')
    #[arg(long)]
    owner: bool,

    /// Create a new room owned by the user and join it
    #[arg(long)]
    create_room: bool,

    /// Backend base URL
    #[arg(short = 's', long, default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// WebSocket path below the server URL
    #[arg(long, default_value = DEFAULT_WS_PATH)]
    ws_path: String,

    /// Give up connecting after this many seconds (waits indefinitely when unset)
    #[arg(long)]
    connect_timeout_secs: Option<u64>,

    /// Write an HTML transcript of the session to this file on exit
    #[arg(long)]
    transcript: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let config = match ClientConfig::new(&args.server, &args.ws_path) {
        Ok(config) => config
            .with_connect_timeout(args.connect_timeout_secs.map(Duration::from_secs))
            .with_transcript(args.transcript),
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let login = LoginForm {
        user_name: args.user,
        room_id: args.room,
        owner: args.owner,
        create_room: args.create_room,
    };
    let login = match login.submit() {
        Ok(login) => login,
        Err(e) => {
            tracing::error!("Invalid login: {}", e);
            std::process::exit(1);
        }
    };

    // Run the client
    if let Err(e) = charla_client::run_client(config, login).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
