//! Client execution: wires the REST API, the STOMP channel and the terminal
//! view into a session and runs it until the user quits.

use std::sync::Arc;

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use crate::{
    config::ClientConfig,
    domain::{ChatApi, Identity, RoomId},
    error::ClientError,
    infrastructure::{http::HttpChatApi, stomp::StompChannel},
    login::{LoginRequest, RoomChoice},
    session::{Session, UserCommand},
    ui::{MessageArea, MessageLog, TerminalView, formatter::MessageFormatter},
};

/// Build a session for `login` against the configured backend, without connecting it.
///
/// With [`RoomChoice::Create`] the room is created first and the permission
/// control starts from the created room's flag.
pub async fn prepare_session<V: MessageArea>(
    config: &ClientConfig,
    login: LoginRequest,
    view: V,
) -> Result<Session<V>, ClientError> {
    let api = Arc::new(HttpChatApi::new(config.http_base.clone()));

    let (identity, permission) = match login.room {
        RoomChoice::Join(room_id) => (
            Identity::new(login.user_name, room_id, login.is_owner),
            None,
        ),
        RoomChoice::Create => {
            let room = api.create_room(&login.user_name).await?;
            tracing::info!("Created room '{}'", room.room_id);
            let room_id = RoomId::new(room.room_id.clone())?;
            (
                Identity::new(login.user_name, room_id, true),
                Some(room.permission()),
            )
        }
    };

    let channel = StompChannel::new(config.ws_url.clone(), identity.user_name.as_str());
    let session = Session::login(identity, Box::new(channel), api, view)
        .with_connect_timeout(config.connect_timeout);

    Ok(match permission {
        Some(permission) => session.with_permission(permission),
        None => session,
    })
}

/// Run the terminal client until the user quits or the connection is lost
pub async fn run_client(config: ClientConfig, login: LoginRequest) -> Result<(), ClientError> {
    let view = TerminalView::new(login.user_name.as_str());
    let mut session = prepare_session(&config, login, view).await?;

    let banner = connect_with_banner(&mut session).await?;
    print!("{banner}");

    let (command_tx, mut command_rx) = mpsc::unbounded_channel::<UserCommand>();
    let prompt = format!("{}> ", session.identity().user_name);

    // rustyline is synchronous, so it gets its own thread
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                tracing::error!("Failed to initialize readline: {}", e);
                command_tx.send(UserCommand::Quit).ok();
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let Some(command) = UserCommand::parse(&line) else {
                        continue;
                    };
                    rl.add_history_entry(line.trim()).ok();
                    let quit = command == UserCommand::Quit;
                    if command_tx.send(command).is_err() || quit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    tracing::info!("Input closed");
                    command_tx.send(UserCommand::Quit).ok();
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    command_tx.send(UserCommand::Quit).ok();
                    break;
                }
            }
        }
    });

    let result = session.run(&mut command_rx).await;

    if let Some(path) = &config.transcript {
        write_transcript(path, session.view().log()).await?;
        tracing::info!("Transcript written to {}", path.display());
    }

    match &result {
        Ok(()) => tracing::info!("Client session ended normally"),
        Err(e) => tracing::warn!("Client session ended: {}", e),
    }
    result
}

/// Connect the session and build the banner describing the joined room.
/// Nothing is produced for a connection that failed.
async fn connect_with_banner<V: MessageArea>(
    session: &mut Session<V>,
) -> Result<String, ClientError> {
    session.connect().await?;
    Ok(MessageFormatter::format_connected(
        session.identity(),
        session.permission_control(),
    ))
}

/// Render the message log as a standalone HTML document
pub fn transcript_html(log: &MessageLog) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Chat transcript</title></head>\n<body>\n{}</body>\n</html>\n",
        log.to_html()
    )
}

async fn write_transcript(path: &std::path::Path, log: &MessageLog) -> Result<(), ClientError> {
    tokio::fs::write(path, transcript_html(log)).await?;
    Ok(())
}
