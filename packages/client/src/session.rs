//! WebSocket client session management.

use std::io::Write as _;

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use crate::commands::{HELP_TEXT, ReplCommand, parse_line};
use crate::error::ClientError;
use crate::formatter::FrameFormatter;

const PROMPT: &str = "scene> ";

fn redisplay_prompt() {
    print!("{PROMPT}");
    let _ = std::io::stdout().flush();
}

/// Run the interactive client session against `url`.
pub async fn run_client_session(url: &str) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to {}", url);
    println!("\nConnected. Type 'help' for commands, 'quit' to exit.\n");

    let (mut write, mut read) = ws_stream.split();

    // Incoming frames. The server pushes the object list twice a second, so
    // consecutive identical frames are collapsed to keep the terminal usable.
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;
        let mut last_frame: Option<String> = None;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let text = text.as_str().to_string();
                    if last_frame.as_deref() == Some(text.as_str()) {
                        continue;
                    }
                    print!("{}", FrameFormatter::format_frame(&text));
                    redisplay_prompt();
                    last_frame = Some(text);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    // Channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Rustyline is synchronous; it gets its own blocking thread.
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Parse each line and ship the resulting frame.
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            let frame = match parse_line(&line) {
                Ok(ReplCommand::Request(request)) => match serde_json::to_string(&request) {
                    Ok(frame) => frame,
                    Err(e) => {
                        tracing::error!("Failed to serialize request: {}", e);
                        continue;
                    }
                },
                Ok(ReplCommand::Raw(frame)) => frame,
                Ok(ReplCommand::Help) => {
                    println!("{HELP_TEXT}");
                    continue;
                }
                Ok(ReplCommand::Quit) => break,
                Ok(ReplCommand::Empty) => continue,
                Err(e) => {
                    println!("{e}");
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(frame.into())).await {
                tracing::warn!("Failed to send frame: {}", e);
                write_error = true;
                break;
            }
        }

        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            if read_result.unwrap_or(false) {
                return Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            if write_result.unwrap_or(false) {
                return Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
        }
    }

    Ok(())
}
