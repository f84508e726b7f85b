//! REPL command parsing.
//!
//! Each shorthand maps to one protocol request. `raw` escapes the shorthand
//! layer and sends an arbitrary JSON frame verbatim.

use serde_json::Value;

use scenescope_server::messages::ClientMessage;

use crate::error::ClientError;

/// What a line of REPL input asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    /// Send a protocol request.
    Request(ClientMessage),
    /// Send an arbitrary JSON frame as-is.
    Raw(String),
    /// Print the command reference.
    Help,
    /// Leave the REPL.
    Quit,
    /// Blank line, nothing to do.
    Empty,
}

/// Command reference printed for `help`.
pub const HELP_TEXT: &str = "\
Commands:
  objects                            list all scene objects
  select <name>                      fetch an object's properties (and watch it)
  set <object> <property> <value> [axis]
                                     update a property; axis applies to
                                     position/rotation/scale (default: x)
  vis <object>                       toggle an object's visibility
  info                               show fps, game speed and mouse state
  speed <value>                      set the simulation speed multiplier
  physics                            toggle physics debug visualization
  mouse                              toggle mouse cursor visibility
  restart                            restart the simulation
  end                                end the simulation
  raw <json>                         send a raw JSON frame
  help                               show this reference
  quit                               exit the client";

/// Parse one line of REPL input.
pub fn parse_line(line: &str) -> Result<ReplCommand, ClientError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ReplCommand::Empty);
    }

    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default();
    let rest: Vec<&str> = parts.collect();

    match command {
        "objects" => Ok(ReplCommand::Request(ClientMessage::GetObjects)),
        "select" => {
            let name = required(&rest, 0, "select <name>")?;
            Ok(ReplCommand::Request(ClientMessage::GetObjectProperties {
                name: name.to_string(),
            }))
        }
        "set" => {
            let object = required(&rest, 0, "set <object> <property> <value> [axis]")?;
            let property = required(&rest, 1, "set <object> <property> <value> [axis]")?;
            let value = required(&rest, 2, "set <object> <property> <value> [axis]")?;
            Ok(ReplCommand::Request(ClientMessage::UpdateObjectProperty {
                object: object.to_string(),
                property: property.to_string(),
                value: parse_value(value),
                axis: rest.get(3).map(|axis| axis.to_string()),
            }))
        }
        "vis" => {
            let object = required(&rest, 0, "vis <object>")?;
            Ok(ReplCommand::Request(ClientMessage::ToggleVisibility {
                object: object.to_string(),
            }))
        }
        "info" => Ok(ReplCommand::Request(ClientMessage::GetGameInfo)),
        "speed" => {
            let value = required(&rest, 0, "speed <value>")?;
            Ok(ReplCommand::Request(ClientMessage::SetGameSpeed {
                speed: parse_value(value),
            }))
        }
        "physics" => Ok(ReplCommand::Request(ClientMessage::TogglePhysicsDebug)),
        "mouse" => Ok(ReplCommand::Request(ClientMessage::ToggleMouse)),
        "restart" => Ok(ReplCommand::Request(ClientMessage::RestartGame)),
        "end" => Ok(ReplCommand::Request(ClientMessage::EndGame)),
        "raw" => {
            let frame = line["raw".len()..].trim();
            if frame.is_empty() {
                return Err(ClientError::InvalidCommand("Usage: raw <json>".to_string()));
            }
            Ok(ReplCommand::Raw(frame.to_string()))
        }
        "help" => Ok(ReplCommand::Help),
        "quit" | "exit" => Ok(ReplCommand::Quit),
        other => Err(ClientError::InvalidCommand(format!(
            "Unknown command '{other}'. Type 'help' for the command reference."
        ))),
    }
}

fn required<'a>(rest: &[&'a str], index: usize, usage: &str) -> Result<&'a str, ClientError> {
    rest.get(index)
        .copied()
        .ok_or_else(|| ClientError::InvalidCommand(format!("Usage: {usage}")))
}

/// Interpret a token as JSON where possible, otherwise as a bare string.
/// `set Cube position 1.5` carries a number; `set Cube tag boss` a string.
fn parse_value(token: &str) -> Value {
    serde_json::from_str(token).unwrap_or_else(|_| Value::String(token.to_string()))
}
