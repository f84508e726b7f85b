//! Display formatting for inbound server frames.

use scenescope_server::messages::{ObjectRef, ServerMessage};

/// Frame formatter for terminal display
pub struct FrameFormatter;

impl FrameFormatter {
    /// Format one inbound frame for display.
    ///
    /// Frames that fail to parse as protocol messages are shown raw rather
    /// than dropped.
    pub fn format_frame(text: &str) -> String {
        match serde_json::from_str::<ServerMessage>(text) {
            Ok(message) => Self::format_message(&message),
            Err(_) => Self::format_raw(text),
        }
    }

    fn format_message(message: &ServerMessage) -> String {
        match message {
            ServerMessage::Objects { data } => Self::format_objects(data),
            ServerMessage::ObjectProperties { data } => {
                let body = serde_json::to_string_pretty(data)
                    .unwrap_or_else(|_| "<unprintable snapshot>".to_string());
                format!("\n[properties]\n{body}\n")
            }
            ServerMessage::UpdateSuccess => "\n[ok] property updated\n".to_string(),
            ServerMessage::VisibilityUpdated { object, visible } => {
                format!("\n[ok] '{object}' is now {}\n", visibility_word(*visible))
            }
            ServerMessage::GameSpeedUpdated { speed } => {
                format!("\n[ok] game speed set to {speed}\n")
            }
            ServerMessage::MouseVisibilityUpdated { visible } => {
                format!("\n[ok] mouse cursor is now {}\n", visibility_word(*visible))
            }
            ServerMessage::GameRestarted => "\n[ok] game restarted\n".to_string(),
            ServerMessage::GameEnded => "\n[ok] game ended\n".to_string(),
            ServerMessage::GameInfo { data } => format!(
                "\n[info] fps: {} | speed: {} | mouse: {}\n",
                data.fps,
                data.game_speed,
                visibility_word(data.mouse_visible)
            ),
            ServerMessage::Error { message } => format!("\n[error] {message}\n"),
        }
    }

    fn format_objects(objects: &[ObjectRef]) -> String {
        let mut output = String::from("\n[objects]\n");
        if objects.is_empty() {
            output.push_str("(no objects)\n");
        } else {
            for object in objects {
                output.push_str(&format!("  {}\n", object.name));
            }
        }
        output
    }

    fn format_raw(text: &str) -> String {
        format!("\n<- {text}\n")
    }
}

fn visibility_word(visible: bool) -> &'static str {
    if visible { "visible" } else { "hidden" }
}
