use colored::Colorize;
use serde_json::Value;

use super::escape::escape_terminal;
use crate::chat::{Message, Metadata, Role};

/// `key=value` pairs, strings unquoted
pub fn format_metadata(metadata: &Metadata) -> String {
    metadata
        .iter()
        .map(|(key, value)| match value {
            Value::String(s) => format!("{}={}", key, s),
            other => format!("{}={}", key, other),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Numbered button row, e.g. `[1] Billing    [2] Outage Assist`
pub fn format_buttons(message: &Message) -> Option<String> {
    if message.affordances.is_empty() {
        return None;
    }
    Some(
        message
            .affordances
            .iter()
            .enumerate()
            .map(|(i, b)| format!("[{}] {}", i + 1, escape_terminal(&b.label)))
            .collect::<Vec<_>>()
            .join("    "),
    )
}

/// Line-oriented rendering used by the REPL and one-shot text output
pub fn render_message_plain(message: &Message, show_metadata: bool) -> String {
    let speaker = match message.role {
        Role::User => "You".blue().bold(),
        Role::Bot => "Natlang".green().bold(),
    };
    let mut out = format!("{}: {}", speaker, escape_terminal(&message.text));

    if let Some(buttons) = format_buttons(message) {
        out.push('\n');
        out.push_str(&buttons.cyan().to_string());
    }
    if show_metadata && !message.metadata.is_empty() {
        out.push('\n');
        out.push_str(
            &format!("  meta: {}", escape_terminal(&format_metadata(&message.metadata)))
                .dimmed()
                .to_string(),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Button;
    use serde_json::json;

    #[test]
    fn test_format_metadata() {
        let mut metadata = Metadata::new();
        metadata.insert("ticket".to_string(), json!("T-1"));
        metadata.insert("actions".to_string(), json!(["notify"]));
        assert_eq!(format_metadata(&metadata), "actions=[\"notify\"] ticket=T-1");
    }

    #[test]
    fn test_plain_rendering() {
        colored::control::set_override(false);
        let message = Message::bot("Pick\x1b one")
            .with_affordances(vec![Button::new("Billing"), Button::new("Outage Assist")]);
        let text = render_message_plain(&message, true);
        assert_eq!(
            text,
            "Natlang: Pick\\u{1b} one\n[1] Billing    [2] Outage Assist"
        );
    }
}
