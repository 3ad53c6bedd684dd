use super::escape::escape_html;
use crate::chat::{Message, Transcript};

/// Markup for one message: text, buttons, metadata. Everything user- or
/// server-supplied goes through `escape_html`.
pub fn render_message_html(message: &Message) -> String {
    let mut out = format!(
        "<div class=\"msg {}\"><div>{}</div>",
        message.role.as_str(),
        escape_html(&message.text)
    );

    if !message.affordances.is_empty() {
        out.push_str("<div class=\"buttons\">");
        for button in &message.affordances {
            out.push_str(&format!(
                "<button class=\"btn\" data-value=\"{}\">{}</button>",
                escape_html(button.submit_value()),
                escape_html(&button.label)
            ));
        }
        out.push_str("</div>");
    }

    if !message.metadata.is_empty() {
        let json = serde_json::to_string(&message.metadata).unwrap_or_default();
        out.push_str(&format!("<div class=\"meta\">{}</div>", escape_html(&json)));
    }

    out.push_str("</div>");
    out
}

/// Standalone page with the whole log
pub fn render_transcript_html(transcript: &Transcript, session_id: &str) -> String {
    let mut out = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Natlang transcript</title>\n</head>\n<body>\n",
    );
    out.push_str(&format!(
        "<div id=\"log\" data-session=\"{}\">\n",
        escape_html(session_id)
    ));
    for message in transcript.messages() {
        out.push_str(&render_message_html(message));
        out.push('\n');
    }
    out.push_str("</div>\n</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{reduce, Button, ChatReply, Event};
    use serde_json::json;

    #[test]
    fn test_user_message_is_escaped() {
        let html = render_message_html(&Message::user("<img src=x onerror='boom'>"));
        assert_eq!(
            html,
            "<div class=\"msg user\"><div>&lt;img src=x onerror=&#39;boom&#39;&gt;</div></div>"
        );
    }

    #[test]
    fn test_buttons_and_metadata() {
        let message = Message::bot("Pick one")
            .with_affordances(vec![Button::new("Billing"), Button::with_value("A&B", "a_b")]);
        let html = render_message_html(&message);
        assert!(html.contains("<button class=\"btn\" data-value=\"Billing\">Billing</button>"));
        assert!(html.contains("data-value=\"a_b\">A&amp;B</button>"));

        let reply = ChatReply::from_value(&json!({"reply": "ok", "ticket_id": "T-<1>"})).unwrap();
        let t = reduce(Default::default(), Event::ReplyReceived(reply));
        let html = render_message_html(t.last().unwrap());
        assert!(html.contains("<div class=\"meta\">{&quot;ticket&quot;:&quot;T-&lt;1&gt;&quot;}</div>"));
    }

    #[test]
    fn test_transcript_page() {
        let t = reduce(Default::default(), Event::Greeted);
        let t = reduce(t, Event::UserSubmitted("hi".to_string()));
        let page = render_transcript_html(&t, "s-1");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("data-session=\"s-1\""));
        assert_eq!(page.matches("<div class=\"msg ").count(), 2);
    }
}
