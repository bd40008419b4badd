//! Fixed-width rendering of the conversation.

use chrono::Local;

use crate::chat::config::UiConfig;
use crate::chat::controller::Conversation;
use crate::chat::message::{DeliveryFailure, Message};

use super::format::{align_right, center, format_time, wrap};
use super::viewport::Viewport;

/// Marker prefixed to delivery failures and the error status line.
const FAILURE_MARK: &str = "! ";

/// Shown below the transcript while scrolled away from the newest line.
const SCROLLED_HINT: &str = "↓ newer messages below (/down)";

/// Render the message sequence top-to-bottom.
///
/// Own messages are right-aligned, guide messages left-aligned, each
/// followed by its local time.
#[must_use]
pub fn render_messages(
    messages: &[Message],
    failures: &[DeliveryFailure],
    width: usize,
) -> Vec<String> {
    let bubble_width = (width / 5 * 3).max(1);
    let mut lines = Vec::new();

    for (i, message) in messages.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }

        let time = format_time(&message.timestamp.with_timezone(&Local));
        let mut bubble = wrap(&message.text, bubble_width);
        bubble.push(time);

        if let Some(failure) = failures.iter().find(|f| f.message_id == message.id) {
            bubble.extend(wrap(
                &format!("{FAILURE_MARK}not delivered: {}", failure.reason),
                bubble_width,
            ));
        }

        if message.is_own {
            lines.extend(bubble.iter().map(|l| align_right(l, width)));
        } else {
            lines.extend(bubble);
        }
    }

    lines
}

/// Render the header block.
#[must_use]
pub fn render_header(ui: &UiConfig) -> Vec<String> {
    vec![
        center(&ui.title, ui.width),
        center(&ui.subtitle, ui.width),
        "─".repeat(ui.width),
    ]
}

/// Render the composer and disclaimer block.
#[must_use]
pub fn render_footer(conversation: &Conversation, ui: &UiConfig) -> Vec<String> {
    let mut lines = vec!["─".repeat(ui.width)];

    if let Some(err) = conversation.last_error() {
        lines.extend(wrap(&format!("{FAILURE_MARK}{err}"), ui.width));
    }

    let input = if conversation.input().is_empty() {
        ui.placeholder.as_str()
    } else {
        conversation.input()
    };
    let marker = if conversation.can_submit() { "➤" } else { " " };
    lines.push(format!("> {input} {marker}"));
    lines.push(center(&ui.disclaimer, ui.width));

    lines
}

/// Render a full frame: header, visible transcript window, footer.
#[must_use]
pub fn render_screen(
    conversation: &Conversation,
    ui: &UiConfig,
    viewport: &mut Viewport,
) -> Vec<String> {
    viewport.sync(conversation.messages().len());
    let transcript = render_messages(conversation.messages(), conversation.failures(), ui.width);

    viewport.clamp(transcript.len(), ui.height);

    let mut lines = render_header(ui);
    lines.extend_from_slice(viewport.window(&transcript, ui.height));
    if !viewport.at_bottom() {
        lines.push(center(SCROLLED_HINT, ui.width));
    }
    lines.extend(render_footer(conversation, ui));
    lines
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::chat::api::HttpGuideClient;
    use crate::chat::config::ChatConfig;
    use crate::chat::session::{MemorySessionStore, SessionManager};

    fn conversation(welcome: &str) -> Conversation {
        let api = Arc::new(HttpGuideClient::new(&ChatConfig::default()).unwrap());
        let session = Arc::new(SessionManager::new(
            Arc::new(MemorySessionStore::new()),
            api.clone(),
        ));
        Conversation::new(welcome, session, api)
    }

    #[test]
    fn test_own_messages_are_right_aligned() {
        let messages = vec![Message::remote("hello"), Message::own("hi")];
        let lines = render_messages(&messages, &[], 20);

        assert_eq!(lines[0], "hello");
        assert_eq!(lines[2], String::new());
        assert_eq!(lines[3], format!("{}hi", " ".repeat(18)));
        assert!(lines[4].ends_with('M'));
        assert_eq!(lines[4].chars().count(), 20);
    }

    #[test]
    fn test_failure_is_rendered_under_message() {
        let own = Message::own("hi");
        let failure = DeliveryFailure {
            message_id: own.id,
            reason: "HTTP 502".to_string(),
        };
        let lines = render_messages(&[own], &[failure], 60);

        assert_eq!(lines.len(), 3);
        assert!(lines[2].trim_start().starts_with("! not delivered"));
    }

    #[test]
    fn test_narrow_width_still_wraps() {
        let lines = render_messages(&[Message::remote("ab")], &[], 1);
        assert_eq!(lines[0], "a");
        assert_eq!(lines[1], "b");
    }

    #[test]
    fn test_bubble_width_does_not_overflow() {
        let lines = render_messages(&[Message::remote("hello")], &[], usize::MAX / 2);
        assert_eq!(lines[0], "hello");
    }

    #[test]
    fn test_screen_has_header_and_placeholder() {
        let ui = UiConfig::default();
        let convo = conversation(&ui.welcome_text);
        let mut viewport = Viewport::new();

        let screen = render_screen(&convo, &ui, &mut viewport);

        assert!(screen[0].contains("BorobuGuide"));
        assert!(screen.iter().any(|l| l.starts_with("Selamat datang")));
        assert!(screen.iter().any(|l| l.contains("Type your message...")));
        assert!(screen.last().unwrap().contains("Pesan bersifat anonim"));
    }

    #[test]
    fn test_scrolled_screen_shows_hint() {
        let mut ui = UiConfig::default();
        ui.height = 1;
        let convo = conversation("welcome");
        let mut viewport = Viewport::new();

        let bottom = render_screen(&convo, &ui, &mut viewport);
        assert!(!bottom.iter().any(|l| l.contains(SCROLLED_HINT)));

        viewport.scroll_up(1);
        let scrolled = render_screen(&convo, &ui, &mut viewport);
        assert!(scrolled.iter().any(|l| l.contains(SCROLLED_HINT)));
        assert!(scrolled.iter().any(|l| l == "welcome"));
    }

    #[test]
    fn test_short_transcript_cannot_scroll() {
        let ui = UiConfig::default();
        let convo = conversation("welcome");
        let mut viewport = Viewport::new();

        viewport.scroll_up(3);
        let screen = render_screen(&convo, &ui, &mut viewport);
        assert!(viewport.at_bottom());
        assert!(!screen.iter().any(|l| l.contains(SCROLLED_HINT)));
    }

    #[test]
    fn test_footer_shows_input_when_present() {
        let ui = UiConfig::default();
        let mut convo = conversation("welcome");
        convo.set_input("draft");

        let footer = render_footer(&convo, &ui);

        assert!(footer.iter().any(|l| l.starts_with("> draft")));
        assert!(!footer.iter().any(|l| l.contains(&ui.placeholder)));
    }
}
