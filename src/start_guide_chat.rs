//! Startup helpers for the terminal chat front-end.

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::chat::{
    ChatConfig, ChatError, ChatResult, Conversation, HttpGuideClient, SessionManager,
    SqliteSessionStore,
};
use crate::view::{ComposerAction, Viewport, handle_key, keys_for_line, render_screen};

/// Line that ends the session.
const QUIT_COMMAND: &str = "/quit";
/// Prefix scrolling the transcript towards older lines.
const UP_COMMAND: &str = "/up";
/// Prefix scrolling the transcript towards newer lines.
const DOWN_COMMAND: &str = "/down";
/// Lines scrolled when `/up` or `/down` has no count.
const DEFAULT_SCROLL: usize = 5;
/// ANSI sequence clearing the screen and homing the cursor.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Terminal command typed instead of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Leave the chat.
    Quit,
    /// Scroll towards older lines.
    ScrollUp(usize),
    /// Scroll towards newer lines.
    ScrollDown(usize),
}

/// Parse a terminal command; any other line is message input.
#[must_use]
pub fn parse_command(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    let head = parts.next()?;
    let arg = parts.next();
    if parts.next().is_some() {
        return None;
    }

    let count = || arg.map_or(Some(DEFAULT_SCROLL), |n| n.parse().ok());
    match head {
        QUIT_COMMAND if arg.is_none() => Some(Command::Quit),
        UP_COMMAND => count().map(Command::ScrollUp),
        DOWN_COMMAND => count().map(Command::ScrollDown),
        _ => None,
    }
}

/// Run the terminal chat until EOF or `/quit`.
///
/// # Returns
/// `ExitCode::SUCCESS` on a normal exit, `1` on startup or I/O failure.
#[must_use]
pub fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting guide-chat v{}", env!("CARGO_PKG_VERSION"));

    let config = ChatConfig::from_env();
    if let Err(e) = config.validate() {
        tracing::error!("{e}");
        return ExitCode::from(1);
    }
    tracing::info!("Guide endpoint: {}", config.base_url);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = rt.block_on(run_terminal(config)) {
        tracing::error!("Chat error: {e}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

/// Wire the `SQLite` token store, HTTP client and conversation together.
///
/// # Errors
/// Returns an error if the store cannot be opened or the client cannot be built.
pub async fn build_conversation(config: &ChatConfig) -> ChatResult<Conversation> {
    let store = Arc::new(SqliteSessionStore::open(&config.storage).await?);
    let api = Arc::new(
        HttpGuideClient::new(config).map_err(|e| ChatError::InvalidConfig(e.to_string()))?,
    );
    let session = Arc::new(SessionManager::new(store, api.clone()));

    Ok(Conversation::new(config.ui.welcome_text.clone(), session, api))
}

async fn run_terminal(config: ChatConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conversation = build_conversation(&config).await?;
    let mut viewport = Viewport::new();
    draw(&conversation, &config, &mut viewport)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Some(Command::Quit) => break,
            Some(Command::ScrollUp(n)) => {
                viewport.scroll_up(n);
                draw(&conversation, &config, &mut viewport)?;
                continue;
            }
            Some(Command::ScrollDown(n)) => {
                viewport.scroll_down(n);
                draw(&conversation, &config, &mut viewport)?;
                continue;
            }
            None => {}
        }

        let mut submit = false;
        for key in keys_for_line(&line) {
            if handle_key(conversation.input_mut(), key) == ComposerAction::Submit {
                submit = true;
            }
        }

        let turn = if submit { conversation.begin_submit() } else { None };
        draw(&conversation, &config, &mut viewport)?;

        let Some(turn) = turn else {
            continue;
        };
        let result = conversation.dispatcher().deliver(&turn).await;
        if let Err(e) = conversation.complete(turn, result) {
            tracing::debug!(retryable = e.is_retryable(), "Turn failed");
        }
        draw(&conversation, &config, &mut viewport)?;
    }

    Ok(())
}

fn draw(
    conversation: &Conversation,
    config: &ChatConfig,
    viewport: &mut Viewport,
) -> std::io::Result<()> {
    let screen = render_screen(conversation, &config.ui, viewport);
    let mut out = std::io::stdout().lock();
    out.write_all(CLEAR_SCREEN.as_bytes())?;
    for line in screen {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scroll_commands() {
        assert_eq!(parse_command("/quit"), Some(Command::Quit));
        assert_eq!(parse_command("  /up 3 "), Some(Command::ScrollUp(3)));
        assert_eq!(parse_command("/up"), Some(Command::ScrollUp(DEFAULT_SCROLL)));
        assert_eq!(parse_command("/down 10"), Some(Command::ScrollDown(10)));
    }

    #[test]
    fn test_other_lines_are_messages() {
        assert_eq!(parse_command("hello"), None);
        assert_eq!(parse_command("/up many"), None);
        assert_eq!(parse_command("/up 1 2"), None);
        assert_eq!(parse_command("/quit 5"), None);
        assert_eq!(parse_command("/upward"), None);
        assert_eq!(parse_command(""), None);
    }

    #[tokio::test]
    async fn test_scroll_survives_redraw_until_new_message() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ChatConfig::new().with_sqlite_path(dir.path().join("chat.sqlite"));
        config.ui.height = 1;
        let mut conversation = build_conversation(&config).await.unwrap();
        let mut viewport = Viewport::new();
        let _ = render_screen(&conversation, &config.ui, &mut viewport);

        if let Some(Command::ScrollUp(n)) = parse_command("/up 1") {
            viewport.scroll_up(n);
        }
        let _ = render_screen(&conversation, &config.ui, &mut viewport);
        assert!(!viewport.at_bottom());

        conversation.set_input("hi");
        assert!(conversation.begin_submit().is_some());
        let _ = render_screen(&conversation, &config.ui, &mut viewport);
        assert!(viewport.at_bottom());
    }

    #[tokio::test]
    async fn test_build_conversation_starts_with_welcome() {
        let dir = tempfile::tempdir().unwrap();
        let config = ChatConfig::new()
            .with_sqlite_path(dir.path().join("chat.sqlite"))
            .with_welcome_text("hello from the guide");

        let conversation = build_conversation(&config).await.unwrap();

        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].text, "hello from the guide");
    }
}
