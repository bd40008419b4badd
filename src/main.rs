//! Binary entrypoint for the terminal guide chat.

use std::process::ExitCode;

use guide_chat::start_guide_chat;

/// Start the chat with configuration from the environment.
fn main() -> ExitCode {
    start_guide_chat::run()
}
