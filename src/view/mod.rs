//! Terminal presentation of the conversation.

pub mod composer;
pub mod format;
pub mod transcript;
pub mod viewport;

pub use composer::{ComposerAction, Key, handle_key, keys_for_line};
pub use format::format_time;
pub use transcript::{render_footer, render_header, render_messages, render_screen};
pub use viewport::Viewport;
