//! Scroll state for the transcript window.

/// Bottom-anchored window over rendered transcript lines.
///
/// Any change in message count snaps the window back to the newest line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    /// Lines scrolled up from the bottom.
    offset: usize,
    /// Message count seen at the last sync.
    seen: usize,
}

impl Viewport {
    /// Create a viewport pinned to the bottom.
    #[must_use]
    pub const fn new() -> Self {
        Self { offset: 0, seen: 0 }
    }

    /// Record the current message count, resetting scroll if it changed.
    pub const fn sync(&mut self, message_count: usize) {
        if message_count != self.seen {
            self.seen = message_count;
            self.offset = 0;
        }
    }

    /// Scroll towards older lines.
    pub const fn scroll_up(&mut self, lines: usize) {
        self.offset = self.offset.saturating_add(lines);
    }

    /// Scroll towards newer lines.
    pub const fn scroll_down(&mut self, lines: usize) {
        self.offset = self.offset.saturating_sub(lines);
    }

    /// Limit the offset to what `line_count` lines in a `height` window allow.
    pub const fn clamp(&mut self, line_count: usize, height: usize) {
        let max_offset = line_count.saturating_sub(height);
        if self.offset > max_offset {
            self.offset = max_offset;
        }
    }

    /// Whether the newest line is visible.
    #[must_use]
    pub const fn at_bottom(&self) -> bool {
        self.offset == 0
    }

    /// The visible slice of `lines` for a window `height` lines tall.
    #[must_use]
    pub fn window<'a>(&self, lines: &'a [String], height: usize) -> &'a [String] {
        let max_offset = lines.len().saturating_sub(height);
        let offset = self.offset.min(max_offset);
        let end = lines.len() - offset;
        let start = end.saturating_sub(height);
        &lines[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Vec<String> {
        (0..n).map(|i| i.to_string()).collect()
    }

    #[test]
    fn test_window_shows_latest_lines() {
        let lines = numbered(10);
        let viewport = Viewport::new();
        assert_eq!(viewport.window(&lines, 3), &lines[7..10]);
        assert_eq!(viewport.window(&lines, 20), &lines[..]);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let lines = numbered(10);
        let mut viewport = Viewport::new();
        viewport.scroll_up(100);
        assert_eq!(viewport.window(&lines, 3), &lines[0..3]);

        viewport.scroll_down(1000);
        assert!(viewport.at_bottom());
    }

    #[test]
    fn test_clamp_limits_offset_to_hidden_lines() {
        let mut viewport = Viewport::new();
        viewport.scroll_up(50);
        viewport.clamp(10, 3);
        viewport.scroll_down(7);
        assert!(viewport.at_bottom());

        viewport.scroll_up(2);
        viewport.clamp(2, 3);
        assert!(viewport.at_bottom());
    }

    #[test]
    fn test_new_message_snaps_to_bottom() {
        let mut viewport = Viewport::new();
        viewport.sync(1);
        viewport.scroll_up(4);
        viewport.sync(1);
        assert!(!viewport.at_bottom());

        viewport.sync(2);
        assert!(viewport.at_bottom());
    }
}
