use itertools::Itertools as _;

use super::DndLayout;

impl<T: 'static> DndLayout<T> {
    /// Log `message` through `log` and, if enabled, into the in-memory ring buffer.
    pub(super) fn debug_log_event(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("{message}");
        if !self.options.debug_event_log {
            return;
        }
        self.push_debug_log_line(message);
    }

    fn push_debug_log_line(&mut self, message: String) {
        let cap = self.options.debug_event_log_capacity.clamp(1, 10_000);
        while self.debug_log.len() >= cap {
            self.debug_log.pop_front();
        }
        self.debug_event_counter += 1;
        self.debug_log
            .push_back(format!("[event {}] {}", self.debug_event_counter, message));
    }

    /// Lines recorded while [`super::DndLayoutOptions::debug_event_log`] was on, oldest first.
    pub fn debug_log_lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.debug_log.iter().map(String::as_str)
    }

    /// All recorded lines, one per line, ready for copy-paste.
    pub fn debug_log_text(&self) -> String {
        self.debug_log.iter().join("\n")
    }

    pub fn debug_log_clear(&mut self) {
        self.debug_log.clear();
    }

    /// One-line summary of the current drag state.
    pub fn debug_summary(&self) -> String {
        let current = self.store.with_current_drag(|drag| {
            drag.map_or_else(
                || "none".to_owned(),
                |d| {
                    d.dnd_id
                        .as_ref()
                        .map_or_else(|| "<untagged>".to_owned(), ToString::to_string)
                },
            )
        });
        let ghost = self
            .ghost
            .as_ref()
            .map_or_else(|| "off".to_owned(), |g| format!("{:?}", g.strategy()));
        [
            format!("phase={:?}", self.phase()),
            format!("dragging={}", self.store.is_dragging()),
            format!("current={current}"),
            format!("listeners={}", self.store.move_listener_count()),
            format!("ghost={ghost}"),
        ]
        .iter()
        .join(" ")
    }
}
