use crate::github::types::UserResult;
use std::time::Instant;

/// Snapshot the engine publishes and the renderer draws.
#[derive(Debug, Clone)]
pub struct AppState {
    pub query: String,
    pub results: Vec<UserResult>,
    pub total_count: u64,
    pub searching: bool,
    pub last_updated: Option<String>,
    pub selected: usize,
    pub start_time: Instant,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            total_count: 0,
            searching: false,
            last_updated: None,
            selected: 0,
            start_time: Instant::now(),
        }
    }

    pub fn selected_user(&self) -> Option<&UserResult> {
        self.results.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.results.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keep the selection inside the current result set.
    pub fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.results.len().saturating_sub(1));
    }

    pub fn uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let h = secs / 3600;
        let m = (secs % 3600) / 60;
        format!("{}h {:02}m", h, m)
    }
}
