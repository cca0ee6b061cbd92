// Tue Jan 13 2026 - Alex

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

pub struct ProgressManager {
    enabled: bool,
    style_template: String,
}

impl ProgressManager {
    pub fn new() -> Self {
        Self {
            enabled: true,
            style_template: "{spinner:.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}"
                .to_string(),
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Bar counting processed documents. Hidden when disabled.
    pub fn documents(&self, total: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::hidden());
        }
        let bar = ProgressBar::new(total);
        match ProgressStyle::default_bar().template(&self.style_template) {
            Ok(style) => bar.set_style(style.progress_chars("█▓▒░ ")),
            Err(e) => log::debug!("Invalid progress template: {}", e),
        }
        bar.set_message("documents");
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_bar_still_counts() {
        let bar = ProgressManager::new().with_enabled(false).documents(3);
        bar.inc(2);
        assert_eq!(bar.position(), 2);
        assert_eq!(bar.length(), Some(3));
    }
}
