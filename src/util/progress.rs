use std::time::{Duration, Instant};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

const PROGRESS_TEMPLATE: &str = "{spinner:.cyan} {msg} [{pos} / {len}]";
const PROGRESS_TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ";

/**
    A spinner tracking a fixed number of sequential tasks, drawn on stderr.
*/
pub struct CliProgressTracker {
    bar: ProgressBar,
    started: Instant,
}

impl CliProgressTracker {
    pub fn new_with_message(message: impl Into<String>, tasks: u64) -> Self {
        let style = ProgressStyle::with_template(PROGRESS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars(PROGRESS_TICK_CHARS);
        let bar = ProgressBar::new(tasks)
            .with_message(message.into())
            .with_style(style);
        bar.enable_steady_tick(Duration::from_millis(80));
        Self {
            bar,
            started: Instant::now(),
        }
    }

    pub fn task_completed(&self) {
        self.bar.inc(1);
    }

    pub fn update_message(&self, message: impl Into<String>) {
        self.bar.set_message(message.into());
    }

    pub fn formatted_elapsed(&self) -> String {
        let elapsed = self.started.elapsed();
        style(format!("(took {elapsed:.2?})")).dim().to_string()
    }

    /**
        Removes the spinner, leaving the terminal ready for regular output.
    */
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for CliProgressTracker {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
