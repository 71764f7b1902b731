use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

/// Typed progress events for terminal rendering
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Transient status shown on the spinner line
    Spinner { message: String },
    Error { message: String },
}

/// Renders progress events on stderr as a spinner.
///
/// Disabled printers swallow every event, which keeps piped and JSON output
/// free of control sequences.
pub struct ProgressPrinter {
    bar: Option<ProgressBar>,
}

impl ProgressPrinter {
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar: Some(bar) }
    }

    /// Enabled only when stderr is an interactive terminal.
    pub fn for_terminal(json_output: bool) -> Self {
        Self::new(!json_output && std::io::stderr().is_terminal())
    }

    pub fn is_enabled(&self) -> bool {
        self.bar.is_some()
    }

    pub fn handle_event(&self, event: &ProgressEvent) {
        let Some(bar) = &self.bar else {
            return;
        };
        match event {
            ProgressEvent::Spinner { message } => bar.set_message(message.clone()),
            ProgressEvent::Error { message } => bar.println(format!("✗ {}", message)),
        }
    }

    /// Run `f` with the spinner hidden so regular output is not overdrawn.
    pub fn suspend<R>(&self, f: impl FnOnce() -> R) -> R {
        match &self.bar {
            Some(bar) => bar.suspend(f),
            None => f(),
        }
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Drop for ProgressPrinter {
    fn drop(&mut self) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_printer_ignores_events() {
        let printer = ProgressPrinter::new(false);
        assert!(!printer.is_enabled());
        printer.handle_event(&ProgressEvent::Spinner {
            message: "Fetching".to_string(),
        });
        printer.finish();
    }

    #[test]
    fn test_json_output_never_shows_spinner() {
        assert!(!ProgressPrinter::for_terminal(true).is_enabled());
    }
}
