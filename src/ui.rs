// UI module for terminal output: spinner progress and the result report

#![allow(clippy::print_stdout, clippy::print_stderr)]

use console::{Term, style};
use dccompat::model::PluginResult;
use dccompat::progress::{ProgressEvent, ProgressSink};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Spinner style similar to uv/pnpm
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Check if stderr is a TTY (for interactive output)
fn is_tty() -> bool {
    Term::stderr().is_term()
}

/// Create a styled spinner for async operations
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if !is_tty() {
        // Non-interactive output prints lines directly instead
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }

    if let Ok(spinner_style) = ProgressStyle::default_spinner()
        .tick_chars(SPINNER_CHARS)
        .template("{spinner:.cyan} {msg}")
    {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());

    if is_tty() {
        pb.enable_steady_tick(Duration::from_millis(80));
    }

    pb
}

/// Progress sink that drives a spinner
///
/// Plugin and tier events update the spinner line; finished plugins and tier
/// failures are printed above it so they stay in the scrollback.
pub struct SpinnerProgress {
    pb: ProgressBar,
}

impl SpinnerProgress {
    pub fn new() -> Self {
        Self {
            pb: spinner("Starting..."),
        }
    }

    fn println(&self, line: String) {
        if is_tty() {
            self.pb.println(line);
        } else {
            eprintln!("{}", line);
        }
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

impl ProgressSink for SpinnerProgress {
    fn emit(&self, event: ProgressEvent) {
        match &event {
            ProgressEvent::PluginStarted { .. }
            | ProgressEvent::MethodAttempt { .. }
            | ProgressEvent::MethodSucceeded { .. } => {
                self.pb.set_message(event.to_string().trim().to_string());
            }
            ProgressEvent::MethodFailed { .. } | ProgressEvent::MethodSkipped { .. } => {
                self.println(format!("{} {}", style("⚠").yellow(), event.to_string().trim()));
            }
            ProgressEvent::PluginFinished { .. } => {
                self.println(format!("{} {}", style("→").cyan(), event));
            }
            ProgressEvent::BatchStarted { .. } | ProgressEvent::BatchFinished { .. } => {
                self.println(style(event.to_string()).dim().to_string());
            }
        }
    }
}

/// Print a success message with checkmark
pub fn success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    eprintln!("{} {}", style("⚠").yellow(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red(), message);
}

/// Print a header/section message
pub fn header(message: &str) {
    println!("{}", style(message).bold());
}

/// Print a dimmed/secondary message
pub fn dim(message: &str) {
    println!("{}", style(message).dim());
}

/// Print a plain line to stdout
pub fn line(message: &str) {
    println!("{}", message);
}

/// Print one line per plugin result
pub fn print_report(results: &[PluginResult]) {
    if let Some(first) = results.first() {
        header(&format!("Compatibility with {}", first.target_version));
    }

    for result in results {
        let status = match result.compatible {
            Some(true) => style("compatible").green(),
            Some(false) => style("upgrade").yellow(),
            None => style("failed").red(),
        };
        let method = result
            .fetch_method
            .map(|m| m.to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "  {:<28} {:<12} {:<12} {:<22} {:<12} {}",
            result.plugin_name,
            result.current_version,
            result.recommended_version.as_deref().unwrap_or("-"),
            result.compatible_version_range.as_deref().unwrap_or("-"),
            status,
            style(method).dim()
        );

        if let Some(err) = &result.error {
            dim(&format!("      {}", err));
        }
    }
}
