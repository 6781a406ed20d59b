use anstyle::{AnsiColor, Style};
use is_terminal::IsTerminal;
use std::fmt::Display;
use std::io::{self, Write};
use std::time::{Duration, Instant};

const STATUS_WIDTH: usize = 12;

#[derive(Debug, Clone, Copy)]
enum StatusKind {
    Pending,
    Success,
    Info,
    Warn,
    Error,
}

impl StatusKind {
    fn uses_stderr(self) -> bool {
        matches!(self, StatusKind::Warn | StatusKind::Error)
    }

    fn style(self) -> Style {
        let style = Style::new().bold();
        match self {
            StatusKind::Pending => style.fg_color(Some(AnsiColor::Cyan.into())),
            StatusKind::Success => style.fg_color(Some(AnsiColor::Green.into())),
            StatusKind::Info => style.fg_color(Some(AnsiColor::Blue.into())),
            StatusKind::Warn => style.fg_color(Some(AnsiColor::Yellow.into())),
            StatusKind::Error => style.fg_color(Some(AnsiColor::Red.into())),
        }
    }
}

fn supports_color(to_stderr: bool) -> bool {
    let is_tty = if to_stderr {
        io::stderr().is_terminal()
    } else {
        io::stdout().is_terminal()
    };
    is_tty && std::env::var_os("NO_COLOR").is_none()
}

fn render(kind: StatusKind, label: &str, message: &str, use_color: bool) -> String {
    let padded_label = format!("{:>width$}", label, width = STATUS_WIDTH);
    let (prefix, suffix) = if use_color {
        let style = kind.style();
        (style.render().to_string(), style.render_reset().to_string())
    } else {
        (String::new(), String::new())
    };

    let mut output = String::new();
    for (idx, line) in message.split('\n').enumerate() {
        if idx == 0 {
            output.push_str(&format!("{prefix}{padded_label}{suffix} {line}\n"));
        } else {
            output.push_str(&format!("{:>width$} {line}\n", "", width = STATUS_WIDTH));
        }
    }
    output
}

fn write_status(kind: StatusKind, label: &str, message: &str) {
    let to_stderr = kind.uses_stderr();
    let text = render(kind, label, message, supports_color(to_stderr));

    // Output errors (closed pipe) are not worth failing a command over.
    if to_stderr {
        let mut handle = io::stderr().lock();
        let _ = handle.write_all(text.as_bytes());
        let _ = handle.flush();
    } else {
        let mut handle = io::stdout().lock();
        let _ = handle.write_all(text.as_bytes());
        let _ = handle.flush();
    }
}

fn format_duration(duration: Duration) -> String {
    if duration.as_secs() >= 60 {
        let minutes = duration.as_secs() / 60;
        let seconds = duration.as_secs() % 60;
        if seconds == 0 {
            format!("{minutes}m")
        } else {
            format!("{minutes}m {seconds}s")
        }
    } else if duration.as_secs_f64() >= 1.0 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{}ms", duration.as_millis())
    }
}

pub fn status(label: &str, message: impl Display) {
    write_status(StatusKind::Pending, label, &message.to_string());
}

pub fn info(message: impl Display) {
    write_status(StatusKind::Info, "Info", &message.to_string());
}

pub fn warn(message: impl Display) {
    write_status(StatusKind::Warn, "Warning", &message.to_string());
}

pub fn error(message: impl Display) {
    write_status(StatusKind::Error, "Error", &message.to_string());
}

pub fn success(label: &str, message: impl Display) {
    write_status(StatusKind::Success, label, &message.to_string());
}

/// A long-running step: prints when started and again when finished
pub struct Progress {
    message: String,
    started: Instant,
    complete: bool,
}

impl Progress {
    pub fn new(label: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        write_status(StatusKind::Pending, label, &message);

        Self {
            message,
            started: Instant::now(),
            complete: false,
        }
    }

    pub fn success(mut self, label: &str) {
        self.complete = true;
        let elapsed = format_duration(self.started.elapsed());
        write_status(
            StatusKind::Success,
            label,
            &format!("{} in {elapsed}", self.message),
        );
    }

    /// Mark the step failed; the error itself is reported by the caller
    pub fn fail(mut self) {
        self.complete = true;
        write_status(StatusKind::Error, "Failed", &self.failure_message());
    }

    fn failure_message(&self) -> String {
        let elapsed = format_duration(self.started.elapsed());
        format!("{} after {elapsed}", self.message)
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        if !self.complete {
            write_status(
                StatusKind::Warn,
                "Cancelled",
                &format!("{} (aborted)", self.message),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_pads_label() {
        let text = render(StatusKind::Success, "Switched", "go 1.23.0", false);
        assert_eq!(text, "    Switched go 1.23.0\n");
    }

    #[test]
    fn test_render_indents_continuation_lines() {
        let text = render(StatusKind::Info, "Info", "first\nsecond", false);
        assert_eq!(text, "        Info first\n             second\n");
    }

    #[test]
    fn test_render_color_wraps_label() {
        let text = render(StatusKind::Error, "Error", "boom", true);
        assert!(text.starts_with("\u{1b}["));
        assert!(text.ends_with(" boom\n"));
    }

    #[test]
    fn test_failure_message_omits_error() {
        let progress = Progress {
            message: "go1.23.0.linux-amd64.tar.gz".to_string(),
            started: Instant::now(),
            complete: true,
        };
        let message = progress.failure_message();
        assert!(message.starts_with("go1.23.0.linux-amd64.tar.gz after "));
        assert!(!message.contains(':'));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
        assert_eq!(format_duration(Duration::from_secs(120)), "2m");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    }
}
