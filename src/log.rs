use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use once_cell::sync::Lazy;
use chrono::Local;
use crossterm::event::KeyCode;

static LOG_FILE: Lazy<Mutex<Option<File>>> = Lazy::new(|| Mutex::new(None));

/// Initialize logging to a file.
///
/// Until this is called every logging function is a no-op, so widgets can be
/// used from tests and embedding applications without touching the disk.
pub fn init() -> std::io::Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let log_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".formkit")
        .join("logs");

    std::fs::create_dir_all(&log_dir)?;

    let log_path = log_dir.join(format!("formkit_{}.log", timestamp));

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)?;

    if let Ok(mut guard) = LOG_FILE.lock() {
        *guard = Some(file);
    }

    log("=== formkit started ===");

    Ok(log_path)
}

/// Log a message with timestamp
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);

    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(ref mut file) = *guard {
            let _ = file.write_all(line.as_bytes());
            let _ = file.flush();
        }
    }
}

/// Log a widget event
pub fn log_event(event: &str) {
    log(&format!("[EVENT] {}", event));
}

/// Log a keystroke dropped by an input filter
pub fn log_rejected(widget: &str, key: &KeyCode) {
    log(&rejected_line(widget, key));
}

fn rejected_line(widget: &str, key: &KeyCode) -> String {
    format!("[REJECT] {} dropped {:?}", widget, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_line() {
        assert_eq!(
            rejected_line("realname", &KeyCode::Char('$')),
            "[REJECT] realname dropped Char('$')"
        );
        assert_eq!(
            rejected_line("username", &KeyCode::Char('"')),
            r#"[REJECT] username dropped Char('"')"#
        );
    }

    #[test]
    fn test_log_without_init_is_noop() {
        log_rejected("email", &KeyCode::Char(' '));
        log_event("nothing");
    }
}
