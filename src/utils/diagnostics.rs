use colored::Colorize;
use jiff::Zoned;

/// Environment flag exported by `--verbose`.
pub const VERBOSE_ENV: &str = "HUNTCORE_VERBOSE";

pub fn is_verbose() -> bool {
    std::env::var_os(VERBOSE_ENV).is_some()
}

/// Prints a timestamped diagnostic line to stderr when verbose output is on.
pub fn verbose(message: impl AsRef<str>) {
    if !is_verbose() {
        return;
    }

    let stamp = Zoned::now().strftime("%H:%M:%S").to_string();
    eprintln!("{} {}", format!("[{stamp}]").dimmed(), message.as_ref().dimmed());
}
