use std::io::Write;

/// Abstraction over user-facing output.
///
/// Command modules use this trait instead of `println!`/`eprintln!` so output
/// can be redirected or silenced by embedding surfaces.
pub trait UserOutput: Send + Sync {
    /// Informational status message (e.g. "Stopping all services...")
    fn status(&self, message: &str);

    /// Success message (e.g. "Service 'api' restarted")
    fn success(&self, message: &str);

    /// Warning message (e.g. "Health stream disconnected, reconnecting")
    fn warning(&self, message: &str);

    /// Error message (e.g. "Service 'api' operation failed")
    fn error(&self, message: &str);

    /// A blank line separator.
    fn blank(&self);
}

/// Standard CLI output — stdout/stderr with ANSI colors.
pub struct CliOutput;

impl UserOutput for CliOutput {
    fn status(&self, message: &str) {
        println!("{}", message);
    }

    fn success(&self, message: &str) {
        println!("\x1b[32m{}\x1b[0m", message);
    }

    fn warning(&self, message: &str) {
        eprintln!("\x1b[33m{}\x1b[0m", message);
    }

    fn error(&self, message: &str) {
        eprintln!("\x1b[31m{}\x1b[0m", message);
        let _ = std::io::stderr().flush();
    }

    fn blank(&self) {
        println!();
    }
}
