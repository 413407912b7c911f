//! Shell configuration.
//!
//! PShell reads no configuration files, flags or environment variables. The
//! values here are compiled-in defaults that the binary builds once at startup.

/// Prompt printed before every line of input.
pub const DEFAULT_PROMPT: &str = "PShell>";

/// Log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Top-level shell configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Prompt string, printed without a trailing newline.
    pub prompt: String,
    /// Default `env_logger` filter. Diagnostics go to stderr.
    pub log_filter: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prompt() {
        let cfg = ShellConfig::default();
        assert_eq!(cfg.prompt, "PShell>");
        assert!(!cfg.prompt.ends_with('\n'));
    }

    #[test]
    fn default_log_filter_is_quiet() {
        assert_eq!(ShellConfig::default().log_filter, "warn");
    }
}
