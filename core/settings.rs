// Runtime settings shared by every server backend
use std::env;

/// Switches a server backend reads at each call site.
///
/// Replaces the flag bitmask of older socket wrappers: one named field per
/// concern instead of bit tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerSettings {
    /// Route diagnostics and accept reports to the log sink.
    pub log_enabled: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings { log_enabled: true }
    }
}

impl ServerSettings {
    pub fn quiet() -> Self {
        ServerSettings { log_enabled: false }
    }

    /// Read overrides from the environment.
    /// SOCKSERVE_LOG: "0" or "false" disables logging (default: enabled).
    pub fn from_env() -> Self {
        let log_enabled = match env::var("SOCKSERVE_LOG") {
            Ok(v) => !matches!(v.as_str(), "0" | "false"),
            Err(_) => true,
        };
        ServerSettings { log_enabled }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_enabled_by_default() {
        assert!(ServerSettings::default().log_enabled);
        assert!(!ServerSettings::quiet().log_enabled);
    }

    #[test]
    fn env_override_disables_logging() {
        std::env::set_var("SOCKSERVE_LOG", "0");
        assert!(!ServerSettings::from_env().log_enabled);
        std::env::set_var("SOCKSERVE_LOG", "1");
        assert!(ServerSettings::from_env().log_enabled);
        std::env::remove_var("SOCKSERVE_LOG");
    }
}
