// Logging collaborator: component-tagged messages routed to a caller sink
use crate::settings::ServerSettings;
use std::sync::Arc;

/// Caller-supplied sink for formatted log lines.
pub type LogCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Held by servers and their accepted connections instead of being inherited
/// from a socket base type. The enable flag is checked here, once, so call
/// sites stay unconditional.
#[derive(Clone)]
pub struct EventLog {
    component: &'static str,
    enabled: bool,
    sink: LogCallback,
}

impl EventLog {
    pub fn new(component: &'static str, settings: ServerSettings, sink: LogCallback) -> Self {
        EventLog {
            component,
            enabled: settings.log_enabled,
            sink,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn error(&self, msg: &str) {
        if self.enabled {
            (self.sink)(&format!("[{}][Error] {}", self.component, msg));
        }
    }

    pub fn info(&self, msg: &str) {
        if self.enabled {
            (self.sink)(&format!("[{}][Info] {}", self.component, msg));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn collector() -> (LogCallback, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink_lines = Arc::clone(&lines);
        let sink: LogCallback = Arc::new(move |msg: &str| {
            sink_lines.lock().unwrap().push(msg.to_string());
        });
        (sink, lines)
    }

    #[test]
    fn tags_component_and_severity() {
        let (sink, lines) = collector();
        let log = EventLog::new("TCPServer", ServerSettings::default(), sink);
        log.error("bind failed : oops");
        log.info("Incoming connection from '127.0.0.1' port '4242'");

        let lines = lines.lock().unwrap();
        assert_eq!(lines[0], "[TCPServer][Error] bind failed : oops");
        assert_eq!(
            lines[1],
            "[TCPServer][Info] Incoming connection from '127.0.0.1' port '4242'"
        );
    }

    #[test]
    fn disabled_settings_silence_the_sink() {
        let (sink, lines) = collector();
        let log = EventLog::new("TCPServer", ServerSettings::quiet(), sink);
        log.error("never seen");
        log.info("never seen");
        assert!(lines.lock().unwrap().is_empty());
        assert!(!log.enabled());
    }
}
