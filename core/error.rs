// Error taxonomy for server transports
use std::io;

pub type Result<T> = std::result::Result<T, SocketError>;

/// Failures a server transport can report.
///
/// `Resolve` only escapes constructors. The setup variants (`Create`,
/// `Bind`, `Listen`) leave the listener invalid so the next accept retries
/// from scratch; `Accept` leaves it listening. Transfer and shutdown
/// failures never touch the listener.
#[derive(Debug, thiserror::Error)]
pub enum SocketError {
    #[error("address resolution failed: {0}")]
    Resolve(#[source] io::Error),

    #[error("socket creation failed: {0}")]
    Create(#[source] io::Error),

    #[error("bind failed: {0}")]
    Bind(#[source] io::Error),

    #[error("listen failed: {0}")]
    Listen(#[source] io::Error),

    #[error("accept failed: {0}")]
    Accept(#[source] io::Error),

    #[error("receive failed: {0}")]
    Receive(#[source] io::Error),

    #[error("send failed: {0}")]
    Send(#[source] io::Error),

    #[error("short write: {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },

    #[error("shutdown failed: {0}")]
    Shutdown(#[source] io::Error),
}

impl SocketError {
    /// Create/bind/listen failures, after which the listening socket has
    /// been reset to the invalid state.
    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            SocketError::Create(_) | SocketError::Bind(_) | SocketError::Listen(_)
        )
    }

    /// The OS diagnostic code behind this failure, when one exists.
    pub fn os_code(&self) -> Option<i32> {
        match self {
            SocketError::Resolve(e)
            | SocketError::Create(e)
            | SocketError::Bind(e)
            | SocketError::Listen(e)
            | SocketError::Accept(e)
            | SocketError::Receive(e)
            | SocketError::Send(e)
            | SocketError::Shutdown(e) => e.raw_os_error(),
            SocketError::ShortWrite { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn io_err(code: i32) -> io::Error {
        io::Error::from_raw_os_error(code)
    }

    #[test]
    fn setup_classification() {
        assert!(SocketError::Create(io_err(13)).is_setup());
        assert!(SocketError::Bind(io_err(98)).is_setup());
        assert!(SocketError::Listen(io_err(95)).is_setup());
        assert!(!SocketError::Accept(io_err(4)).is_setup());
        assert!(!SocketError::Resolve(io_err(22)).is_setup());
        assert!(!SocketError::ShortWrite { written: 1, expected: 2 }.is_setup());
    }

    #[test]
    fn os_code_passthrough() {
        assert_eq!(SocketError::Bind(io_err(98)).os_code(), Some(98));
        assert_eq!(
            SocketError::ShortWrite { written: 0, expected: 5 }.os_code(),
            None
        );
    }

    #[test]
    fn short_write_reports_counts() {
        let e = SocketError::ShortWrite { written: 3, expected: 8 };
        assert_eq!(e.to_string(), "short write: 3 of 8 bytes");
    }
}
