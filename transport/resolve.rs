// Local address resolution for listener setup
use sockserve_core::{Result, SocketError};
use std::io;
use std::net::{SocketAddr, SocketAddrV4, ToSocketAddrs};

/// Resolve a textual port on the wildcard IPv4 interface.
///
/// Called once at construction to fail fast, and again on every setup
/// attempt - nothing resolved is retained in between.
pub fn any_interface(port: &str) -> Result<SocketAddrV4> {
    let candidates = format!("0.0.0.0:{}", port)
        .to_socket_addrs()
        .map_err(SocketError::Resolve)?;

    for addr in candidates {
        if let SocketAddr::V4(v4) = addr {
            return Ok(v4);
        }
    }

    Err(SocketError::Resolve(io::Error::new(
        io::ErrorKind::AddrNotAvailable,
        "no IPv4 address for the wildcard interface",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ports_resolve() {
        let addr = any_interface("3490").expect("resolve");
        assert_eq!(addr.port(), 3490);
        assert!(addr.ip().is_unspecified());

        // the kernel-assigned port is a valid request
        assert_eq!(any_interface("0").expect("resolve").port(), 0);
    }

    #[test]
    fn junk_ports_fail_resolution() {
        for bad in ["", "notaport", "70000", "-1", "80 "] {
            match any_interface(bad) {
                Err(SocketError::Resolve(_)) => {}
                other => panic!("expected Resolve error for {:?}, got {:?}", bad, other),
            }
        }
    }
}
