// TCP server backend: lazy bind/listen on the first accept, blocking I/O
use crate::resolve;
use crate::traits::{StreamConnection, StreamListener};
use nix::sys::socket::{
    accept, bind, getpeername, getsockname, listen, recv, send, shutdown, socket, AddressFamily,
    Backlog, MsgFlags, Shutdown, SockFlag, SockProtocol, SockType, SockaddrIn,
};
use sockserve_core::{EventLog, LogCallback, Result, ServerSettings, SocketError};
use std::io;
use std::net::SocketAddrV4;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};

const COMPONENT: &str = "TCPServer";

pub(crate) fn os_err(errno: nix::errno::Errno) -> io::Error {
    io::Error::from_raw_os_error(errno as i32)
}

/// Blocking TCP listener for a local port.
///
/// The listening socket is created, bound and put into the listening state
/// on the first `accept` call and reused for the lifetime of the server.
/// Dropping the server closes it.
pub struct TcpServer {
    port: String,
    listen_fd: Option<OwnedFd>,
    log: EventLog,
}

impl TcpServer {
    /// Check that `port` resolves on the wildcard interface. The address is
    /// re-derived on every setup attempt, never cached here.
    pub fn new(port: &str, settings: ServerSettings, sink: LogCallback) -> Result<Self> {
        resolve::any_interface(port)?;
        Ok(TcpServer {
            port: port.to_string(),
            listen_fd: None,
            log: EventLog::new(COMPONENT, settings, sink),
        })
    }

    /// True once the listening socket is set up and queuing connections.
    pub fn is_listening(&self) -> bool {
        self.listen_fd.is_some()
    }

    /// Address actually bound, once listening. With port "0" this is where
    /// the kernel-assigned port shows up.
    pub fn local_addr(&self) -> Option<SocketAddrV4> {
        let fd = self.listen_fd.as_ref()?;
        getsockname::<SockaddrIn>(fd.as_raw_fd())
            .ok()
            .map(SocketAddrV4::from)
    }

    // One-time create/bind/listen sequence. A failure at any step drops the
    // partially set up descriptor and leaves `listen_fd` unset, so the next
    // accept retries from scratch.
    fn ensure_listening(&mut self) -> Result<RawFd> {
        if let Some(fd) = &self.listen_fd {
            return Ok(fd.as_raw_fd());
        }

        let addr = resolve::any_interface(&self.port).map_err(|e| {
            self.log
                .error(&format!("resolving port '{}' failed : {}", self.port, e));
            e
        })?;

        let fd = socket(
            AddressFamily::Inet,
            SockType::Stream,
            SockFlag::empty(),
            SockProtocol::Tcp,
        )
        .map_err(|e| {
            self.log.error(&format!("socket failed : {}", e));
            SocketError::Create(os_err(e))
        })?;

        bind(fd.as_raw_fd(), &SockaddrIn::from(addr)).map_err(|e| {
            self.log.error(&format!("bind failed : {}", e));
            SocketError::Bind(os_err(e))
        })?;

        listen(&fd, Backlog::MAXCONN).map_err(|e| {
            self.log.error(&format!("listen failed : {}", e));
            SocketError::Listen(os_err(e))
        })?;

        let raw = fd.as_raw_fd();
        self.listen_fd = Some(fd);
        Ok(raw)
    }
}

impl StreamListener for TcpServer {
    type Connection = TcpConnection;

    fn accept(&mut self) -> Result<TcpConnection> {
        let listen_raw = self.ensure_listening()?;

        let client_raw = accept(listen_raw).map_err(|e| {
            self.log.error(&format!("accept failed : {}", e));
            SocketError::Accept(os_err(e))
        })?;
        // accept() hands back a raw descriptor; it is ours alone from here
        let fd = unsafe { OwnedFd::from_raw_fd(client_raw) };

        // best-effort peer report, skipped when the address is not IPv4
        if let Ok(peer) = getpeername::<SockaddrIn>(fd.as_raw_fd()) {
            let peer = SocketAddrV4::from(peer);
            self.log.info(&format!(
                "Incoming connection from '{}' port '{}'",
                peer.ip(),
                peer.port()
            ));
        }

        Ok(TcpConnection {
            fd,
            log: self.log.clone(),
        })
    }
}

/// Accepted client connection. Owns its descriptor; dropping the handle
/// closes the socket.
pub struct TcpConnection {
    fd: OwnedFd,
    log: EventLog,
}

impl TcpConnection {
    pub fn peer_addr(&self) -> Option<SocketAddrV4> {
        getpeername::<SockaddrIn>(self.fd.as_raw_fd())
            .ok()
            .map(SocketAddrV4::from)
    }
}

impl StreamConnection for TcpConnection {
    fn receive(&mut self, buf: &mut [u8]) -> Result<usize> {
        recv(self.fd.as_raw_fd(), buf, MsgFlags::empty()).map_err(|e| {
            self.log.error(&format!("recv failed : {}", e));
            SocketError::Receive(os_err(e))
        })
    }

    fn send(&mut self, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        match send(self.fd.as_raw_fd(), data, MsgFlags::empty()) {
            Ok(n) if n == data.len() => Ok(()),
            Ok(n) => {
                self.log
                    .error(&format!("send incomplete : {} of {} bytes", n, data.len()));
                Err(SocketError::ShortWrite {
                    written: n,
                    expected: data.len(),
                })
            }
            Err(e) => {
                self.log.error(&format!("send failed : {}", e));
                Err(SocketError::Send(os_err(e)))
            }
        }
    }

    fn disconnect(self) -> Result<()> {
        // descriptor is closed when `self.fd` drops, shutdown outcome aside
        shutdown(self.fd.as_raw_fd(), Shutdown::Read).map_err(|e| {
            self.log.error(&format!("shutdown failed : {}", e));
            SocketError::Shutdown(os_err(e))
        })
    }
}
