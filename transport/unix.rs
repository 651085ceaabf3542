// Unix domain server backend: the TCP contract over AF_UNIX stream sockets
use crate::tcp::os_err;
use crate::traits::{StreamConnection, StreamListener};
use nix::sys::socket::{
    accept, bind, listen, recv, send, shutdown, socket, AddressFamily, Backlog, MsgFlags,
    Shutdown, SockFlag, SockType, UnixAddr,
};
use sockserve_core::{EventLog, LogCallback, Result, ServerSettings, SocketError};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};
use std::path::{Path, PathBuf};

const COMPONENT: &str = "UnixServer";

/// Blocking listener on a Unix domain socket path.
///
/// Same lifecycle as the TCP backend: lazy setup on the first `accept`,
/// reuse thereafter, close on drop.
pub struct UnixServer {
    path: PathBuf,
    listen_fd: Option<OwnedFd>,
    log: EventLog,
}

impl UnixServer {
    /// Check that `path` fits a socket address. The address is re-derived
    /// on every setup attempt.
    pub fn new(path: impl AsRef<Path>, settings: ServerSettings, sink: LogCallback) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        UnixAddr::new(path.as_path()).map_err(|e| SocketError::Resolve(os_err(e)))?;
        Ok(UnixServer {
            path,
            listen_fd: None,
            log: EventLog::new(COMPONENT, settings, sink),
        })
    }

    pub fn is_listening(&self) -> bool {
        self.listen_fd.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_listening(&mut self) -> Result<RawFd> {
        if let Some(fd) = &self.listen_fd {
            return Ok(fd.as_raw_fd());
        }

        let addr = UnixAddr::new(self.path.as_path()).map_err(|e| {
            self.log
                .error(&format!("resolving path {:?} failed : {}", self.path, e));
            SocketError::Resolve(os_err(e))
        })?;

        // a socket file left behind by an earlier run would fail the bind
        let _ = std::fs::remove_file(&self.path);

        let fd = socket(
            AddressFamily::Unix,
            SockType::Stream,
            SockFlag::empty(),
            None,
        )
        .map_err(|e| {
            self.log.error(&format!("socket failed : {}", e));
            SocketError::Create(os_err(e))
        })?;

        bind(fd.as_raw_fd(), &addr).map_err(|e| {
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

impl StreamListener for UnixServer {
    type Connection = UnixConnection;

    fn accept(&mut self) -> Result<UnixConnection> {
        let listen_raw = self.ensure_listening()?;

        let client_raw = accept(listen_raw).map_err(|e| {
            self.log.error(&format!("accept failed : {}", e));
            SocketError::Accept(os_err(e))
        })?;
        let fd = unsafe { OwnedFd::from_raw_fd(client_raw) };

        // client sockets are usually unnamed, so no peer address here
        self.log.info("Incoming connection");

        Ok(UnixConnection {
            fd,
            log: self.log.clone(),
        })
    }
}

/// Accepted client connection on a Unix domain socket.
pub struct UnixConnection {
    fd: OwnedFd,
    log: EventLog,
}

impl StreamConnection for UnixConnection {
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
        shutdown(self.fd.as_raw_fd(), Shutdown::Read).map_err(|e| {
            self.log.error(&format!("shutdown failed : {}", e));
            SocketError::Shutdown(os_err(e))
        })
    }
}
