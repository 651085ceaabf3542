// Listener abstraction - allows pluggable server backends
use sockserve_core::Result;

/// An accepted byte-stream connection, owned by the caller.
///
/// Handles are independent of the listener that produced them and of each
/// other; distinct handles may be driven from different threads.
pub trait StreamConnection: Send {
    /// One underlying read into `buf`. `Ok(0)` is the peer's orderly close.
    fn receive(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// One write attempt covering the whole of `data`. A short write is
    /// reported, never retried here. Empty input succeeds without touching
    /// the platform.
    fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Half-close the receive direction, then close the descriptor. The
    /// close happens even when the shutdown step fails. Consuming the
    /// handle makes a second disconnect unrepresentable.
    fn disconnect(self) -> Result<()>
    where
        Self: Sized;
}

/// A blocking server endpoint bound to a local address.
pub trait StreamListener: Send {
    type Connection: StreamConnection;

    /// Block until a client connects. The first call performs the lazy
    /// create/bind/listen setup; later calls reuse the listening socket.
    /// Setup failures leave the listener invalid so the same call retries
    /// from scratch; accept failures keep it listening.
    fn accept(&mut self) -> Result<Self::Connection>;
}
