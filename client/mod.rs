// client: blocking TCP client for driving a sockserve listener
use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream};

/// Connected TCP client. All calls block; errors are plain `io::Error`s
/// for the caller to map.
pub struct TcpClient {
    stream: TcpStream,
}

impl TcpClient {
    pub fn connect(host: &str, port: u16) -> std::io::Result<Self> {
        let stream = TcpStream::connect((host, port))?;
        Ok(TcpClient { stream })
    }

    /// Write the whole of `data`.
    pub fn send(&mut self, data: &[u8]) -> std::io::Result<()> {
        self.stream.write_all(data)
    }

    /// One read into `buf`; `Ok(0)` means the server closed the connection.
    pub fn receive(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.stream.read(buf)
    }

    /// Read until `buf` is full.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> std::io::Result<()> {
        self.stream.read_exact(buf)
    }

    /// Half-close the send direction so the server observes an orderly EOF
    /// while replies can still arrive.
    pub fn shutdown_write(&mut self) -> std::io::Result<()> {
        self.stream.shutdown(Shutdown::Write)
    }

    pub fn disconnect(self) -> std::io::Result<()> {
        self.stream.shutdown(Shutdown::Both)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn talks_to_a_std_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut buf = [0u8; 16];
            let n = stream.read(&mut buf).expect("read");
            stream.write_all(&buf[..n]).expect("write");
        });

        let mut client = TcpClient::connect("127.0.0.1", port).expect("connect");
        client.send(b"marco").expect("send");
        let mut reply = [0u8; 5];
        client.read_exact(&mut reply).expect("read_exact");
        assert_eq!(&reply, b"marco");

        server.join().unwrap();
        let mut rest = [0u8; 1];
        assert_eq!(client.receive(&mut rest).expect("receive"), 0);
        client.disconnect().expect("disconnect");
    }

    #[test]
    fn write_half_close_yields_server_eof() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut sink = Vec::new();
            stream.read_to_end(&mut sink).expect("read_to_end");
            sink
        });

        let mut client = TcpClient::connect("127.0.0.1", port).expect("connect");
        client.send(b"last words").expect("send");
        client.shutdown_write().expect("shutdown_write");

        assert_eq!(server.join().unwrap(), b"last words");
    }
}
