// sockserve-daemon: echo server driving a blocking listener in a retry loop
use clap::Parser;
use sockserve_core::{LogCallback, ServerSettings};
use sockserve_transport::{StreamConnection, StreamListener, TcpServer, UnixServer};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "sockserve-daemon")]
#[command(about = "Echo daemon over a blocking stream listener", long_about = None)]
#[command(version = "0.1.0")]
struct Cli {
    /// TCP port to listen on
    #[arg(short, long, default_value = "3490")]
    port: String,

    /// Listen on a Unix domain socket path instead of TCP
    #[arg(short = 'u', long = "socket", value_name = "PATH")]
    socket: Option<String>,
}

// Echo until the peer closes, then half-close and drop the handle.
fn serve<C: StreamConnection>(mut conn: C) {
    let mut buf = vec![0u8; 4096];
    loop {
        match conn.receive(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                if conn.send(&buf[..n]).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    }
    let _ = conn.disconnect();
}

// The retry policy lives here, not in the listener: setup failures are
// backed off, single accept failures are just skipped.
fn run<L: StreamListener>(mut server: L) -> !
where
    L::Connection: 'static,
{
    loop {
        match server.accept() {
            Ok(conn) => {
                thread::spawn(move || serve(conn));
            }
            Err(e) if e.is_setup() => {
                eprintln!("setup failed ({}), retrying in 1s", e);
                thread::sleep(Duration::from_secs(1));
            }
            Err(_) => thread::sleep(Duration::from_millis(100)),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let settings = ServerSettings::from_env();
    let sink: LogCallback = Arc::new(|msg: &str| println!("{}", msg));

    match cli.socket {
        Some(path) => {
            let server = match UnixServer::new(&path, settings, sink) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("cannot use socket path {}: {}", path, e);
                    std::process::exit(1);
                }
            };
            println!("sockserve daemon listening on {}", path);
            run(server)
        }
        None => {
            let server = match TcpServer::new(&cli.port, settings, sink) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("cannot use port {}: {}", cli.port, e);
                    std::process::exit(1);
                }
            };
            println!("sockserve daemon listening on port {}", cli.port);
            run(server)
        }
    }
}
