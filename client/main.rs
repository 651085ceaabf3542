// sockserve-probe: send one payload to a listener and print the reply
use sockserve_client::TcpClient;
use std::env;

fn usage() {
    println!("Usage: sockserve-probe [options]");
    println!("Connect to a sockserve daemon, send a payload, print the reply.");
    println!("Options:");
    println!("  -a address    Server address (Default: 127.0.0.1)");
    println!("  -p port       Server port (Default: 3490)");
    println!("  -m message    Payload to send (Default: hello)");
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut host = "127.0.0.1".to_string();
    let mut port: u16 = 3490;
    let mut message = "hello".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-a" => {
                if i + 1 < args.len() {
                    host = args[i + 1].clone();
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "-p" => {
                if i + 1 < args.len() {
                    port = args[i + 1].parse().unwrap_or(3490);
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "-m" => {
                if i + 1 < args.len() {
                    message = args[i + 1].clone();
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "-h" | "--help" => {
                usage();
                return;
            }
            _ => {
                i += 1;
            }
        }
    }

    println!("Connecting to {}:{}", host, port);
    let mut client = match TcpClient::connect(&host, port) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to connect: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = client.send(message.as_bytes()) {
        eprintln!("Send failed: {}", e);
        std::process::exit(1);
    }

    let mut buf = vec![0u8; 4096];
    match client.receive(&mut buf) {
        Ok(0) => println!("Connection closed by server"),
        Ok(n) => {
            let stamp = chrono::Local::now().format("%Y/%m/%d %H:%M:%S");
            println!("{} < {}", stamp, String::from_utf8_lossy(&buf[..n]));
        }
        Err(e) => {
            eprintln!("Receive failed: {}", e);
            std::process::exit(1);
        }
    }

    let _ = client.disconnect();
}
