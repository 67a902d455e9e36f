//! Interactive subscriber terminal: translates console commands into
//! protocol lines with the configured username and prints broker responses
//! and pushed messages as they arrive.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

#[tokio::main]
async fn main() {
    let mut args = std::env::args().skip(1);
    let addr = args.next().unwrap_or_else(|| "127.0.0.1:8080".to_string());
    let username = args.next().unwrap_or_else(|| "subscriber".to_string());

    let stream = TcpStream::connect(&addr)
        .await
        .expect("failed to connect to broker");
    let (read_half, mut write_half) = stream.into_split();
    write_half
        .write_all(b"CLIENT\n")
        .await
        .expect("handshake failed");

    tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            println!("{line}");
        }
        println!("connection to broker closed");
        std::process::exit(0);
    });

    println!("connected to {addr} as {username}");
    println!("commands: display | subscribe <id> | current | unsubscribe <id>");
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = input.next_line().await {
        let Some(cmd) = translate(&line, &username) else {
            if !line.trim().is_empty() {
                eprintln!("unrecognized command: {line}");
            }
            continue;
        };
        if write_half
            .write_all(format!("{cmd}\n").as_bytes())
            .await
            .is_err()
        {
            break;
        }
    }
}

fn translate(line: &str, username: &str) -> Option<String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        ["display"] => Some("DISPLAY".to_string()),
        ["subscribe", id] => Some(format!("SUBSCRIBE {id} {username}")),
        ["current"] => Some(format!("CURRENT {username}")),
        ["unsubscribe", id] => Some(format!("UNSUBSCRIBE {id} {username}")),
        _ => None,
    }
}
