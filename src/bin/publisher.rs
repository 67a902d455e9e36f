//! Interactive publisher terminal: translates console commands into
//! protocol lines with the configured username and prints every broker
//! response as it arrives.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

#[tokio::main]
async fn main() {
    let mut args = std::env::args().skip(1);
    let addr = args.next().unwrap_or_else(|| "127.0.0.1:8080".to_string());
    let username = args.next().unwrap_or_else(|| "publisher".to_string());

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
    println!("commands: create <id> <name> | publish <id> <text...> | show | delete <id>");
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
        ["create", id, name] => Some(format!("CREATE {id} {name} {username}")),
        ["publish", id, text @ ..] if !text.is_empty() => {
            Some(format!("PUBLISH {id} {}", text.join(" ")))
        }
        ["show"] => Some(format!("SHOW {username}")),
        ["delete", id] => Some(format!("DELETE {id}")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::translate;

    #[test]
    fn test_translate_publisher_commands() {
        assert_eq!(
            translate("create t1 Weather", "alice"),
            Some("CREATE t1 Weather alice".to_string())
        );
        assert_eq!(
            translate("publish t1 rain tomorrow", "alice"),
            Some("PUBLISH t1 rain tomorrow".to_string())
        );
        assert_eq!(translate("show", "alice"), Some("SHOW alice".to_string()));
        assert_eq!(
            translate("delete t1", "alice"),
            Some("DELETE t1".to_string())
        );
        assert_eq!(translate("publish t1", "alice"), None);
        assert_eq!(translate("subscribe t1", "alice"), None);
    }
}
