use std::env;
use std::error::Error;
use std::io::{self, Write};

use rooms_protocol::decode_request;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Where to connect: env override or default.
    let addr = env::var("ROOMS_CLIENT_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    println!("Connecting to {}...", addr);
    let stream = TcpStream::connect(&addr).await?;
    println!("Connected.");
    println!("Type JSON request lines like:");
    println!(r#"  {{"type":"create_room","playerName":"alice","pin":"1234"}}"#);
    println!(r#"  {{"type":"join_room","roomId":"AB12CD","playerName":"bob"}}"#);
    println!(r#"  {{"type":"make_move","move":{{"from":"e2","to":"e4","promotion":"q"}}}}"#);
    println!(r#"  {{"type":"get_legal_moves","square":"e2"}}"#);
    println!(r#"  {{"type":"reset_game"}}"#);
    println!("Type 'quit' or 'exit' to leave.\n");

    let (read_half, mut write_half) = stream.into_split();

    // Events arrive whenever the room changes, not only as replies,
    // so print them from a background task.
    tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => println!("<< {}", line),
                Ok(None) => {
                    println!("\nServer closed the connection.");
                    break;
                }
                Err(e) => {
                    eprintln!("Read error: {:?}", e);
                    break;
                }
            }
        }
    });

    let stdin = io::stdin();

    loop {
        // Prompt
        print!(">> ");
        io::stdout().flush()?;

        let mut line = String::new();
        let n = stdin.read_line(&mut line)?;
        if n == 0 {
            // EOF
            println!("\nEOF on stdin, exiting client.");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            println!("Exiting client.");
            break;
        }

        // Catch typos locally before bothering the server.
        if let Err(e) = decode_request(trimmed) {
            eprintln!("Could not parse line as a request: {}", e);
            continue;
        }

        write_half.write_all(trimmed.as_bytes()).await?;
        write_half.write_all(b"\n").await?;
        write_half.flush().await?;
    }

    Ok(())
}
