use clap::Parser;
use std::io::Write;
use taskmill_echo::MAX_FRAME;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Runtime configuration for the echo client binary.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "taskmill-echo-client",
    version,
    about = "Interactive client for the one-shot echo server"
)]
struct CliArgs {
    /// Address of the server to connect to.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("127.0.0.1:8080"))]
    server_addr: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("Enter message to send to server: ");
        std::io::stdout().flush()?;

        let Some(msg) = lines.next_line().await? else {
            // stdin closed.
            return Ok(());
        };
        if msg.is_empty() {
            continue;
        }

        // The protocol is one exchange per connection, so each message gets
        // a fresh one.
        let mut conn = TcpStream::connect(&args.server_addr).await?;
        conn.write_all(msg.as_bytes()).await?;

        let mut buf = [0_u8; MAX_FRAME];
        let n = conn.read(&mut buf).await?;
        if n == 0 {
            anyhow::bail!("server closed the connection without replying");
        }
        println!("Server response: {}", String::from_utf8_lossy(&buf[..n]));
    }
}
