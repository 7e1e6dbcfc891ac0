#![doc = include_str!("../README.md")]

use rand::Rng;
use std::net::SocketAddr;
use taskmill::{AtomicCounter, Counter};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// Upper bound on a single request or response frame.
///
/// There is no length prefix or delimiter: one read, one write, and anything
/// past the cap is silently truncated.
pub const MAX_FRAME: usize = 1024;

/// Canned server replies, chosen at random per request.
pub const REPLIES: [&str; 2] = ["Not too bad, client..", "Not so great, client.."];

/// Capacity of the connection error channel drained by the logging task.
const ERROR_BUFFER: usize = 64;

/// Accepts connections until the listener fails, one task per connection.
///
/// Per-connection I/O errors are transient: they are forwarded to a logging
/// task and the loop keeps serving. A failed accept is fatal and surfaces to
/// the caller. `handled` is incremented once per completed exchange.
pub async fn serve(listener: TcpListener, handled: AtomicCounter) -> anyhow::Result<()> {
    let (errs_tx, mut errs_rx) = mpsc::channel::<(SocketAddr, std::io::Error)>(ERROR_BUFFER);

    tokio::spawn(async move {
        while let Some((peer, err)) = errs_rx.recv().await {
            tracing::warn!(%peer, %err, "connection failed");
        }
    });

    loop {
        let (stream, peer) = listener.accept().await?;
        let errs = errs_tx.clone();
        let handled = handled.clone();
        tokio::spawn(async move {
            match handle_client(stream).await {
                Ok(()) => handled.increment(),
                Err(err) => {
                    let _ = errs.send((peer, err)).await;
                }
            }
        });
    }
}

/// Serves one request/response exchange, then lets the connection close.
///
/// Reads at most [`MAX_FRAME`] bytes and only handles the bytes actually
/// received; the reply is one of [`REPLIES`].
pub async fn handle_client(mut stream: TcpStream) -> std::io::Result<()> {
    let mut buf = [0_u8; MAX_FRAME];
    let n = stream.read(&mut buf).await?;

    let req = String::from_utf8_lossy(&buf[..n]);
    tracing::info!(bytes = n, "received request: {req}");

    stream.write_all(pick_reply().as_bytes()).await?;
    Ok(())
}

fn pick_reply() -> &'static str {
    REPLIES[rand::rng().random_range(0..REPLIES.len())]
}
