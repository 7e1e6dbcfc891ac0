use std::time::Duration;
use taskmill::{AtomicCounter, Counter};
use taskmill_echo::{MAX_FRAME, REPLIES, serve};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::sleep;

async fn spawn_server() -> (std::net::SocketAddr, AtomicCounter) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handled = AtomicCounter::new();
    tokio::spawn(serve(listener, handled.clone()));
    (addr, handled)
}

async fn wait_for_count(counter: &AtomicCounter, expected: u64) {
    for _ in 0..100 {
        if counter.get() == expected {
            return;
        }
        sleep(Duration::from_millis(10)).await;
    }
    panic!("counter never reached {expected} (got {})", counter.get());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn one_shot_roundtrip() {
    let (addr, handled) = spawn_server().await;

    let mut conn = TcpStream::connect(addr).await.unwrap();
    conn.write_all(b"how are you, server?").await.unwrap();

    let mut buf = [0_u8; MAX_FRAME];
    let n = conn.read(&mut buf).await.unwrap();
    let reply = std::str::from_utf8(&buf[..n]).unwrap();
    assert!(REPLIES.contains(&reply), "unexpected reply: {reply}");

    wait_for_count(&handled, 1).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn oversized_requests_are_truncated_not_fatal() {
    let (addr, handled) = spawn_server().await;

    let mut conn = TcpStream::connect(addr).await.unwrap();
    let oversized = vec![b'x'; MAX_FRAME * 2];
    conn.write_all(&oversized).await.unwrap();

    // The server reads at most one frame and still replies.
    let mut buf = [0_u8; MAX_FRAME];
    let n = conn.read(&mut buf).await.unwrap();
    let reply = std::str::from_utf8(&buf[..n]).unwrap();
    assert!(REPLIES.contains(&reply), "unexpected reply: {reply}");

    wait_for_count(&handled, 1).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn each_connection_carries_exactly_one_exchange() {
    let (addr, handled) = spawn_server().await;

    for i in 0..5 {
        let mut conn = TcpStream::connect(addr).await.unwrap();
        conn.write_all(format!("message {i}").as_bytes())
            .await
            .unwrap();

        // After the single reply the server side is done with the
        // connection, so reading to EOF yields exactly one reply.
        let mut reply = Vec::new();
        conn.read_to_end(&mut reply).await.unwrap();
        let reply = std::str::from_utf8(&reply).unwrap();
        assert!(REPLIES.contains(&reply), "unexpected reply: {reply}");
    }

    wait_for_count(&handled, 5).await;
}
