//! Fake counter service and in-memory transports shared by the integration tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, ReadBuf};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use poolcounter_core::error::Result;
use poolcounter_exporter::scrape::{connect_within, Connector, StatsTransport, TcpConnector};

pub const FULL_RESPONSE: &str = "\
uptime: 633 days 10h 23m 10s
total processing time: 389 days 9343h 3m 28.000000s
average processing time: 0.957994s
gained time: 1630 days 39129h 9m 6.000000s
waiting time for me: 22h 14m 53.898438s
waiting time for anyone: 13h 7m 11.224609s
waiting time average: 0.000325s
total_acquired: 70193651
total_releases: 70193651
hashtable_entries: 4
processing_workers: 4
waiting_workers: 0
connect_errors: 0
failed_sends: 2
full_queues: 1271
lock_mismatch: 0
release_mismatch: 0
processed_count: 70193647

";

/// What the fake server does after reading the query line.
#[derive(Clone)]
pub enum Script {
    /// Write the bytes and close.
    Reply(Vec<u8>),
    /// Write the bytes, then hold the connection open for the duration.
    ReplyThenStall(Vec<u8>, Duration),
}

/// Serve exactly one connection. The handle yields the request line received.
pub async fn spawn_server(script: Script) -> (SocketAddr, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut stream = BufReader::new(stream);
        let mut request = String::new();
        stream.read_line(&mut request).await.unwrap();

        match script {
            Script::Reply(bytes) => {
                stream.get_mut().write_all(&bytes).await.unwrap();
                stream.get_mut().shutdown().await.unwrap();
            }
            Script::ReplyThenStall(bytes, hold) => {
                stream.get_mut().write_all(&bytes).await.unwrap();
                tokio::time::sleep(hold).await;
            }
        }
        request
    });

    (addr, handle)
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

pub fn tcp(addr: SocketAddr) -> Arc<dyn Connector> {
    Arc::new(TcpConnector::new(addr.to_string(), Duration::from_secs(2)))
}

/// Hands out one prepared transport.
pub struct OnceConnector(Mutex<Option<Box<dyn StatsTransport>>>);

impl OnceConnector {
    pub fn new(t: impl StatsTransport + 'static) -> Arc<dyn Connector> {
        let boxed: Box<dyn StatsTransport> = Box::new(t);
        Arc::new(Self(Mutex::new(Some(boxed))))
    }
}

#[async_trait]
impl Connector for OnceConnector {
    fn target(&self) -> &str {
        "in-memory"
    }

    async fn connect(&self) -> Result<Box<dyn StatsTransport>> {
        Ok(self.0.lock().unwrap().take().expect("connected twice"))
    }
}

/// Transport whose writes always fail.
pub struct BrokenPipe;

impl AsyncRead for BrokenPipe {
    fn poll_read(self: Pin<&mut Self>, _: &mut Context<'_>, _: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for BrokenPipe {
    fn poll_write(self: Pin<&mut Self>, _: &mut Context<'_>, _: &[u8]) -> Poll<io::Result<usize>> {
        Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer gone")))
    }

    fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Connector whose connect attempt never completes, bounded by `limit`.
pub struct HangingConnector {
    pub limit: Duration,
}

impl HangingConnector {
    pub fn new(limit: Duration) -> Arc<dyn Connector> {
        Arc::new(Self { limit })
    }
}

#[async_trait]
impl Connector for HangingConnector {
    fn target(&self) -> &str {
        "blackhole:7531"
    }

    async fn connect(&self) -> Result<Box<dyn StatsTransport>> {
        let hang = std::future::pending::<io::Result<tokio::net::TcpStream>>();
        connect_within(self.target(), self.limit, hang).await
    }
}
