//! Counter-service protocol reader.
//!
//! One reader owns one connection for one pull. The deadline is absolute and
//! armed right after connect: the query write and every line read share it.
//! Dropping the reader closes the connection.

use std::future::Future;
use std::io;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::net::TcpStream;
use tokio::time::{timeout, timeout_at, Duration, Instant};

use poolcounter_core::error::{PoolCounterError, Result};
use poolcounter_core::stats::{StatLine, STATS_QUERY};

/// Byte stream the reader can talk over.
pub trait StatsTransport: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T> StatsTransport for T where T: AsyncRead + AsyncWrite + Unpin + Send {}

/// Opens transports to the counter service.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Human readable target, used in logs and errors.
    fn target(&self) -> &str;
    async fn connect(&self) -> Result<Box<dyn StatsTransport>>;
}

/// TCP connector. The connect attempt is bounded by `connect_timeout`.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    addr: String,
    connect_timeout: Duration,
}

impl TcpConnector {
    pub fn new(addr: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            connect_timeout,
        }
    }
}

#[async_trait]
impl Connector for TcpConnector {
    fn target(&self) -> &str {
        &self.addr
    }

    async fn connect(&self) -> Result<Box<dyn StatsTransport>> {
        connect_within(&self.addr, self.connect_timeout, TcpStream::connect(self.addr.as_str())).await
    }
}

/// Run a connect attempt under `limit`. Failure and expiry are both `Connection` errors.
pub async fn connect_within<T, F>(addr: &str, limit: Duration, attempt: F) -> Result<Box<dyn StatsTransport>>
where
    T: StatsTransport + 'static,
    F: Future<Output = io::Result<T>>,
{
    match timeout(limit, attempt).await {
        Ok(Ok(stream)) => Ok(Box::new(stream)),
        Ok(Err(e)) => Err(PoolCounterError::Connection {
            addr: addr.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Err(PoolCounterError::Connection {
            addr: addr.to_string(),
            reason: format!("timed out after {limit:?}"),
        }),
    }
}

/// Lazy, finite stream of split response lines.
pub struct StatsReader {
    lines: Lines<BufReader<Box<dyn StatsTransport>>>,
    deadline: Instant,
    finished: bool,
}

impl StatsReader {
    /// Connect, arm the deadline and send the query.
    pub async fn open(connector: &dyn Connector, budget: Duration) -> Result<Self> {
        let mut conn = connector.connect().await?;
        let deadline = Instant::now() + budget;

        let send = async {
            conn.write_all(STATS_QUERY.as_bytes()).await?;
            conn.flush().await
        };
        match timeout_at(deadline, send).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(PoolCounterError::Write(e.to_string())),
            Err(_) => return Err(PoolCounterError::Write("deadline exceeded".into())),
        }

        Ok(Self {
            lines: BufReader::new(conn).lines(),
            deadline,
            finished: false,
        })
    }

    /// Next `key: value` line.
    ///
    /// `Ok(None)` on clean end of stream or on the first line without the
    /// separator. Read failures and deadline expiry are `Stream` errors. Once
    /// the stream has ended or failed, it stays ended.
    pub async fn next_line(&mut self) -> Result<Option<StatLine>> {
        if self.finished {
            return Ok(None);
        }

        let read = timeout_at(self.deadline, self.lines.next_line()).await;
        let line = match read {
            Ok(Ok(line)) => line,
            Ok(Err(e)) => {
                self.finished = true;
                return Err(PoolCounterError::Stream(e.to_string()));
            }
            Err(_) => {
                self.finished = true;
                return Err(PoolCounterError::Stream("deadline exceeded".into()));
            }
        };

        match line.as_deref().and_then(StatLine::split) {
            Some(stat) => Ok(Some(stat)),
            None => {
                self.finished = true;
                Ok(None)
            }
        }
    }
}
