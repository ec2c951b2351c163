//! Transports between the dispatcher and its host.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::sync::mpsc;

use crate::error::ProtocolError;

/// A bidirectional message channel. One inbound message is handled to
/// completion before the next is read.
#[async_trait]
pub trait HostChannel: Send {
    /// Next inbound payload, or `None` once the host has hung up.
    async fn recv(&mut self) -> Result<Option<String>, ProtocolError>;

    async fn send(&mut self, message: &str) -> Result<(), ProtocolError>;
}

/// Newline-delimited JSON over a reader/writer pair.
pub struct JsonLinesChannel<R, W> {
    lines: Lines<BufReader<R>>,
    writer: W,
}

impl<R, W> JsonLinesChannel<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
        }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl JsonLinesChannel<tokio::io::Stdin, tokio::io::Stdout> {
    /// Protocol on stdin/stdout. Logs must go to stderr.
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

#[async_trait]
impl<R, W> HostChannel for JsonLinesChannel<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn recv(&mut self) -> Result<Option<String>, ProtocolError> {
        while let Some(line) = self.lines.next_line().await? {
            if !line.trim().is_empty() {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }

    async fn send(&mut self, message: &str) -> Result<(), ProtocolError> {
        self.writer.write_all(message.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}

/// In-process channel, for embedding the dispatcher and for tests.
pub struct MemoryChannel {
    inbound: mpsc::UnboundedReceiver<String>,
    outbound: mpsc::UnboundedSender<String>,
}

/// The host's side of a [`MemoryChannel`].
pub struct MemoryHost {
    pub to_service: mpsc::UnboundedSender<String>,
    pub from_service: mpsc::UnboundedReceiver<String>,
}

impl MemoryChannel {
    pub fn pair() -> (MemoryChannel, MemoryHost) {
        let (to_service, inbound) = mpsc::unbounded_channel();
        let (outbound, from_service) = mpsc::unbounded_channel();
        (
            MemoryChannel { inbound, outbound },
            MemoryHost {
                to_service,
                from_service,
            },
        )
    }
}

#[async_trait]
impl HostChannel for MemoryChannel {
    async fn recv(&mut self) -> Result<Option<String>, ProtocolError> {
        Ok(self.inbound.recv().await)
    }

    async fn send(&mut self, message: &str) -> Result<(), ProtocolError> {
        self.outbound.send(message.to_string()).map_err(|_| {
            ProtocolError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "host side of the channel was dropped",
            ))
        })
    }
}
