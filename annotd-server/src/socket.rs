//! Line-protocol server: newline-delimited requests over TCP
//!
//! One request per line, one response per request, in order. A zero-length
//! request line is acknowledged with a single blank line and never reaches
//! the pipeline. XML responses span multiple lines, so they end with a
//! terminator line holding a single `.`, and payload lines that start with
//! `.` get an extra leading `.` (receivers strip it). A failed request
//! answers with one `ERROR: <message>` line before the same terminator.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::service::{AnnotationService, RequestOutcome};

/// Connections silent for this long are closed.
const IDLE_TIMEOUT: Duration = Duration::from_secs(300);

/// End-of-response terminator line.
const TERMINATOR: &str = ".";

/// Owns the listening socket and the shared annotation service.
pub struct LineProtocolServer {
    listener: TcpListener,
    service: AnnotationService,
}

impl LineProtocolServer {
    /// Bind the listening socket. Failure here is fatal to the caller.
    pub async fn bind(port: u16, service: AnnotationService) -> Result<Self> {
        let listener = TcpListener::bind(("0.0.0.0", port))
            .await
            .with_context(|| format!("could not bind line-protocol port {port}"))?;
        info!(
            "line-protocol server is listening on port {}",
            listener.local_addr()?.port()
        );
        Ok(Self { listener, service })
    }

    /// Local address of the listening socket.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until Ctrl-C, one task per connection.
    pub async fn run(self) -> Result<()> {
        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let service = self.service.clone();
                        tokio::spawn(async move {
                            Session::new(stream, peer).serve(service).await;
                        });
                    }
                    Err(err) => error!(%err, "accept failed"),
                },
                _ = tokio::signal::ctrl_c() => {
                    info!("shutting down server");
                    return Ok(());
                }
            }
        }
    }
}

/// One accepted connection
struct Session {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    peer: SocketAddr,
    open: bool,
}

impl Session {
    fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        let (read_half, write_half) = stream.into_split();
        Self {
            reader: BufReader::new(read_half),
            writer: write_half,
            peer,
            open: true,
        }
    }

    /// Serve requests until EOF, an I/O failure, or the idle timeout.
    async fn serve(mut self, service: AnnotationService) {
        info!(peer = %self.peer, "opening connection");
        let mut line = String::new();
        while self.open {
            line.clear();
            let read = match timeout(IDLE_TIMEOUT, self.reader.read_line(&mut line)).await {
                Ok(read) => read,
                Err(_) => {
                    info!(peer = %self.peer, "closing idle connection");
                    break;
                }
            };
            match read {
                Ok(0) => self.open = false,
                Ok(_) => {
                    let request = line.trim_end_matches(['\r', '\n']);
                    if let Err(err) = self.respond(request, &service).await {
                        warn!(peer = %self.peer, %err, "write failed");
                        self.open = false;
                    }
                }
                Err(err) => {
                    warn!(peer = %self.peer, %err, "read failed");
                    self.open = false;
                }
            }
        }
        info!(peer = %self.peer, "closing connection");
    }

    async fn respond(
        &mut self,
        request: &str,
        service: &AnnotationService,
    ) -> std::io::Result<()> {
        if request.is_empty() {
            // keep-alive ack; the pipeline is not involved
            self.writer.write_all(b"\n").await?;
            return self.writer.flush().await;
        }
        match service.handle(request).await {
            RequestOutcome::Success(payload) => {
                self.writer.write_all(frame(&payload).as_bytes()).await?;
                info!(peer = %self.peer, "processed {} bytes", request.len());
            }
            RequestOutcome::Empty => self.writer.write_all(b"\n").await?,
            RequestOutcome::Error(message) => {
                self.writer
                    .write_all(format!("ERROR: {message}\n{TERMINATOR}\n").as_bytes())
                    .await?;
            }
        }
        self.writer.flush().await
    }
}

/// Frame a multi-line payload: dot-stuff, then terminate with a lone `.`.
fn frame(payload: &str) -> String {
    let mut framed = String::with_capacity(payload.len() + 8);
    for line in payload.lines() {
        if line.starts_with('.') {
            framed.push('.');
        }
        framed.push_str(line);
        framed.push('\n');
    }
    framed.push_str(TERMINATOR);
    framed.push('\n');
    framed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_terminates_with_lone_dot() {
        assert_eq!(frame("<a>\n<b>\n"), "<a>\n<b>\n.\n");
        assert_eq!(frame("single"), "single\n.\n");
    }

    #[test]
    fn test_frame_dot_stuffs_payload_lines() {
        assert_eq!(frame(".hidden\nplain"), "..hidden\nplain\n.\n");
    }

    #[test]
    fn test_frame_empty_payload_is_just_the_terminator() {
        assert_eq!(frame(""), ".\n");
    }
}
