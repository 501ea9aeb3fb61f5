//! Socket setup and the write side of a connection

use std::io::Write;
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Nickname used when the connect form leaves it blank
pub const DEFAULT_NICKNAME: &str = "guest";

/// What the user entered in the connect form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectRequest {
    pub host: String,
    pub port: u16,
    pub nickname: String,
}

impl ConnectRequest {
    pub fn new(host: impl Into<String>, port: u16, nickname: &str) -> Self {
        let nickname = nickname.trim();
        Self {
            host: host.into().trim().to_string(),
            port,
            nickname: if nickname.is_empty() {
                DEFAULT_NICKNAME.to_string()
            } else {
                nickname.to_string()
            },
        }
    }

    /// Build a request from raw form fields; only the port is validated
    pub fn from_form(host: &str, port: &str, nickname: &str) -> Result<Self> {
        let port = port.trim();
        let port: u16 = port.parse().map_err(|_| Error::InvalidPort {
            input: port.to_string(),
        })?;
        Ok(Self::new(host, port, nickname))
    }

    /// `host:port` label used in notices and the status bar
    pub fn peer_label(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Identification line sent right after connecting
    pub fn nick_command(&self) -> String {
        nick_line(&self.nickname)
    }
}

/// One established socket session (write half)
#[derive(Debug)]
pub struct Connection {
    id: Uuid,
    peer: String,
    nickname: String,
    stream: TcpStream,
}

impl Connection {
    /// Open a TCP stream to the requested server
    ///
    /// With a timeout every resolved address is tried in turn; the last
    /// failure is reported if none accepts.
    pub fn open(id: Uuid, request: &ConnectRequest, timeout: Option<Duration>) -> Result<Self> {
        let peer = request.peer_label();
        let connect_failed = |reason: String| Error::ConnectFailed {
            addr: peer.clone(),
            reason,
        };

        let stream = match timeout {
            Some(timeout) => {
                let addrs = (request.host.as_str(), request.port)
                    .to_socket_addrs()
                    .map_err(|e| connect_failed(e.to_string()))?;

                let mut last_error = None;
                let mut connected = None;
                for addr in addrs {
                    debug!("Trying {} ({})", addr, peer);
                    match TcpStream::connect_timeout(&addr, timeout) {
                        Ok(stream) => {
                            connected = Some(stream);
                            break;
                        }
                        Err(e) => last_error = Some(e),
                    }
                }

                match (connected, last_error) {
                    (Some(stream), _) => stream,
                    (None, Some(e)) => return Err(connect_failed(e.to_string())),
                    (None, None) => {
                        return Err(connect_failed("host did not resolve to any address".to_string()))
                    }
                }
            }
            None => TcpStream::connect((request.host.as_str(), request.port))
                .map_err(|e| connect_failed(e.to_string()))?,
        };

        if let Err(e) = stream.set_nodelay(true) {
            debug!("Could not disable Nagle on {}: {}", peer, e);
        }

        info!("Connected to {} as {}", peer, request.nickname);
        Ok(Self {
            id,
            peer,
            nickname: request.nickname.clone(),
            stream,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// Independent handle for the read loop
    pub fn try_clone_reader(&self) -> Result<TcpStream> {
        self.stream.try_clone().map_err(|e| Error::ConnectFailed {
            addr: self.peer.clone(),
            reason: format!("could not clone stream for reading: {}", e),
        })
    }

    /// Announce the nickname with `/nick <name>`
    pub fn identify(&mut self) -> Result<bool> {
        write_line(&mut self.stream, &nick_line(&self.nickname))
    }

    /// Send one line; see [`write_line`]
    pub fn send_line(&mut self, text: &str) -> Result<bool> {
        write_line(&mut self.stream, text)
    }

    /// Close both directions so a blocked read returns immediately
    pub fn shutdown(&self) {
        if let Err(e) = self.stream.shutdown(Shutdown::Both) {
            // NotConnected here just means the peer already went away
            debug!("Shutdown of {} reported: {}", self.peer, e);
        }
    }
}

fn nick_line(nickname: &str) -> String {
    format!("/nick {}", nickname)
}

/// Write `text` trimmed, followed by `\n`, and flush
///
/// Returns `Ok(false)` without writing anything when the trimmed text is
/// empty.
pub fn write_line<W: Write>(writer: &mut W, text: &str) -> Result<bool> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(false);
    }

    let mut line = String::with_capacity(text.len() + 1);
    line.push_str(text);
    line.push('\n');

    writer
        .write_all(line.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|e| Error::WriteFailed {
            reason: e.to_string(),
        })?;
    Ok(true)
}
