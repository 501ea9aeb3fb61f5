//! Chat connection loop
//!
//! [`ChatClient`] owns at most one live [`Connection`] and its lifecycle
//! state. Socket work happens off the UI thread:
//!
//! ```text
//! ┌──────────────────┐   connect()    ┌──────────────────────────┐
//! │    UI Thread     │ ─────────────▶ │  worker thread (per id)  │
//! │   (ChatClient)   │                │  connect, then read      │
//! │                  │ ◀───────────── │  loop until EOF / error  │
//! │  pump(surface)   │  LoopMessage   └──────────────────────────┘
//! └──────────────────┘
//! ```
//!
//! The UI thread writes `/nick` itself once it has rendered the connected
//! notice, so identification always follows that notice.
//!
//! Every attempt gets a fresh id. Messages carrying an id other than the
//! current one belong to a replaced connection and are discarded, so a stale
//! reader can never render into the transcript of its successor.

pub mod connection;
pub mod reader;

pub use connection::{write_line, ConnectRequest, Connection, DEFAULT_NICKNAME};
pub use reader::ReadExit;

use std::io::BufReader;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

use crate::ansi::{ColorRunParser, TextRun};
use crate::display::DisplaySurface;
use crate::error::{Error, Result};

/// Called from socket threads after queueing a message, typically
/// `egui::Context::request_repaint`
pub type RepaintHook = Arc<dyn Fn() + Send + Sync>;

/// Text of the notice shown when the read loop ends
pub const DISCONNECTED_NOTICE: &str = "[Disconnected from server]";

/// Lifecycle of the client's connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Closed,
}

impl ConnectionState {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "Disconnected",
            ConnectionState::Connecting => "Connecting",
            ConnectionState::Connected => "Connected",
            ConnectionState::Closed => "Closed",
        }
    }
}

/// Result of a send request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// A line went out on the wire
    Sent,
    /// Input was blank, nothing was written
    Skipped,
}

/// Worker/reader thread to UI thread hand-off
#[derive(Debug)]
pub(crate) enum LoopMessage {
    Established { id: Uuid, connection: Connection },
    ConnectFailed { id: Uuid, error: Error },
    Line { id: Uuid, runs: Vec<TextRun> },
    Closed { id: Uuid },
}

impl LoopMessage {
    fn id(&self) -> Uuid {
        match self {
            LoopMessage::Established { id, .. }
            | LoopMessage::ConnectFailed { id, .. }
            | LoopMessage::Line { id, .. }
            | LoopMessage::Closed { id } => *id,
        }
    }
}

/// Line-based chat client
pub struct ChatClient {
    parser: ColorRunParser,
    state: ConnectionState,
    current_id: Option<Uuid>,
    connection: Option<Connection>,
    peer: Option<String>,
    connect_timeout: Option<Duration>,
    tx: UnboundedSender<LoopMessage>,
    rx: UnboundedReceiver<LoopMessage>,
    repaint: Option<RepaintHook>,
}

impl ChatClient {
    pub fn new(parser: ColorRunParser) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            parser,
            state: ConnectionState::Disconnected,
            current_id: None,
            connection: None,
            peer: None,
            connect_timeout: None,
            tx,
            rx,
            repaint: None,
        }
    }

    /// Bound each connect attempt; `None` leaves it to the OS
    pub fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Install a hook the socket threads call after queueing work for the UI
    pub fn set_repaint_hook(&mut self, hook: impl Fn() + Send + Sync + 'static) {
        self.repaint = Some(Arc::new(hook));
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// `host:port` of the current or last connection
    pub fn peer(&self) -> Option<&str> {
        self.peer.as_deref()
    }

    pub fn parser(&self) -> &ColorRunParser {
        &self.parser
    }

    /// Start connecting in the background
    ///
    /// Any existing connection is closed first; its remaining output and its
    /// disconnect notice are dropped. Completion arrives through
    /// [`ChatClient::pump`].
    pub fn connect(&mut self, request: ConnectRequest) -> Uuid {
        self.close_current();

        let id = Uuid::new_v4();
        self.current_id = Some(id);
        self.state = ConnectionState::Connecting;
        self.peer = Some(request.peer_label());
        info!("Connecting to {} as {} [{}]", request.peer_label(), request.nickname, id);

        let parser = self.parser.clone();
        let tx = self.tx.clone();
        let repaint = self.repaint.clone();
        let timeout = self.connect_timeout;

        let spawned = thread::Builder::new()
            .name(format!("subnet-conn-{}", id.simple()))
            .spawn(move || run_connection(id, request, timeout, parser, tx, repaint));

        if let Err(e) = spawned {
            error!("Failed to spawn connection worker: {}", e);
            // Report through the channel so the failure is handled like any other
            let _ = self.tx.send(LoopMessage::ConnectFailed {
                id,
                error: Error::WorkerSpawnFailed {
                    reason: e.to_string(),
                },
            });
        }

        id
    }

    /// Send one line to the server
    ///
    /// Blank input is skipped without touching the socket. Without an
    /// established connection this fails with [`Error::NotConnected`].
    pub fn send_line(&mut self, text: &str) -> Result<SendOutcome> {
        if text.trim().is_empty() {
            return Ok(SendOutcome::Skipped);
        }

        let connection = match (self.state, self.connection.as_mut()) {
            (ConnectionState::Connected, Some(connection)) => connection,
            _ => return Err(Error::NotConnected),
        };

        match connection.send_line(text) {
            Ok(true) => {
                debug!("sent {} byte(s) to {}", text.trim().len() + 1, connection.peer());
                Ok(SendOutcome::Sent)
            }
            Ok(false) => Ok(SendOutcome::Skipped),
            Err(e) => {
                warn!("Write to {} failed: {}", connection.peer(), e);
                Err(e)
            }
        }
    }

    /// Send whatever is in the surface's input field
    ///
    /// The input is cleared only after a successful send. Errors are shown
    /// on the surface and returned.
    pub fn submit_input<S: DisplaySurface + ?Sized>(&mut self, surface: &mut S) -> Result<SendOutcome> {
        let text = surface.input_text();
        match self.send_line(&text) {
            Ok(SendOutcome::Sent) => {
                surface.clear_input();
                Ok(SendOutcome::Sent)
            }
            Ok(SendOutcome::Skipped) => Ok(SendOutcome::Skipped),
            Err(e) => {
                surface.notify_error(e.title(), &e.to_string());
                Err(e)
            }
        }
    }

    /// Close the connection on user request
    ///
    /// The socket is shut down, which unblocks the read loop; its single
    /// disconnect notice still arrives through [`ChatClient::pump`].
    pub fn disconnect(&mut self) {
        match self.state {
            ConnectionState::Connected => {
                if let Some(connection) = self.connection.take() {
                    info!("Disconnecting from {}", connection.peer());
                    connection.shutdown();
                }
                self.state = ConnectionState::Closed;
            }
            ConnectionState::Connecting => {
                info!("Abandoning pending connection attempt");
                self.current_id = None;
                self.state = ConnectionState::Disconnected;
            }
            ConnectionState::Disconnected | ConnectionState::Closed => {}
        }
    }

    /// Apply everything the socket threads queued, in order
    ///
    /// Returns the number of messages that affected the surface.
    pub fn pump<S: DisplaySurface + ?Sized>(&mut self, surface: &mut S) -> usize {
        let mut handled = 0;

        while let Ok(message) = self.rx.try_recv() {
            if Some(message.id()) != self.current_id {
                if let LoopMessage::Established { connection, .. } = message {
                    debug!(
                        "Dropping superseded connection to {} [{}]",
                        connection.peer(),
                        connection.id()
                    );
                    connection.shutdown();
                }
                continue;
            }

            match message {
                LoopMessage::Established { mut connection, .. } => {
                    let peer = connection.peer().to_string();
                    self.state = ConnectionState::Connected;
                    self.peer = Some(peer.clone());
                    surface.set_status(self.state, Some(&peer));
                    surface.render(self.parser.info_notice(format!("[Connected to {}]", peer)));

                    // Notice first, then identify
                    match connection.identify() {
                        Ok(_) => debug!("Identified to {} as {}", peer, connection.nickname()),
                        Err(e) => {
                            // The read loop sees the shutdown and reports the close
                            warn!("Could not identify to {}: {}", peer, e);
                            connection.shutdown();
                        }
                    }
                    self.connection = Some(connection);
                }
                LoopMessage::ConnectFailed { error, .. } => {
                    warn!("{}", error);
                    self.current_id = None;
                    self.state = ConnectionState::Disconnected;
                    surface.set_status(self.state, None);
                    surface.notify_error(error.title(), &error.to_string());
                }
                LoopMessage::Line { runs, .. } => {
                    surface.render(runs);
                }
                LoopMessage::Closed { .. } => {
                    self.current_id = None;
                    self.connection = None;
                    self.state = ConnectionState::Closed;
                    surface.set_status(self.state, self.peer.as_deref());
                    surface.render(self.parser.error_notice(DISCONNECTED_NOTICE));
                }
            }
            handled += 1;
        }

        handled
    }

    fn close_current(&mut self) {
        if let Some(connection) = self.connection.take() {
            info!("Replacing connection to {}", connection.peer());
            connection.shutdown();
        }
        self.current_id = None;
    }
}

impl Drop for ChatClient {
    fn drop(&mut self) {
        self.close_current();
    }
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("state", &self.state)
            .field("current_id", &self.current_id)
            .field("peer", &self.peer)
            .field("connect_timeout", &self.connect_timeout)
            .finish_non_exhaustive()
    }
}

/// Worker thread body: connect, hand the write half over, then become the reader
fn run_connection(
    id: Uuid,
    request: ConnectRequest,
    timeout: Option<Duration>,
    parser: ColorRunParser,
    tx: UnboundedSender<LoopMessage>,
    repaint: Option<RepaintHook>,
) {
    let wake = || {
        if let Some(hook) = &repaint {
            hook();
        }
    };

    let established = Connection::open(id, &request, timeout).and_then(|connection| {
        let reader = connection.try_clone_reader()?;
        Ok((connection, reader))
    });

    let (connection, reader) = match established {
        Ok(pair) => pair,
        Err(error) => {
            let _ = tx.send(LoopMessage::ConnectFailed { id, error });
            wake();
            return;
        }
    };

    if tx.send(LoopMessage::Established { id, connection }).is_err() {
        debug!("Client dropped before connection {} was established", id);
        return;
    }
    wake();

    reader::read_lines(id, BufReader::new(reader), &parser, &tx, repaint.as_ref());
}
