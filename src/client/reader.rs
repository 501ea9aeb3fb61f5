//! Background read loop
//!
//! Runs on the connection's worker thread, turning each received line into
//! colored runs and handing them to the UI thread over the client channel.

use std::io::{BufRead, ErrorKind, Read};
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use super::{LoopMessage, RepaintHook};
use crate::ansi::ColorRunParser;

/// Longest line handed to the parser; longer server lines arrive in pieces
pub const MAX_LINE_BYTES: usize = 8 * 1024;

/// Why the read loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadExit {
    /// The server closed the connection
    EndOfStream,
    /// A read failed; the connection is unusable
    Failed(ErrorKind),
    /// The client went away, nobody is listening anymore
    ReceiverDropped,
}

/// Read lines until the stream ends or fails
///
/// Exactly one [`LoopMessage::Closed`] is sent for `id` once the loop ends,
/// after every line that was read before it.
pub(crate) fn read_lines<R: BufRead>(
    id: Uuid,
    mut reader: R,
    parser: &ColorRunParser,
    tx: &UnboundedSender<LoopMessage>,
    repaint: Option<&RepaintHook>,
) -> ReadExit {
    let mut buf = Vec::with_capacity(1024);
    let mut line_count: u64 = 0;

    let exit = loop {
        // `buf` may already hold the start of a character split off the last chunk
        let limit = (MAX_LINE_BYTES - buf.len()) as u64;
        match (&mut reader).take(limit).read_until(b'\n', &mut buf) {
            Ok(0) => {
                debug!("Read EOF on connection {}", id);
                if !buf.is_empty() && !deliver(id, &buf, parser, tx, repaint) {
                    break ReadExit::ReceiverDropped;
                }
                break ReadExit::EndOfStream;
            }
            Ok(_) => {
                let carry = if buf.len() >= MAX_LINE_BYTES && buf.last() != Some(&b'\n') {
                    debug!("Line from connection {} exceeds {} bytes, splitting", id, MAX_LINE_BYTES);
                    split_partial_char(&mut buf)
                } else {
                    Vec::new()
                };

                line_count += 1;
                if !deliver(id, &buf, parser, tx, repaint) {
                    break ReadExit::ReceiverDropped;
                }
                buf.clear();
                buf.extend_from_slice(&carry);
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => {
                debug!("Read interrupted (EINTR), retrying...");
                continue;
            }
            Err(e) => {
                warn!("Read error on connection {} ({}): {}", id, e.kind(), e);
                break ReadExit::Failed(e.kind());
            }
        }
    };

    info!("Connection {} closed after {} line(s): {:?}", id, line_count, exit);
    if exit != ReadExit::ReceiverDropped && tx.send(LoopMessage::Closed { id }).is_ok() {
        wake(repaint);
    }
    exit
}

/// Parse one line and queue it; false once the receiver is gone
fn deliver(
    id: Uuid,
    raw: &[u8],
    parser: &ColorRunParser,
    tx: &UnboundedSender<LoopMessage>,
    repaint: Option<&RepaintHook>,
) -> bool {
    let line = decode_line(raw);
    trace!("recv [{}]: {}", id, crate::ansi::strip_escapes(&line));

    let runs = parser.parse(&line);
    if tx.send(LoopMessage::Line { id, runs }).is_err() {
        debug!("Read loop: receiver dropped, stopping connection {}", id);
        return false;
    }
    wake(repaint);
    true
}

/// Detach a UTF-8 sequence cut short at the end of `buf`
fn split_partial_char(buf: &mut Vec<u8>) -> Vec<u8> {
    let tail_start = buf.len().saturating_sub(3);
    for i in (tail_start..buf.len()).rev() {
        let byte = buf[i];
        if byte & 0xC0 == 0x80 {
            continue;
        }
        let width = byte.leading_ones() as usize;
        if width >= 2 && buf.len() - i < width {
            return buf.split_off(i);
        }
        break;
    }
    Vec::new()
}

/// Strip the line terminator (`\n` or `\r\n`) and decode as UTF-8
///
/// Invalid byte sequences are replaced rather than ending the session.
fn decode_line(buf: &[u8]) -> String {
    let mut end = buf.len();
    if end > 0 && buf[end - 1] == b'\n' {
        end -= 1;
    }
    if end > 0 && buf[end - 1] == b'\r' {
        end -= 1;
    }
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

fn wake(repaint: Option<&RepaintHook>) {
    if let Some(hook) = repaint {
        hook();
    }
}
