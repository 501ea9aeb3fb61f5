//! Integration tests for the chat connection loop
//!
//! Each test runs the real client against a scripted peer on a loopback
//! socket and observes it through a recording display surface.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use std::thread;
use std::time::Duration;

use subnet_client::ansi::ColorTable;
use subnet_client::client::DISCONNECTED_NOTICE;
use subnet_client::{ChatClient, Color, ColorRunParser, ConnectRequest, ConnectionState, SendOutcome};

use test_utils::fake_peer::{read_line, read_to_end, write_raw};
use test_utils::{pump_for, pump_until, FakePeer, RecordingSurface};

fn client() -> ChatClient {
    ChatClient::new(ColorRunParser::default()).with_connect_timeout(Some(Duration::from_secs(2)))
}

fn request(port: u16, nickname: &str) -> ConnectRequest {
    ConnectRequest::new("127.0.0.1", port, nickname)
}

#[test]
fn test_lines_render_in_order_then_one_disconnect_notice() {
    let peer = FakePeer::spawn(|mut stream| {
        let nick = read_line(&stream);
        for (i, line) in ["L1", "L2", "L3"].iter().enumerate() {
            write_raw(&mut stream, &format!("{}\r\n", line));
            thread::sleep(Duration::from_millis(10 * i as u64));
        }
        nick
    });

    let mut client = client();
    let mut surface = RecordingSurface::new();
    client.connect(request(peer.port(), "alice"));

    pump_until(&mut client, &mut surface, |client, _| {
        client.state() == ConnectionState::Closed
    });
    assert_eq!(peer.join(), "/nick alice\n");

    // Nothing else trickles in after the close
    pump_for(&mut client, &mut surface, Duration::from_millis(50));

    let connected = format!("[Connected to 127.0.0.1:{}]", surface_port(&client));
    assert_eq!(
        surface.texts(),
        vec![
            connected,
            "L1".to_string(),
            "L2".to_string(),
            "L3".to_string(),
            DISCONNECTED_NOTICE.to_string(),
        ]
    );
    assert!(surface.errors.is_empty());
}

fn surface_port(client: &ChatClient) -> u16 {
    client
        .peer()
        .and_then(|peer| peer.rsplit(':').next())
        .and_then(|port| port.parse().ok())
        .expect("client remembers its peer")
}

#[test]
fn test_notices_use_info_and_error_colors() {
    let peer = FakePeer::spawn(|stream| {
        read_line(&stream);
    });

    let mut client = client();
    let mut surface = RecordingSurface::new();
    client.connect(request(peer.port(), "guest"));

    pump_until(&mut client, &mut surface, |client, _| {
        client.state() == ConnectionState::Closed
    });
    peer.join();

    let table = ColorTable::standard();
    let first = &surface.rendered[0];
    let last = surface.rendered.last().expect("disconnect notice");
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].color, table.info_color());
    assert_eq!(last[0].text, DISCONNECTED_NOTICE);
    assert_eq!(last[0].color, table.error_color());
}

#[test]
fn test_colored_lines_are_parsed() {
    let peer = FakePeer::spawn(|mut stream| {
        read_line(&stream);
        write_raw(&mut stream, "\x1b[31mred\x1b[0m \x1b[92mgreen\r\n");
    });

    let mut client = client();
    let mut surface = RecordingSurface::new();
    client.connect(request(peer.port(), "guest"));

    pump_until(&mut client, &mut surface, |client, _| {
        client.state() == ConnectionState::Closed
    });
    peer.join();

    let line = &surface.rendered[1];
    let table = ColorTable::standard();
    assert_eq!(line.len(), 3);
    assert_eq!(line[0].text, "red");
    assert_eq!(line[0].color, table.lookup("31").unwrap());
    // Reset leaves red in effect
    assert_eq!(line[1].text, " ");
    assert_eq!(line[1].color, table.lookup("31").unwrap());
    assert_eq!(line[2].text, "green");
    assert_eq!(line[2].color, table.lookup("92").unwrap());
}

#[test]
fn test_partial_final_line_is_delivered() {
    let peer = FakePeer::spawn(|mut stream| {
        read_line(&stream);
        write_raw(&mut stream, "complete\npartial");
    });

    let mut client = client();
    let mut surface = RecordingSurface::new();
    client.connect(request(peer.port(), "guest"));

    pump_until(&mut client, &mut surface, |client, _| {
        client.state() == ConnectionState::Closed
    });
    peer.join();

    let texts = surface.texts();
    assert_eq!(&texts[1..], &["complete", "partial", DISCONNECTED_NOTICE]);
}

#[test]
fn test_send_trims_and_skips_blank_lines() {
    let peer = FakePeer::spawn(|mut stream| read_to_end(&mut stream));

    let mut client = client();
    let mut surface = RecordingSurface::new();
    client.connect(request(peer.port(), "bob"));
    pump_until(&mut client, &mut surface, |client, _| client.is_connected());

    assert_eq!(client.send_line("").unwrap(), SendOutcome::Skipped);
    assert_eq!(client.send_line("   ").unwrap(), SendOutcome::Skipped);
    assert_eq!(client.send_line(" hi ").unwrap(), SendOutcome::Sent);

    client.disconnect();
    assert_eq!(client.state(), ConnectionState::Closed);

    assert_eq!(peer.join(), "/nick bob\nhi\n");

    pump_until(&mut client, &mut surface, |_, surface| {
        surface.count_text(DISCONNECTED_NOTICE) == 1
    });
}

#[test]
fn test_submit_input_clears_only_after_send() {
    let peer = FakePeer::spawn(|mut stream| read_to_end(&mut stream));

    let mut client = client();
    let mut surface = RecordingSurface::new();
    client.connect(request(peer.port(), "carol"));
    pump_until(&mut client, &mut surface, |client, _| client.is_connected());

    surface.input = "   ".to_string();
    assert_eq!(client.submit_input(&mut surface).unwrap(), SendOutcome::Skipped);
    assert_eq!(surface.input, "   ");

    surface.input = "hello there".to_string();
    assert_eq!(client.submit_input(&mut surface).unwrap(), SendOutcome::Sent);
    assert!(surface.input.is_empty());

    client.disconnect();
    assert_eq!(peer.join(), "/nick carol\nhello there\n");
}

#[test]
fn test_status_follows_lifecycle() {
    let peer = FakePeer::spawn(|stream| {
        read_line(&stream);
    });

    let mut client = client();
    let mut surface = RecordingSurface::new();
    client.connect(request(peer.port(), "guest"));
    assert_eq!(client.state(), ConnectionState::Connecting);

    pump_until(&mut client, &mut surface, |client, _| {
        client.state() == ConnectionState::Closed
    });
    peer.join();

    let states: Vec<ConnectionState> = surface.statuses.iter().map(|(state, _)| *state).collect();
    assert_eq!(states, vec![ConnectionState::Connected, ConnectionState::Closed]);
    assert_eq!(surface.statuses[0].1.as_deref(), client.peer());
}

#[test]
fn test_repaint_hook_is_called_from_socket_thread() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let peer = FakePeer::spawn(|mut stream| {
        read_line(&stream);
        write_raw(&mut stream, "wake up\n");
    });

    let wakes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&wakes);

    let mut client = client();
    client.set_repaint_hook(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let mut surface = RecordingSurface::new();
    client.connect(request(peer.port(), "guest"));

    pump_until(&mut client, &mut surface, |client, _| {
        client.state() == ConnectionState::Closed
    });
    peer.join();

    // Established, one line, close
    assert!(wakes.load(Ordering::SeqCst) >= 3);
    assert_eq!(surface.rendered[1], vec![subnet_client::TextRun::new("wake up", Color::WHITE)]);
}
