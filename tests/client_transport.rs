//! Transport tests over an in-memory duplex stream.

#![cfg(feature = "tokio")]

use std::sync::Arc;
use std::time::Duration;

use ribbirc::{Client, ConnectionState, LogKind, Session, SessionConfig};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

fn session() -> Arc<Session> {
    Arc::new(Session::new(SessionConfig::new("irc.example.net", 6667, "ferris")))
}

#[tokio::test]
async fn test_registration_ping_and_commands() {
    let (client_io, server_io) = tokio::io::duplex(4096);
    let session = session();
    let client = Client::spawn(Arc::clone(&session), client_io);

    let (read, mut write) = tokio::io::split(server_io);
    let mut lines = BufReader::new(read).lines();
    assert_eq!(lines.next_line().await.unwrap().unwrap(), "NICK ferris");
    assert_eq!(lines.next_line().await.unwrap().unwrap(), "USER ferris 0 * ferris");
    assert_eq!(session.state(), ConnectionState::Registering);

    write
        .write_all(b":irc.example.net 001 ferris :Welcome to the network\r\nPING :token\r\n")
        .await
        .unwrap();
    assert_eq!(lines.next_line().await.unwrap().unwrap(), "PONG token");
    assert_eq!(session.state(), ConnectionState::Connected);

    assert!(client.execute("/join #rust").unwrap());
    assert!(!client.execute("/join").unwrap());
    assert_eq!(lines.next_line().await.unwrap().unwrap(), "JOIN #rust");

    client.say("#rust", "hello there").unwrap();
    assert_eq!(
        lines.next_line().await.unwrap().unwrap(),
        "PRIVMSG #rust :hello there"
    );

    let errors = session
        .log()
        .all()
        .into_iter()
        .filter(|e| e.kind == LogKind::Error)
        .count();
    assert_eq!(errors, 1);

    client.shutdown().await;
}

#[tokio::test]
async fn test_dispatch_in_arrival_order() {
    let (client_io, server_io) = tokio::io::duplex(4096);
    let session = session();
    let client = Client::spawn(Arc::clone(&session), client_io);
    let redraw = client.redraw();

    let (_read, mut write) = tokio::io::split(server_io);
    write
        .write_all(
            b":ferris!f@h JOIN #rust\r\n\
              :alice!a@h JOIN #rust\r\n\
              :alice!a@h PRIVMSG #rust :one\r\n\
              :alice!a@h PRIVMSG #rust :two\r\n",
        )
        .await
        .unwrap();

    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Some(channel) = session.get_channel("#rust") {
                if channel.log().len() == 4 {
                    break;
                }
            }
            redraw.notified().await;
        }
    })
    .await
    .expect("messages dispatched");

    let log = session.get_channel("#rust").unwrap().log().all();
    let texts: Vec<&str> = log.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, ["JOINED", "JOINED", "one", "two"]);

    client.shutdown().await;
}

#[tokio::test]
async fn test_eof_marks_session_terminated() {
    let (client_io, server_io) = tokio::io::duplex(4096);
    let session = session();
    let client = Client::spawn(Arc::clone(&session), client_io);
    let redraw = client.redraw();

    drop(server_io);

    tokio::time::timeout(Duration::from_secs(5), async {
        while !matches!(session.state(), ConnectionState::Terminated { .. }) {
            redraw.notified().await;
        }
    })
    .await
    .expect("disconnect noticed");

    let last = session.log().get_n_logs(1, 0).remove(0);
    assert_eq!(last.kind, LogKind::Error);
    assert!(last.text.starts_with("Disconnected: "));

    client.shutdown().await;
}

#[tokio::test]
async fn test_connect_dials_configured_address() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let client = Client::connect(SessionConfig::new("127.0.0.1", port, "ferris"))
        .await
        .unwrap();
    let (server_io, _) = listener.accept().await.unwrap();
    let mut lines = BufReader::new(server_io).lines();
    assert_eq!(lines.next_line().await.unwrap().unwrap(), "NICK ferris");

    let address = format!("127.0.0.1:{}", port);
    let texts: Vec<String> = client
        .session()
        .log()
        .all()
        .into_iter()
        .map(|e| e.text)
        .collect();
    assert_eq!(
        &texts[..2],
        [format!("Dialing {}...", address), format!("Connected to {}", address)]
    );

    client.shutdown().await;
}
