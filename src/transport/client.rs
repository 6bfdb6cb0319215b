//! Connection driver.

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;
use tokio_util::codec::Framed;
use tracing::{debug, info, trace, warn};

use super::LineCodec;
use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::scrollback::LogKind;
use crate::session::{Session, SYSTEM_SOURCE};
use crate::Message;

/// A running connection.
///
/// One task reads lines and feeds them to [`Session::dispatch`] in order;
/// another drains the outgoing queue to the socket. Every dispatched line
/// and the end of the connection wake the [`redraw`](Client::redraw)
/// signal.
#[derive(Debug)]
pub struct Client {
    session: Arc<Session>,
    outgoing: mpsc::UnboundedSender<Message>,
    redraw: Arc<Notify>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl Client {
    /// Drive `session` over an established stream.
    ///
    /// Registration (NICK and USER) is queued before anything is read.
    pub fn spawn<S>(session: Arc<Session>, stream: S) -> Client
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        let (sink, lines) = Framed::new(stream, LineCodec::new()).split();
        let (outgoing, queue) = mpsc::unbounded_channel();
        let redraw = Arc::new(Notify::new());

        for message in session.registration() {
            // The receiver is alive until the writer task below ends.
            let _ = outgoing.send(message);
        }

        let reader = tokio::spawn(read_loop(
            Arc::clone(&session),
            lines,
            outgoing.clone(),
            Arc::clone(&redraw),
        ));
        let writer = tokio::spawn(write_loop(
            Arc::clone(&session),
            sink,
            queue,
            Arc::clone(&redraw),
        ));

        Client {
            session,
            outgoing,
            redraw,
            reader,
            writer,
        }
    }

    /// Dial the configured server over plain TCP.
    pub async fn connect(config: SessionConfig) -> Result<Client> {
        let address = config.address();
        let session = Arc::new(Session::new(config));
        let stream = dial(&session, &address).await?;
        Ok(Client::spawn(session, stream))
    }

    /// Dial the configured server and wrap the connection in TLS.
    #[cfg(feature = "tls")]
    pub async fn connect_tls(
        config: SessionConfig,
        connector: tokio_rustls::TlsConnector,
    ) -> Result<Client> {
        use tokio_rustls::rustls::pki_types::ServerName;

        let server_name = ServerName::try_from(config.host.clone())
            .map_err(|_| Error::InvalidServerName(config.host.clone()))?;
        let address = config.address();
        let session = Arc::new(Session::new(config));
        let stream = dial(&session, &address).await?;
        let stream = connector.connect(server_name, stream).await?;
        debug!(host = session.host(), "tls handshake complete");
        Ok(Client::spawn(session, stream))
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Coalescing signal fired after state changes. Re-read the session
    /// when woken; missed wake-ups are merged.
    pub fn redraw(&self) -> Arc<Notify> {
        Arc::clone(&self.redraw)
    }

    /// Queue a message for the server.
    pub fn send(&self, message: Message) -> Result<()> {
        self.outgoing
            .send(message)
            .map_err(|_| Error::Disconnected)
    }

    /// Run a slash-command line. Returns `false` when the command was
    /// rejected; the reason is in the session log.
    pub fn execute(&self, input: &str) -> Result<bool> {
        match self.session.handle_command(input) {
            Some(message) => self.send(message).map(|()| true),
            None => Ok(false),
        }
    }

    /// Send plain text to a channel or nick, split to fit the line limit.
    pub fn say(&self, target: &str, text: &str) -> Result<()> {
        for message in self.session.compose_privmsg(target, text) {
            self.send(message)?;
        }
        Ok(())
    }

    /// True once the reader has stopped, i.e. the connection is over.
    pub fn is_finished(&self) -> bool {
        self.reader.is_finished()
    }

    /// Stop reading, flush what is queued and close the stream.
    pub async fn shutdown(self) {
        let Client {
            outgoing,
            reader,
            writer,
            ..
        } = self;
        drop(outgoing);
        reader.abort();
        let _ = reader.await;
        let _ = writer.await;
    }
}

async fn dial(session: &Session, address: &str) -> Result<TcpStream> {
    session
        .log()
        .append(SYSTEM_SOURCE, LogKind::Status, format!("Dialing {}...", address));

    let stream = TcpStream::connect(address).await?;
    if let Err(e) = enable_keepalive(&stream) {
        warn!("failed to enable TCP keepalive: {}", e);
    }

    info!(%address, "connected");
    session
        .log()
        .append(SYSTEM_SOURCE, LogKind::Status, format!("Connected to {}", address));
    Ok(stream)
}

fn enable_keepalive(stream: &TcpStream) -> std::io::Result<()> {
    use socket2::{SockRef, TcpKeepalive};

    let sock = SockRef::from(stream);
    let keepalive = TcpKeepalive::new()
        .with_time(Duration::from_secs(120))
        .with_interval(Duration::from_secs(30));
    sock.set_tcp_keepalive(&keepalive)
}

async fn read_loop<S>(
    session: Arc<Session>,
    mut lines: SplitStream<Framed<S, LineCodec>>,
    outgoing: mpsc::UnboundedSender<Message>,
    redraw: Arc<Notify>,
) where
    S: AsyncRead + AsyncWrite,
{
    let reason = loop {
        match lines.next().await {
            Some(Ok(message)) => {
                for reply in session.dispatch(&message) {
                    if outgoing.send(reply).is_err() {
                        debug!("writer gone, dropping reply");
                    }
                }
                redraw.notify_one();
            }
            Some(Err(err)) => {
                warn!(error = %err, "read failed");
                break err.to_string();
            }
            None => break "connection closed by server".to_string(),
        }
    };
    session.disconnected(&reason);
    redraw.notify_one();
}

async fn write_loop<S>(
    session: Arc<Session>,
    mut sink: SplitSink<Framed<S, LineCodec>, Message>,
    mut queue: mpsc::UnboundedReceiver<Message>,
    redraw: Arc<Notify>,
) where
    S: AsyncRead + AsyncWrite,
{
    while let Some(message) = queue.recv().await {
        trace!(line = %message, "send");
        if let Err(err) = sink.send(message).await {
            warn!(error = %err, "write failed");
            session.disconnected(&err.to_string());
            redraw.notify_one();
            return;
        }
    }
    if let Err(err) = sink.close().await {
        debug!(error = %err, "close failed");
    }
}
