//! TransportActor - owns the socket and drives the connection state machine
//!
//! Caller commands, connect completion, inbound reads and the reconnect
//! deadline are all handled in one `select!` loop, so they never run
//! concurrently with each other.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, info, trace, warn};

use super::commands::TransportCommand;
use super::ConnectionState;
use crate::config::StudioConfig;
use crate::error::StudioError;
use crate::mirror::StudioMirror;
use crate::notifier::StudioEvent;
use crate::protocol::LineFramer;

type ConnectFuture = Pin<Box<dyn Future<Output = io::Result<TcpStream>> + Send>>;

/// A live connection, split so reads and writes borrow independently
struct Link {
    reader: FramedRead<OwnedReadHalf, LineFramer>,
    writer: FramedWrite<OwnedWriteHalf, LineFramer>,
}

pub(super) struct TransportActor {
    config: StudioConfig,
    mirror: Arc<StudioMirror>,
    command_rx: mpsc::UnboundedReceiver<TransportCommand>,

    /// At most one of `link` and `connecting` is set
    link: Option<Link>,
    connecting: Option<ConnectFuture>,
    reconnect_at: Option<Instant>,
}

impl TransportActor {
    /// Spawn the actor's run loop and return its command sender
    pub(super) fn spawn(
        config: StudioConfig,
        mirror: Arc<StudioMirror>,
    ) -> mpsc::UnboundedSender<TransportCommand> {
        let (cmd_tx, command_rx) = mpsc::unbounded_channel();

        let actor = TransportActor {
            config,
            mirror,
            command_rx,
            link: None,
            connecting: None,
            reconnect_at: None,
        };
        tokio::spawn(actor.run());

        cmd_tx
    }

    async fn run(mut self) {
        debug!("studio: transport task started");

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(TransportCommand::Connect) => self.connect(),
                    Some(TransportCommand::Write(line)) => self.write(line).await,
                    Some(TransportCommand::Shutdown) | None => break,
                },
                result = connect_result(&mut self.connecting) => {
                    self.connecting = None;
                    match result {
                        Ok(stream) => self.on_connected(stream),
                        Err(e) => self.on_error(e),
                    }
                },
                _ = deadline(self.reconnect_at) => {
                    self.reconnect_at = None;
                    debug!("studio: reconnecting");
                    self.connect();
                },
                read = next_line(&mut self.link) => match read {
                    Some(Ok(line)) => self.on_line(&line),
                    Some(Err(e)) => self.on_error(e),
                    None => self.on_closed(),
                },
            }
        }

        self.teardown();
        self.reconnect_at = None;
        self.mirror.set_connection_state(ConnectionState::Disconnected);
        info!("studio: transport stopped");
    }

    fn connect(&mut self) {
        if self.link.is_some() || self.connecting.is_some() {
            trace!("studio: connect ignored, connection already live or pending");
            return;
        }
        let Some(host) = self.config.host.clone() else {
            warn!("studio: no host configured, not connecting");
            return;
        };

        self.teardown();
        self.reconnect_at = None;
        self.mirror.set_connection_state(ConnectionState::Connecting);

        let addr = format!("{}:{}", host, self.config.port);
        info!("studio: connecting to {}", addr);
        self.connecting = Some(Box::pin(async move { TcpStream::connect(addr).await }));
    }

    fn on_connected(&mut self, stream: TcpStream) {
        if let Err(e) = stream.set_nodelay(true) {
            debug!("studio: could not disable Nagle: {}", e);
        }
        let (reader, writer) = stream.into_split();
        self.link = Some(Link {
            reader: FramedRead::new(reader, LineFramer::new()),
            writer: FramedWrite::new(writer, LineFramer::new()),
        });

        self.mirror.set_connection_state(ConnectionState::Connected);
        info!("studio: connected");
        self.mirror.emit(StudioEvent::Connect);
    }

    fn on_line(&mut self, line: &str) {
        trace!(line = %line, "studio: <-");
        self.mirror.decode(line);
    }

    /// Orderly close by the peer; any unterminated tail was already yielded
    fn on_closed(&mut self) {
        self.teardown();
        self.mirror.set_connection_state(ConnectionState::Disconnected);
        info!("studio: connection closed by peer");
        self.mirror.emit(StudioEvent::Close { had_error: false });
        self.schedule_reconnect();
    }

    /// Socket failure during connect, read or write
    fn on_error(&mut self, error: io::Error) {
        self.teardown();
        self.mirror.set_connection_state(ConnectionState::Disconnected);
        warn!("studio: socket error: {}", error);
        self.mirror
            .emit(StudioEvent::Error(Arc::new(StudioError::Transport(error))));
        self.mirror.emit(StudioEvent::Close { had_error: true });
        self.schedule_reconnect();
    }

    async fn write(&mut self, line: String) {
        let Some(link) = self.link.as_mut() else {
            trace!(line = %line, "studio: not connected, dropping write");
            return;
        };

        debug!(line = %line, "studio: ->");
        if let Err(e) = link.writer.send(line).await {
            self.on_error(e);
        }
    }

    fn schedule_reconnect(&mut self) {
        let delay = self.config.reconnect_delay();
        debug!("studio: reconnect in {:?}", delay);
        self.reconnect_at = Some(Instant::now() + delay);
    }

    /// Drop the socket (with any partial line) and any pending connect
    fn teardown(&mut self) {
        self.link = None;
        self.connecting = None;
    }
}

async fn connect_result(connecting: &mut Option<ConnectFuture>) -> io::Result<TcpStream> {
    match connecting {
        Some(fut) => fut.await,
        None => std::future::pending().await,
    }
}

async fn deadline(at: Option<Instant>) {
    match at {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

async fn next_line(link: &mut Option<Link>) -> Option<io::Result<String>> {
    match link {
        Some(link) => link.reader.next().await,
        None => std::future::pending().await,
    }
}
