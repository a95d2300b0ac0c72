//! The session actor.
//!
//! One task owns the [`Session`] and the live [`ConnectionHandle`]. User
//! commands and transport/claim events are folded through [`reduce`] in
//! arrival order; every changed snapshot is published on a `watch` channel.

use std::sync::Arc;

use livefact_core::errors::SessionError;
use livefact_core::ids::SessionId;
use livefact_settings::LiveFactSettings;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{Instrument, debug, info, info_span};

use super::reducer::{Action, Effect, Transition, reduce};
use super::state::Session;
use super::submitter::ClaimSubmitter;
use crate::transport::{ClaimChecker, ConnectionHandle, EventSink, StreamConnector};

/// Static parameters of one session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Streaming endpoint.
    pub stream_url: String,
    /// Capacity of the command and event channels.
    pub event_buffer: usize,
}

impl SessionConfig {
    /// Session parameters taken from loaded settings.
    pub fn from_settings(settings: &LiveFactSettings) -> Self {
        Self {
            stream_url: settings.backend.stream_url.clone(),
            event_buffer: settings.session.event_buffer,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_settings(&LiveFactSettings::default())
    }
}

#[derive(Debug)]
enum Command {
    Apply(Action),
    Shutdown(oneshot::Sender<()>),
}

/// Cheap, cloneable front end to a running session.
///
/// Commands are fire-and-forget: they return once the actor has queued them.
/// Observe the effect through [`subscribe`](Self::subscribe) or
/// [`wait_for`](Self::wait_for).
#[derive(Clone, Debug)]
pub struct SessionHandle {
    id: SessionId,
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<Session>,
}

impl SessionHandle {
    /// Session identifier (also the `session_id` log field).
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Begin listening, connecting if necessary.
    pub async fn start(&self) -> Result<(), SessionError> {
        self.apply(Action::Start).await
    }

    /// Stop listening, clear the view model and release the connection.
    pub async fn stop(&self) -> Result<(), SessionError> {
        self.apply(Action::Stop).await
    }

    /// Release the connection, keeping the view model.
    pub async fn close(&self) -> Result<(), SessionError> {
        self.apply(Action::Close).await
    }

    /// Check `claim` manually. Blank claims are ignored.
    pub async fn submit_manual(&self, claim: impl Into<String>) -> Result<(), SessionError> {
        self.apply(Action::SubmitManual { claim: claim.into() }).await
    }

    async fn apply(&self, action: Action) -> Result<(), SessionError> {
        self.commands
            .send(Command::Apply(action))
            .await
            .map_err(|_| SessionError::Closed)
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.clone()
    }

    /// Wait until a published snapshot satisfies `predicate`.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&Session) -> bool,
    ) -> Result<Session, SessionError> {
        let mut rx = self.state.clone();
        let session = rx.wait_for(predicate).await.map_err(|_| SessionError::Closed)?;
        Ok(session.clone())
    }

    /// Stop the actor, releasing any connection. Other handles start failing
    /// with [`SessionError::Closed`].
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Command::Shutdown(tx))
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)
    }
}

/// Spawn a session actor on the current runtime.
pub fn spawn_session(
    config: SessionConfig,
    connector: Arc<dyn StreamConnector>,
    checker: Arc<dyn ClaimChecker>,
) -> SessionHandle {
    let id = SessionId::new();
    let buffer = config.event_buffer.max(1);
    let (commands_tx, commands_rx) = mpsc::channel(buffer);
    let (events_tx, events_rx) = mpsc::channel(buffer);
    let (state_tx, state_rx) = watch::channel(Session::new());

    let actor = SessionActor {
        session: Session::new(),
        stream_url: config.stream_url,
        connector,
        submitter: ClaimSubmitter::new(checker, events_tx.clone()),
        events_tx,
        connection: None,
        state_tx,
    };
    let span = info_span!("session", session_id = %id);
    let _ = tokio::spawn(actor.run(commands_rx, events_rx).instrument(span));

    SessionHandle {
        id,
        commands: commands_tx,
        state: state_rx,
    }
}

struct SessionActor {
    session: Session,
    stream_url: String,
    connector: Arc<dyn StreamConnector>,
    submitter: ClaimSubmitter,
    events_tx: mpsc::Sender<Action>,
    connection: Option<ConnectionHandle>,
    state_tx: watch::Sender<Session>,
}

impl SessionActor {
    async fn run(mut self, mut commands: mpsc::Receiver<Command>, mut events: mpsc::Receiver<Action>) {
        info!(stream_url = %self.stream_url, "session started");
        let ack = loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Apply(action)) => self.dispatch(action),
                    Some(Command::Shutdown(ack)) => break Some(ack),
                    None => break None,
                },
                // Never `None`: the actor holds a sender.
                Some(action) = events.recv() => self.dispatch(action),
            }
        };
        // Closing both receivers unblocks connection tasks parked on a full channel.
        drop(commands);
        drop(events);

        if let Some(connection) = self.connection.take() {
            connection.shutdown().await;
        }
        info!(revision = self.session.revision(), "session stopped");
        if let Some(ack) = ack {
            let _ = ack.send(());
        }
    }

    fn dispatch(&mut self, action: Action) {
        let Transition { session, effects } = reduce(&self.session, action);
        let changed = session.revision() != self.session.revision();
        self.session = session;

        for effect in effects {
            self.execute(effect);
        }
        // The reducer forgets a connection once it reports closed.
        if self
            .connection
            .as_ref()
            .is_some_and(|c| Some(c.epoch()) != self.session.live_epoch())
        {
            self.release();
        }

        if changed {
            debug!(
                revision = self.session.revision(),
                phase = %self.session.phase(),
                "session updated"
            );
            let _ = self.state_tx.send_replace(self.session.clone());
        }
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::OpenTransport { epoch } => {
                self.release();
                let sink = EventSink::new(epoch, self.events_tx.clone());
                self.connection = Some(self.connector.connect(&self.stream_url, sink));
            }
            Effect::CloseTransport => self.release(),
            Effect::SubmitClaim { ticket, claim } => self.submitter.submit(ticket, claim),
        }
    }

    fn release(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            connection.close();
        }
    }
}
