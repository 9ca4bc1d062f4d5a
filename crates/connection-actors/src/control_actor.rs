use crate::bridge::LinkDriver;
use actor_protocol::{
    ActorError, ConnectionStatus, ConnectionTrigger, Intent, LinkEvent, PlayStatus,
    StateSnapshot, UiCommand,
};
use actor_runtime::{actor_debug, actor_error, actor_info, actor_warn, Actor, SnapshotWriter};
use core_types::{CommandSequence, ConnectionParameters, Transport, TransportError};
use framing::{decode_ack, encode_command, frame_id, Ack, CobsFramer, FrameOptions, Framer};
use std::ops::ControlFlow;

/// ControlActor runs the Worker Loop
///
/// Responsibilities:
/// - Own the active snapshot; every mutation marks it for the next recache
/// - Apply connection transitions from the table in
///   `actor-protocol/src/state.rs`, and only from there
/// - Drive playback: one command frame in flight, advanced by device acks
/// - Own the transport through [`LinkDriver`]; every call is fire-and-forget
///
/// Key coordination patterns:
/// - **Play while closed**: Closed → Connecting, playback starts on onConnect
/// - **Ack-driven playback**: ACK for the in-flight id → next frame
/// - **Link loss**: any error stops playback and leaves the link Closed;
///   reconnecting is always a fresh operator request
pub struct ControlActor<T> {
    writer: SnapshotWriter<StateSnapshot>,
    link: LinkDriver<T>,
    frame_options: FrameOptions,
    framer: CobsFramer,

    // Parameters of the last connect issued
    params: Option<ConnectionParameters>,

    // Sequence waiting to be played
    sequence: Option<CommandSequence>,

    // Encoded frames of the sequence being played, indexed by step
    frames: Vec<Vec<u8>>,

    // Play was requested before the link came up
    play_on_connect: bool,
}

impl<T: Transport> ControlActor<T> {
    pub fn new(
        writer: SnapshotWriter<StateSnapshot>,
        link: LinkDriver<T>,
        frame_options: FrameOptions,
    ) -> Self {
        Self {
            writer,
            link,
            frame_options,
            framer: CobsFramer::new(),
            params: None,
            sequence: None,
            frames: Vec::new(),
            play_on_connect: false,
        }
    }

    /// The active snapshot, as the worker sees it.
    pub fn snapshot(&self) -> &StateSnapshot {
        self.writer.active()
    }

    pub fn link(&self) -> &LinkDriver<T> {
        &self.link
    }

    fn status(&self) -> ConnectionStatus {
        self.writer.active().connection
    }

    fn set_message(&mut self, message: impl Into<String>) {
        self.writer.active_mut().set_message(message);
    }

    /// Apply `trigger` through the transition table.
    ///
    /// Returns false (and changes nothing) when the trigger is a no-op in the
    /// current state.
    fn apply(&mut self, trigger: ConnectionTrigger) -> bool {
        let old = self.status();
        let Some(new) = old.next(trigger) else {
            actor_debug!("ControlActor: {:?} ignored in {:?}", trigger, old);
            return false;
        };

        if new != old {
            actor_debug!("ControlActor: {:?} → {:?}", old, new);
            let snapshot = self.writer.active_mut();
            snapshot.connection = new;
            snapshot.set_message(new.status_text());
        }
        true
    }

    /// Stop playback, if any, naming the step that was in flight.
    fn abort_playback(&mut self, reason: &str) {
        self.play_on_connect = false;
        self.sequence = None;
        self.frames.clear();
        if !self.writer.active().is_playing() {
            return;
        }
        let step = self.writer.active().active_step;
        actor_warn!("ControlActor: playback stopped at step {}: {}", step + 1, reason);
        self.writer.update(|s| {
            s.stop_playback();
            s.set_message(format!("Stopped at step {}: {}", step + 1, reason));
        });
    }

    /// The transport failed to start an operation; same outcome as onError.
    fn transport_failed(&mut self, err: TransportError) {
        actor_error!("ControlActor: transport call failed: {}", err);
        self.framer.reset();
        if self.apply(ConnectionTrigger::LinkError) {
            self.set_message(format!("Disconnected: {}", err));
        }
        self.abort_playback(&err.to_string());
    }

    fn connect(&mut self, params: ConnectionParameters) {
        if !self.apply(ConnectionTrigger::RequestConnect) {
            return;
        }
        self.params = Some(params);
        self.framer.reset();
        if let Err(e) = self.link.connect(&params) {
            self.transport_failed(e);
        }
    }

    fn disconnect(&mut self) {
        if !self.apply(ConnectionTrigger::RequestDisconnect) {
            return;
        }
        self.abort_playback("disconnect requested");
        if let Err(e) = self.link.disconnect() {
            self.transport_failed(e);
        }
    }

    fn start_playback(&mut self) -> Result<(), ActorError> {
        self.play_on_connect = false;
        let Some(sequence) = self.sequence.take() else {
            return Ok(());
        };
        if sequence.is_empty() {
            self.set_message("Nothing to play");
            return Ok(());
        }

        // All frames are encoded before the first send
        let frames = match sequence
            .iter()
            .enumerate()
            .map(|(step, command)| encode_command(step, command, self.frame_options))
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(frames) => frames,
            Err(e) => {
                self.set_message(format!("Not played: {}", e));
                return Err(ActorError::Frame(e.to_string()));
            }
        };

        let total = frames.len();
        actor_info!("ControlActor: playing {} commands", total);
        self.frames = frames;
        self.framer.reset();
        self.writer.update(|s| {
            s.play = PlayStatus::Playing;
            s.active_step = 0;
            s.set_message(format!("Playing step 1/{}", total));
        });
        self.send_step(0)
    }

    fn send_step(&mut self, step: usize) -> Result<(), ActorError> {
        let frame = self
            .frames
            .get(step)
            .cloned()
            .ok_or_else(|| ActorError::Other(format!("No command at step {}", step)))?;

        actor_debug!(bytes = frame.len(), "ControlActor: sending step {}", step);
        if let Err(e) = self.link.send(frame) {
            self.transport_failed(e);
        }
        Ok(())
    }

    fn handle_ack(&mut self, ack: Ack) -> Result<(), ActorError> {
        let step = self.writer.active().active_step;
        let expected = frame_id(step, self.frame_options.id_parity);
        if ack.id != expected {
            actor_debug!(
                "ControlActor: stale ack {:#04x} (expecting {:#04x})",
                ack.id,
                expected
            );
            return Ok(());
        }
        if !ack.ok {
            self.ack_failure(&format!("device rejected step {}", step + 1));
            return Ok(());
        }

        let total = self.frames.len();
        let next = step + 1;
        if next >= total {
            actor_info!("ControlActor: playback finished ({} commands)", total);
            self.frames.clear();
            self.writer.update(|s| {
                s.stop_playback();
                s.set_message("Finished");
            });
            return Ok(());
        }

        self.writer.update(|s| {
            s.active_step = next;
            s.set_message(format!("Playing step {}/{}", next + 1, total));
        });
        self.send_step(next)
    }

    /// The device refused a command or answered with garbage.
    fn ack_failure(&mut self, reason: &str) {
        actor_warn!("ControlActor: ack failure: {}", reason);
        self.framer.reset();
        if self.apply(ConnectionTrigger::AckFailure) {
            self.abort_playback(reason);
            if let Err(e) = self.link.disconnect() {
                actor_warn!("ControlActor: disconnect after ack failure failed: {}", e);
            }
        }
    }

    fn handle_received(&mut self, data: Vec<u8>) -> Result<(), ActorError> {
        actor_debug!(bytes = data.len(), "ControlActor: received");
        if !self.apply(ConnectionTrigger::DataReceived) {
            return Ok(());
        }

        for frame in self.framer.push(&data) {
            if !self.writer.active().is_playing() {
                actor_debug!("ControlActor: frame outside playback ignored");
                continue;
            }
            match frame.and_then(|payload| decode_ack(&payload)) {
                Ok(ack) => self.handle_ack(ack)?,
                Err(e) => self.ack_failure(&format!("bad reply: {}", e)),
            }
        }
        Ok(())
    }

    fn handle_ui(&mut self, cmd: UiCommand) -> Result<ControlFlow<()>, ActorError> {
        match cmd {
            UiCommand::Connect { params } => self.connect(params),
            UiCommand::Disconnect => self.disconnect(),
            UiCommand::Send { data } => {
                if !self.status().is_link_up() {
                    return Err(ActorError::UnexpectedMessage {
                        state: format!("{:?}", self.status()),
                        message: "Send".into(),
                    });
                }
                if let Err(e) = self.link.send(data) {
                    self.transport_failed(e);
                }
            }
            UiCommand::Play { sequence, params } => {
                if self.writer.active().is_playing() {
                    actor_debug!("ControlActor: already playing, Play ignored");
                    self.set_message("Already playing");
                    return Ok(ControlFlow::Continue(()));
                }
                self.sequence = Some(sequence);
                match self.status() {
                    ConnectionStatus::Connected | ConnectionStatus::Received => {
                        self.start_playback()?
                    }
                    ConnectionStatus::Connecting => self.play_on_connect = true,
                    ConnectionStatus::Closed => {
                        self.play_on_connect = true;
                        self.connect(params);
                    }
                    ConnectionStatus::Closing => {
                        self.sequence = None;
                        return Err(ActorError::UnexpectedMessage {
                            state: "Closing".into(),
                            message: "Play".into(),
                        });
                    }
                }
            }
            UiCommand::Stop => {
                self.play_on_connect = false;
                if self.writer.active().is_playing() {
                    actor_info!("ControlActor: playback stopped by operator");
                    self.frames.clear();
                    self.writer.update(|s| {
                        s.stop_playback();
                        s.set_message("Stopped");
                    });
                }
            }
            UiCommand::Shutdown => {
                actor_info!("ControlActor: shutting down");
                self.abort_playback("shutting down");
                if self.status() != ConnectionStatus::Closed {
                    if let Err(e) = self.link.disconnect() {
                        actor_warn!("ControlActor: disconnect on shutdown failed: {}", e);
                    }
                }
                self.writer.update(|s| {
                    s.connection = ConnectionStatus::Closed;
                    s.set_message("Shut down");
                });
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn handle_link(&mut self, event: LinkEvent) -> Result<(), ActorError> {
        match event {
            LinkEvent::Accepted { address, channel } => {
                actor_info!("ControlActor: accepted {} channel {}", address, channel);
            }
            LinkEvent::Connected { address, channel } => {
                actor_info!("ControlActor: connected to {} channel {}", address, channel);
                if self.apply(ConnectionTrigger::LinkConnected) && self.play_on_connect {
                    self.start_playback()?;
                }
            }
            LinkEvent::Sent { bytes } => {
                actor_debug!(bytes, "ControlActor: sent");
            }
            LinkEvent::Received { data } => self.handle_received(data)?,
            LinkEvent::Timer { delta } => {
                actor_debug!("ControlActor: timer {:?}", delta);
            }
            LinkEvent::Error { code, message } => {
                actor_warn!("ControlActor: link error {}: {}", code, message);
                self.framer.reset();
                if self.apply(ConnectionTrigger::LinkError) {
                    self.set_message(format!("Disconnected: {} (error {})", message, code));
                    self.abort_playback(&message);
                }
            }
            LinkEvent::Closed => {
                if self.apply(ConnectionTrigger::CloseAck) {
                    self.framer.reset();
                    self.play_on_connect = false;
                }
            }
        }
        Ok(())
    }
}

impl<T: Transport + 'static> Actor for ControlActor<T> {
    type Message = Intent;

    fn name(&self) -> &'static str {
        "ControlActor"
    }

    fn handle(&mut self, msg: Intent) -> Result<ControlFlow<()>, ActorError> {
        match msg {
            Intent::Ui(cmd) => self.handle_ui(cmd),
            Intent::Link(event) => {
                self.handle_link(event)?;
                Ok(ControlFlow::Continue(()))
            }
        }
    }

    fn after_drain(&mut self) {
        self.writer.recache();
    }

    fn on_error(&mut self, err: ActorError) {
        actor_error!("ControlActor error: {}", err);
        self.set_message(format!("Error: {}", err));
    }

    fn shutdown(&mut self) {
        self.writer.recache();
    }
}
