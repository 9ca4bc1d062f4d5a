use crate::bridge::{ConnectionBridge, LinkDriver, LinkNotifier};
use crate::{ControlActor, EngineConfig, EngineError};
use actor_protocol::{StateSnapshot, UiCommand};
use actor_runtime::{
    actor_info, actor_warn, command_queue, spawn_worker, SnapshotExchange, SnapshotReader,
};
use core_types::{ConnectionParameters, TilePoint, Transport};
use std::thread::JoinHandle;

/// The engine as seen from the render/update thread.
///
/// Every `request_*` call validates its input, queues one intent and returns;
/// none of them waits for the worker. Status comes back only through
/// [`publish`](Engine::publish) and [`snapshot`](Engine::snapshot).
pub struct Engine {
    bridge: ConnectionBridge,
    reader: SnapshotReader<StateSnapshot>,
    worker: Option<JoinHandle<()>>,
    config: EngineConfig,
    params: ConnectionParameters,
    // Serial of the last status message handed out by take_status_message
    taken_serial: u64,
}

impl Engine {
    /// Start the Worker Loop.
    ///
    /// `make_transport` receives the notifier the transport must report
    /// through and returns the transport the worker will drive.
    pub fn start<T, F>(config: EngineConfig, make_transport: F) -> Result<Self, EngineError>
    where
        T: Transport + 'static,
        F: FnOnce(LinkNotifier) -> T,
    {
        config.validate()?;
        let params = config.connection_parameters()?;

        let (intent_tx, intent_rx) = command_queue(config.queue_capacity);
        let (writer, reader) = SnapshotExchange::new(StateSnapshot::default());
        let bridge = ConnectionBridge::new(intent_tx);

        let transport = make_transport(bridge.notifier());
        let actor = ControlActor::new(writer, LinkDriver::new(transport), config.frame);
        let worker =
            spawn_worker(actor, intent_rx).map_err(|e| EngineError::Spawn(e.to_string()))?;

        actor_info!(
            "Engine started: queue {} intents, tile {}px",
            config.queue_capacity,
            config.tile_size
        );

        Ok(Self {
            bridge,
            reader,
            worker: Some(worker),
            config,
            params,
            taken_serial: 0,
        })
    }

    /// Connect to `address` on `channel`. These become the parameters later
    /// plays use when the link is closed.
    pub fn request_connect(&mut self, address: &str, channel: i32) -> Result<(), EngineError> {
        self.params = self.bridge.request_connect(address, channel)?;
        Ok(())
    }

    pub fn request_disconnect(&self) -> Result<(), EngineError> {
        self.bridge.request_disconnect()
    }

    pub fn request_send(&self, data: Vec<u8>) -> Result<(), EngineError> {
        self.bridge.request_send(data)
    }

    /// Compile `points` and queue them for playback.
    ///
    /// A path that does not compile, including one with a move too long for a
    /// single command frame, is rejected here and never queued.
    pub fn request_play(&self, points: &[TilePoint]) -> Result<(), EngineError> {
        let sequence = path_compiler::compile(points, self.config.tile_size)?;
        self.bridge.submit(UiCommand::Play {
            sequence,
            params: self.params,
        })
    }

    pub fn request_stop(&self) -> Result<(), EngineError> {
        self.bridge.submit(UiCommand::Stop)
    }

    /// Close the link, stop the worker and wait for it to exit.
    ///
    /// Requests made afterwards fail with
    /// [`QueueError::Closed`](actor_runtime::QueueError::Closed).
    pub fn shutdown(&mut self) -> Result<(), EngineError> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };

        if let Err(e) = self.bridge.submit(UiCommand::Shutdown) {
            // Full queue: skip the backlog, the worker stops after its current intent
            actor_warn!("Engine: shutdown intent not queued ({}), closing queue", e);
            self.bridge.close();
        }
        let joined = worker.join();
        self.bridge.close();
        self.reader.publish();

        joined.map_err(|_| EngineError::Spawn("worker thread panicked".into()))?;
        actor_info!("Engine stopped");
        Ok(())
    }

    /// Publish Step: refresh the visible snapshot from the worker's last copy.
    ///
    /// Call once per render tick. Returns true when the snapshot changed.
    pub fn publish(&mut self) -> bool {
        let changed = self.reader.publish();
        if changed {
            let visible = self.reader.visible_mut();
            if visible.message_serial <= self.taken_serial {
                visible.status_message.clear();
            }
        }
        changed
    }

    /// Staleness bound: worker recaches not yet published to
    /// [`snapshot`](Engine::snapshot). Zero right after a publish while the
    /// worker is idle.
    pub fn staleness(&self) -> u64 {
        self.reader.lag()
    }

    /// The ui-visible snapshot. Never blocks.
    pub fn snapshot(&self) -> &StateSnapshot {
        self.reader.visible()
    }

    /// Hand out the current status message once.
    ///
    /// The text stays hidden from later snapshots until the worker posts a
    /// new message.
    pub fn take_status_message(&mut self) -> Option<String> {
        let visible = self.reader.visible_mut();
        if visible.status_message.is_empty() {
            return None;
        }
        self.taken_serial = visible.message_serial;
        Some(std::mem::take(&mut visible.status_message))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn connection_parameters(&self) -> ConnectionParameters {
        self.params
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            actor_warn!("Engine: shutdown on drop failed: {}", e);
        }
    }
}

