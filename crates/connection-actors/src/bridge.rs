//! Connection Bridge
//!
//! The only code that touches the transport, split by thread:
//!
//! - [`ConnectionBridge`]: request surface for the UI thread. Validates, then
//!   enqueues; never calls the transport.
//! - [`LinkNotifier`]: handed to the transport. Turns each notification into a
//!   queued [`LinkEvent`] and does nothing else on the transport's thread.
//! - [`LinkDriver`]: owned by the Worker Loop. Issues the fire-and-forget
//!   transport calls.
use crate::EngineError;
use actor_protocol::{Intent, LinkEvent, UiCommand};
use actor_runtime::{actor_debug, actor_info, actor_warn, IntentSender, QueueError};
use core_types::{ConnectionParameters, Transport, TransportError};
use std::time::Duration;

/// Producer-side request surface.
#[derive(Clone)]
pub struct ConnectionBridge {
    intent_tx: IntentSender<Intent>,
}

impl ConnectionBridge {
    pub fn new(intent_tx: IntentSender<Intent>) -> Self {
        Self { intent_tx }
    }

    /// Validate `address`/`channel` and queue a connect.
    ///
    /// Returns the parsed parameters so the caller can reuse them.
    pub fn request_connect(
        &self,
        address: &str,
        channel: i32,
    ) -> Result<ConnectionParameters, EngineError> {
        let params = ConnectionParameters::new(address, channel)?;
        self.submit(UiCommand::Connect { params })?;
        Ok(params)
    }

    pub fn request_disconnect(&self) -> Result<(), EngineError> {
        self.submit(UiCommand::Disconnect)
    }

    pub fn request_send(&self, data: Vec<u8>) -> Result<(), EngineError> {
        self.submit(UiCommand::Send { data })
    }

    /// Queue any UI command.
    pub fn submit(&self, cmd: UiCommand) -> Result<(), EngineError> {
        self.intent_tx.push(cmd).map_err(|e| {
            actor_warn!("ConnectionBridge: request dropped: {}", e);
            EngineError::from(e)
        })
    }

    /// A notifier feeding the same queue, for the transport.
    pub fn notifier(&self) -> LinkNotifier {
        LinkNotifier {
            intent_tx: self.intent_tx.clone(),
        }
    }

    pub fn queued(&self) -> usize {
        self.intent_tx.len()
    }

    pub(crate) fn close(&self) {
        self.intent_tx.close();
    }
}

/// Transport-side notification sink.
///
/// Every method only enqueues. A full queue is reported back so the transport
/// can retry; the event is not applied.
#[derive(Clone)]
pub struct LinkNotifier {
    intent_tx: IntentSender<Intent>,
}

impl LinkNotifier {
    fn notify(&self, event: LinkEvent) -> Result<(), QueueError> {
        self.intent_tx.push(event).map_err(|e| {
            actor_warn!("LinkNotifier: notification dropped: {}", e);
            e
        })
    }

    /// Incoming connection accepted (server role)
    pub fn on_accept(&self, address: &str, channel: u8) -> Result<(), QueueError> {
        self.notify(LinkEvent::Accepted {
            address: address.to_string(),
            channel,
        })
    }

    pub fn on_connect(&self, address: &str, channel: u8) -> Result<(), QueueError> {
        self.notify(LinkEvent::Connected {
            address: address.to_string(),
            channel,
        })
    }

    pub fn on_send(&self, bytes: usize) -> Result<(), QueueError> {
        self.notify(LinkEvent::Sent { bytes })
    }

    pub fn on_receive(&self, data: &[u8]) -> Result<(), QueueError> {
        self.notify(LinkEvent::Received {
            data: data.to_vec(),
        })
    }

    pub fn on_timer(&self, delta: Duration) -> Result<(), QueueError> {
        self.notify(LinkEvent::Timer { delta })
    }

    pub fn on_error(&self, code: i32, message: impl Into<String>) -> Result<(), QueueError> {
        self.notify(LinkEvent::Error {
            code,
            message: message.into(),
        })
    }

    /// The link finished closing (close acknowledgement)
    pub fn on_close(&self) -> Result<(), QueueError> {
        self.notify(LinkEvent::Closed)
    }
}

/// Worker-side owner of the transport handle.
pub struct LinkDriver<T> {
    transport: T,
}

impl<T: Transport> LinkDriver<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn connect(&mut self, params: &ConnectionParameters) -> Result<(), TransportError> {
        actor_info!(
            "LinkDriver: connecting to {} channel {}",
            params.address,
            params.channel
        );
        self.transport.connect(&params.address, params.channel)
    }

    pub fn disconnect(&mut self) -> Result<(), TransportError> {
        actor_info!("LinkDriver: disconnecting");
        self.transport.disconnect()
    }

    pub fn send(&mut self, data: Vec<u8>) -> Result<(), TransportError> {
        actor_debug!(bytes = data.len(), "LinkDriver: send");
        self.transport.send(data)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use actor_runtime::command_queue;
    use core_types::DeviceAddress;

    #[test]
    fn test_invalid_address_never_queued() {
        let (tx, rx) = command_queue::<Intent>(8);
        let bridge = ConnectionBridge::new(tx);

        assert!(matches!(
            bridge.request_connect("00:16:53:18:8E", 1),
            Err(EngineError::Validation(_))
        ));
        assert!(matches!(
            bridge.request_connect("00:16:53:18:8E:08", 0),
            Err(EngineError::Validation(_))
        ));
        assert!(rx.try_pop().is_none());
    }

    #[test]
    fn test_requests_queue_in_order() {
        let (tx, rx) = command_queue::<Intent>(8);
        let bridge = ConnectionBridge::new(tx);

        let params = bridge.request_connect("00-16-53-18-8e-08", 1).unwrap();
        assert_eq!(params.address.to_string(), "00:16:53:18:8E:08");
        bridge.request_send(vec![1, 2, 3]).unwrap();
        bridge.request_disconnect().unwrap();
        assert_eq!(bridge.queued(), 3);

        match rx.try_pop() {
            Some(Intent::Ui(UiCommand::Connect { params: queued })) => assert_eq!(queued, params),
            other => panic!("Expected Connect, got {:?}", other),
        }
        match rx.try_pop() {
            Some(Intent::Ui(UiCommand::Send { data })) => assert_eq!(data, vec![1, 2, 3]),
            other => panic!("Expected Send, got {:?}", other),
        }
        assert!(matches!(rx.try_pop(), Some(Intent::Ui(UiCommand::Disconnect))));
    }

    #[test]
    fn test_notifier_enqueues_link_events() {
        let (tx, rx) = command_queue::<Intent>(8);
        let notifier = ConnectionBridge::new(tx).notifier();

        notifier.on_connect("00:16:53:18:8E:08", 1).unwrap();
        notifier.on_receive(&[0x06, 0x00]).unwrap();
        notifier.on_error(104, "Connection reset").unwrap();
        notifier.on_close().unwrap();

        let events: Vec<_> = std::iter::from_fn(|| rx.try_pop())
            .map(|intent| match intent {
                Intent::Link(event) => event,
                other => panic!("Expected link event, got {:?}", other),
            })
            .collect();
        assert_eq!(
            events,
            vec![
                LinkEvent::Connected {
                    address: "00:16:53:18:8E:08".into(),
                    channel: 1
                },
                LinkEvent::Received {
                    data: vec![0x06, 0x00]
                },
                LinkEvent::Error {
                    code: 104,
                    message: "Connection reset".into()
                },
                LinkEvent::Closed,
            ]
        );
    }

    #[test]
    fn test_notifier_reports_overflow() {
        let (tx, _rx) = command_queue::<Intent>(1);
        let notifier = ConnectionBridge::new(tx).notifier();
        notifier.on_timer(Duration::from_millis(5)).unwrap();
        assert_eq!(
            notifier.on_send(4),
            Err(QueueError::Overflow { capacity: 1 })
        );
    }

    #[derive(Default)]
    struct Counting {
        connects: Vec<(DeviceAddress, u8)>,
        sent: usize,
        disconnects: usize,
    }

    impl Transport for Counting {
        fn connect(&mut self, address: &DeviceAddress, channel: u8) -> Result<(), TransportError> {
            self.connects.push((*address, channel));
            Ok(())
        }

        fn disconnect(&mut self) -> Result<(), TransportError> {
            self.disconnects += 1;
            Ok(())
        }

        fn send(&mut self, data: Vec<u8>) -> Result<(), TransportError> {
            self.sent += data.len();
            Ok(())
        }
    }

    #[test]
    fn test_link_driver_forwards_calls() {
        let mut driver = LinkDriver::new(Counting::default());
        let params = ConnectionParameters::new("00:16:53:18:8E:08", 2).unwrap();

        driver.connect(&params).unwrap();
        driver.send(vec![0; 6]).unwrap();
        driver.disconnect().unwrap();

        assert_eq!(driver.transport().connects, vec![(params.address, 2)]);
        assert_eq!(driver.transport().sent, 6);
        assert_eq!(driver.transport().disconnects, 1);
    }
}
