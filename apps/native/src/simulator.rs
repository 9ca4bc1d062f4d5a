//! In-process stand-in for the rover's serial link.
//!
//! The transport half lives on the worker thread and only forwards operations.
//! The device half runs as a tokio task and answers through the
//! [`LinkNotifier`], the same way a real adapter's callbacks would.
use connection_actors::LinkNotifier;
use core_types::{DeviceAddress, Transport, TransportError};
use framing::{decode_command, encode_ack, CobsFramer, FrameOptions, Framer};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Debug)]
enum DeviceOp {
    Connect { address: DeviceAddress, channel: u8 },
    Disconnect,
    Send(Vec<u8>),
}

pub struct SimulatedTransport {
    ops: mpsc::UnboundedSender<DeviceOp>,
}

impl SimulatedTransport {
    /// Spawn the device task on the current runtime.
    pub fn spawn(link: LinkNotifier, options: FrameOptions, latency: Duration) -> Self {
        let (ops, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_device(rx, link, options, latency));
        Self { ops }
    }

    fn forward(&self, op: DeviceOp) -> Result<(), TransportError> {
        self.ops
            .send(op)
            .map_err(|_| TransportError::Other("simulated device stopped".into()))
    }
}

impl Transport for SimulatedTransport {
    fn connect(&mut self, address: &DeviceAddress, channel: u8) -> Result<(), TransportError> {
        self.forward(DeviceOp::Connect {
            address: *address,
            channel,
        })
    }

    fn disconnect(&mut self) -> Result<(), TransportError> {
        self.forward(DeviceOp::Disconnect)
    }

    fn send(&mut self, data: Vec<u8>) -> Result<(), TransportError> {
        self.forward(DeviceOp::Send(data))
    }
}

async fn run_device(
    mut ops: mpsc::UnboundedReceiver<DeviceOp>,
    link: LinkNotifier,
    options: FrameOptions,
    latency: Duration,
) {
    let mut framer = CobsFramer::new();

    while let Some(op) = ops.recv().await {
        tokio::time::sleep(latency).await;

        let notified = match op {
            DeviceOp::Connect { address, channel } => {
                info!("device: link up {} channel {}", address, channel);
                framer.reset();
                link.on_connect(&address.to_string(), channel)
            }
            DeviceOp::Disconnect => {
                info!("device: link down");
                framer.reset();
                link.on_close()
            }
            DeviceOp::Send(data) => {
                let sent = link.on_send(data.len());
                for frame in framer.push(&data) {
                    match frame.and_then(|payload| decode_command(&payload, options)) {
                        Ok((id, command)) => {
                            debug!("device: frame {:#04x} {:?}", id, command);
                            if let Err(e) = link.on_receive(&encode_ack(id, true)) {
                                warn!("device: ack not delivered: {}", e);
                            }
                        }
                        Err(e) => warn!("device: bad frame: {}", e),
                    }
                }
                sent
            }
        };

        if let Err(e) = notified {
            warn!("device: notification not delivered: {}", e);
        }
    }
}
