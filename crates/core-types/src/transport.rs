use crate::DeviceAddress;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Not connected")]
    NotConnected,
    #[error("Other: {0}")]
    Other(String),
}

/// Outbound half of an asynchronous device link (Bluetooth RFCOMM, a simulator, ...).
///
/// Every call is fire-and-forget: it only *starts* the operation. Completion,
/// incoming data and failures arrive later through the notification callbacks
/// the transport was built with, on the transport's own thread.
///
/// An `Err` return means the operation could not even be started; it is handled
/// exactly like an asynchronous error notification.
pub trait Transport: Send {
    /// Begin connecting to `address` on `channel`.
    fn connect(&mut self, address: &DeviceAddress, channel: u8) -> Result<(), TransportError>;

    /// Begin closing the link. Completion is reported by a close notification or an error.
    fn disconnect(&mut self) -> Result<(), TransportError>;

    /// Queue bytes for transmission.
    fn send(&mut self, data: Vec<u8>) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn connect(&mut self, address: &DeviceAddress, channel: u8) -> Result<(), TransportError> {
        (**self).connect(address, channel)
    }

    fn disconnect(&mut self) -> Result<(), TransportError> {
        (**self).disconnect()
    }

    fn send(&mut self, data: Vec<u8>) -> Result<(), TransportError> {
        (**self).send(data)
    }
}
