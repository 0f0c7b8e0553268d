//! Plotter transport
//!
//! The protocol layer talks to the plotter through the narrow [`Channel`]
//! interface: write some bytes, or wait for some bytes to arrive. Concrete
//! channels are a serial device and a dry-run sink that records the stream.

pub mod dry_run;
pub mod protocol;
pub mod serial;

pub use dry_run::DryRunChannel;
pub use protocol::{ProtocolState, Transport, TransportSettings};
pub use serial::SerialChannel;

use crate::core::errors::TransportError;
use std::time::Duration;

/// A byte link to the plotter
pub trait Channel {
    /// Write every byte, blocking until the link accepts them
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Wait for incoming bytes
    ///
    /// Returns `Ok(None)` when `timeout` elapses first. A `None` timeout
    /// waits for as long as it takes.
    fn receive(&mut self, timeout: Option<Duration>) -> Result<Option<Vec<u8>>, TransportError>;

    /// Release the link
    fn close(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

impl<C: Channel + ?Sized> Channel for Box<C> {
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        (**self).send(bytes)
    }

    fn receive(&mut self, timeout: Option<Duration>) -> Result<Option<Vec<u8>>, TransportError> {
        (**self).receive(timeout)
    }

    fn close(&mut self) -> Result<(), TransportError> {
        (**self).close()
    }
}
