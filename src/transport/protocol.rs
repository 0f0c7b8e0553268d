//! Command/acknowledge protocol for the plotter
//!
//! `Closed → Awake → Ready → Streaming → Closed`
//!
//! The device is woken with a bare line terminator and is ready once it has
//! printed a `$`. After the fixed initialization sequence every command is
//! sent alone and must be acknowledged before the next one goes out.
//!
//! Replies are framed by line. A read may deliver part of a line or several
//! lines, and only a complete non-empty line acknowledges a command.

use super::Channel;
use crate::core::errors::TransportError;
use crate::rendering::gcode::{MotionCommand, DEFAULT_FEED_RATE};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// Sent to wake the controller
pub const WAKE_TOKEN: &[u8] = b"\n";
/// Printed by the controller once it accepts commands
pub const READY_TOKEN: u8 = b'$';
/// Pause after each transmission so the machine can act
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(100);
/// Longest wait for a single acknowledgment
pub const DEFAULT_ACK_TIMEOUT: Duration = Duration::from_secs(30);
/// Longest wait for the closing pen-up once a command went unacknowledged
pub const FAULTED_CLOSE_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolState {
    Closed,
    Awake,
    Ready,
    Streaming,
}

impl ProtocolState {
    pub fn name(&self) -> &'static str {
        match self {
            ProtocolState::Closed => "closed",
            ProtocolState::Awake => "awake",
            ProtocolState::Ready => "ready",
            ProtocolState::Streaming => "streaming",
        }
    }
}

/// Timing and machine parameters for a transport session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportSettings {
    pub settle: Duration,
    /// `None` waits forever for each acknowledgment
    pub ack_timeout: Option<Duration>,
    /// `None` waits forever for the ready token
    pub ready_timeout: Option<Duration>,
    pub feed_rate: u32,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            settle: DEFAULT_SETTLE,
            ack_timeout: Some(DEFAULT_ACK_TIMEOUT),
            ready_timeout: None,
            feed_rate: DEFAULT_FEED_RATE,
        }
    }
}

/// Synchronous command stream to one plotter
pub struct Transport<C: Channel> {
    channel: Option<C>,
    state: ProtocolState,
    settings: TransportSettings,
    commands_sent: usize,
    /// Received bytes not yet framed into a reply
    incoming: Vec<u8>,
    /// Drop the next line; it is the tail of the ready banner
    discard_line: bool,
    faulted: bool,
}

impl<C: Channel> Transport<C> {
    pub fn new(settings: TransportSettings) -> Self {
        Self {
            channel: None,
            state: ProtocolState::Closed,
            settings,
            commands_sent: 0,
            incoming: Vec::new(),
            discard_line: false,
            faulted: false,
        }
    }

    /// Wake the device, wait until it is ready and send the initialization sequence
    pub fn open(channel: C, settings: TransportSettings) -> Result<Self, TransportError> {
        let mut transport = Self::new(settings);
        transport.wake(channel)?;
        transport.await_ready()?;
        transport.start_streaming()?;
        Ok(transport)
    }

    pub fn state(&self) -> ProtocolState {
        self.state
    }

    /// Commands acknowledged so far, including the initialization sequence
    pub fn commands_sent(&self) -> usize {
        self.commands_sent
    }

    /// Closed → Awake
    pub fn wake(&mut self, channel: C) -> Result<(), TransportError> {
        self.expect_state(ProtocolState::Closed, "wake the device")?;
        info!("About to wake up the robot");

        let channel = self.channel.insert(channel);
        channel.send(WAKE_TOKEN)?;
        self.state = ProtocolState::Awake;
        self.settle();
        Ok(())
    }

    /// Awake → Ready
    pub fn await_ready(&mut self) -> Result<(), TransportError> {
        self.expect_state(ProtocolState::Awake, "wait for the device")?;
        let timeout = self.settings.ready_timeout;
        let deadline = timeout.map(|timeout| Instant::now() + timeout);

        loop {
            if let Some(at) = self.incoming.iter().position(|&b| b == READY_TOKEN) {
                self.incoming.drain(..=at);
                match self.incoming.iter().position(|&b| b == b'\n') {
                    Some(end) => {
                        self.incoming.drain(..=end);
                    }
                    None => {
                        self.incoming.clear();
                        self.discard_line = true;
                    }
                }
                break;
            }

            if !self.incoming.is_empty() {
                trace!("Ignoring {} bytes before ready", self.incoming.len());
                self.incoming.clear();
            }
            let remaining = deadline.map(|deadline| deadline.saturating_duration_since(Instant::now()));
            let received = self.channel_mut()?.receive(remaining)?;
            match received {
                Some(bytes) => self.incoming.extend_from_slice(&bytes),
                None => {
                    return Err(TransportError::ReadyTimeout(timeout.unwrap_or_default()));
                }
            }
        }

        self.state = ProtocolState::Ready;
        info!("The robot is now ready to draw");
        Ok(())
    }

    /// Ready → Streaming
    pub fn start_streaming(&mut self) -> Result<(), TransportError> {
        self.expect_state(ProtocolState::Ready, "initialize the device")?;
        let init = [
            MotionCommand::Home {
                feed_rate: self.settings.feed_rate,
            },
            MotionCommand::EnablePen,
            MotionCommand::PenUp,
        ];
        for command in &init {
            self.exchange(command, self.settings.ack_timeout)?;
        }
        self.state = ProtocolState::Streaming;
        debug!("Initialization sequence acknowledged");
        Ok(())
    }

    /// Send one command and wait for its acknowledgment
    pub fn send(&mut self, command: &MotionCommand) -> Result<(), TransportError> {
        self.expect_state(ProtocolState::Streaming, "send commands")?;
        self.exchange(command, self.settings.ack_timeout)
    }

    /// Send commands in order, stopping at the first failure
    pub fn send_all(&mut self, commands: &[MotionCommand]) -> Result<(), TransportError> {
        for command in commands {
            self.send(command)?;
        }
        Ok(())
    }

    /// Lift the pen and release the channel
    ///
    /// The channel is released even when the final pen-up fails. Closing a
    /// closed transport does nothing. After an unacknowledged command the
    /// pen-up waits at most [`FAULTED_CLOSE_TIMEOUT`].
    pub fn close(&mut self) -> Result<(), TransportError> {
        let timeout = if self.faulted {
            Some(
                self.settings
                    .ack_timeout
                    .map_or(FAULTED_CLOSE_TIMEOUT, |t| t.min(FAULTED_CLOSE_TIMEOUT)),
            )
        } else {
            self.settings.ack_timeout
        };
        let pen_up = if self.state == ProtocolState::Streaming {
            self.exchange(&MotionCommand::PenUp, timeout)
        } else {
            Ok(())
        };

        let released = match self.channel.take() {
            Some(mut channel) => channel.close(),
            None => Ok(()),
        };
        if self.state != ProtocolState::Closed {
            info!("Channel closed after {} commands", self.commands_sent);
        }
        self.state = ProtocolState::Closed;
        self.incoming.clear();
        self.discard_line = false;

        pen_up.and(released)
    }

    fn exchange(
        &mut self,
        command: &MotionCommand,
        timeout: Option<Duration>,
    ) -> Result<(), TransportError> {
        trace!("-> {}", command);
        self.channel_mut()?.send(command.to_line().as_bytes())?;
        match self.read_reply(timeout)? {
            Some(reply) => trace!("<- {}", reply),
            None => {
                warn!("No acknowledgment for `{}`", command);
                self.faulted = true;
                return Err(TransportError::AcknowledgmentTimeout {
                    command: command.to_string(),
                    timeout: timeout.unwrap_or_default(),
                });
            }
        }

        self.commands_sent += 1;
        self.settle();
        Ok(())
    }

    /// Next complete non-empty line, or `None` once `timeout` has elapsed
    fn read_reply(&mut self, timeout: Option<Duration>) -> Result<Option<String>, TransportError> {
        let deadline = timeout.map(|timeout| Instant::now() + timeout);

        loop {
            while let Some(end) = self.incoming.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = self.incoming.drain(..=end).collect();
                if std::mem::take(&mut self.discard_line) {
                    continue;
                }
                let line = String::from_utf8_lossy(&line).trim().to_string();
                if !line.is_empty() {
                    return Ok(Some(line));
                }
            }

            let remaining = deadline.map(|deadline| deadline.saturating_duration_since(Instant::now()));
            let received = self.channel_mut()?.receive(remaining)?;
            match received {
                Some(bytes) => self.incoming.extend_from_slice(&bytes),
                None => return Ok(None),
            }
        }
    }

    fn settle(&self) {
        if !self.settings.settle.is_zero() {
            thread::sleep(self.settings.settle);
        }
    }

    fn channel_mut(&mut self) -> Result<&mut C, TransportError> {
        let state = self.state.name();
        self.channel.as_mut().ok_or(TransportError::InvalidState {
            operation: "use the channel",
            state,
        })
    }

    fn expect_state(&self, expected: ProtocolState, operation: &'static str) -> Result<(), TransportError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(TransportError::InvalidState {
                operation,
                state: self.state.name(),
            })
        }
    }
}

impl<C: Channel> Drop for Transport<C> {
    fn drop(&mut self) {
        if self.state != ProtocolState::Closed {
            if let Err(e) = self.close() {
                warn!("Failed to close transport cleanly: {}", e);
            }
        }
    }
}
