//! Serial device channel
//!
//! Opens a tty, puts it into raw mode at the requested baud rate and reads it
//! from a background thread so that waits for replies can time out.

use super::Channel;
use crate::core::errors::TransportError;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Idle pause for readers on devices that report end of file
const IDLE_POLL: Duration = Duration::from_millis(10);

pub struct SerialChannel {
    path: PathBuf,
    writer: File,
    incoming: Receiver<Vec<u8>>,
    stop: Arc<AtomicBool>,
}

impl SerialChannel {
    pub fn open(path: impl AsRef<Path>, baud_rate: u32) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let writer = OpenOptions::new().read(true).write(true).open(&path)?;

        configure_line(&writer, baud_rate)?;

        let mut reader = writer.try_clone()?;
        let (tx, incoming) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let reader_stop = stop.clone();

        thread::Builder::new()
            .name("serial-reader".to_string())
            .spawn(move || {
                let mut buffer = [0u8; 256];
                while !reader_stop.load(Ordering::Relaxed) {
                    match reader.read(&mut buffer) {
                        Ok(0) => thread::sleep(IDLE_POLL),
                        Ok(n) => {
                            if tx.send(buffer[..n].to_vec()).is_err() {
                                break;
                            }
                        }
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                        Err(e) => {
                            warn!("Serial read failed: {}", e);
                            break;
                        }
                    }
                }
            })?;

        debug!("Opened serial device {:?} at {} baud", path, baud_rate);
        Ok(Self {
            path,
            writer,
            incoming,
            stop,
        })
    }
}

impl Channel for SerialChannel {
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.writer.write_all(bytes)?;
        self.writer.flush()?;
        Ok(())
    }

    fn receive(&mut self, timeout: Option<Duration>) -> Result<Option<Vec<u8>>, TransportError> {
        match timeout {
            Some(timeout) => match self.incoming.recv_timeout(timeout) {
                Ok(bytes) => Ok(Some(bytes)),
                Err(RecvTimeoutError::Timeout) => Ok(None),
                Err(RecvTimeoutError::Disconnected) => Err(TransportError::ChannelClosed),
            },
            None => self
                .incoming
                .recv()
                .map(Some)
                .map_err(|_| TransportError::ChannelClosed),
        }
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.stop.store(true, Ordering::Relaxed);
        debug!("Closed serial device {:?}", self.path);
        Ok(())
    }
}

impl Drop for SerialChannel {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

#[cfg(unix)]
fn configure_line(file: &File, baud_rate: u32) -> io::Result<()> {
    termios::configure_raw(file, baud_rate)
}

#[cfg(not(unix))]
fn configure_line(_file: &File, baud_rate: u32) -> io::Result<()> {
    debug!("Leaving line settings untouched ({} baud requested)", baud_rate);
    Ok(())
}

#[cfg(unix)]
mod termios {
    use std::fs::File;
    use std::io;
    use std::os::unix::io::AsRawFd;
    use tracing::debug;

    fn speed_for(baud_rate: u32) -> Option<libc::speed_t> {
        let speed = match baud_rate {
            9_600 => libc::B9600,
            19_200 => libc::B19200,
            38_400 => libc::B38400,
            57_600 => libc::B57600,
            115_200 => libc::B115200,
            230_400 => libc::B230400,
            _ => return None,
        };
        Some(speed)
    }

    /// Raw 8N1 at `baud_rate`, reads returning after at most 100 ms
    pub fn configure_raw(file: &File, baud_rate: u32) -> io::Result<()> {
        let fd = file.as_raw_fd();
        if unsafe { libc::isatty(fd) } != 1 {
            debug!("Not a terminal device, skipping line configuration");
            return Ok(());
        }

        let speed = speed_for(baud_rate).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unsupported baud rate {baud_rate}"),
            )
        })?;

        let mut tty: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &mut tty) } != 0 {
            return Err(io::Error::last_os_error());
        }

        unsafe {
            libc::cfmakeraw(&mut tty);
            libc::cfsetispeed(&mut tty, speed);
            libc::cfsetospeed(&mut tty, speed);
        }
        tty.c_cflag |= libc::CLOCAL | libc::CREAD;
        tty.c_cc[libc::VMIN] = 0;
        tty.c_cc[libc::VTIME] = 1;

        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &tty) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

}
