//! Dry-run channel
//!
//! Stands in for a plotter: every command line is written to a sink and
//! answered at once, the way a Grbl controller would answer it. The wake
//! token is not written, so the sink holds a clean G-code program.

use super::Channel;
use crate::core::errors::TransportError;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const BANNER: &[u8] = b"\r\nGrbl 1.1f ['$' for help]\r\n";
const ACK: &[u8] = b"ok\r\n";

pub struct DryRunChannel<W: Write> {
    sink: W,
    greeted: bool,
    lines_written: usize,
}

impl<W: Write> DryRunChannel<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            greeted: false,
            lines_written: 0,
        }
    }

    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl DryRunChannel<BufWriter<File>> {
    /// Record the command stream into a file
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path.as_ref())?;
        debug!("Writing command stream to {:?}", path.as_ref());
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> Channel for DryRunChannel<W> {
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        if bytes == b"\n" {
            return Ok(());
        }
        self.sink.write_all(bytes)?;
        self.lines_written += 1;
        Ok(())
    }

    fn receive(&mut self, _timeout: Option<Duration>) -> Result<Option<Vec<u8>>, TransportError> {
        if !self.greeted {
            self.greeted = true;
            return Ok(Some(BANNER.to_vec()));
        }
        Ok(Some(ACK.to_vec()))
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.sink.flush()?;
        debug!("Dry run wrote {} command lines", self.lines_written);
        Ok(())
    }
}
