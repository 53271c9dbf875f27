//! Serial line transport to the microcontroller.
//!
//! Handles device I/O and line splitting only. Callers decide when to
//! poll, and decoding lives in [`crate::protocol`].

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::thread;
use std::time::Duration;

use serialport::{ClearBuffer, SerialPort};

use crate::error::TransportError;

/// Time for the board to come out of reset after the port opens.
const SETTLE_TIME: Duration = Duration::from_secs(1);

/// Blocking reads give up after this long and are retried.
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Complete lines kept waiting for the game; older ones are dropped.
pub const MAX_QUEUED_LINES: usize = 8;

/// A partial line longer than this is noise and is discarded.
pub const MAX_LINE_BYTES: usize = 128;

/// Line-oriented byte transport.
pub trait Transport {
    /// Bytes received and not yet consumed. Never blocks.
    fn bytes_available(&mut self) -> Result<usize, TransportError>;

    /// Next complete line without its terminator. Blocks until one arrives.
    fn read_line(&mut self) -> Result<Vec<u8>, TransportError>;

    /// Write `line` as-is; the caller supplies the terminator.
    fn write_line(&mut self, line: &[u8]) -> Result<(), TransportError>;

    /// Drop everything received so far.
    fn reset_input_buffer(&mut self) -> Result<(), TransportError>;
}

/// Splits a byte stream into `\n`-terminated lines. Buffers partial data
/// across calls; a trailing `\r` is removed.
#[derive(Debug, Default)]
pub struct LineSplitter {
    buf: Vec<u8>,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
        }
    }

    /// Feed new data and extract any complete lines.
    pub fn feed(&mut self, data: &[u8]) -> Vec<Vec<u8>> {
        self.buf.extend_from_slice(data);
        let mut lines = Vec::new();

        while let Some(end) = self.buf.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buf.drain(..=end).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(line);
        }

        lines
    }

    /// Bytes of an incomplete trailing line
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

/// Bounded queue of received lines.
///
/// The game consumes one line per tick. Beyond `capacity` lines the oldest
/// are discarded, as is a partial line that grows past [`MAX_LINE_BYTES`].
#[derive(Debug)]
pub struct LineQueue {
    splitter: LineSplitter,
    lines: VecDeque<Vec<u8>>,
    capacity: usize,
    dropped: u64,
}

impl LineQueue {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            splitter: LineSplitter::new(),
            lines: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    pub fn feed(&mut self, data: &[u8]) {
        for line in self.splitter.feed(data) {
            if self.lines.len() == self.capacity {
                self.lines.pop_front();
                self.dropped += 1;
                log::trace!("Sensor backlog full, dropped oldest line");
            }
            self.lines.push_back(line);
        }
        if self.splitter.pending() > MAX_LINE_BYTES {
            self.splitter.clear();
            self.dropped += 1;
            log::trace!("Discarded unterminated sensor data");
        }
    }

    pub fn pop(&mut self) -> Option<Vec<u8>> {
        self.lines.pop_front()
    }

    /// Queued lines (counting their terminators) plus any partial line
    pub fn buffered_bytes(&self) -> usize {
        let queued: usize = self.lines.iter().map(|l| l.len() + 1).sum();
        queued + self.splitter.pending()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines discarded because the queue was full or overlong
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn clear(&mut self) {
        self.splitter.clear();
        self.lines.clear();
    }
}

/// A serial port configured for the requested baud rate (8N1, raw mode).
pub struct SerialLink {
    port: Box<dyn SerialPort>,
    queue: LineQueue,
    buf: [u8; 256],
}

impl SerialLink {
    /// Open `port`; returns None (after logging why) if it cannot be used.
    pub fn try_open(port: &str, baud_rate: u32) -> Option<Self> {
        match serialport::new(port, baud_rate).timeout(READ_TIMEOUT).open() {
            Ok(handle) => {
                log::info!("Serial port {port} open at {baud_rate} baud");
                thread::sleep(SETTLE_TIME);
                Some(Self {
                    port: handle,
                    queue: LineQueue::new(MAX_QUEUED_LINES),
                    buf: [0; 256],
                })
            }
            Err(e) => {
                log::warn!("Serial port {port} not available ({e}): playing without joystick, LEDs or buzzer");
                None
            }
        }
    }

    /// Move whatever the OS has buffered into the line queue without blocking.
    fn fill(&mut self) -> Result<(), TransportError> {
        let mut waiting = self.port.bytes_to_read()? as usize;
        while waiting > 0 {
            let want = waiting.min(self.buf.len());
            let n = self.port.read(&mut self.buf[..want])?;
            if n == 0 {
                return Err(TransportError::Closed);
            }
            self.queue.feed(&self.buf[..n]);
            waiting -= n;
        }
        Ok(())
    }
}

impl Transport for SerialLink {
    fn bytes_available(&mut self) -> Result<usize, TransportError> {
        self.fill()?;
        Ok(self.queue.buffered_bytes())
    }

    fn read_line(&mut self) -> Result<Vec<u8>, TransportError> {
        loop {
            if let Some(line) = self.queue.pop() {
                return Ok(line);
            }
            match self.port.read(&mut self.buf) {
                Ok(0) => return Err(TransportError::Closed),
                Ok(n) => self.queue.feed(&self.buf[..n]),
                Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::Interrupted) => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn write_line(&mut self, line: &[u8]) -> Result<(), TransportError> {
        self.port.write_all(line)?;
        self.port.flush()?;
        Ok(())
    }

    fn reset_input_buffer(&mut self) -> Result<(), TransportError> {
        self.port.clear(ClearBuffer::Input)?;
        self.queue.clear();
        Ok(())
    }
}
