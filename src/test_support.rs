//! In-memory stand-in for the serial port, shared by the unit and integration tests.

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct MockInner {
    pending: VecDeque<u8>,
    sent: Vec<Vec<u8>>,
    closed: bool,
}

/// Scripted port: replies are queued up front and read back in order, every
/// write is recorded as one frame. Reading an empty queue times out.
#[derive(Clone, Default)]
pub struct MockPort {
    inner: Arc<Mutex<MockInner>>,
}

impl MockPort {
    pub fn new() -> Self {
        Self::default()
    }

    fn wire(&self) -> MutexGuard<'_, MockInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a response frame, CR LF appended.
    pub fn reply(&self, frame: &str) {
        let mut inner = self.wire();
        inner.pending.extend(frame.as_bytes());
        inner.pending.extend(b"\r\n");
    }

    pub fn reply_raw(&self, bytes: &[u8]) {
        self.wire().pending.extend(bytes);
    }

    pub fn sent(&self) -> Vec<String> {
        self.wire()
            .sent
            .iter()
            .map(|frame| String::from_utf8_lossy(frame).to_string())
            .collect()
    }

    pub fn clear_sent(&self) {
        self.wire().sent.clear();
    }

    pub fn close(&self) {
        self.wire().closed = true;
    }
}

impl Read for MockPort {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut inner = self.wire();
        if inner.closed {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "port closed"));
        }
        if inner.pending.is_empty() {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "no data"));
        }
        let n = buf.len().min(inner.pending.len());
        for (slot, byte) in buf.iter_mut().zip(inner.pending.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl Write for MockPort {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self.wire();
        if inner.closed {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "port closed"));
        }
        inner.sent.push(buf.to_vec());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
