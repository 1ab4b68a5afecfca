use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{ErrorKind, Read, Write};
use std::thread;
use std::time::{Duration, Instant};

/// Line speed of the slider. Fixed by the device, not configurable.
pub const BAUD_RATE: u32 = 9600;

/// Every response frame ends with CR LF.
pub const END_MARKER: &[u8] = b"\r\n";

/// Poll interval of a single blocking read on the serial port.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Longest response the device ever sends, end marker included.
pub const MAX_FRAME_LEN: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum TerminalError {
    #[error("Serial port error: {0}")]
    SerialPort(#[from] serialport::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(
        "Timeout error: Expected end marker {expected:?} but got {actual:?}. Likely due to a timeout."
    )]
    Timeout { expected: String, actual: String },

    #[error("Frame overrun: no end marker within {len} bytes")]
    Overrun { len: usize },
}

/// Owns the serial connection to the slider.
///
/// Frames go out as raw bytes without terminator. Responses are read until the
/// CR LF end marker, which is stripped before the frame is handed upward.
/// Every receive waits the settle delay first so the device has time to answer.
pub struct SliderTerminal<S = Box<dyn SerialPort>> {
    serial: S,
    settle_delay: Duration,
    read_timeout: Duration,
}

impl SliderTerminal {
    /// Open the serial device with the slider's fixed line parameters (9600 8N1).
    pub fn open(
        port: &str,
        settle_delay: Duration,
        read_timeout: Duration,
    ) -> Result<Self, TerminalError> {
        let serial = serialport::new(port, BAUD_RATE)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(POLL_INTERVAL)
            .open()?;

        let mut terminal = Self::from_port(serial, settle_delay, read_timeout);
        terminal.flush()?;
        Ok(terminal)
    }

    /// Drop anything the device sent before we were listening
    fn flush(&mut self) -> Result<(), TerminalError> {
        self.serial.clear(serialport::ClearBuffer::All)?;
        Ok(())
    }
}

impl<S: Read + Write> SliderTerminal<S> {
    /// Wrap an already opened port.
    pub fn from_port(serial: S, settle_delay: Duration, read_timeout: Duration) -> Self {
        Self {
            serial,
            settle_delay,
            read_timeout,
        }
    }

    pub fn send(&mut self, frame: &[u8]) -> Result<(), TerminalError> {
        log::debug!("TX >>>> {}", String::from_utf8_lossy(frame));
        self.serial.write_all(frame)?;
        self.serial.flush()?;
        Ok(())
    }

    /// Wait the settle delay, then read one response frame without its end marker.
    pub fn receive(&mut self) -> Result<Vec<u8>, TerminalError> {
        self.settle();

        let mut response = Vec::new();
        let now = Instant::now();

        loop {
            if now.elapsed() >= self.read_timeout {
                return Err(TerminalError::Timeout {
                    expected: String::from_utf8_lossy(END_MARKER).to_string(),
                    actual: String::from_utf8_lossy(&response).to_string(),
                });
            }

            let mut byte = [0u8; 1];
            match self.serial.read_exact(&mut byte) {
                Ok(()) => {
                    response.push(byte[0]);
                    if response.ends_with(END_MARKER) {
                        break;
                    }
                    if response.len() >= MAX_FRAME_LEN {
                        return Err(TerminalError::Overrun {
                            len: response.len(),
                        });
                    }
                }
                Err(e) if is_transient(e.kind()) => {}
                Err(e) => return Err(e.into()),
            }
        }

        response.truncate(response.len() - END_MARKER.len());
        log::debug!("RX <<<< {}", String::from_utf8_lossy(&response));
        Ok(response)
    }

    /// Block for one settle delay.
    pub fn settle(&self) {
        if !self.settle_delay.is_zero() {
            thread::sleep(self.settle_delay);
        }
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }
}

/// Read errors that only mean "nothing arrived yet".
fn is_transient(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
    )
}
