use crate::codec::DeviceStatus;
use crate::serial_terminal::TerminalError;

/// Everything that can go wrong between the driver and the slider.
///
/// Only [`SliderError::Connection`] is ever returned to a caller. The others
/// are recorded as the last fault of an operation and shown through the
/// status and console fields.
#[derive(Debug, thiserror::Error)]
pub enum SliderError {
    #[error("Could not open port {port}. Make sure that the device is connected: {source}")]
    Connection {
        port: String,
        #[source]
        source: TerminalError,
    },

    #[error("Device did not respond: {0}")]
    Io(#[from] TerminalError),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Device fault {}: {status}", .status.code())]
    DeviceFault { status: DeviceStatus },
}
