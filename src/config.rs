use crate::slider::SLOT_COUNT;
use std::time::Duration;

pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";

/// Pause before every read so the device has time to answer.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(10);

pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Construction parameters of a [`Slider`](crate::Slider).
///
/// ```rust
/// use ell9k_rs::SliderConfig;
/// use std::time::Duration;
///
/// let config = SliderConfig::new("/dev/ttyUSB1")
///     .verbose(true)
///     .settle_delay(Duration::from_millis(50));
/// assert_eq!(config.port, "/dev/ttyUSB1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderConfig {
    pub port: String,
    /// Route diagnostics to the log at info level instead of debug.
    /// The console message is written either way.
    pub verbose: bool,
    pub settle_delay: Duration,
    pub read_timeout: Duration,
    /// Rename accepts every slot and filter lookup picks the first match.
    pub strict: bool,
    pub filter_names: [String; SLOT_COUNT],
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            verbose: false,
            settle_delay: DEFAULT_SETTLE_DELAY,
            read_timeout: DEFAULT_READ_TIMEOUT,
            strict: false,
            filter_names: std::array::from_fn(|i| format!("filter_{}", i + 1)),
        }
    }
}

impl SliderConfig {
    pub fn new(port: &str) -> Self {
        Self {
            port: port.to_string(),
            ..Self::default()
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Labels restored from an external store, one per slot.
    pub fn filter_names(mut self, filter_names: [String; SLOT_COUNT]) -> Self {
        self.filter_names = filter_names;
        self
    }
}
