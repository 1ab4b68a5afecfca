//! # ELL9K RS
//!
//! A Rust driver for the Thorlabs ELL9K motorized filter slider.
//!
//! The slider has four discrete slots. Each slot carries a filter label the
//! user may rename; the driver keeps the current slot, its label, the device
//! readiness and the last status and console messages in sync with the
//! hardware over a 9600 baud serial line.
//!
//! ## Features
//!
//! - **Protocol engine**: ASCII frames `address ++ instruction ++ payload`,
//!   responses decoded into position or status reports
//! - **State machine**: forward, backward, absolute slot, home, lookup by label
//! - **Change notification**: every operation reports the fields it touched
//!   and forwards them to subscribed observers
//! - **Fault tolerant**: device errors and silent devices show up in the
//!   status/console fields instead of aborting the caller
//! - **Shareable**: [`SharedSlider`] serializes concurrent callers on one lock
//!
//! ## Examples
//!
//! ### Connecting and moving
//!
//! ```rust,no_run
//! use ell9k_rs::{Slider, SliderConfig};
//!
//! let mut slider = Slider::connect(&SliderConfig::new("/dev/ttyUSB0"))?;
//!
//! slider.forward();
//! slider.set_filter("filter_4");
//! println!("{} at slot {}", slider.get_filter(), slider.get_position());
//! println!("status: {}, console: {}", slider.get_status(), slider.get_console());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Watching for changes
//!
//! ```rust,no_run
//! use ell9k_rs::{SharedSlider, Slider, SliderConfig};
//!
//! let slider = SharedSlider::new(Slider::connect(&SliderConfig::default())?);
//! slider.subscribe(|field, state| {
//!     println!("{} changed, console: {}", field.as_str(), state.console_message);
//! });
//!
//! slider.rename_filter(1, "ND 2.0");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Encoding frames
//!
//! ```rust
//! use ell9k_rs::codec::{decode, encode, Address, Instruction, Payload, Response};
//!
//! let frame = encode(Address::default(), Instruction::MoveAbsolute, Payload::Steps(64));
//! assert_eq!(frame, b"0ma00000040");
//!
//! assert_eq!(decode(b"0PO0000001F"), Response::Position(31));
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod notify;
pub mod protocol;
pub mod serial_terminal;
pub mod shared;
pub mod slider;

#[doc(hidden)]
pub mod test_support;

// Re-export the main types for convenience
pub use codec::{DeviceStatus, Response, StatusOutcome};

pub use config::SliderConfig;

pub use error::SliderError;

pub use notify::{Field, FieldSet};

pub use serial_terminal::{SliderTerminal, TerminalError};

pub use shared::SharedSlider;

pub use slider::{Slider, SliderState, MAX_POS};
