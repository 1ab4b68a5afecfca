use crate::codec::{Address, Instruction, Response, StatusOutcome};
use crate::config::SliderConfig;
use crate::error::SliderError;
use crate::notify::{Field, FieldSet, Observer};
use crate::protocol::ProtocolEngine;
use crate::serial_terminal::{SliderTerminal, TerminalError};
use serialport::SerialPort;
use std::io::{Read, Write};

/// Highest slot index of the slider.
pub const MAX_POS: usize = 3;
pub const SLOT_COUNT: usize = MAX_POS + 1;

const NO_ERROR: &str = "no error";
const START_UP_STATUS: &str = "No status available yet. In start-up";
const NOT_READY: &str = "Device is not ready! Check status to get more information.";
const RIGHTMOST: &str = "Already at the right most position!";
const LEFTMOST: &str = "Already at the left most position!";
const POSITION_OUT_OF_BOUNDS: &str = "Set position out of bounds!";
const FILTER_NOT_RECOGNIZED: &str = "Filter could not be identified by name. Check for typos";
const INDEX_OUT_OF_RANGE: &str = "Index is out of range!";
const TAG_NOT_RECOGNIZED: &str = "The received tag was not recognized";

const MOVE_FIELDS: FieldSet = FieldSet::of(&[
    Field::Position,
    Field::FilterName,
    Field::Status,
    Field::Console,
]);
const STATUS_FIELDS: FieldSet = FieldSet::of(&[Field::Status, Field::Console]);
const RENAME_FIELDS: FieldSet =
    FieldSet::of(&[Field::Console, Field::FilterName, Field::FilterList]);

/// Observable state of the slider.
///
/// `filter_name` always equals `filter_names[position_index]` once an
/// operation has returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderState {
    pub position_index: usize,
    pub filter_name: String,
    pub filter_names: [String; SLOT_COUNT],
    pub ready: bool,
    pub status_message: String,
    pub console_message: String,
    /// Step count of the last position report.
    pub motor_position: u32,
}

impl SliderState {
    fn new(filter_names: [String; SLOT_COUNT]) -> Self {
        Self {
            position_index: 0,
            filter_name: filter_names[0].clone(),
            filter_names,
            ready: false,
            status_message: START_UP_STATUS.to_string(),
            console_message: String::new(),
            motor_position: 0,
        }
    }

    fn sync_filter_name(&mut self) {
        self.filter_name.clone_from(&self.filter_names[self.position_index]);
    }
}

/// Driver for the four-position filter slider.
///
/// None of the operations fail. Device trouble ends up in the status and
/// console messages and in the readiness flag; movement refuses to run until
/// the device reports ready again.
pub struct Slider<S = Box<dyn SerialPort>> {
    engine: ProtocolEngine<S>,
    state: SliderState,
    last_fault: Option<SliderError>,
    port: String,
    verbose: bool,
    strict: bool,
    observers: Vec<Observer>,
}

impl Slider {
    /// Open the serial port and home the slider.
    pub fn connect(config: &SliderConfig) -> Result<Self, SliderError> {
        let terminal =
            SliderTerminal::open(&config.port, config.settle_delay, config.read_timeout)
                .map_err(|source| SliderError::Connection {
                    port: config.port.clone(),
                    source,
                })?;
        log::info!("Successfully established connection to {}", config.port);

        Ok(Self::with_terminal(terminal, config))
    }
}

impl<S: Read + Write> Slider<S> {
    /// Drive the slider over an already opened port.
    pub fn from_port(serial: S, config: &SliderConfig) -> Self {
        let terminal = SliderTerminal::from_port(serial, config.settle_delay, config.read_timeout);
        Self::with_terminal(terminal, config)
    }

    fn with_terminal(terminal: SliderTerminal<S>, config: &SliderConfig) -> Self {
        let mut slider = Self {
            engine: ProtocolEngine::new(terminal, Address::default()),
            state: SliderState::new(config.filter_names.clone()),
            last_fault: None,
            port: config.port.clone(),
            verbose: config.verbose,
            strict: config.strict,
            observers: Vec::new(),
        };

        slider.reset();
        slider.log(&slider.state.status_message);
        slider
    }

    /// Register a callback for field changes.
    pub fn subscribe(&mut self, observer: impl FnMut(Field, &SliderState) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn forward(&mut self) -> FieldSet {
        self.log("Called forward");
        if !self.ensure_ready() {
            return self.publish(Field::Console.into());
        }
        if self.state.position_index >= MAX_POS {
            self.report(RIGHTMOST);
            return self.publish(Field::Console.into());
        }

        let response = self.engine.command(Instruction::MoveForward);
        if self.apply(response) {
            self.state.position_index += 1;
            self.state.sync_filter_name();
        }
        self.engine.pause();
        self.publish(MOVE_FIELDS)
    }

    pub fn backward(&mut self) -> FieldSet {
        self.log("Called backward");
        if !self.ensure_ready() {
            return self.publish(Field::Console.into());
        }
        if self.state.position_index == 0 {
            self.report(LEFTMOST);
            return self.publish(Field::Console.into());
        }

        let response = self.engine.command(Instruction::MoveBackward);
        if self.apply(response) {
            self.state.position_index -= 1;
            self.state.sync_filter_name();
        }
        self.engine.pause();
        self.publish(MOVE_FIELDS)
    }

    /// Home the slider. Runs regardless of readiness.
    pub fn reset(&mut self) -> FieldSet {
        self.log("Called home/reset");
        let response = self.engine.command(Instruction::MoveHome);
        self.apply(response);
        self.state.position_index = 0;
        self.state.sync_filter_name();
        self.publish(MOVE_FIELDS)
    }

    pub fn set_position(&mut self, index: i64) -> FieldSet {
        if !self.ensure_ready() {
            return self.publish(Field::Console.into());
        }
        match usize::try_from(index) {
            Ok(index) if index <= MAX_POS => self.move_to(index),
            _ => {
                self.report(POSITION_OUT_OF_BOUNDS);
                self.publish(Field::Console.into())
            }
        }
    }

    pub fn set_filter(&mut self, name: &str) -> FieldSet {
        if !self.ensure_ready() {
            return self.publish(Field::Console.into());
        }
        let names = &self.state.filter_names;
        let found = if self.strict {
            names.iter().position(|n| n == name)
        } else {
            names.iter().rposition(|n| n == name)
        };

        match found {
            Some(index) => self.move_to(index),
            None => {
                self.report(FILTER_NOT_RECOGNIZED);
                self.publish(Field::Console.into())
            }
        }
    }

    /// Relabel a slot. Never talks to the device, but like every other
    /// operation it is refused while the device is not ready.
    pub fn rename_filter(&mut self, index: i64, new_name: &str) -> FieldSet {
        if !self.ensure_ready() {
            return self.publish(Field::Console.into());
        }
        let limit = if self.strict { SLOT_COUNT } else { MAX_POS };
        let index = match usize::try_from(index) {
            Ok(index) if index < limit => index,
            _ => {
                self.report(INDEX_OUT_OF_RANGE);
                return self.publish(Field::Console.into());
            }
        };

        let old_name = std::mem::replace(&mut self.state.filter_names[index], new_name.to_string());
        self.state.sync_filter_name();
        self.state.console_message = format!("Successfully changed {old_name} to {new_name}");
        self.log(&self.state.console_message);
        self.publish(RENAME_FIELDS)
    }

    /// Poll the device and update readiness. Runs regardless of readiness.
    pub fn refresh_status(&mut self) -> FieldSet {
        let response = self.engine.query_status();
        self.apply(response);
        self.publish(STATUS_FIELDS)
    }

    pub fn get_position(&self) -> usize {
        self.state.position_index
    }

    pub fn get_filter(&self) -> &str {
        &self.state.filter_name
    }

    pub fn get_filter_list(&self) -> &[String] {
        &self.state.filter_names
    }

    pub fn get_status(&self) -> &str {
        &self.state.status_message
    }

    pub fn get_console(&self) -> &str {
        &self.state.console_message
    }

    pub fn is_ready(&self) -> bool {
        self.state.ready
    }

    pub fn motor_position(&self) -> u32 {
        self.state.motor_position
    }

    pub fn state(&self) -> &SliderState {
        &self.state
    }

    /// Fault seen by the most recent device exchange, if any.
    pub fn last_fault(&self) -> Option<&SliderError> {
        self.last_fault.as_ref()
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    fn move_to(&mut self, index: usize) -> FieldSet {
        let response = self.engine.move_absolute(index);
        if self.apply(response) {
            self.state.position_index = index;
            self.state.sync_filter_name();
        }
        self.publish(MOVE_FIELDS)
    }

    fn ensure_ready(&mut self) -> bool {
        if !self.state.ready {
            self.report(NOT_READY);
        }
        self.state.ready
    }

    /// Fold the outcome of one exchange into the state.
    ///
    /// Returns whether the device answered at all.
    fn apply(&mut self, response: Result<Response, TerminalError>) -> bool {
        let response = match response {
            Ok(response) => response,
            Err(e) => {
                self.state.ready = false;
                self.report(&format!("Device did not respond: {e}"));
                self.last_fault = Some(SliderError::Io(e));
                return false;
            }
        };

        match response {
            Response::Position(steps) => {
                self.state.motor_position = steps;
                self.state.status_message = format!("Position: {steps}");
                self.mark_ready();
            }
            Response::Status(StatusOutcome::Known(status)) => {
                self.state.status_message = status.message().to_string();
                if status.is_ready() {
                    self.mark_ready();
                } else {
                    self.state.ready = false;
                    self.report(status.message());
                    self.last_fault = Some(SliderError::DeviceFault { status });
                }
            }
            Response::Status(StatusOutcome::UnknownCode(code)) => {
                self.report(&format!(
                    "Return error code was not recognized. Error code: {code}"
                ));
                self.last_fault = Some(SliderError::Protocol(format!("unknown status code {code}")));
            }
            Response::Unrecognized(tag) => {
                self.report(TAG_NOT_RECOGNIZED);
                self.last_fault = Some(SliderError::Protocol(format!("unknown tag {tag}")));
            }
            Response::Malformed(frame) => {
                let message = format!("Response did not have the right format: {frame}");
                self.report(&message);
                self.last_fault = Some(SliderError::Protocol(message));
            }
        }
        true
    }

    fn mark_ready(&mut self) {
        self.state.ready = true;
        self.state.console_message = NO_ERROR.to_string();
        self.last_fault = None;
    }

    /// Show a diagnostic on the console and in the log.
    fn report(&mut self, message: &str) {
        self.log(message);
        self.state.console_message = message.to_string();
    }

    fn log(&self, message: &str) {
        if self.verbose {
            log::info!("{message}");
        } else {
            log::debug!("{message}");
        }
    }

    fn publish(&mut self, fields: FieldSet) -> FieldSet {
        for field in fields.iter() {
            for observer in &mut self.observers {
                observer(field, &self.state);
            }
        }
        fields
    }
}
