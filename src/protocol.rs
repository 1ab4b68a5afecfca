use crate::codec::{self, Address, Instruction, Payload, Response};
use crate::serial_terminal::{SliderTerminal, TerminalError};
use serialport::SerialPort;
use std::io::{Read, Write};

/// Motor steps between two neighbouring slots.
pub const STEPS_PER_POSITION: u32 = 32;

/// Sequences transmit, settle, receive and decode for every device interaction.
///
/// The device does not acknowledge moves on its own. Every move is followed by
/// a status poll and the poll's answer is what the caller gets back; the settle
/// delay is assumed long enough for the mechanics to finish.
pub struct ProtocolEngine<S = Box<dyn SerialPort>> {
    terminal: SliderTerminal<S>,
    address: Address,
}

impl<S: Read + Write> ProtocolEngine<S> {
    pub fn new(terminal: SliderTerminal<S>, address: Address) -> Self {
        Self { terminal, address }
    }

    fn transmit(
        &mut self,
        instruction: Instruction,
        payload: Payload,
    ) -> Result<(), TerminalError> {
        log::debug!("CMD: {}, ADDR: {}", instruction.as_str(), self.address);
        let frame = codec::encode(self.address, instruction, payload);
        self.terminal.send(&frame)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn query_status(&mut self) -> Result<Response, TerminalError> {
        self.transmit(Instruction::GetStatus, Payload::Empty)?;
        let frame = self.terminal.receive()?;
        Ok(codec::decode(&frame))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn move_absolute(&mut self, position_index: usize) -> Result<Response, TerminalError> {
        let steps = position_index as u32 * STEPS_PER_POSITION;
        self.transmit(Instruction::MoveAbsolute, Payload::Steps(steps))?;
        self.query_status()
    }

    /// Send a bare instruction, then poll status.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn command(&mut self, instruction: Instruction) -> Result<Response, TerminalError> {
        self.transmit(instruction, Payload::Empty)?;
        self.query_status()
    }

    /// Inter-operation pause of one settle delay.
    pub fn pause(&self) {
        self.terminal.settle();
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{DeviceStatus, StatusOutcome};
    use crate::test_support::MockPort;
    use std::time::Duration;

    fn engine(port: &MockPort) -> ProtocolEngine<MockPort> {
        let terminal =
            SliderTerminal::from_port(port.clone(), Duration::ZERO, Duration::from_millis(20));
        ProtocolEngine::new(terminal, Address::default())
    }

    #[test]
    fn test_query_status() {
        let port = MockPort::new();
        port.reply("0GS00");
        let mut engine = engine(&port);

        let response = engine.query_status().unwrap();

        assert_eq!(response, Response::Status(StatusOutcome::Known(DeviceStatus::Ready)));
        assert_eq!(port.sent(), vec!["0gs"]);
    }

    #[test]
    fn test_move_absolute_polls_status() {
        let port = MockPort::new();
        port.reply("0GS00");
        let mut engine = engine(&port);

        engine.move_absolute(2).unwrap();

        assert_eq!(port.sent(), vec!["0ma00000040", "0gs"]);
        assert_eq!(engine.address().as_char(), '0');
    }

    #[test]
    fn test_move_absolute_returns_poll_answer() {
        let port = MockPort::new();
        port.reply("0GS02");
        let mut engine = engine(&port);

        let response = engine.move_absolute(3).unwrap();

        assert_eq!(
            response,
            Response::Status(StatusOutcome::Known(DeviceStatus::MechanicalTimeout))
        );
        assert_eq!(port.sent()[0], "0ma00000060");
    }

    #[test]
    fn test_command_sends_instruction_then_status() {
        let port = MockPort::new();
        port.reply("0PO00000020");
        let mut engine = engine(&port);

        let response = engine.command(Instruction::MoveForward).unwrap();

        assert_eq!(response, Response::Position(32));
        assert_eq!(port.sent(), vec!["0fw", "0gs"]);
    }

    #[test]
    fn test_silent_device_times_out() {
        let port = MockPort::new();
        let mut engine = engine(&port);

        assert!(matches!(
            engine.query_status(),
            Err(TerminalError::Timeout { .. })
        ));
    }
}
