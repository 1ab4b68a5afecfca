use ell9k_rs::test_support::MockPort;
use ell9k_rs::{Slider, SliderConfig};
use std::time::Duration;

pub fn config() -> SliderConfig {
    SliderConfig::default()
        .settle_delay(Duration::ZERO)
        .read_timeout(Duration::from_millis(20))
}

/// A slider that homed successfully, with the homing traffic forgotten.
pub fn homed_slider() -> (Slider<MockPort>, MockPort) {
    let device = MockPort::new();
    device.reply("0GS00");
    let slider = Slider::from_port(device.clone(), &config());
    device.clear_sent();
    (slider, device)
}
