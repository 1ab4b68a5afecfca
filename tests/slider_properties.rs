mod common;

use common::{config, homed_slider};
use ell9k_rs::codec::{decode, encode, Address, Instruction, Payload, Response};
use ell9k_rs::test_support::MockPort;
use ell9k_rs::{Field, Slider, SliderConfig, SliderError, MAX_POS};

#[test]
fn set_position_keeps_filter_in_sync() {
    let (mut slider, device) = homed_slider();

    for index in 0..=MAX_POS {
        device.reply("0GS00");
        slider.set_position(index as i64);

        assert_eq!(slider.get_position(), index);
        assert_eq!(slider.get_filter(), slider.get_filter_list()[index]);
    }
}

#[test]
fn forward_at_last_slot_does_not_touch_device() {
    let (mut slider, device) = homed_slider();
    device.reply("0GS00");
    slider.set_position(MAX_POS as i64);
    device.clear_sent();

    slider.forward();

    assert!(device.sent().is_empty());
    assert_eq!(slider.get_position(), MAX_POS);
}

#[test]
fn backward_at_first_slot_does_not_touch_device() {
    let (mut slider, device) = homed_slider();

    slider.backward();

    assert!(device.sent().is_empty());
    assert_eq!(slider.get_position(), 0);
    assert_ne!(slider.get_console(), "no error");
}

#[test]
fn boundary_messages_name_the_direction() {
    let (mut slider, device) = homed_slider();
    slider.backward();
    let at_start = slider.get_console().to_string();

    device.reply("0GS00");
    slider.set_position(MAX_POS as i64);
    slider.forward();
    let at_end = slider.get_console().to_string();

    assert_ne!(at_start, at_end);
}

#[test]
fn reset_homes_even_when_not_ready() {
    let (mut slider, device) = homed_slider();
    device.reply("0GS00");
    slider.set_position(2);
    device.reply("0GS0B");
    slider.refresh_status();
    assert!(!slider.is_ready());

    device.reply("0GS00");
    slider.reset();

    assert_eq!(slider.get_position(), 0);
    assert_eq!(slider.get_filter(), "filter_1");
    assert!(slider.is_ready());
}

#[test]
fn reset_homes_when_device_stays_silent() {
    let device = MockPort::new();
    let mut slider = Slider::from_port(device.clone(), &config());
    assert!(!slider.is_ready());

    slider.reset();

    assert_eq!(slider.get_position(), 0);
    assert_eq!(slider.get_filter(), slider.get_filter_list()[0]);
}

#[test]
fn position_report_decodes_step_count() {
    assert_eq!(decode(b"0PO0000001F"), Response::Position(31));

    let (mut slider, device) = homed_slider();
    device.reply("0PO0000001F");
    slider.refresh_status();
    assert_eq!(slider.motor_position(), 31);
    assert_eq!(slider.get_status(), "Position: 31");
}

#[test]
fn ready_code_sets_ready_and_clears_console() {
    let device = MockPort::new();
    let mut slider = Slider::from_port(device.clone(), &config());
    assert!(!slider.is_ready());

    device.reply("0GS00");
    slider.refresh_status();

    assert!(slider.is_ready());
    assert_eq!(slider.get_console(), "no error");
}

#[test]
fn short_frame_leaves_readiness_alone() {
    assert!(matches!(decode(b"0P"), Response::Malformed(_)));

    let (mut slider, device) = homed_slider();
    device.reply("0P");
    slider.refresh_status();
    assert!(slider.is_ready());

    let device = MockPort::new();
    let mut slider = Slider::from_port(device.clone(), &config());
    device.reply("0P");
    slider.refresh_status();
    assert!(!slider.is_ready());
}

#[test]
fn move_absolute_payload_is_zero_padded_hex() {
    let frame = encode(Address::default(), Instruction::MoveAbsolute, Payload::Steps(64));
    assert_eq!(&frame[3..], b"00000040");

    let (mut slider, device) = homed_slider();
    device.reply("0GS00");
    slider.set_position(2);
    assert_eq!(device.sent(), vec!["0ma00000040", "0gs"]);
}

#[test]
fn unknown_filter_name_is_rejected() {
    let (mut slider, device) = homed_slider();
    device.reply("0GS00");
    slider.set_position(1);
    device.clear_sent();

    let changed = slider.set_filter("nonexistent");

    assert!(device.sent().is_empty());
    assert_eq!(slider.get_position(), 1);
    assert!(slider.get_console().contains("could not be identified"));
    assert!(changed.contains(Field::Console));
    assert!(!changed.contains(Field::Position));
}

#[test]
fn rename_is_visible_in_list_and_current_filter() {
    let (mut slider, device) = homed_slider();
    device.reply("0GS00");
    slider.set_position(1);

    slider.rename_filter(1, "X");
    assert_eq!(slider.get_filter_list()[1], "X");
    assert_eq!(slider.get_filter(), "X");

    slider.rename_filter(2, "Y");
    assert_eq!(slider.get_filter_list()[2], "Y");
    assert_eq!(slider.get_filter(), "X");
}

#[test]
fn missing_port_fails_construction() {
    let result = Slider::connect(&SliderConfig::new("/nonexistent/tty"));

    match result {
        Err(SliderError::Connection { port, .. }) => assert_eq!(port, "/nonexistent/tty"),
        Err(other) => unreachable!("expected a connection error, got {other}"),
        Ok(_) => unreachable!("opened a port that does not exist"),
    }
}
