use std::cell::RefCell;
use std::rc::Rc;

use reactor_core::{Device, PassOutcome, RegistryError, SensorHandle};
use reactor_traits::{AnalogInput, BoxError};

// Each channel reads `channel * 100 + offset`; channels in `dead` fail.
#[derive(Default)]
struct ChannelInput {
    offset: i32,
    dead: Vec<u8>,
}

impl AnalogInput for ChannelInput {
    fn read(&mut self, channel: u8) -> Result<i32, BoxError> {
        if self.dead.contains(&channel) {
            return Err(Box::new(std::io::Error::other("channel not responding")));
        }
        Ok(i32::from(channel) * 100 + self.offset)
    }
}

#[test]
fn sensors_read_their_own_channel() {
    let mut dev: Device<_> = Device::new(ChannelInput::default(), 4);
    let a = dev.new_analog_sensor(1).unwrap();
    let b = dev.new_analog_sensor(3).unwrap();
    dev.update();
    assert_eq!(dev.analog_sensor(a).unwrap().value(), 100);
    assert_eq!(dev.analog_sensor(b).unwrap().value(), 300);
}

#[test]
fn update_fans_out_in_registration_order() {
    let mut dev: Device<_> = Device::new(ChannelInput::default(), 4);
    let order = Rc::new(RefCell::new(Vec::new()));
    for ch in [2, 0, 5] {
        let h = dev.new_analog_sensor(ch).unwrap();
        let sink = Rc::clone(&order);
        dev.analog_sensor(h).unwrap().on_change(move |v| sink.borrow_mut().push(v));
    }
    dev.update();
    dev.with_input(|input| input.offset = 7);
    dev.update();
    assert_eq!(*order.borrow(), vec![207, 7, 507]);
}

#[test]
fn outcomes_are_reported_per_handle() {
    let mut dev: Device<_> = Device::new(ChannelInput::default(), 2);
    dev.new_analog_sensor(0).unwrap();
    dev.new_analog_sensor(1).unwrap();
    let mut seen = Vec::new();
    dev.update_with(|h, outcome| {
        seen.push((h.index(), matches!(outcome, PassOutcome::Initialized { .. })));
    });
    assert_eq!(seen, vec![(0, true), (1, true)]);
}

#[test]
fn registry_exhaustion_is_an_error() {
    let mut dev: Device<_> = Device::new(ChannelInput::default(), 2);
    dev.new_analog_sensor(0).unwrap();
    dev.new_analog_sensor(1).unwrap();
    assert_eq!(
        dev.new_analog_sensor(2),
        Err(RegistryError::Exhausted { capacity: 2 })
    );
    assert_eq!(dev.len(), 2);
}

#[test]
fn unknown_handle_is_an_error() {
    let mut dev: Device<_> = Device::new(ChannelInput::default(), 2);
    dev.new_analog_sensor(0).unwrap();
    let err = dev.analog_sensor(SensorHandle::new(1)).unwrap_err();
    assert_eq!(err, RegistryError::InvalidHandle(1));
}

#[test]
fn capacity_is_capped_at_handle_space() {
    let dev: Device<_> = Device::new(ChannelInput::default(), 1_000);
    assert_eq!(dev.capacity(), 255);
}

#[test]
fn update_counts_sensors_that_failed_to_read() {
    let mut dev: Device<_> = Device::new(ChannelInput::default(), 3);
    let a = dev.new_analog_sensor(0).unwrap();
    let b = dev.new_analog_sensor(1).unwrap();
    dev.new_analog_sensor(2).unwrap();
    assert_eq!(dev.update(), 0);

    dev.with_input(|input| {
        input.dead = vec![1, 2];
        input.offset = 5;
    });
    assert_eq!(dev.update(), 2);
    assert_eq!(dev.analog_sensor(a).unwrap().value(), 5);
    assert_eq!(dev.analog_sensor(b).unwrap().value(), 100, "failed pass keeps state");

    dev.with_input(|input| input.dead.clear());
    assert_eq!(dev.update(), 0);
    assert_eq!(dev.analog_sensor(b).unwrap().value(), 105);
}
