use std::{cell::RefCell, rc::Rc};

use broadside::{Channel, SubscribeConflict};

#[test]
fn delivers_to_subscribers_in_registration_order() {
    let mut channel: Channel<u32> = Channel::new("test topic");
    let seen = Rc::new(RefCell::new(Vec::new()));

    let first = Rc::clone(&seen);
    channel
        .subscribe("first", move |value: &u32| first.borrow_mut().push(("first", *value)))
        .unwrap();
    let second = Rc::clone(&seen);
    channel
        .subscribe("second", move |value: &u32| second.borrow_mut().push(("second", *value)))
        .unwrap();

    channel.emit(&7);
    assert_eq!(*seen.borrow(), vec![("first", 7), ("second", 7)]);
}

#[test]
fn duplicate_listener_id_is_rejected() {
    let mut channel: Channel<u32> = Channel::new("test topic");
    channel.subscribe("listener", |_| {}).unwrap();

    let err = channel.subscribe("listener", |_| {}).unwrap_err();
    assert_eq!(err.conflict(), SubscribeConflict::DuplicateId);
    assert_eq!(err.topic(), "test topic");
    assert_eq!(err.listener(), "listener");
}

#[test]
fn unsubscribe_unknown_id_is_rejected() {
    let mut channel: Channel<u32> = Channel::new("test topic");
    let err = channel.unsubscribe("nobody").unwrap_err();
    assert_eq!(err.conflict(), SubscribeConflict::UnknownId);
}

#[test]
fn unsubscribed_listener_stops_receiving() {
    let mut channel: Channel<u32> = Channel::new("test topic");
    let seen = Rc::new(RefCell::new(Vec::new()));

    let listener = Rc::clone(&seen);
    channel
        .subscribe("listener", move |value: &u32| listener.borrow_mut().push(*value))
        .unwrap();

    channel.emit(&1);
    channel.unsubscribe("listener").unwrap();
    channel.emit(&2);

    assert_eq!(*seen.borrow(), vec![1]);
    // The id is free again after removal.
    channel.subscribe("listener", |_| {}).unwrap();
}
