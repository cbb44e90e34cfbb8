//! Keyboard State Machine
//!
//! A keyboard that wears out after a fixed number of key presses.
//!
//! Key concepts:
//! - Guarded self-loops sharing an event with a guarded exit
//! - A counter mutated by transition actions and read by guards
//! - Stopping the machine from inside an entry effect
//! - Structured dispatch logs through `tracing`
//!
//! Run with: RUST_LOG=switchyard=debug cargo run --example keyboard

use std::cell::Cell;
use std::rc::Rc;
use switchyard::builder::simple_transition;
use switchyard::{Guard, Machine, MachineConfig, State, Transition};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum Key {
    Pressed,
    CapsLock,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Keyboard State Machine ===\n");

    let machine = Rc::new(Machine::with_config(
        MachineConfig::default().record_history(true).history_capacity(8),
    ));
    let remaining = Rc::new(Cell::new(12u32));

    let handle = Rc::downgrade(&machine);
    let standard = machine.add_state(State::named("standard"));
    let caps_locked = machine.add_state(State::named("caps_locked"));
    let broken = machine.add_state(State::named("broken").on_enter(move || {
        println!("  keyboard broke, stopping");
        if let Some(machine) = handle.upgrade() {
            machine.stop();
        }
    }));

    let reader = Rc::clone(&remaining);
    let keys_remaining = Guard::new(move || reader.get() > 0);

    for (from, to) in [(standard, caps_locked), (caps_locked, standard)] {
        machine
            .register(simple_transition(from, to, Key::CapsLock))
            .expect("states were added above");
    }
    for mode in [standard, caps_locked] {
        let counter = Rc::clone(&remaining);
        machine
            .register(
                Transition::new(mode, mode, Key::Pressed)
                    .with_guard(keys_remaining.clone())
                    .add_action(move || counter.set(counter.get() - 1)),
            )
            .expect("states were added above");
        machine
            .register(
                Transition::new(mode, broken, Key::Pressed).with_guard(keys_remaining.negate()),
            )
            .expect("states were added above");
    }

    machine.start(standard).expect("machine is stopped");

    let script = [
        Key::Pressed,
        Key::Pressed,
        Key::CapsLock,
        Key::Pressed,
        Key::CapsLock,
    ];
    let mut presses = 0;
    for key in script.iter().cycle() {
        if !machine.is_running() {
            break;
        }
        machine.notify(*key);
        if *key == Key::Pressed {
            presses += 1;
        }
    }

    println!("Key presses sent: {presses}");
    println!("Keys left: {}", remaining.get());
    println!(
        "Final state: {}",
        machine
            .current_state()
            .and_then(|id| machine.state_name(id))
            .unwrap_or_default()
    );

    println!("\nLast transitions:");
    for record in machine.history().records() {
        println!(
            "  {:>12} -> {:<12} on {:?}",
            machine.state_name(record.from).unwrap_or_default(),
            machine.state_name(record.to).unwrap_or_default(),
            record.event
        );
    }

    println!("\n=== Example Complete ===");
}
