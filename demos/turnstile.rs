//! Turnstile State Machine
//!
//! This example demonstrates re-entrant event dispatch.
//!
//! Key concepts:
//! - Building transitions with `TransitionBuilder`
//! - Raising an event from inside an entry effect
//! - Inspecting dispatch outcomes
//!
//! Run with: cargo run --example turnstile

use std::rc::Rc;
use switchyard::builder::TransitionBuilder;
use switchyard::{Dispatch, Machine, State};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum Input {
    Coin,
    Push,
    Timeout,
}

fn main() {
    println!("=== Turnstile State Machine ===\n");

    let machine = Rc::new(Machine::new());

    let locked = machine.add_state(State::named("locked").on_enter(|| println!("  [locked]")));
    let unlocked =
        machine.add_state(State::named("unlocked").on_enter(|| println!("  [unlocked]")));

    // Passing through re-locks the gate on its own.
    let handle = Rc::downgrade(&machine);
    let passing = machine.add_state(State::named("passing").on_enter(move || {
        println!("  [passing] raising Timeout");
        if let Some(machine) = handle.upgrade() {
            machine.notify(Input::Timeout);
        }
    }));

    let transitions = [
        TransitionBuilder::new()
            .from(locked)
            .to(unlocked)
            .on(Input::Coin)
            .then(|| println!("  coin accepted")),
        TransitionBuilder::new()
            .from(unlocked)
            .to(passing)
            .on(Input::Push),
        TransitionBuilder::new()
            .from(passing)
            .to(locked)
            .on(Input::Timeout),
    ];
    for builder in transitions {
        let transition = builder.build().expect("every field is set");
        machine.register(transition).expect("states were added above");
    }

    machine.start(locked).expect("machine is stopped");

    for input in [Input::Push, Input::Coin, Input::Push] {
        println!("notify({input:?})");
        match machine.notify(input) {
            Dispatch::Transitioned { from, to } => println!(
                "  moved {} -> {}",
                machine.state_name(from).unwrap_or_default(),
                machine.state_name(to).unwrap_or_default()
            ),
            Dispatch::Ignored => println!("  ignored"),
            Dispatch::NotRunning => println!("  machine stopped"),
        }
    }

    println!(
        "\nFinal state: {}",
        machine
            .current_state()
            .and_then(|id| machine.state_name(id))
            .unwrap_or_default()
    );

    machine.stop();
    println!("\n=== Example Complete ===");
}
