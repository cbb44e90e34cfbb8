//! Event values used as transition triggers.

use std::fmt::Debug;
use std::hash::Hash;

/// Trait for event types that can drive a machine.
///
/// An event is an opaque, host-chosen value. The machine only needs to clone
/// it into its table, compare it for lookups and print it in diagnostics, so
/// any `Clone + Eq + Hash + Debug` type qualifies: characters, integers,
/// fieldless enums, strings, or richer payload-free enums.
///
/// Zero-sized types carry no information and are rejected when a
/// [`Machine`](crate::runtime::Machine) is instantiated with them. That covers
/// `()`, but also unit structs such as `struct Tick;` and single-variant
/// enums: a type with only one value gives the machine nothing to key its
/// table on, since every registered transition would answer the same event.
/// A machine that reacts to a single kind of event still needs a value to
/// dispatch on; give the event type a field or a second variant, or use a
/// `char` or integer.
///
/// ```rust,compile_fail
/// use switchyard::runtime::Machine;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// struct Tick;
///
/// let machine: Machine<Tick> = Machine::new();
/// ```
///
/// # Example
///
/// ```rust
/// use switchyard::core::Event;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Key {
///     Pressed,
///     CapsLock,
/// }
///
/// fn accepts<E: Event>(_: E) {}
///
/// accepts('q');
/// accepts(42u8);
/// accepts(Key::Pressed);
/// accepts(Key::CapsLock);
/// ```
pub trait Event: Clone + Eq + Hash + Debug {}

impl<T> Event for T where T: Clone + Eq + Hash + Debug {}
