//! # Event system for SENSIM
//!
//! Typed, multi-subscriber notifications used to hand sensor data from a
//! rendering backend to its consumers:
//!
//! - **Event**: ordered list of callbacks for one [`EventSignature`]
//! - **Connection**: owned subscription handle, dropping it unsubscribes
//! - **EventRegistry**: string key -> typed channel, process-wide or injected
//!
//! ```rust
//! use sensim_core::events::{Event, EventSignature};
//!
//! enum Temperature {}
//! impl EventSignature for Temperature {
//!     type Args<'a> = f64;
//!     const NAME: &'static str = "Temperature";
//! }
//!
//! let event = Event::<Temperature>::new();
//! let connection = event.connect(|celsius: &f64| println!("{celsius} C"));
//! event.broadcast(&21.5);
//! drop(connection);
//! ```

pub mod channel;
pub mod connection;
pub mod registry;

pub use channel::{Callback, Event, EventMetrics, EventSignature};
pub use connection::{Connection, ConnectionId};
pub use registry::EventRegistry;
