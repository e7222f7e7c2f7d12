//! # Events Module
//!
//! Progress reporting for long batch runs.
//!
//! The core emits [`Event`]s through an [`EventSender`]; the CLI (or any other
//! front end) drains the matching [`EventReceiver`] on its own thread.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Measure(MeasureEvent::Progress(p)) = event {
//!             println!("Measured {}/{}", p.completed, p.total);
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
