//! # Walnut Pair
//!
//! Estimates walnut dimensions from six orthogonal photographs and scores how
//! well two walnuts match.
//!
//! ## Core Philosophy
//! - **Measure, then trust** - Dimensions are validated before any comparison
//! - **Show WHY** - Every record keeps the per-axis and per-side evidence
//! - **No hidden models** - Embeddings come from a provider the caller supplies
//!
//! ## Architecture
//! The library is split into a core engine (UI-agnostic) and presentation layers:
//! - `core` - Measurement and comparison engine
//! - `events` - Event-driven progress reporting
//! - `error` - User-friendly error types
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{Result, WalnutPairError};

/// Initialize tracing for the library
///
/// This should be called by the application entry point. Filtering follows
/// `RUST_LOG`. A second call leaves the first subscriber in place.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
