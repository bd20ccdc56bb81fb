//! # agriwatch-adapters
//!
//! Network collaborators for the agriwatch monitoring stack.
//!
//! This crate wraps the two external services the dashboard talks to:
//!
//! - **Snapshot readers** - one read operation returning the entire current
//!   state tree, either straight from the realtime database
//!   ([`FirebaseSource`]) or through the agriwatch proxy ([`ProxySource`])
//! - **Classification client** - the leaf-disease prediction service
//!   ([`ClassifierClient`]), with both a typed call and a verbatim
//!   pass-through used by the proxy endpoint
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use agriwatch_adapters::FirebaseSource;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = FirebaseSource::builder()
//!         .database_url("https://mini-project.firebasedatabase.app")
//!         .build();
//!
//!     let snapshot = source.read().await?;
//!     println!("{} temperature records", snapshot.mqtt.temperature.len());
//!     Ok(())
//! }
//! ```

pub mod classifier;
pub mod error;
pub mod firebase;
pub mod proxy;

pub use classifier::ClassifierClient;
pub use error::AdapterError;
pub use firebase::FirebaseSource;
pub use proxy::ProxySource;

// Re-export types for convenience
pub use agriwatch_types::{Prediction, Snapshot};
