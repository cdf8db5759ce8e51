//! `invite` - RSVP backend for a single-event invitation site
//!
//! Guests submit a name and whether they are attending; the host lists and
//! prunes the responses. This library provides the storage backends, the
//! HTTP endpoint and the configuration shared by the `invited` server and
//! the client wrapper.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod notify;
pub mod server;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use model::{Attending, NewRsvp, Rsvp};
pub use storage::{open_shared_store, open_store, Backend, RsvpList, RsvpStore, StorageStats};
