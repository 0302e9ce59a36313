//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (`Clock`)
//! - Input listener lifetime
//! - Initialization retries

pub mod init;
pub mod input;
pub mod time;

pub use init::{InitError, RetryPolicy};
pub use input::{Attachment, Release};
pub use time::{Clock, ManualClock};
#[cfg(not(target_arch = "wasm32"))]
pub use time::SystemClock;
