//! Structured logging for hoard
//!
//! Binaries call [`init`] once at startup. Library code never installs a
//! subscriber; it emits operation boundaries through the `log_op_*` macros
//! so every repository call produces the same `op`/`event` shape:
//!
//! ```rust
//! use hoard_core::{log_op_end, log_op_start};
//!
//! log_op_start!("list_vehicles", user_id = "alice");
//! log_op_end!("list_vehicles", duration_ms = 3, user_id = "alice");
//! ```
//!
//! Tests swap the subscriber for [`init_test_capture`] and assert on the
//! recorded events.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
