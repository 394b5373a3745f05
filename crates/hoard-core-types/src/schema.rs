//! Field and event names shared by the logging macros and log consumers
//!
//! Repository operations emit one `start` event and exactly one of `end`
//! or `end_error`. Tests and log pipelines match on these names, so they
//! are defined once here.

pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";

/// Owner of the records an operation touched; empty for store-wide ops
pub const FIELD_USER_ID: &str = "user_id";

/// Error code of an expected failure (`ERR_NOT_FOUND`, `ERR_CONFLICT`)
/// that still ended the operation normally
pub const FIELD_OUTCOME: &str = "outcome";

pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
