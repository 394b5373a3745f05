//! Operation boundary macros
//!
//! Each repository call logs `start` on entry and exactly one of `end` or
//! `end_error` on exit. Extra `key = value` fields are passed straight to
//! `tracing`, so callers tag events with `user_id` and friends.

/// Log entry into `op`
///
/// ```
/// # use hoard_core::log_op_start;
/// log_op_start!("create_purchase");
/// log_op_start!("create_purchase", user_id = "alice");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log a normal exit from `op`, including expected `NotFound`/`Conflict`
///
/// ```
/// # use hoard_core::log_op_end;
/// log_op_end!("get_vehicle", duration_ms = 2);
/// log_op_end!("get_vehicle", duration_ms = 2, outcome = "ERR_NOT_FOUND");
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $ms:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END,
            duration_ms = $ms,
        );
    };
    ($op:expr, duration_ms = $ms:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END,
            duration_ms = $ms,
            $($field)*
        );
    };
}

/// Log a failed exit from `op` at error level with the error's kind and code
///
/// `$err` is anything that converts into `HxError`.
///
/// ```
/// # use hoard_core::log_op_error;
/// # use hoard_core::errors::{HxError, HxErrorKind};
/// let err = HxError::new(HxErrorKind::Concurrency).with_message("database is locked");
/// log_op_error!("update_contract", err, duration_ms = 5000);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $ms:expr) => {
        $crate::log_op_error!($op, $err, duration_ms = $ms,)
    };
    ($op:expr, $err:expr, duration_ms = $ms:expr, $($field:tt)*) => {{
        let failure: $crate::errors::HxError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END_ERROR,
            duration_ms = $ms,
            err.kind = ?failure.kind(),
            err.code = failure.code(),
            error = %failure,
            $($field)*
        );
    }};
}
