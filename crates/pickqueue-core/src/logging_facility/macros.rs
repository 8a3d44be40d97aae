//! Canonical logging macros
//!
//! Every engine operation is bracketed by exactly one start event and one
//! end (or end_error) event carrying the same `op`.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use pickqueue_core::log_op_start;
/// log_op_start!("add_member");
/// log_op_start!("add_member", member = "Sarah");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use pickqueue_core::log_op_end;
/// log_op_end!("advance_queue", duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// Accepts anything convertible into `ExError` and emits its kind and code.
/// Storage failures are logged at error level; domain rejections (duplicate
/// member, wrong picker, ...) at warn.
///
/// ```
/// # use pickqueue_core::{log_op_error, errors::QueueError};
/// log_op_error!("defer_turn", QueueError::EmptyQueue, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {
        $crate::log_op_error!($op, $err, duration_ms = $duration,)
    };
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        use $crate::errors::ExError;
        let ex_err: ExError = $err.into();
        if ex_err.kind().is_retryable() {
            tracing::error!(
                component = module_path!(),
                op = $op,
                event = $crate::core_types::schema::EVENT_END_ERROR,
                duration_ms = $duration,
                err_kind = ?ex_err.kind(),
                err_code = ex_err.code(),
                err_message = ex_err.message(),
                $($field)*
            );
        } else {
            tracing::warn!(
                component = module_path!(),
                op = $op,
                event = $crate::core_types::schema::EVENT_END_ERROR,
                duration_ms = $duration,
                err_kind = ?ex_err.kind(),
                err_code = ex_err.code(),
                $($field)*
            );
        }
    }};
}
