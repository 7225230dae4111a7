//! Operation boundary macros
//!
//! Every repository operation is bracketed by a start event and either an
//! end or an end_error event, all carrying `component`, `op` and `event`.
//! Any further `key = value` fields (usually `table`) are passed through to
//! `tracing` unchanged. The macros resolve `tracing` and the schema constants
//! through this crate, so callers need no extra dependencies.

/// Shared expansion; `$level` is a `tracing` level macro name
#[doc(hidden)]
#[macro_export]
macro_rules! __log_op {
    ($level:ident, $op:expr, $event:expr $(, $($field:tt)*)?) => {
        $crate::__private::tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $event,
            $($($field)*)?
        )
    };
}

/// Log the start of an operation, at debug
///
/// # Example
///
/// ```
/// # use bookkeeper_core::log_op_start;
/// log_op_start!("repo_add");
/// log_op_start!("repo_add", table = "expense");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_op!(
            debug,
            $op,
            $crate::__private::schema::EVENT_START
            $(, $($field)*)?
        )
    };
}

/// Log the successful end of an operation, at info
///
/// `duration_ms` comes first and is required.
///
/// # Example
///
/// ```
/// # use bookkeeper_core::log_op_end;
/// log_op_end!("repo_add", duration_ms = 3);
/// log_op_end!("repo_add", duration_ms = 3, table = "expense", row_count = 1);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_op!(
            info,
            $op,
            $crate::__private::schema::EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Log a failed operation, at error
///
/// The error is converted into an `ExError`, so the event carries its
/// canonical kind and code. A pk carried by the error is logged as
/// `pk`; pass `table` explicitly, it is not taken from the error.
///
/// # Example
///
/// ```
/// # use bookkeeper_core::{log_op_error, errors::BookkeeperError};
/// let err = BookkeeperError::NotFound { table: "expense".to_string(), pk: 7 };
/// log_op_error!("repo_delete", err, duration_ms = 1, table = "expense");
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        match ex_err.pk() {
            Some(pk) => $crate::__log_op!(
                error,
                $op,
                $crate::__private::schema::EVENT_END_ERROR,
                duration_ms = $duration,
                err_kind = ?ex_err.kind(),
                err_code = ex_err.code(),
                pk = pk
                $(, $($field)*)?
            ),
            None => $crate::__log_op!(
                error,
                $op,
                $crate::__private::schema::EVENT_END_ERROR,
                duration_ms = $duration,
                err_kind = ?ex_err.kind(),
                err_code = ex_err.code()
                $(, $($field)*)?
            ),
        }
    }};
}
