/// Centralized logging macros for the worker and bridge
///
/// Thin wrappers over `tracing` so every crate logs through one spelling and
/// needs no direct `tracing` dependency. Events carry the `actor` target, so
/// `RUST_LOG=actor=debug` isolates worker-loop traffic.
///
/// Log debug-level message
///
/// # Example
/// ```
/// use actor_runtime::actor_debug;
/// actor_debug!("ControlActor: {:?} → {:?}", "Closed", "Connecting");
/// ```
#[macro_export]
macro_rules! actor_debug {
    ($($arg:tt)*) => {
        $crate::tracing::debug!(target: "actor", $($arg)*)
    };
}

/// Log info-level message
///
/// Use for state changes and operator-facing events
#[macro_export]
macro_rules! actor_info {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "actor", $($arg)*)
    };
}

/// Log warning-level message
///
/// Use for recoverable errors: transport failures, rejected acks
#[macro_export]
macro_rules! actor_warn {
    ($($arg:tt)*) => {
        $crate::tracing::warn!(target: "actor", $($arg)*)
    };
}

/// Log error-level message
///
/// Use for failures a handler could not recover from
#[macro_export]
macro_rules! actor_error {
    ($($arg:tt)*) => {
        $crate::tracing::error!(target: "actor", $($arg)*)
    };
}
