//! Utility macros used internally by the client crate.

/// Returns early with `$error` when `$predicate` does not hold.
///
/// ```ignore
/// ensure!(!headers.is_empty(), HttpClientError::malformed("no headers in response"));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
