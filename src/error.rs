//! Error type for failed read operations.

/// Error produced when a host reader fires its error slot.
///
/// The wrapped host contract guarantees no structured error: at error
/// time the reader's result field holds whatever value the host chose to
/// leave there, possibly nothing. That value is carried here verbatim and
/// otherwise uninterpreted; classification (not-found, permission,
/// encoding) belongs to the host, not the adapter.
///
/// # Examples
///
/// ```rust
/// use readfuture::ReadFailure;
///
/// fn describe(err: &ReadFailure) -> String {
///     match err.value() {
///         Some(value) => format!("host reported: {value}"),
///         None => "host reported nothing".to_string(),
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("file read failed: {}", .value.as_deref().unwrap_or("<no result>"))]
pub struct ReadFailure {
    value: Option<String>,
}

impl ReadFailure {
    pub(crate) fn new(value: Option<String>) -> Self {
        Self { value }
    }

    /// The reader's result field at the moment the error slot fired.
    #[inline]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Consume the failure, returning the raw host value.
    #[inline]
    pub fn into_value(self) -> Option<String> {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_failure_display_with_value() {
        let err = ReadFailure::new(Some("fileError".to_string()));
        assert_eq!(err.to_string(), "file read failed: fileError");
    }

    #[test]
    fn read_failure_display_without_value() {
        let err = ReadFailure::new(None);
        assert_eq!(err.to_string(), "file read failed: <no result>");
    }

    #[test]
    fn read_failure_exposes_raw_value() {
        let err = ReadFailure::new(Some("fileError".to_string()));
        assert_eq!(err.value(), Some("fileError"));
        assert_eq!(err.into_value(), Some("fileError".to_string()));
    }
}
