use thiserror::Error;

/// A page cursor supplied by a client could not be decoded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid preview cursor: {0:?}")]
pub struct CursorError(pub String);

/// A requested page size is zero or larger than any window.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Page size {size} out of range (1..={max})")]
pub struct PageSizeError {
    pub size: usize,
    pub max: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_error_display() {
        let error = CursorError("abc".to_string());
        assert_eq!(error.to_string(), "Invalid preview cursor: \"abc\"");
    }

    #[test]
    fn test_page_size_error_display() {
        let error = PageSizeError { size: 0, max: 200 };
        assert_eq!(error.to_string(), "Page size 0 out of range (1..=200)");
    }
}
