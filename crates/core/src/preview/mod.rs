mod error;
mod ordering;
mod truncate;
mod types;

pub use error::{CursorError, PageSizeError};
pub use ordering::{sort_by_order, SortOrder};
pub use truncate::{truncate_chars, utf8_prefix};
pub use types::{
    validate_page_size, PreviewCursor, PreviewFilters, PreviewPage, PreviewRecord, PreviewRow,
    PreviewSet, DEFAULT_PAGE_SIZE, DEFAULT_PREVIEW_LIMIT, MAX_PREVIEW_LIMIT, PREVIEW_FETCH_BYTES,
    PREVIEW_FETCH_CHARS, PREVIEW_MAX_CHARS,
};
