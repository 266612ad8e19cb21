//! Domain types shared by every strategy.

mod request;
mod url;

pub use request::{DEFAULT_QUALITY, DownloadRequest};
pub use url::{INVALID_URL_MESSAGE, UrlKind, ValidationResult, extract_spotify_id, validate_url};
