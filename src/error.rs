use thiserror::Error;

/// Error types for Last.fm API operations.
///
/// This enum covers all failures that can surface from the client: network
/// issues, error payloads returned by the API, malformed responses, rate
/// limiting, and invalid local configuration.
///
/// # Error Handling Examples
///
/// ```rust,no_run
/// use lastfm_api::{Client, LastFmError};
///
/// #[tokio::main]
/// async fn main() {
///     let client = Client::new(
///         "api-key",
///         Box::new(http_client::native::NativeClient::new()),
///     );
///
///     match client.get_artist_info("Radiohead", &Default::default()).await {
///         Ok(artist) => println!("{} has {} listeners", artist.name, artist.listeners),
///         Err(LastFmError::Api { code, message }) => {
///             eprintln!("API rejected the request ({code}): {message}");
///         }
///         Err(LastFmError::RateLimit { retry_after }) => {
///             eprintln!("Rate limited, retry in {retry_after} seconds");
///         }
///         Err(e) => eprintln!("Other error: {e}"),
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum LastFmError {
    /// HTTP/network related errors.
    ///
    /// This includes connection failures, timeouts, DNS errors, and other
    /// low-level networking issues.
    #[error("HTTP error: {0}")]
    Http(String),

    /// An error payload returned by the Last.fm API.
    ///
    /// The API reports failures as a JSON body containing `error` (a numeric
    /// code) and `message`, usually alongside a non-200 status.
    #[error("API error {code}: {message}")]
    Api {
        /// Numeric error code from the response body
        code: u32,
        /// Human-readable message from the response body
        message: String,
    },

    /// Failed to parse a Last.fm response.
    ///
    /// The API's JSON is loosely shaped; this is returned when a payload is
    /// missing a field the client genuinely requires.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Rate limiting from Last.fm.
    ///
    /// The `retry_after` field indicates how many seconds to wait before the
    /// next request attempt. Requests issued through the client are retried
    /// automatically with backoff before this surfaces.
    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimit {
        /// Number of seconds to wait before retrying
        retry_after: u64,
    },

    /// Invalid construction parameters.
    ///
    /// Fatal at construction time; nothing has been fetched when this is
    /// returned (e.g. a paginator item ceiling of zero).
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// An argument outside the range the API accepts.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File system I/O errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
