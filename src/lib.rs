//! An async client for the Last.fm web API.
//!
//! The crate exposes typed lookups for artists, albums, tracks, tags and
//! users, and lazy pagination over every listing endpoint. Nothing is
//! fetched until a paginator is iterated, and iteration stops permanently
//! once the API runs out of results.
//!
//! The HTTP transport is injected, so any implementation of
//! [`http_client::HttpClient`] works, including canned transports in tests.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use lastfm_api::{AsyncPaginatedIterator, Client, PageOptions};
//!
//! #[tokio::main]
//! async fn main() -> lastfm_api::Result<()> {
//!     let client = Client::new(
//!         "your-api-key",
//!         Box::new(http_client::native::NativeClient::new()),
//!     );
//!
//!     // A single lookup.
//!     let artist = client.get_artist_info("Radiohead", &Default::default()).await?;
//!     println!("{} has {} listeners", artist.name, artist.listeners);
//!
//!     // A lazy, bounded listing.
//!     let mut chart = client.chart_top_artists(PageOptions {
//!         max: Some(100),
//!         ..Default::default()
//!     })?;
//!     while let Some(entry) = chart.next().await? {
//!         println!("{}", entry.name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Pagination
//!
//! Paged methods return a [`Paginator`]; [`MappedPaginator`] and
//! [`FilteredPaginator`] layer transformation and filtering on top of any
//! [`AsyncPaginatedIterator`] without changing when pages are fetched:
//!
//! ```rust,no_run
//! # use lastfm_api::{AsyncPaginatedIterator, Client, PageOptions};
//! # #[tokio::main]
//! # async fn main() -> lastfm_api::Result<()> {
//! # let client = Client::new("k", Box::new(http_client::native::NativeClient::new()));
//! let mut artists = client.search_artists("mogwai", PageOptions::default())?;
//! let names = artists.map(|artist| artist.name).take(20).await?;
//! assert!(names.len() <= 20);
//! # Ok(())
//! # }
//! ```

pub mod album;
pub mod artist;
pub mod chart;
pub mod client;
pub mod error;
pub mod http;
pub mod image;
pub mod paginator;
mod parsing;
pub mod retry;
pub mod tag;
pub mod track;
pub mod user;
pub mod wiki;

pub use album::Album;
pub use artist::Artist;
pub use chart::WeeklyChart;
pub use client::{Client, InfoOptions};
pub use error::LastFmError;
pub use http::HttpClient;
pub use image::{Image, ImageSize};
pub use paginator::{
    AsyncPaginatedIterator, Exhausted, FetchError, FilteredPaginator, MappedPaginator, PageFn,
    PageOptions, Paginator, DEFAULT_PAGE_SIZE, MAX_PAGES,
};
pub use retry::{RetryConfig, RetryResult};
pub use tag::Tag;
pub use track::Track;
pub use user::{Period, RecentTracksOptions, User};
pub use wiki::Wiki;

#[cfg(feature = "mock")]
pub use paginator::MockAsyncPaginatedIterator;

/// Convenient result type for API operations.
pub type Result<T> = std::result::Result<T, LastFmError>;
