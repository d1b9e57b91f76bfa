//! High-level entry point for the API.
//!
//! [`Client`] wraps the transport-level [`HttpClient`] and exposes typed
//! lookups plus lazily paginated listings. Paged methods return a
//! [`Paginator`] that fetches nothing until it is iterated.

use crate::album::Album;
use crate::artist::Artist;
use crate::http::HttpClient;
use crate::paginator::{PageFn, PageOptions, Paginator};
use crate::tag::Tag;
use crate::track::Track;
use crate::user::User;
use crate::{parsing, LastFmError, Result};
use futures::FutureExt;
use serde_json::Value;
use std::sync::Arc;

/// Options shared by the info lookups.
#[derive(Debug, Clone, Default)]
pub struct InfoOptions {
    /// Ask the API to transparently correct misspelled names.
    pub autocorrect: Option<bool>,
    /// Include this user's playcount in the payload.
    pub username: Option<String>,
    /// Language for the wiki text, as an ISO 639 alpha-2 code.
    pub lang: Option<String>,
}

/// A Last.fm API client.
///
/// Cheap to clone; clones share the underlying transport.
///
/// # Examples
///
/// ```rust,no_run
/// use lastfm_api::{AsyncPaginatedIterator, Client, PageOptions};
///
/// #[tokio::main]
/// async fn main() -> lastfm_api::Result<()> {
///     let client = Client::new(
///         "api-key",
///         Box::new(http_client::native::NativeClient::new()),
///     );
///
///     let mut albums = client.search_albums(
///         "In Rainbows",
///         PageOptions { max: Some(50), ..Default::default() },
///     )?;
///     while let Some(album) = albums.next().await? {
///         println!("{} — {}", album.artist.as_deref().unwrap_or("?"), album.title);
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    http: Arc<HttpClient>,
}

impl Client {
    /// Create a client for the public API.
    pub fn new(api_key: impl Into<String>, transport: Box<dyn http_client::HttpClient>) -> Self {
        Self {
            http: Arc::new(HttpClient::new(api_key, transport)),
        }
    }

    /// Create a client against a custom API root, for tests or mirrors.
    pub fn with_base_url(
        api_key: impl Into<String>,
        transport: Box<dyn http_client::HttpClient>,
        base_url: String,
    ) -> Self {
        Self {
            http: Arc::new(HttpClient::with_base_url(api_key, transport, base_url)),
        }
    }

    /// Wrap a preconfigured transport-level client, e.g. one with a custom
    /// [`RetryConfig`](crate::RetryConfig).
    pub fn from_http(http: HttpClient) -> Self {
        Self {
            http: Arc::new(http),
        }
    }

    fn unwrap_payload<'a>(data: &'a Value, key: &str) -> Result<&'a Value> {
        data.get(key)
            .ok_or_else(|| LastFmError::Parse(format!("response is missing `{key}` payload")))
    }

    // -----------------------------------------------------------------
    // Info lookups
    // -----------------------------------------------------------------

    pub async fn get_artist_info(&self, artist: &str, options: &InfoOptions) -> Result<Artist> {
        let data = self
            .http
            .get_artist_info(
                Some(artist),
                None,
                options.autocorrect,
                options.username.as_deref(),
                options.lang.as_deref(),
            )
            .await?;
        Artist::from_json(Self::unwrap_payload(&data, "artist")?, Arc::clone(&self.http))
    }

    pub async fn get_artist_info_by_mbid(
        &self,
        mbid: &str,
        options: &InfoOptions,
    ) -> Result<Artist> {
        let data = self
            .http
            .get_artist_info(
                None,
                Some(mbid),
                options.autocorrect,
                options.username.as_deref(),
                options.lang.as_deref(),
            )
            .await?;
        Artist::from_json(Self::unwrap_payload(&data, "artist")?, Arc::clone(&self.http))
    }

    pub async fn get_album_info(
        &self,
        artist: &str,
        album: &str,
        options: &InfoOptions,
    ) -> Result<Album> {
        let data = self
            .http
            .get_album_info(
                Some(artist),
                Some(album),
                None,
                options.autocorrect,
                options.username.as_deref(),
                options.lang.as_deref(),
            )
            .await?;
        Album::from_json(Self::unwrap_payload(&data, "album")?, Arc::clone(&self.http))
    }

    pub async fn get_album_info_by_mbid(
        &self,
        mbid: &str,
        options: &InfoOptions,
    ) -> Result<Album> {
        let data = self
            .http
            .get_album_info(
                None,
                None,
                Some(mbid),
                options.autocorrect,
                options.username.as_deref(),
                options.lang.as_deref(),
            )
            .await?;
        Album::from_json(Self::unwrap_payload(&data, "album")?, Arc::clone(&self.http))
    }

    pub async fn get_track_info(
        &self,
        artist: &str,
        track: &str,
        options: &InfoOptions,
    ) -> Result<Track> {
        let data = self
            .http
            .get_track_info(
                Some(artist),
                Some(track),
                None,
                options.autocorrect,
                options.username.as_deref(),
            )
            .await?;
        Track::from_json(Self::unwrap_payload(&data, "track")?, Arc::clone(&self.http))
    }

    pub async fn get_track_info_by_mbid(
        &self,
        mbid: &str,
        options: &InfoOptions,
    ) -> Result<Track> {
        let data = self
            .http
            .get_track_info(
                None,
                None,
                Some(mbid),
                options.autocorrect,
                options.username.as_deref(),
            )
            .await?;
        Track::from_json(Self::unwrap_payload(&data, "track")?, Arc::clone(&self.http))
    }

    pub async fn get_tag_info(&self, tag: &str, lang: Option<&str>) -> Result<Tag> {
        let data = self.http.get_tag_info(tag, lang).await?;
        Tag::from_json(Self::unwrap_payload(&data, "tag")?, Arc::clone(&self.http))
    }

    pub async fn get_user_info(&self, user: &str) -> Result<User> {
        let data = self.http.get_user_info(user).await?;
        User::from_json(Self::unwrap_payload(&data, "user")?, Arc::clone(&self.http))
    }

    // -----------------------------------------------------------------
    // Paged listings
    // -----------------------------------------------------------------

    /// Search for albums by name.
    pub fn search_albums(
        &self,
        query: &str,
        options: PageOptions,
    ) -> Result<Paginator<'static, Album>> {
        let http = Arc::clone(&self.http);
        let query = query.to_string();
        let fetch: PageFn<'static, Album> = Box::new(move |page, limit| {
            let http = Arc::clone(&http);
            let query = query.clone();
            async move {
                let data = http.search_albums(&query, Some(limit), Some(page)).await?;
                parsing::list_at(&data, &["results", "albummatches", "album"])
                    .into_iter()
                    .map(|album| Album::from_json(album, Arc::clone(&http)))
                    .collect()
            }
            .boxed_local()
        });
        Paginator::with_options(fetch, options)
    }

    /// Search for artists by name.
    pub fn search_artists(
        &self,
        query: &str,
        options: PageOptions,
    ) -> Result<Paginator<'static, Artist>> {
        let http = Arc::clone(&self.http);
        let query = query.to_string();
        let fetch: PageFn<'static, Artist> = Box::new(move |page, limit| {
            let http = Arc::clone(&http);
            let query = query.clone();
            async move {
                let data = http.search_artists(&query, Some(limit), Some(page)).await?;
                parsing::list_at(&data, &["results", "artistmatches", "artist"])
                    .into_iter()
                    .map(|artist| Artist::from_json(artist, Arc::clone(&http)))
                    .collect()
            }
            .boxed_local()
        });
        Paginator::with_options(fetch, options)
    }

    /// Search for tracks by name.
    pub fn search_tracks(
        &self,
        query: &str,
        options: PageOptions,
    ) -> Result<Paginator<'static, Track>> {
        let http = Arc::clone(&self.http);
        let query = query.to_string();
        let fetch: PageFn<'static, Track> = Box::new(move |page, limit| {
            let http = Arc::clone(&http);
            let query = query.clone();
            async move {
                let data = http.search_tracks(&query, Some(limit), Some(page)).await?;
                parsing::list_at(&data, &["results", "trackmatches", "track"])
                    .into_iter()
                    .map(|track| Track::from_json(track, Arc::clone(&http)))
                    .collect()
            }
            .boxed_local()
        });
        Paginator::with_options(fetch, options)
    }

    /// Global artist chart.
    pub fn chart_top_artists(&self, options: PageOptions) -> Result<Paginator<'static, Artist>> {
        let http = Arc::clone(&self.http);
        let fetch: PageFn<'static, Artist> = Box::new(move |page, limit| {
            let http = Arc::clone(&http);
            async move {
                let data = http.get_chart_top_artists(Some(limit), Some(page)).await?;
                parsing::nested_list(&data, "artists", "artist")
                    .into_iter()
                    .map(|artist| Artist::from_json(artist, Arc::clone(&http)))
                    .collect()
            }
            .boxed_local()
        });
        Paginator::with_options(fetch, options)
    }

    /// Global tag chart.
    pub fn chart_top_tags(&self, options: PageOptions) -> Result<Paginator<'static, Tag>> {
        let http = Arc::clone(&self.http);
        let fetch: PageFn<'static, Tag> = Box::new(move |page, limit| {
            let http = Arc::clone(&http);
            async move {
                let data = http.get_chart_top_tags(Some(limit), Some(page)).await?;
                parsing::nested_list(&data, "tags", "tag")
                    .into_iter()
                    .map(|tag| Tag::from_json(tag, Arc::clone(&http)))
                    .collect()
            }
            .boxed_local()
        });
        Paginator::with_options(fetch, options)
    }

    /// Global track chart.
    pub fn chart_top_tracks(&self, options: PageOptions) -> Result<Paginator<'static, Track>> {
        let http = Arc::clone(&self.http);
        let fetch: PageFn<'static, Track> = Box::new(move |page, limit| {
            let http = Arc::clone(&http);
            async move {
                let data = http.get_chart_top_tracks(Some(limit), Some(page)).await?;
                parsing::nested_list(&data, "tracks", "track")
                    .into_iter()
                    .map(|track| Track::from_json(track, Arc::clone(&http)))
                    .collect()
            }
            .boxed_local()
        });
        Paginator::with_options(fetch, options)
    }

    /// Most popular artists in a country (ISO 3166-1 name).
    pub fn country_top_artists(
        &self,
        country: &str,
        options: PageOptions,
    ) -> Result<Paginator<'static, Artist>> {
        let http = Arc::clone(&self.http);
        let country = country.to_string();
        let fetch: PageFn<'static, Artist> = Box::new(move |page, limit| {
            let http = Arc::clone(&http);
            let country = country.clone();
            async move {
                let data = http
                    .get_geo_top_artists(&country, Some(limit), Some(page))
                    .await?;
                parsing::nested_list(&data, "topartists", "artist")
                    .into_iter()
                    .map(|artist| Artist::from_json(artist, Arc::clone(&http)))
                    .collect()
            }
            .boxed_local()
        });
        Paginator::with_options(fetch, options)
    }

    /// Most popular tracks in a country (ISO 3166-1 name).
    pub fn country_top_tracks(
        &self,
        country: &str,
        options: PageOptions,
    ) -> Result<Paginator<'static, Track>> {
        let http = Arc::clone(&self.http);
        let country = country.to_string();
        let fetch: PageFn<'static, Track> = Box::new(move |page, limit| {
            let http = Arc::clone(&http);
            let country = country.clone();
            async move {
                let data = http
                    .get_geo_top_tracks(&country, Some(limit), Some(page))
                    .await?;
                parsing::nested_list(&data, "tracks", "track")
                    .into_iter()
                    .map(|track| Track::from_json(track, Arc::clone(&http)))
                    .collect()
            }
            .boxed_local()
        });
        Paginator::with_options(fetch, options)
    }

    /// Every artist in a user's library.
    pub fn library_artists(
        &self,
        user: &str,
        options: PageOptions,
    ) -> Result<Paginator<'static, Artist>> {
        let http = Arc::clone(&self.http);
        let user = user.to_string();
        let fetch: PageFn<'static, Artist> = Box::new(move |page, limit| {
            let http = Arc::clone(&http);
            let user = user.clone();
            async move {
                let data = http
                    .get_library_artists(&user, Some(limit), Some(page))
                    .await?;
                parsing::nested_list(&data, "artists", "artist")
                    .into_iter()
                    .map(|artist| Artist::from_json(artist, Arc::clone(&http)))
                    .collect()
            }
            .boxed_local()
        });
        Paginator::with_options(fetch, options)
    }
}
