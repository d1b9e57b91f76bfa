//! HTTP layer for the Last.fm web API.
//!
//! [`HttpClient`] owns the API key and the injected transport, turns endpoint
//! calls into signed-query GET requests against the API root, retries rate
//! limited requests with backoff, and maps error payloads onto
//! [`LastFmError::Api`]. Endpoint wrappers return raw [`serde_json::Value`]
//! payloads; the domain modules do the field mapping.

use crate::retry::{retry_operation, RetryConfig};
use crate::{LastFmError, Result};
use http_client::Request;
use http_types::{Method, Url};
use serde_json::Value;

/// Root endpoint of the Last.fm web API.
pub const API_URL: &str = "http://ws.audioscrobbler.com/2.0/";

/// Query parameters for one API call.
///
/// `None`-valued parameters are omitted and booleans are encoded as `0`/`1`,
/// matching what the API expects.
#[derive(Debug, Clone)]
pub(crate) struct Params {
    method: &'static str,
    pairs: Vec<(&'static str, String)>,
}

impl Params {
    pub(crate) fn new(method: &'static str) -> Self {
        Self {
            method,
            pairs: Vec::new(),
        }
    }

    pub(crate) fn set(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.pairs.push((key, value.into()));
        self
    }

    pub(crate) fn opt(mut self, key: &'static str, value: Option<impl ToString>) -> Self {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
        self
    }

    pub(crate) fn flag(mut self, key: &'static str, value: Option<bool>) -> Self {
        if let Some(value) = value {
            self.pairs.push((key, String::from(if value { "1" } else { "0" })));
        }
        self
    }
}

/// Transport-level client for the Last.fm web API.
///
/// Usually reached through [`Client`](crate::Client) or a domain object's
/// follow-up methods rather than directly.
#[derive(Debug)]
pub struct HttpClient {
    api_key: String,
    base_url: String,
    transport: Box<dyn http_client::HttpClient>,
    retry: RetryConfig,
}

impl HttpClient {
    /// Create a client for the public API root.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Last.fm API key sent with every request
    /// * `transport` - Any HTTP client implementation that implements
    ///   [`http_client::HttpClient`]
    pub fn new(api_key: impl Into<String>, transport: Box<dyn http_client::HttpClient>) -> Self {
        Self::with_base_url(api_key, transport, API_URL.to_string())
    }

    /// Create a client against a custom API root.
    ///
    /// Useful for tests or API-compatible mirrors.
    pub fn with_base_url(
        api_key: impl Into<String>,
        transport: Box<dyn http_client::HttpClient>,
        base_url: String,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url,
            transport,
            retry: RetryConfig::default(),
        }
    }

    /// Replace the rate-limit retry configuration.
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Issue one API call, retrying rate limited attempts with backoff.
    pub(crate) async fn request(&self, params: Params) -> Result<Value> {
        let method = params.method;
        let outcome = retry_operation(self.retry.clone(), method, || self.send_once(&params)).await?;
        Ok(outcome.result)
    }

    async fn send_once(&self, params: &Params) -> Result<Value> {
        let url = self
            .build_url(params)
            .parse::<Url>()
            .map_err(|e| LastFmError::Http(e.to_string()))?;

        log::debug!("GET {} ({})", params.method, url);
        let request = Request::new(Method::Get, url);
        let mut response = self
            .transport
            .send(request)
            .await
            .map_err(|e| LastFmError::Http(e.to_string()))?;

        let status = response.status();
        if status == 429 {
            let retry_after = response
                .header("Retry-After")
                .and_then(|values| values.get(0))
                .and_then(|value| value.as_str().parse().ok())
                .unwrap_or(60);
            return Err(LastFmError::RateLimit { retry_after });
        }

        let body = response
            .body_string()
            .await
            .map_err(|e| LastFmError::Http(e.to_string()))?;

        let data: Value = match serde_json::from_str(&body) {
            Ok(data) => data,
            Err(err) => {
                if !status.is_success() {
                    return Err(LastFmError::Http(format!("unexpected status {status}")));
                }
                return Err(LastFmError::Parse(err.to_string()));
            }
        };

        // Failures come back as an error payload, usually with a non-200
        // status; the payload is the authoritative signal.
        if data.get("error").is_some() {
            let code = data.get("error").and_then(Value::as_u64).unwrap_or(0) as u32;
            let message = data
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(LastFmError::Api { code, message });
        }
        if !status.is_success() {
            return Err(LastFmError::Http(format!("unexpected status {status}")));
        }

        Ok(data)
    }

    fn build_url(&self, params: &Params) -> String {
        let mut query = format!(
            "method={}&api_key={}&format=json",
            urlencoding::encode(params.method),
            urlencoding::encode(&self.api_key)
        );
        for (key, value) in &params.pairs {
            query.push('&');
            query.push_str(key);
            query.push('=');
            query.push_str(&urlencoding::encode(value));
        }
        format!("{}?{}", self.base_url, query)
    }

    /// Fetch raw bytes from an absolute URL (image downloads).
    pub(crate) async fn read(&self, url: &str) -> Result<Vec<u8>> {
        let url = url
            .parse::<Url>()
            .map_err(|e| LastFmError::Http(e.to_string()))?;
        let request = Request::new(Method::Get, url);
        let mut response = self
            .transport
            .send(request)
            .await
            .map_err(|e| LastFmError::Http(e.to_string()))?;
        response
            .body_bytes()
            .await
            .map_err(|e| LastFmError::Http(e.to_string()))
    }

    // ---------------------------------------------------------------------
    // album.*
    // ---------------------------------------------------------------------

    pub(crate) async fn add_album_tags(
        &self,
        api_sig: &str,
        sk: &str,
        artist: &str,
        album: &str,
        tags: &[&str],
    ) -> Result<()> {
        self.request(
            Params::new("album.addTags")
                .set("api_sig", api_sig)
                .set("sk", sk)
                .set("artist", artist)
                .set("album", album)
                .set("tags", tags.join(",")),
        )
        .await?;
        Ok(())
    }

    pub(crate) async fn remove_album_tag(
        &self,
        api_sig: &str,
        sk: &str,
        artist: &str,
        album: &str,
        tag: &str,
    ) -> Result<()> {
        self.request(
            Params::new("album.removeTag")
                .set("api_sig", api_sig)
                .set("sk", sk)
                .set("artist", artist)
                .set("album", album)
                .set("tag", tag),
        )
        .await?;
        Ok(())
    }

    pub(crate) async fn get_album_info(
        &self,
        artist: Option<&str>,
        album: Option<&str>,
        mbid: Option<&str>,
        autocorrect: Option<bool>,
        username: Option<&str>,
        lang: Option<&str>,
    ) -> Result<Value> {
        self.request(
            Params::new("album.getInfo")
                .opt("artist", artist)
                .opt("album", album)
                .opt("mbid", mbid)
                .flag("autocorrect", autocorrect)
                .opt("username", username)
                .opt("lang", lang),
        )
        .await
    }

    pub(crate) async fn get_album_tags(
        &self,
        artist: Option<&str>,
        album: Option<&str>,
        mbid: Option<&str>,
        autocorrect: Option<bool>,
        user: Option<&str>,
    ) -> Result<Value> {
        self.request(
            Params::new("album.getTags")
                .opt("artist", artist)
                .opt("album", album)
                .opt("mbid", mbid)
                .flag("autocorrect", autocorrect)
                .opt("user", user),
        )
        .await
    }

    pub(crate) async fn get_album_top_tags(
        &self,
        artist: Option<&str>,
        album: Option<&str>,
        mbid: Option<&str>,
        autocorrect: Option<bool>,
    ) -> Result<Value> {
        self.request(
            Params::new("album.getTopTags")
                .opt("artist", artist)
                .opt("album", album)
                .opt("mbid", mbid)
                .flag("autocorrect", autocorrect),
        )
        .await
    }

    pub(crate) async fn search_albums(
        &self,
        album: &str,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Value> {
        self.request(
            Params::new("album.search")
                .set("album", album)
                .opt("limit", limit)
                .opt("page", page),
        )
        .await
    }

    // ---------------------------------------------------------------------
    // artist.*
    // ---------------------------------------------------------------------

    pub(crate) async fn add_artist_tags(
        &self,
        api_sig: &str,
        sk: &str,
        artist: &str,
        tags: &[&str],
    ) -> Result<()> {
        self.request(
            Params::new("artist.addTags")
                .set("api_sig", api_sig)
                .set("sk", sk)
                .set("artist", artist)
                .set("tags", tags.join(",")),
        )
        .await?;
        Ok(())
    }

    pub(crate) async fn remove_artist_tag(
        &self,
        api_sig: &str,
        sk: &str,
        artist: &str,
        tag: &str,
    ) -> Result<()> {
        self.request(
            Params::new("artist.removeTag")
                .set("api_sig", api_sig)
                .set("sk", sk)
                .set("artist", artist)
                .set("tag", tag),
        )
        .await?;
        Ok(())
    }

    pub(crate) async fn get_artist_correction(&self, artist: &str) -> Result<Value> {
        self.request(Params::new("artist.getCorrection").set("artist", artist))
            .await
    }

    pub(crate) async fn get_artist_info(
        &self,
        artist: Option<&str>,
        mbid: Option<&str>,
        autocorrect: Option<bool>,
        username: Option<&str>,
        lang: Option<&str>,
    ) -> Result<Value> {
        self.request(
            Params::new("artist.getInfo")
                .opt("artist", artist)
                .opt("mbid", mbid)
                .flag("autocorrect", autocorrect)
                .opt("username", username)
                .opt("lang", lang),
        )
        .await
    }

    pub(crate) async fn get_artist_similar(
        &self,
        artist: Option<&str>,
        mbid: Option<&str>,
        autocorrect: Option<bool>,
        limit: Option<u32>,
    ) -> Result<Value> {
        self.request(
            Params::new("artist.getSimilar")
                .opt("artist", artist)
                .opt("mbid", mbid)
                .flag("autocorrect", autocorrect)
                .opt("limit", limit),
        )
        .await
    }

    pub(crate) async fn get_artist_tags(
        &self,
        artist: Option<&str>,
        mbid: Option<&str>,
        autocorrect: Option<bool>,
        user: Option<&str>,
    ) -> Result<Value> {
        self.request(
            Params::new("artist.getTags")
                .opt("artist", artist)
                .opt("mbid", mbid)
                .flag("autocorrect", autocorrect)
                .opt("user", user),
        )
        .await
    }

    pub(crate) async fn get_artist_top_albums(
        &self,
        artist: Option<&str>,
        mbid: Option<&str>,
        autocorrect: Option<bool>,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Value> {
        self.request(
            Params::new("artist.getTopAlbums")
                .opt("artist", artist)
                .opt("mbid", mbid)
                .flag("autocorrect", autocorrect)
                .opt("limit", limit)
                .opt("page", page),
        )
        .await
    }

    pub(crate) async fn get_artist_top_tags(
        &self,
        artist: Option<&str>,
        mbid: Option<&str>,
        autocorrect: Option<bool>,
    ) -> Result<Value> {
        self.request(
            Params::new("artist.getTopTags")
                .opt("artist", artist)
                .opt("mbid", mbid)
                .flag("autocorrect", autocorrect),
        )
        .await
    }

    pub(crate) async fn get_artist_top_tracks(
        &self,
        artist: Option<&str>,
        mbid: Option<&str>,
        autocorrect: Option<bool>,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Value> {
        self.request(
            Params::new("artist.getTopTracks")
                .opt("artist", artist)
                .opt("mbid", mbid)
                .flag("autocorrect", autocorrect)
                .opt("limit", limit)
                .opt("page", page),
        )
        .await
    }

    pub(crate) async fn search_artists(
        &self,
        artist: &str,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Value> {
        self.request(
            Params::new("artist.search")
                .set("artist", artist)
                .opt("limit", limit)
                .opt("page", page),
        )
        .await
    }

    // ---------------------------------------------------------------------
    // chart.* / geo.* / library.*
    // ---------------------------------------------------------------------

    pub(crate) async fn get_chart_top_artists(
        &self,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Value> {
        self.request(
            Params::new("chart.getTopArtists")
                .opt("limit", limit)
                .opt("page", page),
        )
        .await
    }

    pub(crate) async fn get_chart_top_tags(
        &self,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Value> {
        self.request(
            Params::new("chart.getTopTags")
                .opt("limit", limit)
                .opt("page", page),
        )
        .await
    }

    pub(crate) async fn get_chart_top_tracks(
        &self,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Value> {
        self.request(
            Params::new("chart.getTopTracks")
                .opt("limit", limit)
                .opt("page", page),
        )
        .await
    }

    pub(crate) async fn get_geo_top_artists(
        &self,
        country: &str,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Value> {
        self.request(
            Params::new("geo.getTopArtists")
                .set("country", country)
                .opt("limit", limit)
                .opt("page", page),
        )
        .await
    }

    pub(crate) async fn get_geo_top_tracks(
        &self,
        country: &str,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Value> {
        self.request(
            Params::new("geo.getTopTracks")
                .set("country", country)
                .opt("limit", limit)
                .opt("page", page),
        )
        .await
    }

    pub(crate) async fn get_library_artists(
        &self,
        user: &str,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Value> {
        self.request(
            Params::new("library.getArtists")
                .set("user", user)
                .opt("limit", limit)
                .opt("page", page),
        )
        .await
    }

    // ---------------------------------------------------------------------
    // tag.*
    // ---------------------------------------------------------------------

    pub(crate) async fn get_tag_info(&self, tag: &str, lang: Option<&str>) -> Result<Value> {
        self.request(Params::new("tag.getInfo").set("tag", tag).opt("lang", lang))
            .await
    }

    pub(crate) async fn get_tag_similar(&self, tag: &str) -> Result<Value> {
        self.request(Params::new("tag.getSimilar").set("tag", tag))
            .await
    }

    pub(crate) async fn get_tag_top_albums(
        &self,
        tag: &str,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Value> {
        self.request(
            Params::new("tag.getTopAlbums")
                .set("tag", tag)
                .opt("limit", limit)
                .opt("page", page),
        )
        .await
    }

    pub(crate) async fn get_tag_top_artists(
        &self,
        tag: &str,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Value> {
        self.request(
            Params::new("tag.getTopArtists")
                .set("tag", tag)
                .opt("limit", limit)
                .opt("page", page),
        )
        .await
    }

    pub(crate) async fn get_tag_top_tracks(
        &self,
        tag: &str,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Value> {
        self.request(
            Params::new("tag.getTopTracks")
                .set("tag", tag)
                .opt("limit", limit)
                .opt("page", page),
        )
        .await
    }

    pub(crate) async fn get_tag_weekly_chart_list(&self, tag: &str) -> Result<Value> {
        self.request(Params::new("tag.getWeeklyChartList").set("tag", tag))
            .await
    }

    // ---------------------------------------------------------------------
    // track.*
    // ---------------------------------------------------------------------

    pub(crate) async fn add_track_tags(
        &self,
        api_sig: &str,
        sk: &str,
        artist: &str,
        track: &str,
        tags: &[&str],
    ) -> Result<()> {
        self.request(
            Params::new("track.addTags")
                .set("api_sig", api_sig)
                .set("sk", sk)
                .set("artist", artist)
                .set("track", track)
                .set("tags", tags.join(",")),
        )
        .await?;
        Ok(())
    }

    pub(crate) async fn remove_track_tag(
        &self,
        api_sig: &str,
        sk: &str,
        artist: &str,
        track: &str,
        tag: &str,
    ) -> Result<()> {
        self.request(
            Params::new("track.removeTag")
                .set("api_sig", api_sig)
                .set("sk", sk)
                .set("artist", artist)
                .set("track", track)
                .set("tag", tag),
        )
        .await?;
        Ok(())
    }

    pub(crate) async fn get_track_correction(&self, artist: &str, track: &str) -> Result<Value> {
        self.request(
            Params::new("track.getCorrection")
                .set("artist", artist)
                .set("track", track),
        )
        .await
    }

    pub(crate) async fn get_track_info(
        &self,
        artist: Option<&str>,
        track: Option<&str>,
        mbid: Option<&str>,
        autocorrect: Option<bool>,
        username: Option<&str>,
    ) -> Result<Value> {
        self.request(
            Params::new("track.getInfo")
                .opt("artist", artist)
                .opt("track", track)
                .opt("mbid", mbid)
                .flag("autocorrect", autocorrect)
                .opt("username", username),
        )
        .await
    }

    pub(crate) async fn get_track_tags(
        &self,
        artist: Option<&str>,
        track: Option<&str>,
        mbid: Option<&str>,
        autocorrect: Option<bool>,
        user: Option<&str>,
    ) -> Result<Value> {
        self.request(
            Params::new("track.getTags")
                .opt("artist", artist)
                .opt("track", track)
                .opt("mbid", mbid)
                .flag("autocorrect", autocorrect)
                .opt("user", user),
        )
        .await
    }

    pub(crate) async fn get_track_top_tags(
        &self,
        artist: Option<&str>,
        track: Option<&str>,
        mbid: Option<&str>,
        autocorrect: Option<bool>,
    ) -> Result<Value> {
        self.request(
            Params::new("track.getTopTags")
                .opt("artist", artist)
                .opt("track", track)
                .opt("mbid", mbid)
                .flag("autocorrect", autocorrect),
        )
        .await
    }

    pub(crate) async fn love_track(&self, api_sig: &str, sk: &str, artist: &str, track: &str) -> Result<()> {
        self.request(
            Params::new("track.love")
                .set("api_sig", api_sig)
                .set("sk", sk)
                .set("artist", artist)
                .set("track", track),
        )
        .await?;
        Ok(())
    }

    pub(crate) async fn unlove_track(
        &self,
        api_sig: &str,
        sk: &str,
        artist: &str,
        track: &str,
    ) -> Result<()> {
        self.request(
            Params::new("track.unlove")
                .set("api_sig", api_sig)
                .set("sk", sk)
                .set("artist", artist)
                .set("track", track),
        )
        .await?;
        Ok(())
    }

    pub(crate) async fn search_tracks(
        &self,
        track: &str,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Value> {
        self.request(
            Params::new("track.search")
                .set("track", track)
                .opt("limit", limit)
                .opt("page", page),
        )
        .await
    }

    // ---------------------------------------------------------------------
    // user.*
    // ---------------------------------------------------------------------

    pub(crate) async fn get_user_info(&self, user: &str) -> Result<Value> {
        self.request(Params::new("user.getInfo").set("user", user))
            .await
    }

    pub(crate) async fn get_user_loved_tracks(
        &self,
        user: &str,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Value> {
        self.request(
            Params::new("user.getLovedTracks")
                .set("user", user)
                .opt("limit", limit)
                .opt("page", page),
        )
        .await
    }

    pub(crate) async fn get_user_friends(
        &self,
        user: &str,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Value> {
        self.request(
            Params::new("user.getFriends")
                .set("user", user)
                .opt("limit", limit)
                .opt("page", page),
        )
        .await
    }

    pub(crate) async fn get_user_personal_tags(
        &self,
        tag: &str,
        user: &str,
        tagging_type: &str,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Value> {
        self.request(
            Params::new("user.getPersonalTags")
                .set("tag", tag)
                .set("user", user)
                .set("taggingtype", tagging_type)
                .opt("limit", limit)
                .opt("page", page),
        )
        .await
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) async fn get_user_recent_tracks(
        &self,
        user: &str,
        limit: Option<u32>,
        page: Option<u32>,
        from: Option<i64>,
        to: Option<i64>,
        extended: Option<bool>,
    ) -> Result<Value> {
        self.request(
            Params::new("user.getRecentTracks")
                .set("user", user)
                .opt("limit", limit)
                .opt("page", page)
                .opt("from", from)
                .opt("to", to)
                .flag("extended", extended),
        )
        .await
    }

    pub(crate) async fn get_user_top_albums(
        &self,
        user: &str,
        period: Option<&str>,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Value> {
        self.request(
            Params::new("user.getTopAlbums")
                .set("user", user)
                .opt("period", period)
                .opt("limit", limit)
                .opt("page", page),
        )
        .await
    }

    pub(crate) async fn get_user_top_artists(
        &self,
        user: &str,
        period: Option<&str>,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Value> {
        self.request(
            Params::new("user.getTopArtists")
                .set("user", user)
                .opt("period", period)
                .opt("limit", limit)
                .opt("page", page),
        )
        .await
    }

    pub(crate) async fn get_user_top_tags(&self, user: &str, limit: Option<u32>) -> Result<Value> {
        self.request(
            Params::new("user.getTopTags")
                .set("user", user)
                .opt("limit", limit),
        )
        .await
    }

    pub(crate) async fn get_user_top_tracks(
        &self,
        user: &str,
        period: Option<&str>,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Value> {
        self.request(
            Params::new("user.getTopTracks")
                .set("user", user)
                .opt("period", period)
                .opt("limit", limit)
                .opt("page", page),
        )
        .await
    }

    pub(crate) async fn get_user_weekly_album_chart(
        &self,
        user: &str,
        from: Option<i64>,
        to: Option<i64>,
    ) -> Result<Value> {
        self.request(
            Params::new("user.getWeeklyAlbumChart")
                .set("user", user)
                .opt("from", from)
                .opt("to", to),
        )
        .await
    }

    pub(crate) async fn get_user_weekly_artist_chart(
        &self,
        user: &str,
        from: Option<i64>,
        to: Option<i64>,
    ) -> Result<Value> {
        self.request(
            Params::new("user.getWeeklyArtistChart")
                .set("user", user)
                .opt("from", from)
                .opt("to", to),
        )
        .await
    }

    pub(crate) async fn get_user_weekly_chart_list(&self, user: &str) -> Result<Value> {
        self.request(Params::new("user.getWeeklyChartList").set("user", user))
            .await
    }

    pub(crate) async fn get_user_weekly_track_chart(
        &self,
        user: &str,
        from: Option<i64>,
        to: Option<i64>,
    ) -> Result<Value> {
        self.request(
            Params::new("user.getWeeklyTrackChart")
                .set("user", user)
                .opt("from", from)
                .opt("to", to),
        )
        .await
    }

    #[cfg(test)]
    pub(crate) fn test_url(&self, params: &Params) -> String {
        self.build_url(params)
    }
}
