use crate::album::Album;
use crate::artist::Artist;
use crate::http::HttpClient;
use crate::image::Image;
use crate::tag::Tag;
use crate::wiki::Wiki;
use crate::{parsing, LastFmError, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use std::sync::Arc;

const MAX_TAGS_PER_REQUEST: usize = 10;

/// A Last.fm track.
///
/// Built from info payloads, search results, charts, or a user's listening
/// history. Scrobble entries additionally carry a play date or a now-playing
/// marker.
#[derive(Debug, Clone)]
pub struct Track {
    http: Arc<HttpClient>,
    data: Value,
    pub name: String,
    pub mbid: Option<String>,
    pub url: Option<String>,
    /// Duration as reported; info payloads use milliseconds, list payloads
    /// seconds. Zero and missing both read as `None`.
    pub duration: Option<u64>,
    pub playcount: u64,
    pub listeners: u64,
    /// Whether the requesting user loved this track; only meaningful on
    /// payloads that carry the flag (extended recent tracks).
    pub loved: bool,
}

impl Track {
    pub(crate) fn from_json(data: &Value, http: Arc<HttpClient>) -> Result<Self> {
        let duration = match parsing::count(data, "duration") {
            0 => None,
            millis_or_secs => Some(millis_or_secs),
        };
        Ok(Self {
            name: parsing::name(data)?,
            mbid: parsing::optional_str(data, "mbid"),
            url: parsing::optional_str(data, "url"),
            duration,
            playcount: parsing::count(data, "playcount"),
            listeners: parsing::count(data, "listeners"),
            loved: parsing::flag(data, "loved"),
            data: data.clone(),
            http,
        })
    }

    /// The artist reference embedded in this payload, if any.
    pub fn artist(&self) -> Option<Artist> {
        match self.data.get("artist") {
            Some(object @ Value::Object(_)) => {
                Artist::from_json(object, Arc::clone(&self.http)).ok()
            }
            Some(Value::String(name)) if !name.is_empty() => {
                Artist::from_json(&json!({ "name": name }), Arc::clone(&self.http)).ok()
            }
            _ => None,
        }
    }

    /// The album reference embedded in this payload, if any.
    pub fn album(&self) -> Option<Album> {
        self.data
            .get("album")
            .and_then(|album| Album::from_json(album, Arc::clone(&self.http)).ok())
    }

    pub fn images(&self) -> Vec<Image> {
        parsing::list(&self.data, "image")
            .into_iter()
            .map(|image| Image::from_json(image, Arc::clone(&self.http)))
            .collect()
    }

    /// Top tags embedded in a `track.getInfo` payload.
    pub fn toptags(&self) -> Vec<Tag> {
        parsing::nested_list(&self.data, "toptags", "tag")
            .into_iter()
            .filter_map(|tag| Tag::from_json(tag, Arc::clone(&self.http)).ok())
            .collect()
    }

    /// Wiki entry, present on `track.getInfo` payloads.
    pub fn wiki(&self) -> Option<Wiki> {
        self.data.get("wiki").and_then(|wiki| Wiki::from_json(wiki).ok())
    }

    /// Whether this scrobble entry is the listener's currently playing track.
    pub fn is_now_playing(&self) -> bool {
        self.data
            .get("@attr")
            .and_then(|attr| attr.get("nowplaying"))
            .and_then(Value::as_str)
            == Some("true")
    }

    /// When this scrobble was played. Absent for non-scrobble payloads and
    /// for the now-playing entry.
    pub fn played_at(&self) -> Option<DateTime<Utc>> {
        self.data
            .get("date")
            .map(|date| parsing::count(date, "uts"))
            .filter(|uts| *uts > 0)
            .and_then(|uts| Utc.timestamp_opt(uts as i64, 0).single())
    }

    fn named_artist(&self) -> Result<String> {
        parsing::string_or_name(&self.data, "artist").ok_or_else(|| {
            LastFmError::InvalidArgument("track payload carries no artist name".to_string())
        })
    }

    fn lookup(&self) -> (Option<String>, Option<&str>, Option<&str>) {
        match &self.mbid {
            Some(mbid) => (None, None, Some(mbid.as_str())),
            None => (
                parsing::string_or_name(&self.data, "artist"),
                Some(self.name.as_str()),
                None,
            ),
        }
    }

    /// Fetch the full info payload for this track's artist.
    pub async fn get_artist(&self) -> Result<Option<Artist>> {
        let Some(name) = parsing::string_or_name(&self.data, "artist") else {
            return Ok(None);
        };
        let data = self
            .http
            .get_artist_info(Some(&name), None, None, None, None)
            .await?;
        match data.get("artist") {
            Some(artist) => Ok(Some(Artist::from_json(artist, Arc::clone(&self.http))?)),
            None => Ok(None),
        }
    }

    /// Fetch the full info payload for this track's album.
    pub async fn get_album(&self) -> Result<Option<Album>> {
        let Some(album) = self.album() else {
            return Ok(None);
        };
        let Some(artist) = album.artist.or_else(|| {
            parsing::string_or_name(&self.data, "artist")
        }) else {
            return Ok(None);
        };
        let data = self
            .http
            .get_album_info(Some(&artist), Some(&album.title), None, None, None, None)
            .await?;
        match data.get("album") {
            Some(album) => Ok(Some(Album::from_json(album, Arc::clone(&self.http))?)),
            None => Ok(None),
        }
    }

    /// The canonical artist and track spelling, if the API knows a correction.
    pub async fn get_correction(&self) -> Result<Option<Track>> {
        let artist = self.named_artist()?;
        let data = self.http.get_track_correction(&artist, &self.name).await?;
        Ok(parsing::list_at(&data, &["corrections", "correction"])
            .first()
            .and_then(|correction| correction.get("track"))
            .and_then(|track| Track::from_json(track, Arc::clone(&self.http)).ok()))
    }

    /// Tags `user` has applied to this track.
    pub async fn get_tags(&self, user: &str) -> Result<Vec<Tag>> {
        let (artist, track, mbid) = self.lookup();
        let data = self
            .http
            .get_track_tags(artist.as_deref(), track, mbid, None, Some(user))
            .await?;
        parsing::nested_list(&data, "tags", "tag")
            .into_iter()
            .map(|tag| Tag::from_json(tag, Arc::clone(&self.http)))
            .collect()
    }

    /// Tags applied by all users, most popular first.
    pub async fn get_top_tags(&self) -> Result<Vec<Tag>> {
        let (artist, track, mbid) = self.lookup();
        let data = self
            .http
            .get_track_top_tags(artist.as_deref(), track, mbid, None)
            .await?;
        parsing::nested_list(&data, "toptags", "tag")
            .into_iter()
            .map(|tag| Tag::from_json(tag, Arc::clone(&self.http)))
            .collect()
    }

    /// Love this track on behalf of an authenticated session.
    pub async fn love(&self, api_sig: &str, sk: &str) -> Result<()> {
        let artist = self.named_artist()?;
        self.http.love_track(api_sig, sk, &artist, &self.name).await
    }

    /// Remove this track from the session user's loved tracks.
    pub async fn unlove(&self, api_sig: &str, sk: &str) -> Result<()> {
        let artist = self.named_artist()?;
        self.http.unlove_track(api_sig, sk, &artist, &self.name).await
    }

    /// Apply up to ten tags to this track on behalf of an authenticated
    /// session.
    pub async fn add_tags(&self, api_sig: &str, sk: &str, tags: &[&str]) -> Result<()> {
        if tags.len() > MAX_TAGS_PER_REQUEST {
            return Err(LastFmError::InvalidArgument(format!(
                "at most {MAX_TAGS_PER_REQUEST} tags may be added per request"
            )));
        }
        let artist = self.named_artist()?;
        self.http
            .add_track_tags(api_sig, sk, &artist, &self.name, tags)
            .await
    }

    /// Remove one of the session user's tags from this track.
    pub async fn remove_tag(&self, api_sig: &str, sk: &str, tag: &str) -> Result<()> {
        let artist = self.named_artist()?;
        self.http
            .remove_track_tag(api_sig, sk, &artist, &self.name, tag)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn http() -> Arc<HttpClient> {
        Arc::new(HttpClient::new(
            "test-key",
            Box::new(http_client::native::NativeClient::new()),
        ))
    }

    #[test]
    fn parses_scrobble_entry() {
        let track = Track::from_json(
            &json!({
                "name": "Svefn-g-englar",
                "artist": { "#text": "Sigur Rós", "mbid": "" },
                "album": { "#text": "Ágætis byrjun" },
                "date": { "uts": "1672531200", "#text": "01 Jan 2023, 00:00" }
            }),
            http(),
        )
        .unwrap();
        assert_eq!(track.artist().unwrap().name, "Sigur Rós");
        assert_eq!(track.album().unwrap().title, "Ágætis byrjun");
        assert_eq!(track.played_at().unwrap().timestamp(), 1_672_531_200);
        assert!(!track.is_now_playing());
    }

    #[test]
    fn parses_now_playing_entry() {
        let track = Track::from_json(
            &json!({
                "name": "Ágætis byrjun",
                "artist": { "#text": "Sigur Rós" },
                "@attr": { "nowplaying": "true" }
            }),
            http(),
        )
        .unwrap();
        assert!(track.is_now_playing());
        assert!(track.played_at().is_none());
    }

    #[test]
    fn parses_search_result_with_string_artist() {
        let track = Track::from_json(
            &json!({ "name": "Believe", "artist": "Cher", "listeners": "12345" }),
            http(),
        )
        .unwrap();
        assert_eq!(track.artist().unwrap().name, "Cher");
        assert_eq!(track.listeners, 12_345);
        assert!(track.album().is_none());
    }

    #[test]
    fn zero_duration_reads_as_unknown() {
        let track = Track::from_json(&json!({ "name": "x", "duration": "0" }), http()).unwrap();
        assert_eq!(track.duration, None);
        let track = Track::from_json(&json!({ "name": "x", "duration": "215000" }), http()).unwrap();
        assert_eq!(track.duration, Some(215_000));
    }

    #[tokio::test]
    async fn loving_without_an_artist_fails() {
        let track = Track::from_json(&json!({ "name": "Orphan" }), http()).unwrap();
        assert!(matches!(
            track.love("sig", "sk").await,
            Err(LastFmError::InvalidArgument(_))
        ));
    }
}
