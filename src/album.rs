use crate::http::HttpClient;
use crate::image::Image;
use crate::tag::Tag;
use crate::track::Track;
use crate::wiki::Wiki;
use crate::{parsing, LastFmError, Result};
use serde_json::Value;
use std::sync::Arc;

const MAX_TAGS_PER_REQUEST: usize = 10;

/// A Last.fm album.
///
/// The artist reference arrives as a bare string in search results and as an
/// embedded object in info payloads; both forms parse into [`Album::artist`].
#[derive(Debug, Clone)]
pub struct Album {
    http: Arc<HttpClient>,
    data: Value,
    pub title: String,
    /// Name of the album's artist. Weekly charts may omit it.
    pub artist: Option<String>,
    pub mbid: Option<String>,
    pub url: Option<String>,
    pub playcount: u64,
    pub listeners: u64,
}

impl Album {
    pub(crate) fn from_json(data: &Value, http: Arc<HttpClient>) -> Result<Self> {
        Ok(Self {
            title: parsing::name(data)?,
            artist: parsing::string_or_name(data, "artist"),
            mbid: parsing::optional_str(data, "mbid"),
            url: parsing::optional_str(data, "url"),
            playcount: parsing::count(data, "playcount"),
            listeners: parsing::count(data, "listeners"),
            data: data.clone(),
            http,
        })
    }

    pub fn wiki(&self) -> Option<Wiki> {
        self.data.get("wiki").and_then(|wiki| Wiki::from_json(wiki).ok())
    }

    pub fn images(&self) -> Vec<Image> {
        parsing::list(&self.data, "image")
            .into_iter()
            .map(|image| Image::from_json(image, Arc::clone(&self.http)))
            .collect()
    }

    /// Tags embedded in the payload this album was built from.
    pub fn tags(&self) -> Vec<Tag> {
        parsing::nested_list(&self.data, "tags", "tag")
            .into_iter()
            .filter_map(|tag| Tag::from_json(tag, Arc::clone(&self.http)).ok())
            .collect()
    }

    /// Track listing, present on `album.getInfo` payloads.
    pub fn tracks(&self) -> Vec<Track> {
        parsing::nested_list(&self.data, "tracks", "track")
            .into_iter()
            .filter_map(|track| Track::from_json(track, Arc::clone(&self.http)).ok())
            .collect()
    }

    fn lookup(&self) -> (Option<&str>, Option<&str>, Option<&str>) {
        match &self.mbid {
            Some(mbid) => (None, None, Some(mbid.as_str())),
            None => (self.artist.as_deref(), Some(self.title.as_str()), None),
        }
    }

    fn named_artist(&self) -> Result<&str> {
        self.artist.as_deref().ok_or_else(|| {
            LastFmError::InvalidArgument("album payload carries no artist name".to_string())
        })
    }

    /// Tags `user` has applied to this album.
    pub async fn get_tags(&self, user: &str) -> Result<Vec<Tag>> {
        let (artist, album, mbid) = self.lookup();
        let data = self
            .http
            .get_album_tags(artist, album, mbid, None, Some(user))
            .await?;
        parsing::nested_list(&data, "tags", "tag")
            .into_iter()
            .map(|tag| Tag::from_json(tag, Arc::clone(&self.http)))
            .collect()
    }

    /// Tags applied by all users, most popular first.
    pub async fn get_top_tags(&self) -> Result<Vec<Tag>> {
        let (artist, album, mbid) = self.lookup();
        let data = self.http.get_album_top_tags(artist, album, mbid, None).await?;
        parsing::nested_list(&data, "toptags", "tag")
            .into_iter()
            .map(|tag| Tag::from_json(tag, Arc::clone(&self.http)))
            .collect()
    }

    /// Apply up to ten tags to this album on behalf of an authenticated
    /// session. Requires an artist name in the payload.
    pub async fn add_tags(&self, api_sig: &str, sk: &str, tags: &[&str]) -> Result<()> {
        if tags.len() > MAX_TAGS_PER_REQUEST {
            return Err(LastFmError::InvalidArgument(format!(
                "at most {MAX_TAGS_PER_REQUEST} tags may be added per request"
            )));
        }
        let artist = self.named_artist()?;
        self.http
            .add_album_tags(api_sig, sk, artist, &self.title, tags)
            .await
    }

    /// Remove one of the session user's tags from this album.
    pub async fn remove_tag(&self, api_sig: &str, sk: &str, tag: &str) -> Result<()> {
        let artist = self.named_artist()?;
        self.http
            .remove_album_tag(api_sig, sk, artist, &self.title, tag)
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
    fn parses_search_result_with_string_artist() {
        let album = Album::from_json(
            &json!({
                "name": "Lonerism",
                "artist": "Tame Impala",
                "url": "https://www.last.fm/music/Tame+Impala/Lonerism",
                "image": [{ "#text": "https://img.example/a.png", "size": "large" }]
            }),
            http(),
        )
        .unwrap();
        assert_eq!(album.title, "Lonerism");
        assert_eq!(album.artist.as_deref(), Some("Tame Impala"));
        assert_eq!(album.images().len(), 1);
    }

    #[test]
    fn parses_info_payload_with_embedded_tracks() {
        let album = Album::from_json(
            &json!({
                "name": "Spiderland",
                "artist": { "name": "Slint" },
                "playcount": "4941209",
                "tracks": { "track": [{ "name": "Breadcrumb Trail" }, { "name": "Nosferatu Man" }] },
                "wiki": { "summary": "Landmark record.", "content": "Landmark record." }
            }),
            http(),
        )
        .unwrap();
        assert_eq!(album.artist.as_deref(), Some("Slint"));
        assert_eq!(album.playcount, 4_941_209);
        assert_eq!(album.tracks().len(), 2);
        assert!(album.wiki().is_some());
    }

    #[test]
    fn single_embedded_track_still_lists() {
        let album = Album::from_json(
            &json!({
                "name": "Single",
                "tracks": { "track": { "name": "Only One" } }
            }),
            http(),
        )
        .unwrap();
        assert_eq!(album.tracks().len(), 1);
    }

    #[tokio::test]
    async fn tag_mutations_need_an_artist() {
        let album = Album::from_json(&json!({ "name": "Untitled" }), http()).unwrap();
        assert!(matches!(
            album.add_tags("sig", "sk", &["ambient"]).await,
            Err(LastFmError::InvalidArgument(_))
        ));
        assert!(matches!(
            album.remove_tag("sig", "sk", "ambient").await,
            Err(LastFmError::InvalidArgument(_))
        ));
    }
}
