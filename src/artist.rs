use crate::album::Album;
use crate::http::HttpClient;
use crate::image::Image;
use crate::tag::Tag;
use crate::track::Track;
use crate::wiki::Wiki;
use crate::{parsing, LastFmError, Result};
use serde_json::Value;
use std::sync::Arc;

/// Maximum number of tags one request may apply, enforced by the API.
const MAX_TAGS_PER_REQUEST: usize = 10;

/// A Last.fm artist.
///
/// Holds whatever payload it was built from. `artist.getInfo` payloads carry
/// stats, bio and similar artists inline; references embedded in charts and
/// search results are sparser, and the lazy accessors simply return less.
#[derive(Debug, Clone)]
pub struct Artist {
    http: Arc<HttpClient>,
    data: Value,
    pub name: String,
    pub mbid: Option<String>,
    pub url: Option<String>,
    pub listeners: u64,
    pub playcount: u64,
    pub streamable: bool,
    /// Whether the artist is currently on tour.
    pub ontour: bool,
}

impl Artist {
    pub(crate) fn from_json(data: &Value, http: Arc<HttpClient>) -> Result<Self> {
        // Info payloads nest the counts under `stats`, list payloads inline
        // them.
        let stats = data.get("stats").unwrap_or(data);
        Ok(Self {
            name: parsing::name(data)?,
            mbid: parsing::optional_str(data, "mbid"),
            url: parsing::optional_str(data, "url"),
            listeners: parsing::count(stats, "listeners"),
            playcount: parsing::count(stats, "playcount"),
            streamable: parsing::flag(data, "streamable"),
            ontour: parsing::flag(data, "ontour"),
            data: data.clone(),
            http,
        })
    }

    /// Biography, present on `artist.getInfo` payloads.
    pub fn wiki(&self) -> Option<Wiki> {
        self.data.get("bio").and_then(|bio| Wiki::from_json(bio).ok())
    }

    pub fn images(&self) -> Vec<Image> {
        parsing::list(&self.data, "image")
            .into_iter()
            .map(|image| Image::from_json(image, Arc::clone(&self.http)))
            .collect()
    }

    /// Tags embedded in the payload this artist was built from.
    pub fn tags(&self) -> Vec<Tag> {
        parsing::nested_list(&self.data, "tags", "tag")
            .into_iter()
            .filter_map(|tag| Tag::from_json(tag, Arc::clone(&self.http)).ok())
            .collect()
    }

    /// Similar artists embedded in the payload this artist was built from.
    pub fn similar(&self) -> Vec<Artist> {
        parsing::nested_list(&self.data, "similar", "artist")
            .into_iter()
            .filter_map(|artist| Artist::from_json(artist, Arc::clone(&self.http)).ok())
            .collect()
    }

    fn lookup(&self) -> (Option<&str>, Option<&str>) {
        match &self.mbid {
            Some(mbid) => (None, Some(mbid.as_str())),
            None => (Some(self.name.as_str()), None),
        }
    }

    /// The canonical spelling of this artist's name, if the API knows a
    /// correction.
    pub async fn get_correction(&self) -> Result<Option<String>> {
        let data = self.http.get_artist_correction(&self.name).await?;
        Ok(parsing::list_at(&data, &["corrections", "correction"])
            .first()
            .and_then(|correction| correction.get("artist"))
            .and_then(|artist| parsing::name(artist).ok()))
    }

    /// Tags `user` has applied to this artist.
    pub async fn get_tags(&self, user: &str) -> Result<Vec<Tag>> {
        let (artist, mbid) = self.lookup();
        let data = self.http.get_artist_tags(artist, mbid, None, Some(user)).await?;
        parsing::nested_list(&data, "tags", "tag")
            .into_iter()
            .map(|tag| Tag::from_json(tag, Arc::clone(&self.http)))
            .collect()
    }

    /// Tags applied by all users, most popular first.
    pub async fn get_top_tags(&self) -> Result<Vec<Tag>> {
        let (artist, mbid) = self.lookup();
        let data = self.http.get_artist_top_tags(artist, mbid, None).await?;
        parsing::nested_list(&data, "toptags", "tag")
            .into_iter()
            .map(|tag| Tag::from_json(tag, Arc::clone(&self.http)))
            .collect()
    }

    /// Fetch similar artists from the API.
    pub async fn get_similar(&self, limit: Option<u32>) -> Result<Vec<Artist>> {
        let (artist, mbid) = self.lookup();
        let data = self.http.get_artist_similar(artist, mbid, None, limit).await?;
        parsing::nested_list(&data, "similarartists", "artist")
            .into_iter()
            .map(|artist| Artist::from_json(artist, Arc::clone(&self.http)))
            .collect()
    }

    pub async fn get_top_albums(
        &self,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Vec<Album>> {
        let (artist, mbid) = self.lookup();
        let data = self
            .http
            .get_artist_top_albums(artist, mbid, None, limit, page)
            .await?;
        parsing::nested_list(&data, "topalbums", "album")
            .into_iter()
            .map(|album| Album::from_json(album, Arc::clone(&self.http)))
            .collect()
    }

    pub async fn get_top_tracks(
        &self,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Vec<Track>> {
        let (artist, mbid) = self.lookup();
        let data = self
            .http
            .get_artist_top_tracks(artist, mbid, None, limit, page)
            .await?;
        parsing::nested_list(&data, "toptracks", "track")
            .into_iter()
            .map(|track| Track::from_json(track, Arc::clone(&self.http)))
            .collect()
    }

    /// Apply up to ten tags to this artist on behalf of an authenticated
    /// session.
    pub async fn add_tags(&self, api_sig: &str, sk: &str, tags: &[&str]) -> Result<()> {
        if tags.len() > MAX_TAGS_PER_REQUEST {
            return Err(LastFmError::InvalidArgument(format!(
                "at most {MAX_TAGS_PER_REQUEST} tags may be added per request"
            )));
        }
        self.http.add_artist_tags(api_sig, sk, &self.name, tags).await
    }

    /// Remove one of the session user's tags from this artist.
    pub async fn remove_tag(&self, api_sig: &str, sk: &str, tag: &str) -> Result<()> {
        self.http.remove_artist_tag(api_sig, sk, &self.name, tag).await
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
    fn parses_info_payload_with_nested_stats() {
        let artist = Artist::from_json(
            &json!({
                "name": "Boards of Canada",
                "mbid": "bd6e1d52-7b2c-43b9-8bcd-bbd85b37a861",
                "url": "https://www.last.fm/music/Boards+of+Canada",
                "stats": { "listeners": "1445470", "playcount": "93657340" },
                "similar": { "artist": [{ "name": "Autechre" }, { "name": "Plaid" }] },
                "tags": { "tag": [{ "name": "idm" }] },
                "bio": { "summary": "Scottish duo.", "content": "Scottish duo." }
            }),
            http(),
        )
        .unwrap();
        assert_eq!(artist.listeners, 1_445_470);
        assert_eq!(artist.playcount, 93_657_340);
        assert_eq!(artist.similar().len(), 2);
        assert_eq!(artist.tags()[0].name, "idm");
        assert!(artist.wiki().is_some());
    }

    #[test]
    fn parses_chart_reference_with_inline_counts() {
        let artist = Artist::from_json(
            &json!({ "name": "Beach House", "listeners": "2000000", "mbid": "" }),
            http(),
        )
        .unwrap();
        assert_eq!(artist.listeners, 2_000_000);
        assert_eq!(artist.mbid, None);
        assert!(artist.similar().is_empty());
        assert!(artist.wiki().is_none());
    }

    #[tokio::test]
    async fn too_many_tags_are_rejected_locally() {
        let artist = Artist::from_json(&json!({ "name": "Low" }), http()).unwrap();
        let tags: Vec<&str> = (0..11).map(|_| "tag").collect();
        assert!(matches!(
            artist.add_tags("sig", "sk", &tags).await,
            Err(LastFmError::InvalidArgument(_))
        ));
    }
}
