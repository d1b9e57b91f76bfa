use crate::album::Album;
use crate::artist::Artist;
use crate::chart::WeeklyChart;
use crate::http::HttpClient;
use crate::track::Track;
use crate::wiki::Wiki;
use crate::{parsing, Result};
use serde_json::Value;
use std::sync::Arc;

/// A Last.fm tag, either from `tag.getInfo` or embedded in another payload.
///
/// Info payloads carry `total`/`reach` and a wiki; embedded tag references
/// usually only carry a name and URL, in which case the counts read as zero.
#[derive(Debug, Clone)]
pub struct Tag {
    http: Arc<HttpClient>,
    data: Value,
    pub name: String,
    pub url: Option<String>,
    /// Number of times the tag has been applied.
    pub total: u64,
    /// Number of distinct users who applied the tag.
    pub reach: u64,
}

impl Tag {
    pub(crate) fn from_json(data: &Value, http: Arc<HttpClient>) -> Result<Self> {
        Ok(Self {
            name: parsing::name(data)?,
            url: parsing::optional_str(data, "url"),
            total: parsing::count(data, "total"),
            reach: parsing::count(data, "reach"),
            data: data.clone(),
            http,
        })
    }

    /// Editorial description, present on `tag.getInfo` payloads.
    pub fn wiki(&self) -> Option<Wiki> {
        self.data.get("wiki").and_then(|w| Wiki::from_json(w).ok())
    }

    /// Tags similar to this one.
    pub async fn get_similar(&self) -> Result<Vec<Tag>> {
        let data = self.http.get_tag_similar(&self.name).await?;
        parsing::nested_list(&data, "similartags", "tag")
            .into_iter()
            .map(|tag| Tag::from_json(tag, Arc::clone(&self.http)))
            .collect()
    }

    /// Artists most tagged with this tag.
    pub async fn get_top_artists(
        &self,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Vec<Artist>> {
        let data = self.http.get_tag_top_artists(&self.name, limit, page).await?;
        parsing::nested_list(&data, "topartists", "artist")
            .into_iter()
            .map(|artist| Artist::from_json(artist, Arc::clone(&self.http)))
            .collect()
    }

    /// Albums most tagged with this tag.
    pub async fn get_top_albums(
        &self,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Vec<Album>> {
        let data = self.http.get_tag_top_albums(&self.name, limit, page).await?;
        parsing::nested_list(&data, "albums", "album")
            .into_iter()
            .map(|album| Album::from_json(album, Arc::clone(&self.http)))
            .collect()
    }

    /// Tracks most tagged with this tag.
    pub async fn get_top_tracks(
        &self,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Vec<Track>> {
        let data = self.http.get_tag_top_tracks(&self.name, limit, page).await?;
        parsing::nested_list(&data, "tracks", "track")
            .into_iter()
            .map(|track| Track::from_json(track, Arc::clone(&self.http)))
            .collect()
    }

    /// Weeks for which this tag has chart data.
    pub async fn get_weekly_chart_list(&self) -> Result<Vec<WeeklyChart>> {
        let data = self.http.get_tag_weekly_chart_list(&self.name).await?;
        parsing::nested_list(&data, "weeklychartlist", "chart")
            .into_iter()
            .map(WeeklyChart::from_json)
            .collect()
    }
}
