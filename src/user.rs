use crate::album::Album;
use crate::artist::Artist;
use crate::chart::WeeklyChart;
use crate::http::HttpClient;
use crate::image::Image;
use crate::tag::Tag;
use crate::track::Track;
use crate::{parsing, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::sync::Arc;

/// Time window for a user's top charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum Period {
    #[default]
    Overall,
    SevenDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overall => "overall",
            Self::SevenDays => "7day",
            Self::OneMonth => "1month",
            Self::ThreeMonths => "3month",
            Self::SixMonths => "6month",
            Self::OneYear => "12month",
        }
    }
}

/// Options for [`User::get_recent_tracks`].
#[derive(Debug, Clone, Default)]
pub struct RecentTracksOptions {
    pub limit: Option<u32>,
    pub page: Option<u32>,
    /// Only include scrobbles after this instant.
    pub from: Option<DateTime<Utc>>,
    /// Only include scrobbles before this instant.
    pub to: Option<DateTime<Utc>>,
    /// Ask for extended payloads, which include the loved flag.
    pub extended: Option<bool>,
}

/// A Last.fm user profile.
#[derive(Debug, Clone)]
pub struct User {
    http: Arc<HttpClient>,
    data: Value,
    pub name: String,
    pub realname: Option<String>,
    pub url: Option<String>,
    pub country: Option<String>,
    /// Age in years; the API reports `"0"` for users who do not share it.
    pub age: Option<u64>,
    pub playcount: u64,
    pub artist_count: u64,
    pub album_count: u64,
    pub track_count: u64,
    /// When the account was created.
    pub registered: Option<DateTime<Utc>>,
}

impl User {
    pub(crate) fn from_json(data: &Value, http: Arc<HttpClient>) -> Result<Self> {
        let registered = data
            .get("registered")
            .map(|registered| parsing::count(registered, "unixtime"))
            .filter(|uts| *uts > 0)
            .and_then(|uts| Utc.timestamp_opt(uts as i64, 0).single());
        Ok(Self {
            name: parsing::name(data)?,
            realname: parsing::optional_str(data, "realname"),
            url: parsing::optional_str(data, "url"),
            country: parsing::optional_str(data, "country"),
            age: match parsing::count(data, "age") {
                0 => None,
                age => Some(age),
            },
            playcount: parsing::count(data, "playcount"),
            artist_count: parsing::count(data, "artist_count"),
            album_count: parsing::count(data, "album_count"),
            track_count: parsing::count(data, "track_count"),
            registered,
            data: data.clone(),
            http,
        })
    }

    pub fn images(&self) -> Vec<Image> {
        parsing::list(&self.data, "image")
            .into_iter()
            .map(|image| Image::from_json(image, Arc::clone(&self.http)))
            .collect()
    }

    /// Most listened artists within `period`.
    pub async fn get_top_artists(
        &self,
        period: Period,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Vec<Artist>> {
        let data = self
            .http
            .get_user_top_artists(&self.name, Some(period.as_str()), limit, page)
            .await?;
        parsing::nested_list(&data, "topartists", "artist")
            .into_iter()
            .map(|artist| Artist::from_json(artist, Arc::clone(&self.http)))
            .collect()
    }

    /// Most listened albums within `period`.
    pub async fn get_top_albums(
        &self,
        period: Period,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Vec<Album>> {
        let data = self
            .http
            .get_user_top_albums(&self.name, Some(period.as_str()), limit, page)
            .await?;
        parsing::nested_list(&data, "topalbums", "album")
            .into_iter()
            .map(|album| Album::from_json(album, Arc::clone(&self.http)))
            .collect()
    }

    /// Most listened tracks within `period`.
    pub async fn get_top_tracks(
        &self,
        period: Period,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Vec<Track>> {
        let data = self
            .http
            .get_user_top_tracks(&self.name, Some(period.as_str()), limit, page)
            .await?;
        parsing::nested_list(&data, "toptracks", "track")
            .into_iter()
            .map(|track| Track::from_json(track, Arc::clone(&self.http)))
            .collect()
    }

    /// Tags this user applies most often.
    pub async fn get_top_tags(&self, limit: Option<u32>) -> Result<Vec<Tag>> {
        let data = self.http.get_user_top_tags(&self.name, limit).await?;
        parsing::nested_list(&data, "toptags", "tag")
            .into_iter()
            .map(|tag| Tag::from_json(tag, Arc::clone(&self.http)))
            .collect()
    }

    /// Listening history, most recent first. A currently playing track is
    /// included as an extra leading entry with no play date.
    pub async fn get_recent_tracks(&self, options: &RecentTracksOptions) -> Result<Vec<Track>> {
        let data = self
            .http
            .get_user_recent_tracks(
                &self.name,
                options.limit,
                options.page,
                options.from.map(|instant| instant.timestamp()),
                options.to.map(|instant| instant.timestamp()),
                options.extended,
            )
            .await?;
        parsing::nested_list(&data, "recenttracks", "track")
            .into_iter()
            .map(|track| Track::from_json(track, Arc::clone(&self.http)))
            .collect()
    }

    /// Tracks this user has loved, most recent first.
    pub async fn get_loved_tracks(
        &self,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Vec<Track>> {
        let data = self.http.get_user_loved_tracks(&self.name, limit, page).await?;
        parsing::nested_list(&data, "lovedtracks", "track")
            .into_iter()
            .map(|track| Track::from_json(track, Arc::clone(&self.http)))
            .collect()
    }

    /// This user's friends.
    pub async fn get_friends(&self, limit: Option<u32>, page: Option<u32>) -> Result<Vec<User>> {
        let data = self.http.get_user_friends(&self.name, limit, page).await?;
        parsing::nested_list(&data, "friends", "user")
            .into_iter()
            .map(|user| User::from_json(user, Arc::clone(&self.http)))
            .collect()
    }

    /// Artists this user has tagged with `tag`.
    pub async fn get_personal_artist_tags(
        &self,
        tag: &str,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Vec<Artist>> {
        let data = self
            .http
            .get_user_personal_tags(tag, &self.name, "artist", limit, page)
            .await?;
        parsing::list_at(&data, &["taggings", "artists", "artist"])
            .into_iter()
            .map(|artist| Artist::from_json(artist, Arc::clone(&self.http)))
            .collect()
    }

    /// Albums this user has tagged with `tag`.
    pub async fn get_personal_album_tags(
        &self,
        tag: &str,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Vec<Album>> {
        let data = self
            .http
            .get_user_personal_tags(tag, &self.name, "album", limit, page)
            .await?;
        parsing::list_at(&data, &["taggings", "albums", "album"])
            .into_iter()
            .map(|album| Album::from_json(album, Arc::clone(&self.http)))
            .collect()
    }

    /// Tracks this user has tagged with `tag`.
    pub async fn get_personal_track_tags(
        &self,
        tag: &str,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<Vec<Track>> {
        let data = self
            .http
            .get_user_personal_tags(tag, &self.name, "track", limit, page)
            .await?;
        parsing::list_at(&data, &["taggings", "tracks", "track"])
            .into_iter()
            .map(|track| Track::from_json(track, Arc::clone(&self.http)))
            .collect()
    }

    /// Weeks for which this user has chart data.
    pub async fn get_weekly_chart_list(&self) -> Result<Vec<WeeklyChart>> {
        let data = self.http.get_user_weekly_chart_list(&self.name).await?;
        parsing::nested_list(&data, "weeklychartlist", "chart")
            .into_iter()
            .map(WeeklyChart::from_json)
            .collect()
    }

    /// Artist chart for one week, or the most recent week when `chart` is
    /// `None`.
    pub async fn get_weekly_artist_chart(
        &self,
        chart: Option<&WeeklyChart>,
    ) -> Result<Vec<Artist>> {
        let (from, to) = Self::bounds(chart);
        let data = self
            .http
            .get_user_weekly_artist_chart(&self.name, from, to)
            .await?;
        parsing::nested_list(&data, "weeklyartistchart", "artist")
            .into_iter()
            .map(|artist| Artist::from_json(artist, Arc::clone(&self.http)))
            .collect()
    }

    /// Album chart for one week, or the most recent week when `chart` is
    /// `None`.
    pub async fn get_weekly_album_chart(&self, chart: Option<&WeeklyChart>) -> Result<Vec<Album>> {
        let (from, to) = Self::bounds(chart);
        let data = self
            .http
            .get_user_weekly_album_chart(&self.name, from, to)
            .await?;
        parsing::nested_list(&data, "weeklyalbumchart", "album")
            .into_iter()
            .map(|album| Album::from_json(album, Arc::clone(&self.http)))
            .collect()
    }

    /// Track chart for one week, or the most recent week when `chart` is
    /// `None`.
    pub async fn get_weekly_track_chart(&self, chart: Option<&WeeklyChart>) -> Result<Vec<Track>> {
        let (from, to) = Self::bounds(chart);
        let data = self
            .http
            .get_user_weekly_track_chart(&self.name, from, to)
            .await?;
        parsing::nested_list(&data, "weeklytrackchart", "track")
            .into_iter()
            .map(|track| Track::from_json(track, Arc::clone(&self.http)))
            .collect()
    }

    fn bounds(chart: Option<&WeeklyChart>) -> (Option<i64>, Option<i64>) {
        match chart {
            Some(chart) => (Some(chart.start.timestamp()), Some(chart.end.timestamp())),
            None => (None, None),
        }
    }
}
