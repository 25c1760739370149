//! Unsplash background image client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{get_json, BackgroundImage, ImageSource, UpstreamError};

/// Base URL for the Unsplash API
pub const UNSPLASH_BASE_URL: &str = "https://api.unsplash.com";

/// Client that draws a random landscape photo from one Unsplash collection
#[derive(Debug, Clone)]
pub struct ImageClient {
    client: Client,
    access_key: String,
    collection_id: String,
    base_url: String,
}

impl ImageClient {
    pub fn new(
        client: Client,
        access_key: impl Into<String>,
        collection_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            access_key: access_key.into(),
            collection_id: collection_id.into(),
            base_url: UNSPLASH_BASE_URL.to_string(),
        }
    }

    /// Point requests at a different base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ImageSource for ImageClient {
    async fn fetch(&self) -> Result<BackgroundImage, UpstreamError> {
        let url = format!("{}/photos/random", self.base_url.trim_end_matches('/'));
        let request = self
            .client
            .get(&url)
            .header("Accept-Version", "v1")
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .query(&[
                ("collections", self.collection_id.as_str()),
                ("orientation", "landscape"),
            ]);

        let photo: UnsplashPhoto = get_json(request).await?;
        parse_photo(photo)
    }
}

fn parse_photo(photo: UnsplashPhoto) -> Result<BackgroundImage, UpstreamError> {
    if photo.urls.full.is_empty() {
        return Err(UpstreamError::MissingField("urls.full".to_string()));
    }

    Ok(BackgroundImage {
        image_url: photo.urls.full,
        creator_name: photo.user.name,
        creator_url: photo.user.links.html,
    })
}

#[derive(Debug, Deserialize)]
struct UnsplashPhoto {
    urls: UnsplashUrls,
    user: UnsplashUser,
}

#[derive(Debug, Deserialize)]
struct UnsplashUrls {
    full: String,
}

#[derive(Debug, Deserialize)]
struct UnsplashUser {
    name: String,
    links: UnsplashUserLinks,
}

#[derive(Debug, Deserialize)]
struct UnsplashUserLinks {
    html: String,
}
