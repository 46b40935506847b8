//! Remote image download and decode.

use image::RgbaImage;
use thiserror::Error;
use url::Url;

use crate::config::ServiceEndpoints;
use crate::net::{HttpClient, NetError};

#[derive(Debug, Error)]
pub enum ImageError {
    #[error(transparent)]
    Net(#[from] NetError),
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, url: &Url) -> Result<RgbaImage, ImageError>;
}

pub struct HttpImageFetcher {
    client: HttpClient,
}

impl HttpImageFetcher {
    pub fn new(endpoints: &ServiceEndpoints) -> Self {
        Self {
            client: HttpClient::new(&endpoints.user_agent),
        }
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, url: &Url) -> Result<RgbaImage, ImageError> {
        let bytes = self.client.get_bytes(url.as_str(), &[])?;
        Ok(image::load_from_memory(&bytes)?.to_rgba8())
    }
}
