//! Delivery REST service HTTP client.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use dronz_core::models::{Order, Region, Restaurant};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the restaurants/orders/regions service.
#[derive(Debug, Clone)]
pub struct DronzClient {
    client: Client,
    base_url: String,
}

impl DronzClient {
    /// Create a client for the service rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            base_url: normalize_base_url(base_url.into()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// `true` when the service answers `isAlive` with a literal `true`.
    ///
    /// Transport failures are reported as `false`, not as errors.
    pub async fn is_alive(&self) -> bool {
        let response = match self.client.get(self.url("isAlive")).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("isAlive request failed: {}", err);
                return false;
            }
        };
        if !response.status().is_success() {
            tracing::warn!("isAlive returned {}", response.status());
            return false;
        }
        match response.text().await {
            Ok(body) => body.trim() == "true",
            Err(err) => {
                tracing::warn!("isAlive body unreadable: {}", err);
                false
            }
        }
    }

    /// Every participating restaurant, open or not.
    pub async fn restaurants(&self) -> Result<Vec<Restaurant>> {
        self.get_json("restaurants").await
    }

    /// Restaurants open on `date`'s weekday.
    pub async fn open_restaurants(&self, date: NaiveDate) -> Result<Vec<Restaurant>> {
        let restaurants = self.restaurants().await?;
        Ok(open_on(restaurants, date))
    }

    pub async fn orders_for_date(&self, date: NaiveDate) -> Result<Vec<Order>> {
        self.get_json(&format!("orders/{}", date.format("%Y-%m-%d")))
            .await
    }

    pub async fn central_area(&self) -> Result<Region> {
        self.get_json("centralArea").await
    }

    pub async fn no_fly_zones(&self) -> Result<Vec<Region>> {
        self.get_json("noFlyZones").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", path))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "{} request failed: {} {}",
                path,
                status,
                body
            ));
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse {} response", path))
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn open_on(restaurants: Vec<Restaurant>, date: NaiveDate) -> Vec<Restaurant> {
    restaurants
        .into_iter()
        .filter(|r| r.is_open_on(date))
        .collect()
}
