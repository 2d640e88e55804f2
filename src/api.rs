use crate::cancel::CancelToken;
use crate::error::{ConsoleError, Result};
use crate::types::{RecognitionResult, Reply, Vehicle};
use log::debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

/// JSON-over-HTTP access to the gate server.
///
/// Every call returns the parsed JSON body regardless of the HTTP status;
/// the server reports application errors through an `error` field instead.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base: Url) -> Self {
        ApiClient {
            client: reqwest::Client::new(),
            base,
        }
    }

    fn url(&self, path: &str) -> Result<Url> {
        let relative = path.trim_start_matches('/');
        self.base
            .join(relative)
            .map_err(|e| ConsoleError::InvalidUrl(path.to_string(), e))
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
        cancel: &CancelToken,
    ) -> Result<Value> {
        let url = self.url(path)?;
        let target = url.to_string();
        if cancel.is_cancelled() {
            return Err(ConsoleError::Cancelled(target));
        }
        debug!("{} {}", method, target);

        let mut builder = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(payload) = payload {
            builder = builder.body(payload.to_string());
        }

        let exchange = async {
            let response = builder
                .send()
                .await
                .map_err(|e| ConsoleError::Transport(target.clone(), e))?;
            debug!("{} answered {}", target, response.status());
            let body = response
                .bytes()
                .await
                .map_err(|e| ConsoleError::Transport(target.clone(), e))?;
            serde_json::from_slice::<Value>(&body)
                .map_err(|e| ConsoleError::Decode(target.clone(), e))
        };

        tokio::select! {
            result = exchange => result,
            _ = cancel.cancelled() => Err(ConsoleError::Cancelled(target.clone())),
        }
    }

    async fn get_as<T: DeserializeOwned>(&self, path: &str, cancel: &CancelToken) -> Result<T> {
        let value = self.request(Method::GET, path, None, cancel).await?;
        serde_json::from_value(value).map_err(|e| ConsoleError::Decode(path.to_string(), e))
    }

    pub async fn list_vehicles(&self, cancel: &CancelToken) -> Result<Vec<Vehicle>> {
        self.get_as("/api/vehicles", cancel).await
    }

    pub async fn add_vehicle(&self, vehicle: &Vehicle, cancel: &CancelToken) -> Result<Reply> {
        let payload = serde_json::to_value(vehicle)
            .map_err(|e| ConsoleError::Decode("/api/vehicles".to_string(), e))?;
        let value = self
            .request(Method::POST, "/api/vehicles", Some(&payload), cancel)
            .await?;
        Ok(Reply::from(&value))
    }

    pub async fn delete_vehicle(&self, plate: &str, cancel: &CancelToken) -> Result<Reply> {
        let path = vehicle_path(plate);
        let value = self.request(Method::DELETE, &path, None, cancel).await?;
        Ok(Reply::from(&value))
    }

    pub async fn recent_results(
        &self,
        limit: usize,
        cancel: &CancelToken,
    ) -> Result<Vec<RecognitionResult>> {
        self.get_as(&format!("/api/recent?limit={}", limit), cancel)
            .await
    }

    /// `null` from the server means nothing has been recognised yet.
    pub async fn latest_result(&self, cancel: &CancelToken) -> Result<Option<RecognitionResult>> {
        self.get_as("/api/latest", cancel).await
    }
}

/// Path of one vehicle, with the plate escaped as a single path segment.
pub fn vehicle_path(plate: &str) -> String {
    format!("/api/vehicles/{}", urlencoding::encode(plate))
}
