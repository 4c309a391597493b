use crate::DEFAULT_API_PREFIX;
use crate::client::FortiSoar;
use crate::error::FsrError;

use const_format::concatcp;
use serde_json::Value;

const ALERTS_ENDPOINT: &str = concatcp!(DEFAULT_API_PREFIX, "/alerts");

/// CRUD on the `alerts` module.
#[derive(Debug, Clone, Copy)]
pub struct AlertsApi<'c> {
    client: &'c FortiSoar,
}

impl<'c> AlertsApi<'c> {
    pub(crate) fn new(client: &'c FortiSoar) -> Self {
        Self { client }
    }

    /// A page of alerts as the raw Hydra collection.
    pub async fn list(&self, params: &[(&str, &str)]) -> Result<Value, FsrError> {
        self.client.get(ALERTS_ENDPOINT, params).await?.into_json()
    }

    pub async fn get(&self, id: &str) -> Result<Value, FsrError> {
        self.client
            .get(&alert_endpoint(id), &[])
            .await?
            .into_json()
    }

    pub async fn create(&self, alert: Value) -> Result<Value, FsrError> {
        self.client.post(ALERTS_ENDPOINT, alert).await
    }

    pub async fn update(&self, id: &str, changes: Value) -> Result<Value, FsrError> {
        self.client
            .put(&alert_endpoint(id), Some(changes), &[])
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), FsrError> {
        self.client.delete(&alert_endpoint(id), &[]).await
    }
}

fn alert_endpoint(id: &str) -> String {
    format!("{ALERTS_ENDPOINT}/{id}")
}
