use crate::error::StoreError;
use crate::gateways::traits::PropertyStore;
use crate::gateways::types::{Session, StoreOptions};
use crate::models::{Property, PropertyDraft, PropertyPatch};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// PostgREST-backed store over a hosted Supabase project
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: Client,
    options: StoreOptions,
    access_token: Option<String>,
}

impl SupabaseStore {
    pub fn new(options: StoreOptions) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(concat!("grandview-listings/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            options,
            access_token: None,
        })
    }

    /// A copy of this store that writes as the signed-in operator
    pub fn authorized(&self, session: &Session) -> Self {
        Self {
            access_token: Some(session.access_token.clone()),
            ..self.clone()
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.options.url, self.options.table)
    }

    fn request(&self, method: reqwest::Method) -> RequestBuilder {
        let bearer = self
            .access_token
            .as_deref()
            .unwrap_or(&self.options.api_key);

        self.client
            .request(method, self.table_url())
            .header("apikey", &self.options.api_key)
            .bearer_auth(bearer)
    }

    /// Decode a row list, turning non-2xx responses into `StoreError::Api`
    async fn rows<T: DeserializeOwned>(response: Response) -> Result<Vec<T>, StoreError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl PropertyStore for SupabaseStore {
    async fn select_all(&self) -> Result<Vec<Property>, StoreError> {
        let response = self
            .request(reqwest::Method::GET)
            .query(&[("select", "*")])
            .send()
            .await?;

        let rows: Vec<Property> = Self::rows(response).await?;
        info!(count = rows.len(), table = %self.options.table, "Fetched listings");
        Ok(rows)
    }

    async fn select_by_id(&self, id: &str) -> Result<Option<Property>, StoreError> {
        let filter = format!("eq.{}", id);
        let response = self
            .request(reqwest::Method::GET)
            .query(&[("select", "*"), ("id", filter.as_str())])
            .send()
            .await?;

        let rows: Vec<Property> = Self::rows(response).await?;
        debug!(id, found = !rows.is_empty(), "Fetched listing");
        Ok(rows.into_iter().next())
    }

    async fn insert(&self, draft: &PropertyDraft) -> Result<Property, StoreError> {
        let response = self
            .request(reqwest::Method::POST)
            .header("Prefer", "return=representation")
            .json(&[draft])
            .send()
            .await?;

        let rows: Vec<Property> = Self::rows(response).await?;
        let created = rows.into_iter().next().ok_or_else(|| StoreError::Api {
            status: 200,
            message: "insert returned no row".to_string(),
        })?;
        info!(id = %created.id, "Created listing");
        Ok(created)
    }

    async fn update(
        &self,
        id: &str,
        patch: &PropertyPatch,
    ) -> Result<Option<Property>, StoreError> {
        let filter = format!("eq.{}", id);
        let response = self
            .request(reqwest::Method::PATCH)
            .query(&[("id", filter.as_str())])
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;

        let rows: Vec<Property> = Self::rows(response).await?;
        info!(id, updated = !rows.is_empty(), "Updated listing");
        Ok(rows.into_iter().next())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let filter = format!("eq.{}", id);
        let response = self
            .request(reqwest::Method::DELETE)
            .query(&[("id", filter.as_str())])
            .header("Prefer", "return=representation")
            .send()
            .await?;

        let rows: Vec<serde_json::Value> = Self::rows(response).await?;
        info!(id, deleted = !rows.is_empty(), "Deleted listing");
        Ok(!rows.is_empty())
    }

    fn store_name(&self) -> &'static str {
        "supabase"
    }
}
