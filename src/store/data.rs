//! HTTP client for the relational data store collaborator.
//!
//! Speaks a PostgREST-style protocol: table routes with query-string
//! filters, `Prefer` headers for returning representations and resolving
//! upsert conflicts, and an RPC route for the atomic severity raise.

use crate::config::get_config;
use crate::models::{Document, NewDocument, NewNotification, RoleSummaryRecord};
use crate::roles::RoleCode;
use crate::store::{DataStore, NotificationError, NotificationSink, PersistenceError};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

/// REST relational store client.
pub struct RestDataStore {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) api_key: Option<String>,
}

impl RestDataStore {
    /// Construct a new client using configuration derived from the environment.
    pub fn new() -> Result<Self, PersistenceError> {
        let config = get_config();
        let client = Client::builder().user_agent("doctriage/0.1").build()?;
        let base_url = config.data_store_url.trim_end_matches('/').to_string();
        tracing::debug!(
            url = %base_url,
            has_api_key = config.data_store_api_key.is_some(),
            "Initialized data store HTTP client"
        );

        Ok(Self {
            client,
            base_url,
            api_key: config.data_store_api_key.clone(),
        })
    }

    fn post(&self, route: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.post(format!("{}/{route}", self.base_url));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        builder
    }

    fn get(&self, route: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.get(format!("{}/{route}", self.base_url));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        builder
    }
}

async fn unexpected_status(response: Response) -> PersistenceError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    PersistenceError::UnexpectedStatus { status, body }
}

#[derive(Deserialize)]
struct UserRoleRow {
    user_id: String,
}

#[async_trait]
impl DataStore for RestDataStore {
    async fn insert_document(&self, document: NewDocument) -> Result<Document, PersistenceError> {
        let response = self
            .post("documents")
            .header("prefer", "return=representation")
            .json(&document)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(unexpected_status(response).await);
        }

        let mut rows: Vec<Document> = response
            .json()
            .await
            .map_err(|error| PersistenceError::Decode(error.to_string()))?;
        rows.pop()
            .ok_or_else(|| PersistenceError::Decode("insert returned no rows".into()))
    }

    async fn upsert_role_summary(
        &self,
        record: &RoleSummaryRecord,
    ) -> Result<(), PersistenceError> {
        let response = self
            .post("role_summaries?on_conflict=document_id,role_code")
            .header("prefer", "resolution=merge-duplicates")
            .json(record)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(unexpected_status(response).await);
        }
        tracing::debug!(
            document_id = %record.document_id,
            role = %record.role_code,
            "Upserted role summary"
        );
        Ok(())
    }

    async fn raise_severity(
        &self,
        document_id: Uuid,
        candidate: u8,
    ) -> Result<(), PersistenceError> {
        let response = self
            .post("rpc/raise_document_severity")
            .json(&json!({
                "document_id": document_id,
                "candidate": candidate,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(unexpected_status(response).await);
        }
        Ok(())
    }

    async fn active_users_with_roles(
        &self,
        roles: &[RoleCode],
    ) -> Result<Vec<String>, PersistenceError> {
        let role_list = roles
            .iter()
            .map(|role| role.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let route =
            format!("user_roles?select=user_id&active=eq.true&role_code=in.({role_list})");
        let response = self.get(&route).send().await?;

        if !response.status().is_success() {
            return Err(unexpected_status(response).await);
        }

        let rows: Vec<UserRoleRow> = response
            .json()
            .await
            .map_err(|error| PersistenceError::Decode(error.to_string()))?;

        // A user holding several target roles is still one recipient.
        let mut users = Vec::new();
        for row in rows {
            if !users.contains(&row.user_id) {
                users.push(row.user_id);
            }
        }
        Ok(users)
    }
}

#[async_trait]
impl NotificationSink for RestDataStore {
    async fn create(&self, notification: NewNotification) -> Result<(), NotificationError> {
        let response = self.post("notifications").json(&notification).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::UnexpectedStatus { status, body });
        }
        Ok(())
    }
}
