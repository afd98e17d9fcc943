//! HTTP client for CRM API requests.
//!
//! This module provides a low-level HTTP client wrapper for making requests
//! to the CRM API, handling authentication, query encoding, and envelope
//! parsing.

use super::models::{Envelope, Resource};
use super::CrmError;
use crate::collection::PageResult;
use crate::session::AuthContext;
use log::*;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

/// Makes requests to the CRM API and unwraps the response envelope.
///
#[derive(Clone)]
pub struct Client {
    auth: AuthContext,
    base_url: String,
    http_client: reqwest::Client,
}

impl Client {
    /// Returns a new instance for the given auth context and base URL.
    ///
    pub fn new(auth: AuthContext, base_url: &str, timeout: Duration) -> Result<Self, CrmError> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Client {
            auth,
            base_url: base_url.trim_end_matches('/').to_owned(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Return the full URL for a collection endpoint.
    ///
    pub fn collection_url(&self, resource: &Resource) -> String {
        format!("{}/api/{}", self.base_url, resource.path)
    }

    /// Fetch one page of raw rows from a collection endpoint.
    ///
    pub async fn get_page(
        &self,
        resource: &Resource,
        params: &[(String, String)],
        requested_size: usize,
    ) -> Result<PageResult<Value>, CrmError> {
        let token = self.auth.token()?;
        let request_url = self.collection_url(resource);
        debug!("GET {} with params {:?}", request_url, params);

        let response = self
            .http_client
            .get(&request_url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .query(params)
            .send()
            .await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!("API rejected access token with status {}", status);
            return Err(CrmError::Unauthorized {
                status: status.as_u16(),
            });
        }

        // Check status before trying to deserialize
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("Unable to read response"));
            error!("API request failed with status {}: {}", status, body);
            return Err(CrmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response_bytes = response.bytes().await?;
        let envelope: Envelope = match serde_json::from_slice(&response_bytes) {
            Ok(envelope) => envelope,
            Err(e) => {
                error!(
                    "Failed to deserialize API response: {}. Response body: {}",
                    e,
                    String::from_utf8_lossy(&response_bytes)
                );
                return Err(e.into());
            }
        };
        envelope.into_page(resource, requested_size)
    }
}
