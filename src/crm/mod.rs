mod client;
mod error;
mod models;
mod resource;

pub use client::Client;
pub use error::CrmError;
pub use models::{decode_page, Column, FilterSpec, Resource, Row};
pub use resource::*;

use crate::collection::{PageResult, QueryState};
use crate::session::AuthContext;
use log::*;
use serde_json::Value;
use std::time::Duration;

/// Responsible for asynchronous interaction with the CRM API. Rows come
/// back raw and are decoded by the collection they belong to.
///
#[derive(Clone)]
pub struct Crm {
    client: Client,
}

impl Crm {
    /// Returns a new instance for the given session and API base URL.
    ///
    pub fn new(auth: AuthContext, base_url: &str, timeout: Duration) -> Result<Crm, CrmError> {
        debug!("Initializing CRM client for {}...", base_url);
        Ok(Crm {
            client: Client::new(auth, base_url, timeout)?,
        })
    }

    /// Returns one page of raw rows for the resource matching the query.
    ///
    pub async fn fetch(
        &self,
        resource: &Resource,
        query: &QueryState,
    ) -> Result<PageResult<Value>, CrmError> {
        debug!(
            "Requesting page {} of '{}' (search: {:?}, filters: {:?})...",
            query.page(),
            resource.path,
            query.search(),
            query.filters()
        );
        let page = self
            .client
            .get_page(resource, &query.to_params(), query.page_size())
            .await?;
        debug!(
            "Retrieved {} of {} rows from '{}'",
            page.items.len(),
            page.total,
            resource.path
        );
        Ok(page)
    }

}
