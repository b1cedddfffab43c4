//! HTTP client for one side of the comparison

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::error::{HarnessError, HarnessResult};

/// Query parameters attached to a request
///
/// Pagination fields are explicit; anything endpoint-specific goes in
/// `extra`. The paginated fetch overwrites `page` and `limit` per page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RequestParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl RequestParams {
    pub fn is_empty(&self) -> bool {
        self.page.is_none() && self.limit.is_none() && self.extra.is_empty()
    }
}

impl fmt::Display for RequestParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "(no params)");
        }
        let mut parts = Vec::new();
        if let Some(page) = self.page {
            parts.push(format!("page={page}"));
        }
        if let Some(limit) = self.limit {
            parts.push(format!("limit={limit}"));
        }
        for (key, value) in &self.extra {
            parts.push(format!("{key}={value}"));
        }
        write!(f, "{}", parts.join("&"))
    }
}

/// Result of aggregating a paginated endpoint
///
/// `truncated` distinguishes "ran off the end of the data" from "stopped
/// early on an error": callers see partial aggregation instead of it
/// being silently folded into the item list.
#[derive(Debug, Clone)]
pub struct PageAggregate {
    /// Concatenation of every page fetched before the stop condition
    pub items: Vec<Value>,
    /// Number of page requests issued, including the terminating one
    pub pages_fetched: u32,
    /// True when pagination stopped before the empty-page sentinel
    pub truncated: bool,
    /// Status that stopped pagination, when a non-success status did
    pub failure_status: Option<StatusCode>,
}

/// Client bound to one deployment's base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    label: String,
}

impl ApiClient {
    pub fn new(label: &str, base_url: &str, token: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: if token.is_empty() {
                None
            } else {
                Some(token.to_string())
            },
            label: label.to_string(),
        }
    }

    /// Label identifying this side in diagnostics
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str, params: &RequestParams) -> HarnessResult<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(&url).query(params);

        if let Some(ref token) = self.token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        request
            .send()
            .await
            .map_err(|source| HarnessError::Transport { url, source })
    }

    /// Fetch one resource and parse the body as JSON
    ///
    /// A non-success status is surfaced as an error rather than handing
    /// an error body to the JSON parser.
    pub async fn get_json(&self, path: &str, params: &RequestParams) -> HarnessResult<Value> {
        let response = self.get(path, params).await?;
        let url = response.url().to_string();
        let status = response.status();

        if !status.is_success() {
            return Err(HarnessError::UnexpectedStatus { url, status });
        }

        let raw = response
            .text()
            .await
            .map_err(|source| HarnessError::Transport {
                url: url.clone(),
                source,
            })?;
        serde_json::from_str(&raw).map_err(|source| HarnessError::InvalidJson { url, source })
    }

    /// Fetch every page of a paginated resource
    ///
    /// Pages count from 1. An empty array is the end-of-data sentinel; a
    /// non-success status or a non-array body stops pagination and marks
    /// the aggregate truncated, keeping whatever was collected so far.
    /// Transport errors still abort the run.
    pub async fn get_paginated(
        &self,
        path: &str,
        params: &RequestParams,
        limit: u32,
    ) -> HarnessResult<PageAggregate> {
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let mut page_params = params.clone();
            page_params.page = Some(page);
            page_params.limit = Some(limit);

            let response = self.get(path, &page_params).await?;
            let url = response.url().to_string();
            let status = response.status();

            if !status.is_success() {
                warn!(
                    side = %self.label,
                    %url,
                    status = status.as_u16(),
                    page,
                    "pagination stopped on error status"
                );
                return Ok(PageAggregate {
                    items,
                    pages_fetched: page,
                    truncated: true,
                    failure_status: Some(status),
                });
            }

            let raw = response
                .text()
                .await
                .map_err(|source| HarnessError::Transport {
                    url: url.clone(),
                    source,
                })?;
            let body: Value = serde_json::from_str(&raw)
                .map_err(|source| HarnessError::InvalidJson { url, source })?;

            match body {
                Value::Array(page_items) if page_items.is_empty() => {
                    return Ok(PageAggregate {
                        items,
                        pages_fetched: page,
                        truncated: false,
                        failure_status: None,
                    });
                }
                Value::Array(page_items) => {
                    items.extend(page_items);
                    page += 1;
                }
                other => {
                    warn!(
                        side = %self.label,
                        path,
                        page,
                        body_type = value_type_name(&other),
                        "expected a JSON array page; stopping pagination"
                    );
                    return Ok(PageAggregate {
                        items,
                        pages_fetched: page,
                        truncated: true,
                        failure_status: None,
                    });
                }
            }
        }
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
