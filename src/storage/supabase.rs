// Supabase (PostgREST) client for the history_snapshots table

use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use super::HistoryStore;
use crate::config::{AppConfig, SupabaseConfig};
use crate::error::StorageError;
use crate::models::HistorySnapshot;

pub const HISTORY_TABLE: &str = "history_snapshots";

/// Timestamp format for query filters; avoids a `+` offset in the URL
const FILTER_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Blocking REST client for one Supabase project
pub struct SupabaseClient {
    base_url: String,
    key: String,
    http: Client,
}

impl SupabaseClient {
    pub fn new(config: &SupabaseConfig, timeout: std::time::Duration) -> Result<Self, StorageError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            key: config.key.clone(),
            http,
        })
    }

    /// Client for the configured project, or `NotConfigured`
    pub fn from_config(config: &AppConfig) -> Result<Self, StorageError> {
        let supabase = config.supabase.as_ref().ok_or(StorageError::NotConfigured)?;
        Self::new(supabase, config.api.timeout())
    }

    pub fn table_url(&self, table: &str) -> String {
        table_url(&self.base_url, table)
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.key)
            .header("Authorization", format!("Bearer {}", self.key))
    }

    fn get(&self) -> RequestBuilder {
        self.request(self.http.get(self.table_url(HISTORY_TABLE)))
    }

    fn delete(&self) -> RequestBuilder {
        self.request(self.http.delete(self.table_url(HISTORY_TABLE)))
    }

    /// True when the table answers a count query
    pub fn test_connection(&self) -> bool {
        match self.get_history_count() {
            Ok(count) => {
                info!(count, "database connection ok");
                true
            }
            Err(e) => {
                error!(error = %e, "database connection failed");
                false
            }
        }
    }

    pub fn insert_history(&self, snapshot: &HistorySnapshot) -> Result<(), StorageError> {
        let response = self
            .request(self.http.post(self.table_url(HISTORY_TABLE)))
            .header("Prefer", "return=minimal")
            .json(snapshot)
            .send()?;
        check_status(response)?;
        info!(week = snapshot.week_number, "history snapshot inserted");
        Ok(())
    }

    /// All snapshots, newest id first
    pub fn get_all_history(&self) -> Result<Vec<HistorySnapshot>, StorageError> {
        self.fetch_rows(self.get().query(&[("select", "*"), ("order", "id.desc")]))
    }

    pub fn delete_all_history(&self) -> Result<(), StorageError> {
        let response = self.delete().query(&[("id", "neq.0")]).send()?;
        check_status(response)?;
        info!("all history snapshots deleted");
        Ok(())
    }

    pub fn get_history_count(&self) -> Result<usize, StorageError> {
        let response = self
            .get()
            .query(&[("select", "id"), ("limit", "1")])
            .header("Prefer", "count=exact")
            .send()?;
        let response = check_status(response)?;
        Ok(content_range_total(&response))
    }

    /// Snapshots created within the last `days` days, newest first
    pub fn get_recent_history(&self, days: i64) -> Result<Vec<HistorySnapshot>, StorageError> {
        let cutoff = format_filter_time(Utc::now() - ChronoDuration::days(days));
        self.fetch_rows(self.get().query(&[
            ("select", "*".to_string()),
            ("created_at", format!("gte.{}", cutoff)),
            ("order", "created_at.desc".to_string()),
        ]))
    }

    /// One page of snapshots (1-based) and the total row count
    pub fn get_history_paginated(
        &self,
        page: usize,
        page_size: usize,
    ) -> Result<(Vec<HistorySnapshot>, usize), StorageError> {
        let offset = page.saturating_sub(1) * page_size;
        let response = self
            .get()
            .query(&[
                ("select", "*".to_string()),
                ("order", "created_at.desc".to_string()),
                ("limit", page_size.to_string()),
                ("offset", offset.to_string()),
            ])
            .header("Prefer", "count=exact")
            .send()?;
        let response = check_status(response)?;
        let total = content_range_total(&response);
        let rows = response.json::<Vec<HistorySnapshot>>()?;
        Ok((rows, total))
    }

    /// Snapshots whose date is within `[start, end]`, latest date first
    pub fn get_history_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<HistorySnapshot>, StorageError> {
        self.fetch_rows(self.get().query(&[
            ("select", "*".to_string()),
            ("date", format!("gte.{}", start)),
            ("date", format!("lte.{}", end)),
            ("order", "date.desc".to_string()),
        ]))
    }

    pub fn get_history_by_week(&self, week_number: u32) -> Result<Vec<HistorySnapshot>, StorageError> {
        self.fetch_rows(self.get().query(&[
            ("select", "*".to_string()),
            ("week_number", format!("eq.{}", week_number)),
            ("order", "created_at.desc".to_string()),
        ]))
    }

    /// Deletes snapshots older than `months` months and returns how many went
    pub fn cleanup_old_history(&self, months: i64) -> Result<usize, StorageError> {
        let cutoff = format_filter_time(Utc::now() - ChronoDuration::days(months * 30));
        let response = self
            .delete()
            .query(&[("created_at", format!("lt.{}", cutoff))])
            .header("Prefer", "return=representation")
            .send()?;
        let deleted = check_status(response)?
            .json::<Vec<serde_json::Value>>()?
            .len();
        info!(deleted, "old history snapshots cleaned up");
        Ok(deleted)
    }

    fn fetch_rows<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<Vec<T>, StorageError> {
        let response = check_status(builder.send()?)?;
        let rows = response.json::<Vec<T>>()?;
        debug!(rows = rows.len(), "history rows fetched");
        Ok(rows)
    }
}

impl HistoryStore for SupabaseClient {
    fn name(&self) -> &str {
        "supabase"
    }

    fn insert(&self, snapshot: &HistorySnapshot) -> Result<(), StorageError> {
        self.insert_history(snapshot)
    }

    fn all(&self) -> Result<Vec<HistorySnapshot>, StorageError> {
        self.get_all_history()
    }

    fn delete_all(&self) -> Result<(), StorageError> {
        self.delete_all_history()
    }

    fn count(&self) -> Result<usize, StorageError> {
        self.get_history_count()
    }
}

pub fn table_url(base_url: &str, table: &str) -> String {
    format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table)
}

pub fn format_filter_time(time: DateTime<Utc>) -> String {
    time.format(FILTER_TIME_FORMAT).to_string()
}

/// Total from a PostgREST `Content-Range` header such as `0-9/42` or `*/0`
pub fn parse_content_range_total(header: &str) -> Option<usize> {
    header.rsplit_once('/')?.1.trim().parse().ok()
}

fn content_range_total(response: &Response) -> usize {
    response
        .headers()
        .get("content-range")
        .and_then(|v| v.to_str().ok())
        .and_then(parse_content_range_total)
        .unwrap_or(0)
}

fn check_status(response: Response) -> Result<Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(StorageError::Status {
        status: status.as_u16(),
        body,
    })
}
