//! Salesforce contact lookup over the REST API.
//!
//! Authenticates with the OAuth password grant. The access token is kept for
//! the lifetime of the client unless a TTL is configured.

use super::ContactSource;
use crate::config::SalesforceConfig;
use crate::error::{Result, SyncError};
use crate::record::Customer;
use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};

/// Fields requested for every contact.
pub const CONTACT_FIELDS: &str = "Salutation,FirstName,LastName,Title,Email";

/// A Contact record as returned by the REST API.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SalesforceContact {
    pub id: Option<String>,
    pub salutation: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
}

impl From<SalesforceContact> for Customer {
    fn from(contact: SalesforceContact) -> Self {
        let mut customer = Customer {
            id: contact.id,
            email: contact.email,
            first_name: contact.first_name,
            last_name: contact.last_name,
            ..Customer::default()
        };
        customer
            .properties
            .insert("Salutation".to_string(), Value::from(contact.salutation));
        customer
            .properties
            .insert("Title".to_string(), Value::from(contact.title));
        customer
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    fetched_at: Instant,
}

pub struct SalesforceClient {
    http: Client,
    config: SalesforceConfig,
    token: Option<AccessToken>,
}

impl SalesforceClient {
    pub fn new(config: SalesforceConfig, http: Client) -> Self {
        SalesforceClient {
            http,
            config,
            token: None,
        }
    }

    /// Returns a usable access token, fetching one if none is held or the
    /// held one is past its TTL.
    pub fn access_token(&mut self) -> Result<String> {
        if let Some(token) = &self.token {
            if !self.is_expired(token) {
                return Ok(token.value.clone());
            }
            debug!("Salesforce access token expired, fetching a new one");
        }

        let token = self.fetch_token()?;
        let value = token.value.clone();
        self.token = Some(token);
        Ok(value)
    }

    fn is_expired(&self, token: &AccessToken) -> bool {
        match self.config.token_ttl_secs {
            Some(ttl) => token.fetched_at.elapsed() >= Duration::from_secs(ttl),
            None => false,
        }
    }

    fn fetch_token(&self) -> Result<AccessToken> {
        let url = &self.config.token_url;
        let params = [
            ("grant_type", "password"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("username", self.config.username.as_str()),
            ("password", self.config.password.as_str()),
        ];

        let response = self
            .http
            .post(url)
            .form(&params)
            .send()
            .map_err(|e| match SyncError::transport(url, e) {
                SyncError::Http(e) => SyncError::AuthFailure(e.to_string()),
                other => other,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SyncError::AuthFailure(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .map_err(|e| SyncError::AuthFailure(format!("unreadable token response: {e}")))?;
        let value = token.access_token.ok_or_else(|| {
            SyncError::AuthFailure("token response has no access_token".to_string())
        })?;

        info!("Obtained Salesforce access token");
        Ok(AccessToken {
            value,
            fetched_at: Instant::now(),
        })
    }

    /// Fetches one contact by id. `None` when Salesforce has no such contact.
    pub fn fetch_contact(&mut self, id: &str) -> Result<Option<SalesforceContact>> {
        let url = self.contact_url(id)?;
        let token = self.access_token()?;

        let response = self
            .http
            .get(url.clone())
            .bearer_auth(token)
            .query(&[("fields", CONTACT_FIELDS)])
            .send()
            .map_err(|e| SyncError::transport(url.as_str(), e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            info!("Salesforce has no contact {}", id);
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SyncError::CrmStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .map_err(|e| SyncError::transport(url.as_str(), e))?;
        Ok(Some(serde_json::from_str(&body)?))
    }

    /// `<instance>/services/data/<version>/sobjects/Contact/<id>`, with the id
    /// escaped as a single path segment.
    fn contact_url(&self, id: &str) -> Result<Url> {
        let invalid = || {
            SyncError::Config(format!(
                "invalid SALESFORCE_INSTANCE_URL: {}",
                self.config.instance_url
            ))
        };

        let mut url = Url::parse(&self.config.instance_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(["services", "data", self.config.api_version.as_str()])
            .extend(["sobjects", "Contact"])
            .push(id);
        Ok(url)
    }
}

impl ContactSource for SalesforceClient {
    fn name(&self) -> &'static str {
        "Salesforce"
    }

    fn fetch_customer(&mut self, id: &str) -> Result<Customer> {
        Ok(self
            .fetch_contact(id)?
            .map(Customer::from)
            .unwrap_or_default())
    }
}
