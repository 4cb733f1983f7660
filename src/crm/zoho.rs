//! Zoho CRM contact search.
//!
//! Zoho answers searches with a list of `{"val": <field>, "content": <value>}`
//! pairs under `response.result.Contacts.row.FL`. A reply without that path is
//! a miss, not an error.

use super::{value_text, ContactSource};
use crate::config::ZohoConfig;
use crate::error::{Result, SyncError};
use crate::record::Customer;
use log::{info, warn};
use reqwest::blocking::Client;
use serde_json::Value;
use std::collections::HashMap;

const SEARCH_BY_ID_PATH: &str = "/crm/private/json/Contacts/getSearchRecordsByPDC";
const SEARCH_BY_EMAIL_PATH: &str = "/crm/private/json/Contacts/searchRecords";

/// Field values of one contact, keyed by Zoho field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactFields(HashMap<String, Value>);

impl ContactFields {
    /// Extracts the contact fields from a search reply, or `None` on a miss.
    ///
    /// When several rows match, the first one wins.
    pub fn from_response(body: &Value) -> Option<Self> {
        let row = match body.pointer("/response/result/Contacts/row")? {
            Value::Array(rows) => rows.first()?,
            row => row,
        };

        let pairs = row.get("FL")?.as_array()?;
        let fields = pairs
            .iter()
            .filter_map(|pair| {
                let name = pair.get("val")?.as_str()?;
                let content = pair.get("content").cloned().unwrap_or(Value::Null);
                Some((name.to_string(), content))
            })
            .collect();
        Some(ContactFields(fields))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Field value as text; absent fields yield `None`.
    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name).and_then(value_text)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&ContactFields> for Customer {
    fn from(fields: &ContactFields) -> Self {
        let mut customer = Customer {
            id: fields.text("CONTACTID"),
            email: fields.text("Email"),
            first_name: fields.text("First Name"),
            last_name: fields.text("Last Name"),
            ..Customer::default()
        };
        for name in ["Salutation", "Title"] {
            customer
                .properties
                .insert(name.to_string(), Value::from(fields.text(name)));
        }
        customer
    }
}

pub struct ZohoClient {
    http: Client,
    config: ZohoConfig,
}

impl ZohoClient {
    pub fn new(config: ZohoConfig, http: Client) -> Self {
        ZohoClient { http, config }
    }

    /// Searches by the CRM-assigned contact id.
    pub fn search_by_id(&self, id: &str) -> Result<Option<ContactFields>> {
        self.search(
            SEARCH_BY_ID_PATH,
            &[("searchColumn", "contactid"), ("searchValue", id)],
        )
    }

    pub fn search_by_email(&self, email: &str) -> Result<Option<ContactFields>> {
        let criteria = format!("(email:{})", email);
        self.search(SEARCH_BY_EMAIL_PATH, &[("criteria", criteria.as_str())])
    }

    /// Tries the id search first and falls back to treating `id` as an email.
    pub fn lookup(&self, id: &str) -> Result<Option<ContactFields>> {
        if let Some(fields) = self.search_by_id(id)? {
            return Ok(Some(fields));
        }
        info!("Zoho miss on id, retrying as email");

        let fields = self.search_by_email(id)?;
        if fields.is_none() {
            info!("Zoho miss on email");
        }
        Ok(fields)
    }

    fn search(&self, resource: &str, criteria: &[(&str, &str)]) -> Result<Option<ContactFields>> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), resource);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("authtoken", self.config.auth_token.as_str()),
                ("scope", "crmapi"),
            ])
            .query(criteria)
            .send()
            .map_err(|e| SyncError::transport(&url, e))?;

        let status = response.status();
        let body = response.text().map_err(|e| SyncError::transport(&url, e))?;
        if !status.is_success() {
            return Err(SyncError::CrmStatus {
                status: status.as_u16(),
                body,
            });
        }

        let reply: Value = serde_json::from_str(&body)?;
        Ok(ContactFields::from_response(&reply))
    }
}

impl ContactSource for ZohoClient {
    fn name(&self) -> &'static str {
        "Zoho"
    }

    fn fetch_customer(&mut self, id: &str) -> Result<Customer> {
        match self.lookup(id)? {
            Some(fields) => Ok(Customer::from(&fields)),
            None => {
                warn!("No Zoho contact matches {}, syncing empty profile", id);
                Ok(Customer::default())
            }
        }
    }
}
