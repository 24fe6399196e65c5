//! Registry client implementation
//!
//! Talks to the employee REST endpoints:
//!
//! - `GET /employees`
//! - `POST /employees`
//! - `PUT /employees/{id}`
//! - `DELETE /employees/{id}`
//! - `POST /employees/reassign-weapons?from_employee_id=..&to_employee_id=..`

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::config::{defaults, urls};
use crate::core::employee::{Employee, EmployeeFields};
use crate::error::RemoteError;
use crate::registry::remote::RemoteRegistry;

/// Body returned by create/update calls
///
/// The backend wraps created records as `{ "success": true, "employee": {..} }`
/// while updates return the bare record; both are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordBody {
    Envelope { employee: Employee },
    Bare(Employee),
}

impl RecordBody {
    fn into_employee(self) -> Employee {
        match self {
            Self::Envelope { employee } | Self::Bare(employee) => employee,
        }
    }
}

/// REST client for the employee registry
#[derive(Debug, Clone)]
pub struct HttpRegistry {
    /// HTTP client
    client: reqwest::Client,
    /// Registry base URL, without trailing slash
    base_url: String,
}

impl HttpRegistry {
    /// Create a client with default timeouts
    pub fn new(base_url: &str) -> Self {
        Self::with_timeouts(
            base_url,
            Duration::from_secs(defaults::DEFAULT_REQUEST_TIMEOUT_SECS),
            Duration::from_secs(defaults::DEFAULT_CONNECT_TIMEOUT_SECS),
        )
    }

    /// Create a client with custom timeouts
    pub fn with_timeouts(base_url: &str, timeout: Duration, connect_timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .connect_timeout(connect_timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Get the registry base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn employee_url(&self, id: i64) -> String {
        format!("{}{}/{id}", self.base_url, urls::EMPLOYEES_PATH)
    }

    /// Send a request and fail on non-success statuses
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, RemoteError> {
        let response = request.send().await.map_err(|e| RemoteError::Network {
            url: url.to_string(),
            error: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    /// Decode a create/update response into a validated record
    async fn read_record(response: reqwest::Response, url: &str) -> Result<Employee, RemoteError> {
        let body: RecordBody = response.json().await.map_err(|e| RemoteError::Decode {
            url: url.to_string(),
            error: e.to_string(),
        })?;

        let employee = body.into_employee();
        employee.validate().map_err(|error| RemoteError::Decode {
            url: url.to_string(),
            error,
        })?;
        Ok(employee)
    }
}

impl Default for HttpRegistry {
    fn default() -> Self {
        Self::new(urls::DEFAULT_REGISTRY)
    }
}

#[async_trait]
impl RemoteRegistry for HttpRegistry {
    async fn list_all(&self) -> Result<Vec<Employee>, RemoteError> {
        let url = self.url(urls::EMPLOYEES_PATH);
        let response = self.send(self.client.get(&url), &url).await?;

        let rows: Vec<Value> = response.json().await.map_err(|e| RemoteError::Decode {
            url: url.clone(),
            error: e.to_string(),
        })?;

        let mut employees = Vec::with_capacity(rows.len());
        for row in rows {
            match serde_json::from_value::<Employee>(row) {
                Ok(employee) => match employee.validate() {
                    Ok(()) => employees.push(employee),
                    Err(reason) => {
                        tracing::warn!("Skipping invalid employee '{}': {}", employee.name, reason);
                    }
                },
                Err(e) => tracing::warn!("Skipping malformed employee record: {}", e),
            }
        }

        tracing::debug!("Fetched {} employees from {}", employees.len(), url);
        Ok(employees)
    }

    async fn create(&self, fields: &EmployeeFields) -> Result<Employee, RemoteError> {
        let url = self.url(urls::EMPLOYEES_PATH);
        let response = self.send(self.client.post(&url).json(fields), &url).await?;
        Self::read_record(response, &url).await
    }

    async fn update(&self, id: i64, fields: &EmployeeFields) -> Result<Employee, RemoteError> {
        let url = self.employee_url(id);
        let response = self.send(self.client.put(&url).json(fields), &url).await?;
        Self::read_record(response, &url).await
    }

    async fn delete(&self, id: i64) -> Result<(), RemoteError> {
        let url = self.employee_url(id);
        self.send(self.client.delete(&url), &url).await?;
        Ok(())
    }

    async fn reassign_owned_resources(&self, from_id: i64, to_id: i64) -> Result<(), RemoteError> {
        let url = self.url(urls::REASSIGN_PATH);
        let request = self
            .client
            .post(&url)
            .query(&[("from_employee_id", from_id), ("to_employee_id", to_id)]);
        self.send(request, &url).await?;
        Ok(())
    }
}
