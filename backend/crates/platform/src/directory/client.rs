//! HTTP Directory client
//!
//! Talks to a directory process serving [`super::directory_router`].

use reqwest::{Client, StatusCode};

use super::router::{EndpointBody, NameListResponse};
use super::{Directory, DirectoryError, DirectoryResult, Endpoint};

/// Directory reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    base: Endpoint,
    client: Client,
}

impl HttpDirectory {
    pub fn new(base: Endpoint, client: Client) -> Self {
        Self { base, client }
    }

    pub fn base(&self) -> &Endpoint {
        &self.base
    }

    fn name_url(&self, name: &str) -> String {
        self.base.url(&format!("names/{}", name))
    }
}

fn unreachable(err: reqwest::Error) -> DirectoryError {
    DirectoryError::Unreachable(err.to_string())
}

fn status_error(status: StatusCode, name: &str) -> DirectoryError {
    match status {
        StatusCode::BAD_REQUEST => DirectoryError::InvalidName(name.to_string()),
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            DirectoryError::Unreachable(format!("directory answered {}", status))
        }
        other => DirectoryError::Internal(format!("directory answered {}", other)),
    }
}

impl Directory for HttpDirectory {
    async fn register(&self, name: &str, endpoint: &Endpoint) -> DirectoryResult<()> {
        let response = self
            .client
            .put(self.name_url(name))
            .json(&EndpointBody {
                endpoint: endpoint.clone(),
            })
            .send()
            .await
            .map_err(unreachable)?;

        if !response.status().is_success() {
            return Err(status_error(response.status(), name));
        }
        Ok(())
    }

    async fn lookup(&self, name: &str) -> DirectoryResult<Option<Endpoint>> {
        let response = self
            .client
            .get(self.name_url(name))
            .send()
            .await
            .map_err(unreachable)?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body: EndpointBody = response.json().await.map_err(unreachable)?;
                Ok(Some(body.endpoint))
            }
            status => Err(status_error(status, name)),
        }
    }

    async fn list(&self) -> DirectoryResult<Vec<String>> {
        let response = self
            .client
            .get(self.base.url("names"))
            .send()
            .await
            .map_err(unreachable)?;

        if !response.status().is_success() {
            return Err(status_error(response.status(), ""));
        }
        let body: NameListResponse = response.json().await.map_err(unreachable)?;
        Ok(body.names)
    }

    async fn unbind(&self, name: &str) -> DirectoryResult<()> {
        let response = self
            .client
            .delete(self.name_url(name))
            .send()
            .await
            .map_err(unreachable)?;

        if !response.status().is_success() {
            return Err(status_error(response.status(), name));
        }
        Ok(())
    }
}
