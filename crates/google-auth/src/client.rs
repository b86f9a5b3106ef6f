//! Network-backed `DriveProvider` implementation
//!
//! Every operation is a single HTTP call with no retry. Exchange and listing
//! fail when the provider reports an error field in the body or the transport
//! reports a non-success status; revocation fails on any non-200 and carries
//! the response body so the caller can log it.

use std::future::Future;
use std::pin::Pin;

use common::Secret;
use tracing::debug;

use crate::DriveProvider;
use crate::constants::{
    AUTHORIZATION_ENDPOINT, DRIVE_FILES_ENDPOINT, DRIVE_METADATA_SCOPE, REVOCATION_ENDPOINT,
    TOKEN_ENDPOINT,
};
use crate::drive::{FileList, title_filter};
use crate::error::{Error, Result};
use crate::oauth::{TokenResponse, authorization_url};

/// Provider endpoint set. Defaults to the public Google endpoints;
/// overridable so tests can point at a local server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub authorization: String,
    pub token: String,
    pub revocation: String,
    pub drive_files: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            authorization: AUTHORIZATION_ENDPOINT.into(),
            token: TOKEN_ENDPOINT.into(),
            revocation: REVOCATION_ENDPOINT.into(),
            drive_files: DRIVE_FILES_ENDPOINT.into(),
        }
    }
}

/// The real Google-backed provider client.
pub struct GoogleDrive {
    http: reqwest::Client,
    client_id: String,
    client_secret: Secret<String>,
    endpoints: Endpoints,
}

impl GoogleDrive {
    pub fn new(http: reqwest::Client, client_id: String, client_secret: Secret<String>) -> Self {
        Self {
            http,
            client_id,
            client_secret,
            endpoints: Endpoints::default(),
        }
    }

    /// Replace the endpoint set (tests point this at a local server).
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    async fn do_exchange(&self, redirect_uri: &str, code: &str) -> Result<TokenResponse> {
        let response = self
            .http
            .post(&self.endpoints.token)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.expose().as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .map_err(|e| Error::Http(format!("token exchange request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Http(format!("reading token response: {e}")))?;

        if !status.is_success() {
            return Err(Error::TokenExchange(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| Error::TokenExchange(format!("invalid token response: {e}")))?;
        if let Some(err) = value.get("error") {
            return Err(Error::TokenExchange(err.to_string()));
        }

        serde_json::from_value(value)
            .map_err(|e| Error::TokenExchange(format!("invalid token response: {e}")))
    }

    async fn do_revoke(&self, access_token: &str) -> Result<()> {
        let response = self
            .http
            .post(&self.endpoints.revocation)
            .form(&[("token", access_token)])
            .send()
            .await
            .map_err(|e| Error::Http(format!("revocation request failed: {e}")))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<no body>"));
            return Err(Error::Revocation(format!(
                "revocation endpoint returned {status}: {body}"
            )));
        }

        debug!("access token revoked");
        Ok(())
    }

    async fn do_list(&self, access_token: &str, title_query: Option<&str>) -> Result<FileList> {
        let mut request = self
            .http
            .get(&self.endpoints.drive_files)
            .bearer_auth(access_token);
        if let Some(query) = title_query {
            request = request.query(&[("q", title_filter(query))]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Http(format!("listing request failed: {e}")))?;

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Listing(format!("invalid list response: {e}")))?;
        if let Some(err) = value.get("error") {
            return Err(Error::Listing(err.to_string()));
        }

        serde_json::from_value(value)
            .map_err(|e| Error::Listing(format!("invalid list response: {e}")))
    }
}

impl DriveProvider for GoogleDrive {
    fn authorization_url(&self, redirect_uri: &str, state: &str) -> String {
        authorization_url(
            &self.endpoints.authorization,
            &self.client_id,
            redirect_uri,
            DRIVE_METADATA_SCOPE,
            state,
        )
    }

    fn exchange_code<'a>(
        &'a self,
        redirect_uri: &'a str,
        code: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<TokenResponse>> + Send + 'a>> {
        Box::pin(self.do_exchange(redirect_uri, code))
    }

    fn revoke_token<'a>(
        &'a self,
        access_token: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(self.do_revoke(access_token))
    }

    fn list_files<'a>(
        &'a self,
        access_token: &'a str,
        title_query: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<FileList>> + Send + 'a>> {
        Box::pin(self.do_list(access_token, title_query))
    }
}
