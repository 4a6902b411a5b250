//! REST client for the DataCite DOI registration API.
//!
//! Thin wrapper over the `/dois` endpoint: create, update, state
//! transitions, retrieval, and draft deletion. Requests authenticate with
//! HTTP basic auth against a repository account and use the JSON:API media
//! type DataCite expects. There is no retry machinery; a failed call is
//! reported with the response body so the record can be corrected and
//! resubmitted.
//!
//! # Examples
//!
//! ```no_run
//! use spasecite::datacite::client::{Credentials, DataCiteClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DataCiteClient::test(Credentials {
//!   username: "REPO.ACCOUNT".to_string(),
//!   password: "hunter2".to_string(),
//! })?;
//! let record = client.get("10.48322/example").await?;
//! println!("{}", record.to_json_pretty()?);
//! # Ok(())
//! # }
//! ```

use url::Url;

use super::*;

/// Production API endpoint.
pub const API_URL: &str = "https://api.datacite.org";

/// Sandbox API endpoint; DOIs minted here do not resolve.
pub const TEST_API_URL: &str = "https://api.test.datacite.org";

/// JSON:API media type required by the DataCite API.
const MEDIA_TYPE: &str = "application/vnd.api+json";

/// DataCite repository account credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
  /// Repository account ID, e.g. `REPO.ACCOUNT`.
  pub username: String,
  /// Account password.
  pub password: String,
}

/// Client for the DataCite `/dois` endpoint.
#[derive(Debug, Clone)]
pub struct DataCiteClient {
  /// Underlying HTTP client.
  http:        reqwest::Client,
  /// API base URL.
  base_url:    Url,
  /// Basic-auth credentials.
  credentials: Credentials,
}

impl DataCiteClient {
  /// Creates a client against the production API.
  ///
  /// # Errors
  ///
  /// Returns [`SpaseciteError::InvalidUrl`] if the base URL fails to parse,
  /// which cannot happen for the built-in endpoints.
  pub fn new(credentials: Credentials) -> Result<Self> {
    Self::with_base_url(API_URL, credentials)
  }

  /// Creates a client against the sandbox API.
  ///
  /// # Errors
  ///
  /// See [`Self::new`].
  pub fn test(credentials: Credentials) -> Result<Self> {
    Self::with_base_url(TEST_API_URL, credentials)
  }

  /// Creates a client against an arbitrary base URL.
  ///
  /// # Errors
  ///
  /// Returns [`SpaseciteError::InvalidUrl`] if the base URL fails to parse.
  pub fn with_base_url(base_url: &str, credentials: Credentials) -> Result<Self> {
    Ok(Self { http: reqwest::Client::new(), base_url: Url::parse(base_url)?, credentials })
  }

  /// The endpoint for a DOI, or the collection endpoint when `doi` is empty.
  fn dois_url(&self, doi: &str) -> String {
    let base = self.base_url.as_str().trim_end_matches('/');
    if doi.is_empty() {
      format!("{base}/dois")
    } else {
      format!("{base}/dois/{doi}")
    }
  }

  /// Registers a new record. Without an `event` in the attributes the DOI is
  /// created as a draft; `register` or `publish` transitions it immediately.
  ///
  /// # Errors
  ///
  /// Returns [`SpaseciteError::Api`] for rejected submissions, carrying the
  /// response body, or [`SpaseciteError::Network`] for transport failures.
  pub async fn create(&self, record: &DataCiteRecord) -> Result<DataCiteRecord> {
    debug!("Creating DOI record at {}", self.dois_url(""));
    let response = self
      .http
      .post(self.dois_url(""))
      .basic_auth(&self.credentials.username, Some(&self.credentials.password))
      .header(reqwest::header::CONTENT_TYPE, MEDIA_TYPE)
      .json(record)
      .send()
      .await?;
    Self::into_record(response).await
  }

  /// Updates the metadata of an existing DOI.
  ///
  /// # Errors
  ///
  /// See [`Self::create`]; additionally [`SpaseciteError::NotFound`] when
  /// the DOI does not exist.
  pub async fn update(&self, doi: &str, record: &DataCiteRecord) -> Result<DataCiteRecord> {
    debug!("Updating DOI {doi}");
    let response = self
      .http
      .put(self.dois_url(doi))
      .basic_auth(&self.credentials.username, Some(&self.credentials.password))
      .header(reqwest::header::CONTENT_TYPE, MEDIA_TYPE)
      .json(record)
      .send()
      .await?;
    Self::into_record(response).await
  }

  /// Requests a state transition without touching the metadata.
  ///
  /// # Errors
  ///
  /// See [`Self::update`].
  pub async fn transition(&self, doi: &str, event: DoiEvent) -> Result<DataCiteRecord> {
    debug!("Transitioning DOI {doi}: {event}");
    let body = serde_json::json!({
      "data": { "type": "dois", "attributes": { "event": event } }
    });
    let response = self
      .http
      .put(self.dois_url(doi))
      .basic_auth(&self.credentials.username, Some(&self.credentials.password))
      .header(reqwest::header::CONTENT_TYPE, MEDIA_TYPE)
      .json(&body)
      .send()
      .await?;
    Self::into_record(response).await
  }

  /// Makes a DOI findable.
  ///
  /// # Errors
  ///
  /// See [`Self::update`].
  pub async fn publish(&self, doi: &str) -> Result<DataCiteRecord> {
    self.transition(doi, DoiEvent::Publish).await
  }

  /// Moves a findable DOI back to registered.
  ///
  /// # Errors
  ///
  /// See [`Self::update`].
  pub async fn hide(&self, doi: &str) -> Result<DataCiteRecord> {
    self.transition(doi, DoiEvent::Hide).await
  }

  /// Retrieves the registered record for a DOI.
  ///
  /// # Errors
  ///
  /// Returns [`SpaseciteError::NotFound`] for unknown DOIs; see also
  /// [`Self::create`].
  pub async fn get(&self, doi: &str) -> Result<DataCiteRecord> {
    debug!("Fetching DOI {doi}");
    let response = self
      .http
      .get(self.dois_url(doi))
      .basic_auth(&self.credentials.username, Some(&self.credentials.password))
      .send()
      .await?;
    Self::into_record(response).await
  }

  /// Deletes a DOI that is still in the draft state. Registered and findable
  /// DOIs cannot be deleted; DataCite rejects the request and the rejection
  /// surfaces as an [`SpaseciteError::Api`] error.
  ///
  /// # Errors
  ///
  /// Returns [`SpaseciteError::NotFound`] for unknown DOIs and
  /// [`SpaseciteError::Api`] for non-draft DOIs.
  pub async fn delete_draft(&self, doi: &str) -> Result<()> {
    debug!("Deleting draft DOI {doi}");
    let response = self
      .http
      .delete(self.dois_url(doi))
      .basic_auth(&self.credentials.username, Some(&self.credentials.password))
      .send()
      .await?;
    let status = response.status();
    if status.is_success() {
      return Ok(());
    }
    if status == reqwest::StatusCode::NOT_FOUND {
      return Err(SpaseciteError::NotFound);
    }
    Err(SpaseciteError::Api {
      status:  status.as_u16(),
      message: response.text().await.unwrap_or_default(),
    })
  }

  /// Converts an API response into a record, mapping non-success statuses to
  /// the appropriate error.
  async fn into_record(response: reqwest::Response) -> Result<DataCiteRecord> {
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
      return Err(SpaseciteError::NotFound);
    }
    if !status.is_success() {
      return Err(SpaseciteError::Api {
        status:  status.as_u16(),
        message: response.text().await.unwrap_or_default(),
      });
    }
    let body = response.text().await?;
    trace!("DataCite response: {body}");
    Ok(serde_json::from_str(&body)?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn credentials() -> Credentials {
    Credentials { username: "REPO.ACCOUNT".to_string(), password: "hunter2".to_string() }
  }

  #[test]
  fn builds_doi_endpoints() {
    let client = DataCiteClient::new(credentials()).unwrap();
    assert_eq!(client.dois_url(""), "https://api.datacite.org/dois");
    assert_eq!(
      client.dois_url("10.48322/example"),
      "https://api.datacite.org/dois/10.48322/example"
    );
  }

  #[test]
  fn sandbox_uses_the_test_endpoint() {
    let client = DataCiteClient::test(credentials()).unwrap();
    assert_eq!(client.dois_url(""), "https://api.test.datacite.org/dois");
  }

  #[test]
  fn rejects_malformed_base_urls() {
    assert!(DataCiteClient::with_base_url("not a url", credentials()).is_err());
  }

  #[test]
  fn get_fails_without_a_reachable_endpoint() {
    // Port 9 is the discard service; nothing answers there.
    let client = DataCiteClient::with_base_url("http://127.0.0.1:9", credentials()).unwrap();
    assert!(tokio_test::block_on(client.get("10.48322/example")).is_err());
  }
}
