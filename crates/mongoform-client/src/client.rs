//! The backend client.

use mongoform_query::FinalDocument;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::encode::encode_uri;
use crate::error::{ClientError, Result};
use crate::operation::{document_or_null, filter_or_empty, set_document, Operation};
use crate::transport::{Reply, Transport, UreqTransport};

/// Submits compiled documents to a mongo-api backend.
///
/// Every operation is a single blocking `GET` whose path carries the
/// collection and the JSON documents. Missing filters serialize as `{}` and
/// missing data documents as `null`.
///
/// # Example
///
/// ```
/// use mongoform_client::{BackendClient, ClientConfig, MockTransport, Reply};
/// use mongoform_query::{compile, FieldSpec};
///
/// let transport = MockTransport::new().with_reply(Reply::ok("[]"));
/// let client = BackendClient::with_transport(ClientConfig::default(), transport).unwrap();
///
/// let filter = compile(&[FieldSpec::text("name", "Ada")]);
/// let found = client.find("people", Some(&filter)).unwrap();
///
/// assert_eq!(found, serde_json::json!([]));
/// assert_eq!(
///     client.transport().last_request().unwrap(),
///     "http://localhost:8080/mongo-api/find/people/%7B%22name%22:%22Ada%22%7D"
/// );
/// ```
#[derive(Debug)]
pub struct BackendClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl BackendClient<UreqTransport> {
    /// Creates a network client for `config`.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = UreqTransport::new(config.timeout());
        Self::with_transport(config, transport)
    }

    /// Creates a network client configured from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }
}

impl<T: Transport> BackendClient<T> {
    /// Creates a client that sends requests through `transport`.
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Builds the encoded URL for `op` on `collection` with path `segments`.
    pub fn url_for(&self, op: Operation, collection: &str, segments: &[&str]) -> Result<String> {
        if collection.is_empty() {
            return Err(ClientError::EmptyCollection);
        }
        let mut url = format!("{}/{}/{}", self.config.root(), op, collection);
        for segment in segments {
            url.push('/');
            url.push_str(segment);
        }
        Ok(encode_uri(&url))
    }

    /// Inserts `doc` into `collection`.
    pub fn insert(&self, collection: &str, doc: Option<&FinalDocument>) -> Result<Reply> {
        let doc = document_or_null(doc)?;
        self.send(Operation::Insert, collection, &[doc.as_str()])
    }

    /// Finds documents in `collection` matching `filter` and parses the reply.
    pub fn find(&self, collection: &str, filter: Option<&FinalDocument>) -> Result<Value> {
        let filter = filter_or_empty(filter)?;
        let url = self.url_for(Operation::Find, collection, &[filter.as_str()])?;
        let reply = self.get(Operation::Find, &url)?;
        serde_json::from_str(&reply.body).map_err(|source| ClientError::InvalidJson { url, source })
    }

    /// Sets the fields of `data` on documents matching `filter`.
    pub fn update(
        &self,
        collection: &str,
        filter: Option<&FinalDocument>,
        data: Option<&FinalDocument>,
    ) -> Result<Reply> {
        let filter = document_or_null(filter)?;
        let set = set_document(data)?;
        self.send(Operation::Update, collection, &[filter.as_str(), set.as_str()])
    }

    /// Deletes documents in `collection` matching `filter`.
    pub fn delete(&self, collection: &str, filter: Option<&FinalDocument>) -> Result<Reply> {
        let filter = filter_or_empty(filter)?;
        self.send(Operation::Delete, collection, &[filter.as_str()])
    }

    /// Removes every document from `collection`.
    pub fn empty_collection(&self, collection: &str) -> Result<Reply> {
        self.send(Operation::Empty, collection, &[])
    }

    /// Drops `collection`.
    pub fn drop_collection(&self, collection: &str) -> Result<Reply> {
        self.send(Operation::Drop, collection, &[])
    }

    fn send(&self, op: Operation, collection: &str, segments: &[&str]) -> Result<Reply> {
        let url = self.url_for(op, collection, segments)?;
        self.get(op, &url)
    }

    fn get(&self, op: Operation, url: &str) -> Result<Reply> {
        debug!(%op, url, "sending request");
        let reply = self.transport.get(url)?;
        if reply.is_success() {
            debug!(%op, status = reply.status, bytes = reply.body.len(), "request completed");
        } else {
            warn!(%op, status = reply.status, "backend returned an error status");
        }
        Ok(reply)
    }
}
