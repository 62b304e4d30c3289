//! Live provider backed by a MongoDB server.

use mongodb::bson::{Bson, doc};
use mongodb::sync::{Client, Database};
use tracing::debug;

use crate::snapshot::StatusSnapshot;

use super::{ProviderError, StatusProvider};

const ADMIN_DB: &str = "admin";

/// Driver timeouts applied unless the connection string sets its own. The
/// driver default of 30s would stall startup and shutdown on a dead server.
const DEFAULT_TIMEOUT_OPTIONS: [(&str, u32); 2] =
    [("serverSelectionTimeoutMS", 2000), ("connectTimeoutMS", 2000)];

/// Provider running `serverStatus` against the `admin` database.
///
/// The client is created once; the driver handles reconnects internally, so
/// a server outage surfaces as per-tick [`ProviderError::Command`] errors.
pub struct MongoProvider {
    db: Database,
    target: String,
}

impl MongoProvider {
    /// Creates a client for `uri`. Only URI parsing errors are reported here.
    pub fn connect(uri: &str) -> Result<Self, ProviderError> {
        let target = redact_uri(uri);
        let client = Client::with_uri_str(with_default_timeouts(uri))
            .map_err(|e| ProviderError::Connect(e.to_string()))?;
        Ok(Self {
            db: client.database(ADMIN_DB),
            target,
        })
    }

    /// Probes reachability with a `ping`. Bounded by the server selection
    /// timeout.
    pub fn ping(&self) -> Result<(), ProviderError> {
        self.db
            .run_command(doc! { "ping": 1 }, None)
            .map_err(|e| ProviderError::Connect(e.to_string()))?;
        debug!("Connected to {}", self.target);
        Ok(())
    }
}

/// Appends [`DEFAULT_TIMEOUT_OPTIONS`] that `uri` does not already set.
pub fn with_default_timeouts(uri: &str) -> String {
    let lower = uri.to_ascii_lowercase();
    let missing: Vec<String> = DEFAULT_TIMEOUT_OPTIONS
        .iter()
        .filter(|(key, _)| !lower.contains(&format!("{}=", key.to_ascii_lowercase())))
        .map(|(key, ms)| format!("{}={}", key, ms))
        .collect();
    if missing.is_empty() {
        return uri.to_string();
    }

    let authority_start = uri.find("://").map(|i| i + 3).unwrap_or(0);
    let separator = if uri[authority_start..].contains('?') {
        if uri.ends_with('?') || uri.ends_with('&') { "" } else { "&" }
    } else if uri[authority_start..].contains('/') {
        "?"
    } else {
        "/?"
    };
    format!("{}{}{}", uri, separator, missing.join("&"))
}

impl StatusProvider for MongoProvider {
    fn fetch_status(&mut self) -> Result<StatusSnapshot, ProviderError> {
        let reply = self
            .db
            .run_command(doc! { "serverStatus": 1 }, None)
            .map_err(|e| ProviderError::Command(e.to_string()))?;
        Ok(Bson::Document(reply).into_relaxed_extjson())
    }

    fn describe(&self) -> String {
        self.target.clone()
    }
}

/// Strips credentials from a connection string so it can be logged.
///
/// `mongodb://user:secret@db:27017/?tls=true` becomes
/// `mongodb://***@db:27017/?tls=true`.
pub fn redact_uri(uri: &str) -> String {
    let Some(scheme_end) = uri.find("://") else {
        return uri.to_string();
    };
    let authority_start = scheme_end + 3;
    let authority_end = uri[authority_start..]
        .find(['/', '?'])
        .map(|i| authority_start + i)
        .unwrap_or(uri.len());

    match uri[authority_start..authority_end].rfind('@') {
        Some(at) => format!(
            "{}***{}",
            &uri[..authority_start],
            &uri[authority_start + at..]
        ),
        None => uri.to_string(),
    }
}
