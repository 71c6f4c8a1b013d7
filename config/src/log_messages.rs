use serde::{
    Deserialize,
    Serialize,
};

/// Exact log message texts the classifier recognizes.
///
/// Matching is by string equality. A server release that rewords one of these messages makes the
/// affected records fall into the generic bucket until the catalogue is updated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogMessageCatalog {
    pub connection_accepted: String,
    pub connection_ended: String,
    pub authentication_failed: String,
    pub authentication_succeeded: String,
    pub client_metadata: String,
    pub slow_query: String,
}

impl Default for LogMessageCatalog {
    fn default() -> Self {
        Self {
            connection_accepted: "connection accepted".to_string(),
            connection_ended: "connection ended".to_string(),
            authentication_failed: "Authentication failed".to_string(),
            authentication_succeeded: "Successful authentication".to_string(),
            client_metadata: "client metadata".to_string(),
            slow_query: "Slow query".to_string(),
        }
    }
}
