use super::LogRecord;
use crate::metrics::{
    Metric,
    MetricPoint,
};
use mongo_exporter_config::LogMessageCatalog;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ConnectionState {
    Accepted,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum AuthenticationState {
    Success,
    Fail,
}

/// The category a log record falls into, with the labels extracted for it.
#[derive(Debug, Clone, PartialEq)]
pub enum LogEvent {
    Connection(ConnectionState),
    Authentication {
        state: AuthenticationState,
        mechanism: String,
        db: String,
        principal: String,
        remote: String,
    },
    ClientMetadata {
        remote: String,
        driver: String,
    },
    SlowQuery {
        db: String,
        collection: String,
        command: String,
        seconds: f64,
    },
    Uncategorized,
}

/// Maps log records to metric points by exact message text.
#[derive(Debug, Clone, Default)]
pub struct LogClassifier {
    catalog: LogMessageCatalog,
}

impl LogClassifier {
    pub fn new(catalog: LogMessageCatalog) -> Self {
        Self { catalog }
    }

    /// First match wins: connection, authentication, client metadata, slow query.
    pub fn classify(&self, record: &LogRecord) -> LogEvent {
        let message = record.message.as_str();
        let catalog = &self.catalog;
        let attributes = &record.attributes;

        if message == catalog.connection_accepted {
            return LogEvent::Connection(ConnectionState::Accepted);
        }
        if message == catalog.connection_ended {
            return LogEvent::Connection(ConnectionState::Ended);
        }

        if message == catalog.authentication_failed || message == catalog.authentication_succeeded {
            let state = if message == catalog.authentication_failed {
                AuthenticationState::Fail
            } else {
                AuthenticationState::Success
            };
            return LogEvent::Authentication {
                state,
                mechanism: attributes.label("mechanism"),
                db: attributes.string("authenticationDatabase"),
                principal: attributes.label("principalName"),
                remote: remote_host(&attributes.string("client"), "authentication"),
            };
        }

        if message == catalog.client_metadata {
            return LogEvent::ClientMetadata {
                remote: remote_host(&attributes.string("remote"), "client metadata"),
                driver: attributes.string("doc.driver.name"),
            };
        }

        if message == catalog.slow_query {
            let command = attributes.get("command");
            let command_name = command.first_key().unwrap_or_else(|| {
                warn!(
                    command = %attributes.string("command"),
                    "Could not parse slow query command name from log, using empty value"
                );
                ""
            });
            return LogEvent::SlowQuery {
                db: command.label("$db"),
                collection: attributes.label("ns"),
                command: command_name.to_string(),
                seconds: slow_query_seconds(record),
            };
        }

        LogEvent::Uncategorized
    }

    /// The generic per-level counter plus at most one category point.
    pub fn points(&self, record: &LogRecord) -> Vec<MetricPoint> {
        let level = record.level.as_str();
        let component = record.component.as_str();
        let mut points = vec![MetricPoint::increment(Metric::LogTotal, [level, component])];

        match self.classify(record) {
            LogEvent::Connection(state) => points.push(MetricPoint::increment(
                Metric::LogConnectionTotal,
                [level.to_string(), component.to_string(), state.to_string()],
            )),
            LogEvent::Authentication {
                state,
                mechanism,
                db,
                principal,
                remote,
            } => points.push(MetricPoint::increment(
                Metric::LogAuthenticationTotal,
                [
                    level.to_string(),
                    component.to_string(),
                    state.to_string(),
                    mechanism,
                    db,
                    principal,
                    remote,
                ],
            )),
            LogEvent::ClientMetadata { remote, driver } => points.push(MetricPoint::increment(
                Metric::LogClientMetadataTotal,
                [level.to_string(), component.to_string(), remote, driver],
            )),
            LogEvent::SlowQuery {
                db,
                collection,
                command,
                seconds,
            } => points.push(MetricPoint::new(
                Metric::LogSlowQuerySeconds,
                [level.to_string(), component.to_string(), db, collection, command],
                seconds,
            )),
            LogEvent::Uncategorized => {}
        }
        points
    }
}

fn slow_query_seconds(record: &LogRecord) -> f64 {
    match record.attributes.get("durationMillis").try_f64() {
        Ok(millis) if millis >= 0.0 => millis / 1000.0,
        Ok(millis) => {
            warn!(millis, "Negative slow query duration, recording 0");
            0.0
        }
        Err(err) => {
            warn!(%err, "Could not read slow query duration, recording 0");
            0.0
        }
    }
}

/// Host part of a `host:port` address. Bracketed IPv6 hosts lose their brackets.
pub fn parse_remote(address: &str) -> Option<&str> {
    let (host, port) = address.rsplit_once(':')?;
    port.parse::<u16>().ok()?;
    let host = host
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(host);
    if host.is_empty() || (host.contains(':') && !address.starts_with('[')) {
        return None;
    }
    Some(host)
}

fn remote_host(address: &str, context: &'static str) -> String {
    match parse_remote(address) {
        Some(host) => host.to_string(),
        None => {
            warn!(remote = address, context, "Could not parse remote IP, using empty value");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use pretty_assertions::assert_eq;
    use serde_json::{
        json,
        Value,
    };

    fn record(message: &str, attributes: Value) -> LogRecord {
        LogRecord {
            timestamp: "2024-03-01T10:00:00.000+00:00".to_string(),
            level: "I".to_string(),
            component: "ACCESS".to_string(),
            message: message.to_string(),
            attributes: Document::new(attributes),
        }
    }

    fn classifier() -> LogClassifier {
        LogClassifier::default()
    }

    #[test]
    fn connection_events() {
        let accepted = record("connection accepted", json!({ "remote": "10.0.0.5:54321" }));
        assert_eq!(
            classifier().classify(&accepted),
            LogEvent::Connection(ConnectionState::Accepted)
        );

        let points = classifier().points(&record("connection ended", json!({})));
        assert_eq!(
            points,
            vec![
                MetricPoint::increment(Metric::LogTotal, ["I", "ACCESS"]),
                MetricPoint::increment(Metric::LogConnectionTotal, ["I", "ACCESS", "ended"]),
            ]
        );
    }

    #[test]
    fn authentication_extracts_fields() {
        let failed = record(
            "Authentication failed",
            json!({
                "mechanism": "SCRAM-SHA-256",
                "principalName": "reporter",
                "authenticationDatabase": "admin",
                "client": "10.0.0.5:54321",
                "result": "UserNotFound"
            }),
        );
        let points = classifier().points(&failed);
        assert_eq!(
            points[1],
            MetricPoint::increment(
                Metric::LogAuthenticationTotal,
                ["I", "ACCESS", "fail", "SCRAM-SHA-256", "admin", "reporter", "10.0.0.5"]
            )
        );

        let succeeded = record("Successful authentication", json!({ "client": "10.0.0.6:1234" }));
        assert!(matches!(
            classifier().classify(&succeeded),
            LogEvent::Authentication { state: AuthenticationState::Success, ref remote, .. } if remote == "10.0.0.6"
        ));
    }

    #[test]
    fn malformed_remote_still_counts() {
        let failed = record(
            "Authentication failed",
            json!({ "client": "10.0.0.5", "mechanism": "SCRAM-SHA-256", "principalName": "app" }),
        );
        let (points, logs) = crate::test_logs::capture(|| classifier().points(&failed));
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].labels[6], "");
        assert!(logs.contains("Could not parse remote IP"));
        assert!(logs.contains("10.0.0.5"));
    }

    #[test]
    fn missing_labels_are_empty_and_logged() {
        let failed = record("Authentication failed", json!({ "client": "10.0.0.5:50000" }));
        let (event, logs) = crate::test_logs::capture(|| classifier().classify(&failed));
        assert_eq!(
            event,
            LogEvent::Authentication {
                state: AuthenticationState::Fail,
                mechanism: String::new(),
                db: String::new(),
                principal: String::new(),
                remote: "10.0.0.5".to_string(),
            }
        );
        assert!(logs.contains("Missing label value"));
        assert!(logs.contains("mechanism"));
        assert!(logs.contains("principalName"));
    }

    #[test]
    fn client_metadata_reads_driver() {
        let metadata = record(
            "client metadata",
            json!({
                "remote": "192.168.1.20:60000",
                "client": "conn12",
                "doc": { "driver": { "name": "mongo-rust-driver", "version": "3.1.0" } }
            }),
        );
        assert_eq!(
            classifier().classify(&metadata),
            LogEvent::ClientMetadata {
                remote: "192.168.1.20".to_string(),
                driver: "mongo-rust-driver".to_string(),
            }
        );
    }

    #[test]
    fn slow_query_observes_seconds() {
        let slow = record(
            "Slow query",
            json!({
                "type": "command",
                "ns": "sales.orders",
                "command": { "find": "orders", "filter": { "status": "open" }, "$db": "sales" },
                "durationMillis": 1500
            }),
        );
        let points = classifier().points(&slow);
        assert_eq!(
            points[1],
            MetricPoint::new(
                Metric::LogSlowQuerySeconds,
                ["I", "ACCESS", "sales", "sales.orders", "find"],
                1.5
            )
        );
    }

    #[test]
    fn slow_query_without_command_or_duration() {
        let slow = record("Slow query", json!({ "ns": "sales.orders", "command": "redacted" }));
        assert_eq!(
            classifier().classify(&slow),
            LogEvent::SlowQuery {
                db: String::new(),
                collection: "sales.orders".to_string(),
                command: String::new(),
                seconds: 0.0,
            }
        );
    }

    #[test]
    fn matching_is_exact() {
        for message in ["Connection accepted", "connection accepted ", "Slow query detected", ""] {
            let other = record(message, json!({}));
            assert_eq!(classifier().classify(&other), LogEvent::Uncategorized);
            assert_eq!(classifier().points(&other).len(), 1);
        }
    }

    #[test]
    fn catalogue_is_configurable() {
        let catalog = LogMessageCatalog {
            slow_query: "Slow operation".to_string(),
            ..LogMessageCatalog::default()
        };
        let classifier = LogClassifier::new(catalog);
        let slow = record("Slow operation", json!({ "durationMillis": 20 }));
        assert!(matches!(classifier.classify(&slow), LogEvent::SlowQuery { seconds, .. } if seconds == 0.02));
        assert_eq!(
            classifier.classify(&record("Slow query", json!({}))),
            LogEvent::Uncategorized
        );
    }

    #[test]
    fn remote_addresses() {
        assert_eq!(parse_remote("10.0.0.5:54321"), Some("10.0.0.5"));
        assert_eq!(parse_remote("db.internal:27017"), Some("db.internal"));
        assert_eq!(parse_remote("[::1]:27017"), Some("::1"));
        assert_eq!(parse_remote("10.0.0.5"), None);
        assert_eq!(parse_remote("10.0.0.5:port"), None);
        assert_eq!(parse_remote(":27017"), None);
        assert_eq!(parse_remote("::1"), None);
        assert_eq!(parse_remote(""), None);
    }
}
