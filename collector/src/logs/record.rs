use crate::{
    document::{
        Document,
        Node,
    },
    error::ParseError,
};
use serde_json::Value;

/// One structured entry of the server's log buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// ISO-8601 text from `t.$date`; compared as text.
    pub timestamp: String,
    pub level: String,
    pub component: String,
    pub message: String,
    pub attributes: Document,
}

impl LogRecord {
    /// Decodes an entry that is either JSON text or an already decoded object.
    pub fn from_node(entry: Node<'_>) -> Result<Self, ParseError> {
        let document = match entry.value() {
            Some(Value::String(text)) => Document::parse(text)?,
            Some(value @ Value::Object(_)) => Document::new(value.clone()),
            None | Some(Value::Null) => return Err(ParseError::Missing),
            Some(_) => return Err(ParseError::Unexpected("a JSON object or JSON text")),
        };
        Self::from_document(document)
    }

    pub fn from_document(document: Document) -> Result<Self, ParseError> {
        let timestamp = document
            .get("t.$date")
            .as_str()
            .filter(|timestamp| !timestamp.is_empty())
            .ok_or(ParseError::Missing)?
            .to_string();

        Ok(Self {
            timestamp,
            level: document.string("s"),
            component: document.string("c"),
            message: document.string("msg"),
            attributes: document.get("attr").to_document(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn decodes_json_text() {
        let entry = json!(
            r#"{"t":{"$date":"2024-03-01T10:00:00.000+00:00"},"s":"I","c":"NETWORK","id":22943,"ctx":"listener","msg":"connection accepted","attr":{"remote":"10.0.0.5:54321","connectionCount":3}}"#
        );
        let record = LogRecord::from_node(Node::new(&entry)).unwrap();
        assert_eq!(record.timestamp, "2024-03-01T10:00:00.000+00:00");
        assert_eq!(record.level, "I");
        assert_eq!(record.component, "NETWORK");
        assert_eq!(record.message, "connection accepted");
        assert_eq!(record.attributes.string("remote"), "10.0.0.5:54321");
    }

    #[test]
    fn decodes_objects() {
        let entry = json!({
            "t": { "$date": "2024-03-01T10:00:01.000+00:00" },
            "s": "W",
            "c": "COMMAND",
            "msg": "Slow query"
        });
        let record = LogRecord::from_node(Node::new(&entry)).unwrap();
        assert_eq!(record.level, "W");
        assert!(!record.attributes.root().is_present());
    }

    #[test]
    fn entries_without_timestamp_are_rejected() {
        let entry = json!(r#"{"s":"I","c":"NETWORK","msg":"connection accepted"}"#);
        assert!(matches!(LogRecord::from_node(Node::new(&entry)), Err(ParseError::Missing)));
    }

    #[test]
    fn malformed_entries_are_rejected() {
        let text = json!("not json at all");
        assert!(matches!(
            LogRecord::from_node(Node::new(&text)),
            Err(ParseError::InvalidJson(_))
        ));
        let number = json!(12);
        assert!(matches!(
            LogRecord::from_node(Node::new(&number)),
            Err(ParseError::Unexpected(_))
        ));
    }
}
