use crate::{
    document::Document,
    error::{
        Error,
        Result,
    },
};
use futures::{
    future::BoxFuture,
    FutureExt,
};
use mongodb::{
    bson::{
        doc,
        Bson,
        Document as BsonDocument,
    },
    error::ErrorKind,
    options::ClientOptions,
    Client,
};
use std::time::Duration;

pub const ADMIN_DATABASE: &str = "admin";
const APP_NAME: &str = "mongo-exporter";
/// Extra time granted to the ping beyond the driver's own server selection timeout.
const CONNECT_SLACK: Duration = Duration::from_secs(1);

/// The administrative commands the collectors issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    GetLog,
    ListDatabases,
    ServerStatus,
    CollStats { collection: String },
}

impl AdminCommand {
    pub fn name(&self) -> &'static str {
        match self {
            AdminCommand::GetLog => "getLog",
            AdminCommand::ListDatabases => "listDatabases",
            AdminCommand::ServerStatus => "serverStatus",
            AdminCommand::CollStats { .. } => "collStats",
        }
    }

    pub fn to_document(&self) -> BsonDocument {
        match self {
            AdminCommand::GetLog => doc! { "getLog": "global" },
            AdminCommand::ListDatabases => doc! { "listDatabases": 1 },
            AdminCommand::ServerStatus => doc! { "serverStatus": 1 },
            AdminCommand::CollStats { collection } => doc! { "collStats": collection.as_str() },
        }
    }
}

/// The database operations collectors depend on. Implementations are shared between tasks.
pub trait AdminClient: Send + Sync {
    fn run_command<'a>(&'a self, database: &'a str, command: &'a AdminCommand) -> BoxFuture<'a, Result<Document>>;

    fn list_database_names(&self) -> BoxFuture<'_, Result<Vec<String>>>;

    fn list_collection_names<'a>(&'a self, database: &'a str) -> BoxFuture<'a, Result<Vec<String>>>;
}

/// Fails with a command error unless the response's `ok` field coerces to `1`.
pub fn ensure_ok(response: &Document, command: &AdminCommand) -> Result<()> {
    match response.get("ok").try_f64() {
        Ok(ok) if ok == 1.0 => Ok(()),
        Ok(ok) => Err(Error::command(command.name(), format!("ok was {ok}"))),
        Err(err) => Err(Error::command(command.name(), format!("ok field: {err}"))),
    }
}

/// [`AdminClient`] backed by the official driver.
#[derive(Clone, Debug)]
pub struct MongoAdminClient {
    client: Client,
}

impl MongoAdminClient {
    /// Connects and pings `admin`, bounded by `timeout`.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self> {
        if url.trim().is_empty() {
            return Err(Error::EmptyConnectionString);
        }

        let mut options = ClientOptions::parse(url).await.map_err(Error::Connection)?;
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);
        options.app_name = Some(APP_NAME.to_string());

        let client = Client::with_options(options).map_err(Error::Connection)?;
        let admin = client.database(ADMIN_DATABASE);
        tokio::time::timeout(timeout + CONNECT_SLACK, async move {
            admin.run_command(doc! { "ping": 1 }).await
        })
        .await
        .map_err(|_| Error::ConnectTimeout(timeout))?
        .map_err(|err| match *err.kind {
            ErrorKind::ServerSelection { .. } => Error::ConnectTimeout(timeout),
            _ => Error::Connection(err),
        })?;

        Ok(Self { client })
    }
}

impl AdminClient for MongoAdminClient {
    fn run_command<'a>(&'a self, database: &'a str, command: &'a AdminCommand) -> BoxFuture<'a, Result<Document>> {
        async move {
            let response = self
                .client
                .database(database)
                .run_command(command.to_document())
                .await
                .map_err(|err| Error::command(command.name(), err))?;
            Ok(Document::new(Bson::Document(response).into_relaxed_extjson()))
        }
        .boxed()
    }

    fn list_database_names(&self) -> BoxFuture<'_, Result<Vec<String>>> {
        async move {
            self.client
                .list_database_names()
                .await
                .map_err(|err| Error::command("listDatabaseNames", err))
        }
        .boxed()
    }

    fn list_collection_names<'a>(&'a self, database: &'a str) -> BoxFuture<'a, Result<Vec<String>>> {
        async move {
            self.client
                .database(database)
                .list_collection_names()
                .await
                .map_err(|err| Error::command("listCollectionNames", err))
        }
        .boxed()
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use serde_json::Value;
    use std::{
        collections::HashMap,
        sync::Mutex,
    };

    /// Canned responses keyed by database and command name, with per-call failure injection.
    #[derive(Default)]
    pub struct FakeAdminClient {
        responses: Mutex<HashMap<(String, String), Vec<Value>>>,
        collections: HashMap<String, Vec<String>>,
        failing: Mutex<Vec<String>>,
        pub calls: Mutex<Vec<String>>,
    }

    impl FakeAdminClient {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queues a response; the last queued response repeats once the queue drains.
        pub fn respond(self, database: &str, command: &str, response: Value) -> Self {
            self.responses
                .lock()
                .unwrap()
                .entry((database.to_string(), command.to_string()))
                .or_default()
                .push(response);
            self
        }

        pub fn with_collections(mut self, database: &str, collections: &[&str]) -> Self {
            self.collections.insert(
                database.to_string(),
                collections.iter().map(|name| name.to_string()).collect(),
            );
            self
        }

        /// Makes every call whose description contains `needle` fail.
        pub fn fail_on(&self, needle: &str) {
            self.failing.lock().unwrap().push(needle.to_string());
        }

        pub fn heal(&self) {
            self.failing.lock().unwrap().clear();
        }

        fn track(&self, call: String) -> Result<()> {
            self.calls.lock().unwrap().push(call.clone());
            if self.failing.lock().unwrap().iter().any(|needle| call.contains(needle)) {
                return Err(Error::command(call, "injected failure"));
            }
            Ok(())
        }
    }

    impl AdminClient for FakeAdminClient {
        fn run_command<'a>(&'a self, database: &'a str, command: &'a AdminCommand) -> BoxFuture<'a, Result<Document>> {
            async move {
                let key = match command {
                    AdminCommand::CollStats { collection } => format!("collStats:{collection}"),
                    other => other.name().to_string(),
                };
                self.track(format!("{database}.{key}"))?;
                let mut responses = self.responses.lock().unwrap();
                let queue = responses
                    .get_mut(&(database.to_string(), key.clone()))
                    .ok_or_else(|| Error::command(command.name(), format!("no response for {database}.{key}")))?;
                let response = if queue.len() > 1 {
                    queue.remove(0)
                } else {
                    queue[0].clone()
                };
                Ok(Document::new(response))
            }
            .boxed()
        }

        fn list_database_names(&self) -> BoxFuture<'_, Result<Vec<String>>> {
            async move {
                self.track("listDatabaseNames".to_string())?;
                let mut names: Vec<String> = self.collections.keys().cloned().collect();
                names.sort();
                Ok(names)
            }
            .boxed()
        }

        fn list_collection_names<'a>(&'a self, database: &'a str) -> BoxFuture<'a, Result<Vec<String>>> {
            async move {
                self.track(format!("{database}.listCollectionNames"))?;
                Ok(self.collections.get(database).cloned().unwrap_or_default())
            }
            .boxed()
        }
    }
}
