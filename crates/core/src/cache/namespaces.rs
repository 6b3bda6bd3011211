//! Cache namespace and entry operations.
//!
//! A namespace is a named, versioned store mapping request identities to
//! stored responses. Namespaces are created on demand and never dropped.

use super::connection::CacheDb;
use crate::Error;
use crate::request::{Method, Response};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A response to be stored under a request identity.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key_hash: String,
    pub method: Method,
    pub url: String,
    pub response: Response,
}

/// Listing metadata for a stored entry (no body).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct EntryInfo {
    pub key_hash: String,
    pub method: String,
    pub url: String,
    pub status: u16,
    pub body_len: usize,
    pub stored_at: String,
}

/// A namespace and how many entries it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct NamespaceInfo {
    pub name: String,
    pub created_at: String,
    pub entry_count: u64,
}

impl CacheDb {
    /// Open a namespace, creating it if it doesn't exist.
    ///
    /// Opening an existing namespace leaves its entries untouched.
    pub async fn open_namespace(&self, name: &str) -> Result<(), Error> {
        if name.trim().is_empty() {
            return Err(Error::InvalidInput("cache namespace name cannot be empty".into()));
        }
        let name = name.to_string();
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let created = conn.execute(
                    "INSERT OR IGNORE INTO cache_namespaces (name, created_at) VALUES (?1, ?2)",
                    params![name, now],
                )?;
                if created > 0 {
                    tracing::info!(namespace = %name, "created cache namespace");
                }
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Store entries in a namespace in a single transaction.
    ///
    /// Uses UPSERT semantics keyed by (namespace, key_hash), so storing the
    /// same entries twice leaves the namespace unchanged. Either every entry
    /// is written or none is.
    pub async fn put_entries(&self, namespace: &str, entries: Vec<CacheEntry>) -> Result<(), Error> {
        let namespace = namespace.to_string();
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                let known: bool = tx.query_row(
                    "SELECT EXISTS(SELECT 1 FROM cache_namespaces WHERE name = ?1)",
                    params![namespace],
                    |row| row.get(0),
                )?;
                if !known {
                    return Err(Error::InvalidInput(format!("cache namespace {namespace} is not open")));
                }

                for entry in &entries {
                    let headers_json = serde_json::to_string(&entry.response.headers)?;
                    tx.execute(
                        "INSERT INTO cache_entries (
                            namespace, key_hash, method, url, status, headers_json, body, stored_at
                        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                        ON CONFLICT(namespace, key_hash) DO UPDATE SET
                            method = excluded.method,
                            url = excluded.url,
                            status = excluded.status,
                            headers_json = excluded.headers_json,
                            body = excluded.body,
                            stored_at = excluded.stored_at",
                        params![
                            &namespace,
                            &entry.key_hash,
                            entry.method.as_str(),
                            &entry.url,
                            entry.response.status,
                            headers_json,
                            entry.response.body.as_ref(),
                            &now,
                        ],
                    )?;
                }

                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Look up a stored response by request identity.
    ///
    /// Returns None if the namespace holds no entry for the key.
    pub async fn match_entry(&self, namespace: &str, key_hash: &str) -> Result<Option<Response>, Error> {
        let namespace = namespace.to_string();
        let key_hash = key_hash.to_string();
        self.conn
            .call(move |conn| -> Result<Option<Response>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT status, headers_json, body FROM cache_entries
                     WHERE namespace = ?1 AND key_hash = ?2",
                )?;

                let row = stmt.query_row(params![namespace, key_hash], |row| {
                    Ok((row.get::<_, u16>(0)?, row.get::<_, String>(1)?, row.get::<_, Vec<u8>>(2)?))
                });

                match row {
                    Ok((status, headers_json, body)) => {
                        let headers = serde_json::from_str(&headers_json)?;
                        Ok(Some(Response { status, headers, body: Bytes::from(body) }))
                    }
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// List the entries of a namespace, ordered by URL.
    pub async fn list_entries(&self, namespace: &str) -> Result<Vec<EntryInfo>, Error> {
        let namespace = namespace.to_string();
        self.conn
            .call(move |conn| -> Result<Vec<EntryInfo>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT key_hash, method, url, status, length(body), stored_at
                     FROM cache_entries WHERE namespace = ?1
                     ORDER BY url, method",
                )?;

                let rows = stmt.query_map(params![namespace], |row| {
                    Ok(EntryInfo {
                        key_hash: row.get(0)?,
                        method: row.get(1)?,
                        url: row.get(2)?,
                        status: row.get(3)?,
                        body_len: row.get::<_, i64>(4)? as usize,
                        stored_at: row.get(5)?,
                    })
                })?;

                let collected = rows.collect::<Result<Vec<_>, _>>()?;
                Ok(collected)
            })
            .await
            .map_err(Error::from)
    }

    /// Count the entries of a namespace.
    pub async fn entry_count(&self, namespace: &str) -> Result<u64, Error> {
        let namespace = namespace.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM cache_entries WHERE namespace = ?1",
                    params![namespace],
                    |row| row.get(0),
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// List every namespace in the database, including orphaned versions.
    pub async fn list_namespaces(&self) -> Result<Vec<NamespaceInfo>, Error> {
        self.conn
            .call(move |conn| -> Result<Vec<NamespaceInfo>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT n.name, n.created_at, COUNT(e.key_hash)
                     FROM cache_namespaces n
                     LEFT JOIN cache_entries e ON e.namespace = n.name
                     GROUP BY n.name, n.created_at
                     ORDER BY n.created_at, n.name",
                )?;

                let rows = stmt.query_map([], |row| {
                    Ok(NamespaceInfo {
                        name: row.get(0)?,
                        created_at: row.get(1)?,
                        entry_count: row.get::<_, i64>(2)? as u64,
                    })
                })?;

                let collected = rows.collect::<Result<Vec<_>, _>>()?;
                Ok(collected)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;

    const NS: &str = "topview-shell-v1";

    fn make_entry(url: &str, body: &str) -> CacheEntry {
        let request = Request::get(url).unwrap();
        CacheEntry {
            key_hash: request.cache_key(),
            method: request.method,
            url: request.url.to_string(),
            response: Response::new(200, body.to_string()).with_header("content-type", "text/html"),
        }
    }

    #[tokio::test]
    async fn test_put_and_match() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.open_namespace(NS).await.unwrap();

        let entry = make_entry("http://localhost:8080/index.html", "<html>shell</html>");
        db.put_entries(NS, vec![entry.clone()]).await.unwrap();

        let found = db.match_entry(NS, &entry.key_hash).await.unwrap().unwrap();
        assert_eq!(found, entry.response);
    }

    #[tokio::test]
    async fn test_match_missing() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.open_namespace(NS).await.unwrap();
        assert!(db.match_entry(NS, "nonexistent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_binary_body_round_trip() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.open_namespace(NS).await.unwrap();

        let mut entry = make_entry("http://localhost:8080/icon.png", "");
        entry.response.body = Bytes::from_static(&[0x89, b'P', b'N', b'G', 0x00, 0xff, 0x0a]);
        db.put_entries(NS, vec![entry.clone()]).await.unwrap();

        let found = db.match_entry(NS, &entry.key_hash).await.unwrap().unwrap();
        assert_eq!(found.body, entry.response.body);
    }

    #[tokio::test]
    async fn test_non_utf8_header_round_trip() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.open_namespace(NS).await.unwrap();

        let mut entry = make_entry("http://localhost:8080/export", "a,b");
        entry.response = entry.response.with_header("content-disposition", b"attachment; filename=r\xe9sum\xe9.csv");
        db.put_entries(NS, vec![entry.clone()]).await.unwrap();

        let found = db.match_entry(NS, &entry.key_hash).await.unwrap().unwrap();
        assert_eq!(found.headers, entry.response.headers);
        assert_eq!(found.header_bytes("content-disposition"), Some(&b"attachment; filename=r\xe9sum\xe9.csv"[..]));
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.open_namespace("topview-shell-v0").await.unwrap();
        db.open_namespace(NS).await.unwrap();

        let entry = make_entry("http://localhost:8080/", "v0 shell");
        db.put_entries("topview-shell-v0", vec![entry.clone()]).await.unwrap();

        assert!(db.match_entry(NS, &entry.key_hash).await.unwrap().is_none());
        assert_eq!(db.entry_count("topview-shell-v0").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_put_is_idempotent() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.open_namespace(NS).await.unwrap();

        let entries = vec![
            make_entry("http://localhost:8080/", "root"),
            make_entry("http://localhost:8080/index.html", "index"),
        ];
        db.put_entries(NS, entries.clone()).await.unwrap();
        db.put_entries(NS, entries).await.unwrap();

        let listed = db.list_entries(NS).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].url, "http://localhost:8080/");
        assert_eq!(listed[1].body_len, 5);
    }

    #[tokio::test]
    async fn test_put_requires_open_namespace() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let result = db
            .put_entries("never-opened", vec![make_entry("http://localhost:8080/", "root")])
            .await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_open_namespace_keeps_entries() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.open_namespace(NS).await.unwrap();
        db.put_entries(NS, vec![make_entry("http://localhost:8080/", "root")])
            .await
            .unwrap();

        db.open_namespace(NS).await.unwrap();
        assert_eq!(db.list_namespaces().await.unwrap().len(), 1);
        assert_eq!(db.entry_count(NS).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_empty_namespace_name_rejected() {
        let db = CacheDb::open_in_memory().await.unwrap();
        assert!(matches!(db.open_namespace("  ").await, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_list_namespaces_includes_orphans() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.open_namespace("topview-shell-v0").await.unwrap();
        db.open_namespace(NS).await.unwrap();
        db.put_entries(NS, vec![make_entry("http://localhost:8080/", "root")])
            .await
            .unwrap();

        let namespaces = db.list_namespaces().await.unwrap();
        assert_eq!(namespaces.len(), 2);
        let current = namespaces.iter().find(|n| n.name == NS).unwrap();
        assert_eq!(current.entry_count, 1);
        let orphan = namespaces.iter().find(|n| n.name == "topview-shell-v0").unwrap();
        assert_eq!(orphan.entry_count, 0);
    }
}
