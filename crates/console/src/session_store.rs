//! Session persistence between console invocations.
//!
//! `login` writes the token to a small JSON file; every other command reads
//! it back into the shared [`SessionContext`]. When a command ends with the
//! session dropped (logout, or the server refusing the token) the file is
//! removed so the next command fails fast.

use std::io::ErrorKind;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use catalog_gateway::{Session, SessionContext};

use crate::config::ConsoleConfig;

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    #[serde(default)]
    email: Option<String>,
}

/// The session to start with: `CATALOG_TOKEN` if set, else the stored one.
pub async fn resolve(config: &ConsoleConfig) -> anyhow::Result<Option<Session>> {
    if let Some(token) = &config.token {
        return Ok(Some(Session::new(token.clone())));
    }

    let raw = match tokio::fs::read_to_string(&config.session_file).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| {
                format!("reading session file {}", config.session_file.display())
            })
        }
    };

    match serde_json::from_str::<StoredSession>(&raw) {
        Ok(stored) => Ok(Some(Session {
            token: stored.token,
            email: stored.email,
        })),
        Err(e) => {
            tracing::warn!(
                path = %config.session_file.display(),
                error = %e,
                "Ignoring unreadable session file",
            );
            Ok(None)
        }
    }
}

pub async fn save(path: &Path, session: &Session) -> anyhow::Result<()> {
    let stored = StoredSession {
        token: session.token.clone(),
        email: session.email.clone(),
    };
    tokio::fs::write(path, serde_json::to_vec_pretty(&stored)?)
        .await
        .with_context(|| format!("writing session file {}", path.display()))
}

/// Remove the stored session if the context no longer holds one.
pub async fn sync(path: &Path, session: &SessionContext) -> anyhow::Result<()> {
    if session.is_active().await {
        return Ok(());
    }
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "Removed stored session");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("removing session file {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("catalog-console-{}-{name}", std::process::id()))
    }

    fn config(session_file: PathBuf, token: Option<&str>) -> ConsoleConfig {
        ConsoleConfig {
            api_base: "http://localhost".into(),
            catalog_endpoint: "list.php".into(),
            token: token.map(str::to_string),
            admin_email: None,
            session_file,
            request_timeout: None,
        }
    }

    #[tokio::test]
    async fn saved_session_is_resolved() {
        let path = scratch("saved");
        save(&path, &Session::new("abc").with_email("admin@example.com"))
            .await
            .unwrap();

        let session = resolve(&config(path.clone(), None)).await.unwrap().unwrap();
        assert_eq!(session.token, "abc");
        assert_eq!(session.email.as_deref(), Some("admin@example.com"));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn env_token_wins() {
        let session = resolve(&config(scratch("unused"), Some("from-env")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.token, "from-env");
    }

    #[tokio::test]
    async fn missing_file_means_no_session() {
        assert!(resolve(&config(scratch("missing"), None)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sync_removes_file_once_session_dropped() {
        let path = scratch("sync");
        save(&path, &Session::new("abc")).await.unwrap();

        let context = SessionContext::with_session(Session::new("abc"));
        sync(&path, &context).await.unwrap();
        assert!(path.exists());

        context.invalidate().await;
        sync(&path, &context).await.unwrap();
        assert!(!path.exists());

        // Nothing left to remove.
        sync(&path, &context).await.unwrap();
    }
}
