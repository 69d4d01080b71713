//! JSON file storage backend
//!
//! The session keys are stored as one JSON object. Writes go to a sibling
//! temporary file that is then renamed over the target, so a crash never
//! leaves a half-written session behind. The file is readable by its owner
//! only (mode `0600` on unix).

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use loginkit_core::SessionRepository;
use loginkit_domain::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, TOKEN_EXPIRE_DATE_KEY};
use loginkit_domain::{LoginKitError, Result, Session};
use parking_lot::Mutex;
use tempfile::NamedTempFile;
use tracing::debug;

use super::{encode_expiry, session_from_keys};
use crate::errors::InfraError;

type KeyMap = BTreeMap<String, String>;

/// Session repository persisted to a JSON file
#[derive(Debug)]
pub struct FileSessionRepository {
    path: PathBuf,
    // Serializes read-modify-write cycles within the process.
    lock: Mutex<()>,
}

impl FileSessionRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_keys(&self) -> Result<KeyMap> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(KeyMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(KeyMap::new()),
            Err(err) => Err(io_error(err)),
        }
    }

    fn write_keys(&self, keys: &KeyMap) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(io_error)?;

        // Created with mode 0600; `persist` renames it over the target.
        let mut file = NamedTempFile::new_in(dir).map_err(io_error)?;
        file.write_all(serde_json::to_string_pretty(keys)?.as_bytes()).map_err(io_error)?;
        file.as_file().sync_all().map_err(io_error)?;

        file.persist(&self.path).map_err(|err| io_error(err.error))?;
        debug!(path = %self.path.display(), keys = keys.len(), "Session file written");
        Ok(())
    }
}

fn io_error(err: std::io::Error) -> LoginKitError {
    InfraError::from(err).into()
}

impl SessionRepository for FileSessionRepository {
    fn load(&self) -> Result<Option<Session>> {
        let _guard = self.lock.lock();
        let mut keys = self.read_keys()?;

        Ok(session_from_keys(
            keys.remove(ACCESS_TOKEN_KEY),
            keys.remove(REFRESH_TOKEN_KEY),
            keys.get(TOKEN_EXPIRE_DATE_KEY).map(String::as_str),
        ))
    }

    fn save(&self, session: &Session) -> Result<()> {
        let _guard = self.lock.lock();
        let mut keys = KeyMap::new();
        keys.insert(ACCESS_TOKEN_KEY.to_string(), session.access_token.clone());
        if let Some(refresh_token) = &session.refresh_token {
            keys.insert(REFRESH_TOKEN_KEY.to_string(), refresh_token.clone());
        }
        if let Some(expires_at) = session.expires_at {
            keys.insert(TOKEN_EXPIRE_DATE_KEY.to_string(), encode_expiry(expires_at));
        }
        self.write_keys(&keys)
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    use super::*;

    fn repository() -> (FileSessionRepository, TempDir) {
        let dir = TempDir::new().unwrap();
        (FileSessionRepository::new(dir.path().join("nested").join("session.json")), dir)
    }

    #[test]
    fn missing_file_is_logged_out() {
        let (repository, _dir) = repository();
        assert!(repository.load().unwrap().is_none());
        repository.clear().unwrap();
    }

    #[test]
    fn save_then_load_restores_session() {
        let (repository, _dir) = repository();
        let expires_at = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let session = Session::new("A", Some("R".into()), Some(expires_at));

        repository.save(&session).unwrap();

        assert_eq!(repository.load().unwrap(), Some(session));
        let leftovers = fs::read_dir(repository.path().parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1, "only the session file remains");
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (repository, _dir) = repository();
        repository.save(&Session::new("A", Some("R".into()), None)).unwrap();

        let mode = fs::metadata(repository.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        // Rewrites keep the restricted mode.
        repository.save(&Session::new("B", None, None)).unwrap();
        let mode = fs::metadata(repository.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn file_uses_session_key_names() {
        let (repository, _dir) = repository();
        repository.save(&Session::new("A", None, None)).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(repository.path()).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({ "accessToken": "A" }));
    }

    #[test]
    fn clear_deletes_file() {
        let (repository, _dir) = repository();
        repository.save(&Session::new("A", Some("R".into()), None)).unwrap();

        repository.clear().unwrap();

        assert!(!repository.path().exists());
        assert!(repository.load().unwrap().is_none());
    }

    #[test]
    fn corrupt_file_is_serialization_error() {
        let (repository, _dir) = repository();
        fs::create_dir_all(repository.path().parent().unwrap()).unwrap();
        fs::write(repository.path(), "{ not json").unwrap();

        assert!(matches!(repository.load(), Err(LoginKitError::Serialization(_))));
    }
}
