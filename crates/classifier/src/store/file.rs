//! JSON file-based stores with atomic writes.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::{IpBlockList, LeecherStore, StoreError};

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Write and sync a temp file first, then rename over the target.
fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let tmp_path = path.with_extension("json.tmp");
    {
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }

    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn create_parent_dir(path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Leecher list stored as a JSON array of user names.
#[derive(Debug, Clone)]
pub struct FileLeecherStore {
    path: PathBuf,
}

impl FileLeecherStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create store, making parent directories if needed.
    pub fn new_with_create_dir(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        create_parent_dir(&path)?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LeecherStore for FileLeecherStore {
    fn load(&self) -> Result<Vec<String>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        read_json(&self.path)
    }

    fn save(&self, leechers: &[String]) -> Result<(), StoreError> {
        write_json_atomic(&self.path, leechers)
    }
}

/// IP block list stored as a JSON object of `ip -> user`.
///
/// Loaded to memory on startup and written back on every append.
#[derive(Debug)]
pub struct FileIpBlockList {
    path: PathBuf,
    blocked: RwLock<BTreeMap<IpAddr, String>>,
}

impl FileIpBlockList {
    /// Load existing file or create an empty list.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let blocked = if path.exists() {
            Self::load_from_file(&path)?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            blocked: RwLock::new(blocked),
        })
    }

    /// Create list, making parent directories if needed.
    pub fn new_with_create_dir(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        create_parent_dir(&path)?;
        Self::new(path)
    }

    fn load_from_file(path: &Path) -> Result<BTreeMap<IpAddr, String>, StoreError> {
        let raw: BTreeMap<String, String> = read_json(path)?;

        let mut blocked = BTreeMap::new();
        for (ip, user) in raw {
            match ip.parse::<IpAddr>() {
                Ok(ip) => {
                    blocked.insert(ip, user);
                }
                Err(_) => warn!(%ip, path = %path.display(), "skipping malformed IP block entry"),
            }
        }

        Ok(blocked)
    }

    fn save_to_file(&self, blocked: &BTreeMap<IpAddr, String>) -> Result<(), StoreError> {
        let raw: BTreeMap<String, &String> = blocked
            .iter()
            .map(|(ip, user)| (ip.to_string(), user))
            .collect();
        write_json_atomic(&self.path, &raw)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IpBlockList for FileIpBlockList {
    fn contains(&self, ip: &IpAddr) -> bool {
        self.blocked.read().contains_key(ip)
    }

    fn append(&self, ip: IpAddr, user: &str) -> Result<(), StoreError> {
        let mut blocked = self.blocked.write();
        if blocked.contains_key(&ip) {
            return Ok(());
        }

        blocked.insert(ip, user.to_owned());
        if let Err(e) = self.save_to_file(&blocked) {
            blocked.remove(&ip);
            return Err(e);
        }
        Ok(())
    }

    fn entries(&self) -> Vec<(IpAddr, String)> {
        self.blocked
            .read()
            .iter()
            .map(|(ip, user)| (*ip, user.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leecher_store_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLeecherStore::new(dir.path().join("leechers.json"));

        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_leecher_store_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("leechers.json");

        {
            let store = FileLeecherStore::new_with_create_dir(&path).unwrap();
            store
                .save(&["alice".to_owned(), "bob".to_owned()])
                .unwrap();
        }

        let store = FileLeecherStore::new(&path);
        assert_eq!(
            store.load().unwrap(),
            vec!["alice".to_owned(), "bob".to_owned()]
        );
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_ip_block_list_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ipblocklist.json");
        let ip: IpAddr = "1.2.3.4".parse().unwrap();

        {
            let list = FileIpBlockList::new(&path).unwrap();
            assert!(!list.contains(&ip));
            list.append(ip, "alice").unwrap();
            assert!(path.exists());
        }

        let list = FileIpBlockList::new(&path).unwrap();
        assert!(list.contains(&ip));
        assert_eq!(list.entries(), vec![(ip, "alice".to_owned())]);
    }

    #[test]
    fn test_write_json_atomic_replaces_complete_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ipblocklist.json");
        fs::write(&path, "{\"9.9.9.9\": \"old\"}").unwrap();

        let list = FileIpBlockList::new(&path).unwrap();
        list.append("1.2.3.4".parse().unwrap(), "alice").unwrap();

        let on_disk: BTreeMap<String, String> = read_json(&path).unwrap();
        assert_eq!(on_disk.len(), 2);
        assert_eq!(on_disk.get("1.2.3.4").map(String::as_str), Some("alice"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_ip_block_list_skips_malformed_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ipblocklist.json");
        fs::write(&path, r#"{"1.2.3.4": "alice", "not-an-ip": "bob"}"#).unwrap();

        let list = FileIpBlockList::new(&path).unwrap();
        assert_eq!(list.entries().len(), 1);
    }

    #[test]
    fn test_ip_block_list_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ipblocklist.json");
        fs::write(&path, "[1, 2").unwrap();

        assert!(matches!(
            FileIpBlockList::new(&path),
            Err(StoreError::Serialization(_))
        ));
    }
}
