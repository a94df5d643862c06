use std::fs;
use std::io;

use tft_hash::{hex, ObjectId, HEX_LEN};

use crate::{ObjectStore, StoreError};

impl ObjectStore {
    /// Every stored id whose hex form starts with `prefix`, sorted.
    ///
    /// Only the fan-out directory named by the first two digits is read,
    /// so the prefix must be at least two hex digits long.
    pub fn find_by_prefix(&self, prefix: &str) -> Result<Vec<ObjectId>, StoreError> {
        if prefix.len() < 2 || prefix.len() > HEX_LEN || !hex::is_hex(prefix) {
            return Err(StoreError::InvalidPrefix(prefix.to_string()));
        }
        let prefix = prefix.to_ascii_lowercase();
        let (dir, rest) = prefix.split_at(2);

        let mut found = ids_in_fanout(&self.objects_dir.join(dir), dir)?
            .into_iter()
            .filter(|oid| oid.to_hex()[2..].starts_with(rest))
            .collect::<Vec<_>>();
        found.sort();
        Ok(found)
    }

    /// Every stored id, sorted.
    pub fn list(&self) -> Result<Vec<ObjectId>, StoreError> {
        let entries = match fs::read_dir(&self.objects_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut all = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.len() == 2 && hex::is_hex(name) && entry.file_type()?.is_dir() {
                all.extend(ids_in_fanout(&entry.path(), &name.to_ascii_lowercase())?);
            }
        }
        all.sort();
        Ok(all)
    }
}

/// Ids stored in one fan-out directory. Files that do not look like a
/// 38-digit object name are ignored.
fn ids_in_fanout(dir: &std::path::Path, fanout: &str) -> Result<Vec<ObjectId>, StoreError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut ids = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.len() != HEX_LEN - 2 || !hex::is_hex(name) {
            continue;
        }
        if let Ok(oid) = ObjectId::from_hex(&format!("{fanout}{name}")) {
            ids.push(oid);
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tft_object::ObjectKind;

    fn plant_name(store: &ObjectStore, hex: &str) {
        let dir = store.objects_dir().join(&hex[..2]);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(&hex[2..]), b"").unwrap();
    }

    #[test]
    fn prefix_selects_fanout_then_filters() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::open(dir.path());
        let a = "ab1".to_string() + &"0".repeat(37);
        let b = "ab2".to_string() + &"0".repeat(37);
        plant_name(&store, &a);
        plant_name(&store, &b);

        assert_eq!(store.find_by_prefix("ab").unwrap().len(), 2);
        let only_a = store.find_by_prefix("ab1").unwrap();
        assert_eq!(only_a, vec![ObjectId::from_hex(&a).unwrap()]);
        assert!(store.find_by_prefix("ab3").unwrap().is_empty());
        assert!(store.find_by_prefix("cd").unwrap().is_empty());
    }

    #[test]
    fn prefix_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::open(dir.path());
        let oid = store.write_raw(ObjectKind::Blob, b"hello\n").unwrap();
        assert_eq!(store.find_by_prefix("CE0136").unwrap(), vec![oid]);
        assert_eq!(store.find_by_prefix(&oid.to_hex()).unwrap(), vec![oid]);
    }

    #[test]
    fn invalid_prefixes() {
        let store = ObjectStore::open("/nonexistent");
        assert!(matches!(store.find_by_prefix("a"), Err(StoreError::InvalidPrefix(_))));
        assert!(matches!(store.find_by_prefix("zz"), Err(StoreError::InvalidPrefix(_))));
        assert!(store.find_by_prefix(&"a".repeat(41)).is_err());
    }

    #[test]
    fn list_skips_stray_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::open(dir.path());
        let one = store.write_raw(ObjectKind::Blob, b"1").unwrap();
        let two = store.write_raw(ObjectKind::Blob, b"2").unwrap();
        fs::create_dir_all(dir.path().join("info")).unwrap();
        fs::write(dir.path().join("ce").join("junk"), b"").ok();
        fs::write(dir.path().join("tmp_obj_abc"), b"").unwrap();

        let mut expected = vec![one, two];
        expected.sort();
        assert_eq!(store.list().unwrap(), expected);
    }
}
