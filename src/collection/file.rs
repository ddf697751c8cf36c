//! Load and atomic write-replace of the collection file.

use crate::error::{Result, StoreError};
use crate::types::Recipe;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Suffix of in-flight temporary files next to the collection.
const TEMP_SUFFIX: &str = ".tmp";

/// The single file holding the recipe collection.
#[derive(Clone, Debug)]
pub struct CollectionFile {
    /// Path to the collection file.
    path: PathBuf,

    /// Pretty-print the JSON on write.
    pretty: bool,
}

impl CollectionFile {
    pub fn new(path: impl AsRef<Path>, pretty: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            pretty,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Create the file holding an empty collection if it is missing.
    ///
    /// Returns true if the file was created.
    pub fn ensure_exists(&self) -> Result<bool> {
        if self.exists() {
            return Ok(false);
        }
        fs::create_dir_all(self.dir())?;
        self.persist(&[])?;
        Ok(true)
    }

    /// Read and parse the full collection.
    ///
    /// A zero-length file is an empty collection. Malformed content or a
    /// repeated id is reported as a read error.
    pub fn load(&self) -> Result<Vec<Recipe>> {
        let bytes = fs::read(&self.path).map_err(|e| StoreError::read(&self.path, e))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let recipes: Vec<Recipe> = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::read(&self.path, format!("malformed collection: {}", e)))?;

        let mut seen = HashSet::with_capacity(recipes.len());
        for recipe in &recipes {
            if !seen.insert(recipe.id.as_str()) {
                return Err(StoreError::read(
                    &self.path,
                    format!("duplicate recipe id {}", recipe.id),
                ));
            }
        }

        debug!(path = ?self.path, count = recipes.len(), "loaded collection");
        Ok(recipes)
    }

    /// Replace the collection on disk with `recipes`.
    ///
    /// Content is written to a temporary file in the same directory, synced,
    /// then renamed over the collection. On failure the temporary file is
    /// removed and the existing collection is left untouched.
    pub fn persist(&self, recipes: &[Recipe]) -> Result<()> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(recipes)?
        } else {
            serde_json::to_vec(recipes)?
        };

        let dir = self.dir();
        let mut temp = tempfile::Builder::new()
            .prefix(&format!(".{}.", self.file_name()))
            .suffix(TEMP_SUFFIX)
            .tempfile_in(&dir)
            .map_err(|e| StoreError::write(&self.path, e))?;

        temp.write_all(&encoded)
            .map_err(|e| StoreError::write(&self.path, e))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| StoreError::write(&self.path, e))?;

        // Dropping the error drops its temp file, which deletes it.
        temp.persist(&self.path)
            .map_err(|e| StoreError::write(&self.path, e.error))?;

        // Make the rename itself durable.
        if let Err(e) = File::open(&dir).and_then(|d| d.sync_all()) {
            debug!(dir = ?dir, error = %e, "directory sync skipped");
        }

        debug!(path = ?self.path, count = recipes.len(), bytes = encoded.len(), "persisted collection");
        Ok(())
    }

    fn dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "collection".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RecipeFields, RecipeId};
    use tempfile::TempDir;

    fn tea() -> Recipe {
        Recipe::new(
            RecipeId::from("tea-1"),
            RecipeFields::named("Tea")
                .with_ingredients("water,tea")
                .with_instructions("boil")
                .with_cooking_time(5),
        )
    }

    fn leftover_temp_files(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.to_string_lossy().ends_with(TEMP_SUFFIX))
            .collect()
    }

    #[test]
    fn test_ensure_exists_creates_empty_collection() {
        let dir = TempDir::new().unwrap();
        let file = CollectionFile::new(dir.path().join("nested/recipes.json"), true);

        assert!(file.ensure_exists().unwrap());
        assert!(!file.ensure_exists().unwrap());

        let content = fs::read_to_string(file.path()).unwrap();
        assert_eq!(content.trim(), "[]");
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn test_ensure_exists_keeps_existing_content() {
        let dir = TempDir::new().unwrap();
        let file = CollectionFile::new(dir.path().join("recipes.json"), true);

        file.persist(&[tea()]).unwrap();
        file.ensure_exists().unwrap();

        assert_eq!(file.load().unwrap(), vec![tea()]);
    }

    #[test]
    fn test_persist_and_load() {
        let dir = TempDir::new().unwrap();
        let file = CollectionFile::new(dir.path().join("recipes.json"), true);

        let mut second = tea();
        second.id = RecipeId::from("tea-2");
        second.name = "Green Tea".into();

        file.persist(&[tea(), second.clone()]).unwrap();

        let loaded = file.load().unwrap();
        assert_eq!(loaded, vec![tea(), second]);
        assert!(leftover_temp_files(dir.path()).is_empty());
    }

    #[test]
    fn test_pretty_and_compact_output() {
        let dir = TempDir::new().unwrap();
        let pretty = CollectionFile::new(dir.path().join("pretty.json"), true);
        let compact = CollectionFile::new(dir.path().join("compact.json"), false);

        pretty.persist(&[tea()]).unwrap();
        compact.persist(&[tea()]).unwrap();

        assert!(fs::read_to_string(pretty.path()).unwrap().contains('\n'));
        assert!(!fs::read_to_string(compact.path()).unwrap().contains('\n'));
        assert_eq!(pretty.load().unwrap(), compact.load().unwrap());
    }

    #[test]
    fn test_zero_length_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("recipes.json");
        fs::write(&path, b"").unwrap();

        let file = CollectionFile::new(&path, true);
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("recipes.json");
        fs::write(&path, b"[{\"id\": \"x\", \"name\": ").unwrap();

        let file = CollectionFile::new(&path, true);
        assert!(matches!(file.load(), Err(StoreError::StorageRead { .. })));
    }

    #[test]
    fn test_duplicate_ids_are_read_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("recipes.json");
        let file = CollectionFile::new(&path, true);

        fs::write(&path, serde_json::to_vec(&vec![tea(), tea()]).unwrap()).unwrap();
        assert!(matches!(file.load(), Err(StoreError::StorageRead { .. })));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let file = CollectionFile::new(dir.path().join("absent.json"), true);
        assert!(matches!(file.load(), Err(StoreError::StorageRead { .. })));
    }

    #[test]
    fn test_failed_persist_cleans_up() {
        let dir = TempDir::new().unwrap();
        // A directory in place of the collection makes the final rename fail.
        let path = dir.path().join("recipes.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), b"x").unwrap();

        let file = CollectionFile::new(&path, true);
        let result = file.persist(&[tea()]);

        assert!(matches!(result, Err(StoreError::StorageWrite { .. })));
        assert!(leftover_temp_files(dir.path()).is_empty());
        assert!(path.join("keep").exists());
    }
}
