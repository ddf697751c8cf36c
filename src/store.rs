//! Main RecipeStore tying the collection file to serialized CRUD.

use crate::collection::CollectionFile;
use crate::error::{Result, StoreError};
use crate::types::{Recipe, RecipeFields, RecipeId};
use fs2::FileExt;
use parking_lot::Mutex;
use serde::Deserialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What read-only operations do when the collection cannot be read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadFailurePolicy {
    /// Report the failure to the caller.
    #[default]
    Propagate,

    /// Log the failure and answer as if the collection were empty.
    ///
    /// Mutations still fail, so a masked read never gets written back.
    Empty,
}

/// Store configuration.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Path to the collection file.
    pub path: PathBuf,

    /// Whether to create the collection file if it doesn't exist.
    pub create_if_missing: bool,

    /// Handling of read failures in `list_all` and `get_by_id`.
    pub read_failure: ReadFailurePolicy,

    /// Pretty-print the persisted JSON.
    pub pretty: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./recipes.json"),
            create_if_missing: true,
            read_failure: ReadFailurePolicy::Propagate,
            pretty: true,
        }
    }
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }
}

/// The recipe store.
///
/// Every operation reads the whole collection from disk; mutations then
/// write the whole collection back. Mutations hold `write_lock` for the
/// entire read-modify-write so concurrent writers queue instead of losing
/// each other's updates. Readers take no lock: the file is only ever
/// replaced atomically.
pub struct RecipeStore {
    /// Store configuration.
    config: StoreConfig,

    /// The collection file.
    file: CollectionFile,

    /// Lock file for exclusive access across processes.
    _lock_file: File,

    /// Lock for mutating operations.
    write_lock: Mutex<()>,
}

impl RecipeStore {
    /// Open the collection, creating an empty one if it is missing.
    ///
    /// Fails with [`StoreError::StorageUnavailable`] if the file cannot be
    /// created or accessed, and [`StoreError::Locked`] if another process
    /// holds the collection.
    pub fn open(config: StoreConfig) -> Result<Self> {
        let file = CollectionFile::new(&config.path, config.pretty);

        if !file.exists() {
            if !config.create_if_missing {
                return Err(StoreError::unavailable(
                    &config.path,
                    "collection file does not exist",
                ));
            }
            if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| StoreError::unavailable(&config.path, e))?;
            }
        }

        let lock_file = Self::acquire_lock(&config.path)?;

        if file
            .ensure_exists()
            .map_err(|e| StoreError::unavailable(&config.path, e))?
        {
            info!(path = ?config.path, "created empty recipe collection");
        }

        match file.load() {
            Ok(recipes) => info!(path = ?config.path, count = recipes.len(), "opened recipe collection"),
            Err(e) => warn!(path = ?config.path, error = %e, "recipe collection is not readable"),
        }

        Ok(Self {
            config,
            file,
            _lock_file: lock_file,
            write_lock: Mutex::new(()),
        })
    }

    // --- Read Operations ---

    /// All recipes in insertion order.
    pub fn list_all(&self) -> Result<Vec<Recipe>> {
        match self.file.load() {
            Ok(recipes) => Ok(recipes),
            Err(e) if self.config.read_failure == ReadFailurePolicy::Empty => {
                warn!(path = ?self.config.path, error = %e, "read failed, answering with an empty collection");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Get a recipe by ID.
    pub fn get_by_id(&self, id: &RecipeId) -> Result<Recipe> {
        self.list_all()?
            .into_iter()
            .find(|r| r.id == *id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Number of recipes in the collection.
    pub fn len(&self) -> Result<usize> {
        Ok(self.list_all()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    // --- Mutating Operations ---

    /// Append a new recipe with a freshly generated id.
    pub fn create(&self, fields: RecipeFields) -> Result<Recipe> {
        fields.validate()?;

        let recipe = self.mutate(|recipes| {
            let mut id = RecipeId::generate();
            while recipes.iter().any(|r| r.id == id) {
                id = RecipeId::generate();
            }

            let recipe = Recipe::new(id, fields);
            recipes.push(recipe.clone());
            Ok(recipe)
        })?;

        info!(id = %recipe.id, name = %recipe.name, "created recipe");
        Ok(recipe)
    }

    /// Replace every field of an existing recipe, keeping its id.
    pub fn update(&self, id: &RecipeId, fields: RecipeFields) -> Result<Recipe> {
        fields.validate()?;

        let recipe = self.mutate(|recipes| {
            let slot = recipes
                .iter_mut()
                .find(|r| r.id == *id)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;

            *slot = Recipe::new(id.clone(), fields);
            Ok(slot.clone())
        })?;

        info!(id = %recipe.id, "updated recipe");
        Ok(recipe)
    }

    /// Remove a recipe, returning it.
    pub fn delete(&self, id: &RecipeId) -> Result<Recipe> {
        let removed = self.mutate(|recipes| {
            let index = recipes
                .iter()
                .position(|r| r.id == *id)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;

            Ok(recipes.remove(index))
        })?;

        info!(id = %removed.id, "deleted recipe");
        Ok(removed)
    }

    // --- Store Operations ---

    /// Get the collection file path.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // --- Private Helpers ---

    /// Run one read-modify-write under the write lock.
    ///
    /// Reads here always propagate failures regardless of the read policy.
    /// If `apply` fails nothing is written.
    fn mutate<T>(&self, apply: impl FnOnce(&mut Vec<Recipe>) -> Result<T>) -> Result<T> {
        let _lock = self.write_lock.lock();

        let mut recipes = self.file.load()?;
        let out = apply(&mut recipes)?;

        self.file.persist(&recipes).map_err(|e| {
            tracing::error!(path = ?self.config.path, error = %e, "failed to persist collection");
            match e {
                StoreError::StorageWrite { .. } => e,
                other => StoreError::write(&self.config.path, other),
            }
        })?;

        debug!(count = recipes.len(), "collection replaced");
        Ok(out)
    }

    fn acquire_lock(path: &Path) -> Result<File> {
        let mut lock_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        lock_name.push(".lock");
        let lock_path = path.with_file_name(lock_name);

        let lock_file =
            File::create(&lock_path).map_err(|e| StoreError::unavailable(&lock_path, e))?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| StoreError::Locked(path.to_path_buf()))?;

        Ok(lock_file)
    }
}
