//! # Recipe Store
//!
//! A file-backed store for recipe records with serialized CRUD, plus an
//! HTTP API over it.
//!
//! ## Core Concepts
//!
//! - **Collection**: One JSON file holding every recipe, in insertion order
//! - **Atomic write-replace**: Each mutation writes a temp file and renames it
//!   over the collection, so readers never see a partial file
//! - **Write lock**: Mutations run their read-modify-write one at a time
//! - **Server**: An axum router mapping `/api/recipes` to store operations
//!
//! ## Example
//!
//! ```ignore
//! use recipe_store::{RecipeFields, RecipeStore, StoreConfig};
//!
//! let store = RecipeStore::open(StoreConfig::new("./recipes.json"))?;
//!
//! let tea = store.create(
//!     RecipeFields::named("Tea")
//!         .with_ingredients("water,tea")
//!         .with_instructions("boil")
//!         .with_cooking_time(5),
//! )?;
//!
//! store.update(&tea.id, tea.fields().with_cooking_time(6))?;
//! store.delete(&tea.id)?;
//! ```

pub mod collection;
pub mod error;
pub mod server;
pub mod store;
pub mod types;

// Re-exports
pub use collection::CollectionFile;
pub use error::{Result, StoreError};
pub use server::{create_router, run_server, ServerConfig, ServerState};
pub use store::{ReadFailurePolicy, RecipeStore, StoreConfig};
pub use types::*;
