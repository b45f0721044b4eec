//! Client-side core of the cookbook front end.
//!
//! Everything the pages need that is not rendering: talking to the API,
//! the list pipeline, debounced search, local persistence, kitchen mode,
//! the recipe editor and the authentication context.

pub mod api;
pub mod auth;
pub mod directory;
pub mod editor;
pub mod kitchen;
pub mod local_store;
pub mod pipeline;
pub mod storage;

pub use api::{ClientError, HttpRecipeClient, RecipeSource};
pub use auth::{AuthContext, AuthState, IdentityProvider, Subscription};
pub use directory::{DirectorySnapshot, RecipeDirectory};
pub use local_store::{KitchenProgress, LocalStore};
pub use pipeline::{ListFilters, SortMode};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage};
