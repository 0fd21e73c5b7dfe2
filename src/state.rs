use axum::extract::FromRef;
use sqlx::PgPool;

use crate::config::Config;
use crate::storage::ImageStore;
use crate::store::{FavoriteStore, RecipeStore, RecipeViews, UserStore};

/// Process-wide handles shared by every request handler. Built once in main
/// and cloned into the router; the stores all share the same pool.
#[derive(Clone)]
pub struct AppState {
    pub users: UserStore,
    pub recipes: RecipeStore,
    pub favorites: FavoriteStore,
    pub views: RecipeViews,
    pub images: Option<ImageStore>,
    pub config: Config,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config, images: Option<ImageStore>) -> Self {
        Self {
            users: UserStore::new(pool.clone()),
            recipes: RecipeStore::new(pool.clone()),
            favorites: FavoriteStore::new(pool.clone()),
            views: RecipeViews::new(pool),
            images,
            config,
        }
    }
}

impl FromRef<AppState> for UserStore {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

impl FromRef<AppState> for RecipeStore {
    fn from_ref(state: &AppState) -> Self {
        state.recipes.clone()
    }
}

impl FromRef<AppState> for FavoriteStore {
    fn from_ref(state: &AppState) -> Self {
        state.favorites.clone()
    }
}

impl FromRef<AppState> for RecipeViews {
    fn from_ref(state: &AppState) -> Self {
        state.views.clone()
    }
}

impl FromRef<AppState> for Option<ImageStore> {
    fn from_ref(state: &AppState) -> Self {
        state.images.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
