mod index;
mod persistence;
mod store;

pub use index::ItemIndex;
pub use persistence::{
    cleanup_stale_caches, dated_cache_path, load_ai_cache, load_menu_cache, save_ai_cache,
    save_menu_cache, AiCacheSnapshot, MenuCacheSnapshot,
};
pub use store::ItemStore;
