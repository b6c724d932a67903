//! rotalog config - Log config loading, settings lookup and change watching

mod debounce;
mod loader;
mod settings;
mod watcher;

pub use debounce::Debouncer;
pub use loader::ConfigLoader;
pub use settings::{apply_rotation_defaults, SettingsView};
pub use watcher::ConfigWatcher;
