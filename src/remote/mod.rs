mod importer;
mod installer;
mod store;

pub use importer::import_task;
pub use installer::{CargoInstaller, Installer};
pub use store::{GistStore, SnippetContent, SnippetStore};
