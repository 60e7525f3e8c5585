pub mod constants;
pub mod pages;
pub mod watcher;
