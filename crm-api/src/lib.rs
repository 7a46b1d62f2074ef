pub mod config;
pub mod handlers;
pub mod helpers;
pub mod services;
pub mod storage;

pub use storage::{CrmStore, SharedStore};
