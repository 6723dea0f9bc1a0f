pub mod config;
pub mod manager;
pub mod scanner;
pub mod timeline;

pub use manager::StoryManager;
pub use scanner::{Preload, Scanner};
pub use timeline::{StageState, Timeline};
