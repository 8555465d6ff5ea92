//! Services module
//!
//! Use cases that coordinate between the screens and the repository.

pub mod folders;
pub mod notes;
pub mod recents;

pub use folders::FoldersService;
pub use notes::NotesService;
pub use recents::RecentsService;
