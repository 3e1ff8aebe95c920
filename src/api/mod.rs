pub mod auth;
pub mod dashboard;
pub mod pet;
pub mod screen;
pub mod session;

pub use pet::PetDirectory;
pub use screen::RecordScreen;
pub use session::{Command, Session, SessionError};
