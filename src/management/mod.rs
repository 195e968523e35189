mod retention;
mod session;

pub use retention::RetentionPolicy;
pub use retention::RetentionSweeper;
pub use session::SessionStore;
