pub mod pdf;
pub mod session;
pub mod submit;

pub use session::Session;
