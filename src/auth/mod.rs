pub mod extractor;
pub mod gate;
pub mod jwt;
pub mod session;

pub use extractor::AdminSession;
pub use gate::{AdminCredentials, AdminGate, AdminPrincipal, Credentials, Role};
