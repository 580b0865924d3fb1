mod auth_service;
mod user_directory;

pub use auth_service::AuthService;
pub use user_directory::PgUserDirectory;
