mod emails;
mod password;

pub mod dtos;
pub mod handlers;
pub mod jwt;
pub mod model;
pub mod models;
pub mod pin;
pub mod routes;
pub mod services;
pub mod session;

pub use jwt::JwtService;
pub use routes::AuthState;
pub use session::{SessionCookies, SessionResolver, UserDirectory};
