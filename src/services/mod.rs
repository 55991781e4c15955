pub mod activity;
pub use activity::ActivityLogger;

pub mod password;
pub use password::PasswordService;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService};
pub use auth_service_impl::SeaOrmAuthService;

pub mod user_service;
pub mod user_service_impl;
pub use user_service::{CreateUserInput, UserError, UserService};
pub use user_service_impl::SeaOrmUserService;
