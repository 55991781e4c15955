pub use super::activity_logs::Entity as ActivityLogs;
pub use super::users::Entity as Users;
