mod reset_password;
mod users;

pub use reset_password::cmd_reset_password;
pub use users::cmd_list_users;
