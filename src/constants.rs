pub mod auth {

    pub const MIN_PASSWORD_LENGTH: usize = 6;

    /// Key under which the authenticated [`crate::models::SessionUser`] is stored.
    pub const SESSION_USER_KEY: &str = "user";
}

pub mod logs {

    pub const DEFAULT_PAGE: u64 = 1;

    pub const DEFAULT_LIMIT: u64 = 50;

    pub const MAX_LIMIT: u64 = 100;
}

pub mod limits {

    pub const CLI_USER_LIST_LIMIT: u64 = 20;
}

pub mod actions {

    pub const LOGIN: &str = "login";

    pub const LOGOUT: &str = "logout";

    pub const CHANGE_PASSWORD: &str = "change_password";

    pub const CREATE_USER: &str = "create_user";

    pub const RESET_PASSWORD: &str = "reset_password";

    pub const TOGGLE_USER_STATUS: &str = "toggle_user_status";

    pub const DELETE_USER: &str = "delete_user";

    pub const ENTITY_USER: &str = "user";
}
