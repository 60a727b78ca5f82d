// DB constants
pub const DB_TABLE: &str = "table";

pub const DB_NAME: &str = "name";
pub const DB_EMAIL: &str = "email";
pub const DB_ADDRESS: &str = "address";
pub const DB_PHONE: &str = "phone";
pub const DB_FAVORITE: &str = "favorite";

pub const DB_SEARCH_TERM: &str = "search_term";
