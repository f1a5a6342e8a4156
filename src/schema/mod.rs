mod user;

pub use user::{User, UserQueryBuilder};
