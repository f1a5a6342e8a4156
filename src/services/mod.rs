mod users;

pub use users::UserService;
