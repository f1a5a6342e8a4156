pub mod error;
pub mod form;
pub mod page;
pub mod user;

pub use error::Error;
pub use page::{Page, PageRequest, Sort, SortDirection};
pub use user::{UserStatus, UserType};
