pub mod figment;
pub mod retry;
pub mod sensitive;
pub mod validator;

pub use retry::{Retry, RetryFailed};
pub use sensitive::Sensitive;
