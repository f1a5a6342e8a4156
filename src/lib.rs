pub mod app;
pub mod config;
pub mod courses;
pub mod database;
pub mod events;
pub mod http;
pub mod logging;
pub mod schema;
pub mod services;
pub mod store;
pub mod types;
pub mod util;

pub use app::App;

#[cfg(test)]
pub(crate) mod test_utils;
