//! Request bodies. Every struct here is a view profile: it only reads
//! the fields permitted for its operation and silently drops the rest.
pub mod users;
