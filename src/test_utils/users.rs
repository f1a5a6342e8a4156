#![allow(clippy::unwrap_used)]

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::schema::User;
use crate::types::{UserStatus, UserType};

#[must_use]
pub fn alice() -> User {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    User {
        user_id: Uuid::new_v4(),
        username: "alice".into(),
        email: "alice@example.com".into(),
        password: "hunter22".into(),
        full_name: "Alice Liddell".into(),
        user_status: UserStatus::Active,
        user_type: UserType::Student,
        phone_number: Some("555-0100".into()),
        national_id: None,
        image_url: None,
        creation_date: created,
        last_update_date: created,
    }
}

/// A second student created a day after [`alice`].
#[must_use]
pub fn bob() -> User {
    let created = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
    User {
        user_id: Uuid::new_v4(),
        username: "bob".into(),
        email: "bob@example.org".into(),
        password: "correct-horse".into(),
        full_name: "Bob Builder".into(),
        user_status: UserStatus::Blocked,
        user_type: UserType::Instructor,
        phone_number: None,
        national_id: Some("123.456.789-00".into()),
        image_url: Some("https://img.example.org/bob.png".into()),
        creation_date: created,
        last_update_date: created,
    }
}
