use rowmap::{Attach, Entity, Init, Prototype, Tagged};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[rowmap(table = "users")]
pub struct User {
    #[rowmap(recurse)]
    pub prototype: Prototype,
    pub identity: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i32>,
    #[rowmap(skip)]
    pub session: Option<String>,
}

impl User {
    pub fn new(identity: &str, name: &str) -> Self {
        let mut result = Self {
            identity: identity.into(),
            name: Some(name.into()),
            ..Default::default()
        };
        result.prototype.init();
        result
    }
}

/// Matches a user by surrogate key, natural key or display name.
#[derive(Tagged, Default)]
pub struct UserLookup {
    #[rowmap(binary_id)]
    pub id: Option<Uuid>,
    #[rowmap(name = "identity name", alias = "key")]
    pub key: Option<String>,
    #[rowmap(name = "age", op = ">=")]
    pub min_age: Option<i32>,
    #[rowmap(name = "age", alias = "max_age", op = "<")]
    pub max_age: Option<i32>,
}

#[derive(Tagged, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub mtime: Option<OffsetDateTime>,
}

#[derive(Attach, Default, Debug, PartialEq)]
pub struct UserTimes {
    #[rowmap(attach = "prototype.time.created_at")]
    pub created: String,
    #[rowmap(attach = "modified_at")]
    pub modified: Option<OffsetDateTime>,
}

#[derive(Attach, Default, Debug, PartialEq)]
pub struct UserView {
    #[rowmap(attach = "prototype.id")]
    pub id: String,
    #[rowmap(attach = "name")]
    pub display_name: Option<String>,
    #[rowmap(attach = "age")]
    pub age: i64,
    #[rowmap(recurse, attach = "prototype.time")]
    pub times: Option<UserTimes>,
    #[rowmap(recurse, attach = "phone")]
    pub contact: Option<Contact>,
    pub note: String,
}

#[derive(Attach, Default, Debug, PartialEq)]
pub struct Contact {
    #[rowmap(attach = "phone")]
    pub phone: String,
}
