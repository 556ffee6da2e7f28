use crate::{AsValue, FieldDef, FieldSlot, FromRow, Result, RowLabeled, Tagged, decode_column};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Lifecycle initialisation of a new entity.
pub trait Init {
    fn init(&mut self);
}

/// Current time in UTC truncated to whole seconds.
pub fn now_truncated() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now - Duration::nanoseconds(now.nanosecond() as i64)
}

/// Creation and modification timestamps, stored as `ctime` and `mtime`.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrototypeTime {
    pub created_at: Option<OffsetDateTime>,
    pub modified_at: Option<OffsetDateTime>,
}

static PROTOTYPE_TIME_FIELDS: [FieldDef; 2] = [
    FieldDef {
        name: "ctime",
        nullable: true,
        ..FieldDef::new("created_at")
    },
    FieldDef {
        name: "mtime",
        nullable: true,
        ..FieldDef::new("modified_at")
    },
];

impl Init for PrototypeTime {
    fn init(&mut self) {
        let now = now_truncated();
        self.created_at = Some(now);
        self.modified_at = Some(now);
    }
}

impl Tagged for PrototypeTime {
    fn field_defs(&self) -> &'static [FieldDef] {
        &PROTOTYPE_TIME_FIELDS
    }
    fn field(&self, index: usize) -> FieldSlot<'_> {
        match index {
            0 => FieldSlot::Value(self.created_at.as_value()),
            1 => FieldSlot::Value(self.modified_at.as_value()),
            _ => FieldSlot::Skipped,
        }
    }
}

impl FromRow for PrototypeTime {
    fn column_labels() -> Vec<&'static str> {
        vec!["ctime", "mtime"]
    }
    fn from_row(row: &RowLabeled) -> Result<Self> {
        Ok(Self {
            created_at: decode_column(row, "ctime")?,
            modified_at: decode_column(row, "mtime")?,
        })
    }
}

/// Identifier and timestamps shared by every persisted entity.
///
/// Embed it as a `recurse` field, `init` fills it when the entity is created and
/// nothing stamps it again afterwards.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prototype {
    pub id: Option<Uuid>,
    pub time: PrototypeTime,
}

static PROTOTYPE_FIELDS: [FieldDef; 2] = [
    FieldDef {
        binary_id: true,
        nullable: true,
        ..FieldDef::new("id")
    },
    FieldDef {
        recurse: true,
        ..FieldDef::new("time")
    },
];

impl Prototype {
    pub fn new() -> Self {
        let mut result = Self::default();
        result.init();
        result
    }
}

impl Init for Prototype {
    fn init(&mut self) {
        self.id = Some(Uuid::new_v4());
        self.time.init();
    }
}

impl Tagged for Prototype {
    fn field_defs(&self) -> &'static [FieldDef] {
        &PROTOTYPE_FIELDS
    }
    fn field(&self, index: usize) -> FieldSlot<'_> {
        match index {
            0 => FieldSlot::Value(self.id.as_value()),
            1 => FieldSlot::Nested(Some(&self.time)),
            _ => FieldSlot::Skipped,
        }
    }
}

impl FromRow for Prototype {
    fn column_labels() -> Vec<&'static str> {
        let mut result = vec!["id"];
        result.extend(PrototypeTime::column_labels());
        result
    }
    fn from_row(row: &RowLabeled) -> Result<Self> {
        Ok(Self {
            id: decode_column(row, "id")?,
            time: PrototypeTime::from_row(row)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Init, Prototype, PrototypeTime};
    use crate::{FromRow, Mode, RowLabeled, Value, walk};
    use time::macros::datetime;
    use uuid::Uuid;

    #[test]
    fn init_stamps_once() {
        let prototype = Prototype::new();
        assert!(prototype.id.is_some());
        let created_at = prototype.time.created_at.unwrap();
        assert_eq!(Some(created_at), prototype.time.modified_at);
        assert_eq!(created_at.nanosecond(), 0);
        assert_eq!(created_at.offset(), time::UtcOffset::UTC);
        assert_ne!(Prototype::new().id, prototype.id);
    }

    #[test]
    fn walks_as_inline_fields() {
        let prototype = Prototype::new();
        let fields = walk(&prototype, Mode::Insert);
        let names: Vec<_> = fields.iter().map(|f| f.storage_name).collect();
        assert_eq!(names, ["id", "ctime", "mtime"]);
        assert_eq!(fields[0].bind_token, "UUID_TO_BIN(:id)");
        assert!(walk(&Prototype::default(), Mode::Insert).is_empty());
    }

    #[test]
    fn decodes() {
        let id = Uuid::new_v4();
        let row = RowLabeled::new(
            ["id".to_string(), "ctime".to_string(), "mtime".to_string()].into(),
            [
                Value::Blob(Some(id.as_bytes().to_vec().into_boxed_slice())),
                Value::Timestamp(Some(datetime!(2024-01-02 03:04:05))),
                Value::Null,
            ]
            .into(),
        );
        let prototype = Prototype::from_row(&row).unwrap();
        assert_eq!(prototype.id, Some(id));
        assert_eq!(
            prototype.time,
            PrototypeTime {
                created_at: Some(datetime!(2024-01-02 03:04:05 UTC)),
                modified_at: None,
            }
        );
        let mut time = PrototypeTime::default();
        time.init();
        assert_eq!(time.created_at, time.modified_at);
    }
}
