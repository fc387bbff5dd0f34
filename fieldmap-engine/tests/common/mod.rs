//! Hand-written `Mapped` fixtures shared by the engine tests.

#![allow(dead_code)]

use fieldmap_engine::{DecodedFields, FieldValue, Mapped};
use fieldmap_model::{ClassDescriptor, FieldDescriptor, FnProcessor, ProcessorError};
use fieldmap_types::{FieldInfo, MapError, NamingConvention, Result};

fn unknown(class: &str, field: &str) -> MapError {
    MapError::configuration(class, format!("no field '{field}'"))
}

// ── Plain: default naming, no processors ─────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Plain {
    pub name: String,
    pub age: u32,
    pub score: f64,
    pub active: bool,
    pub tags: Vec<String>,
    pub nickname: Option<String>,
}

impl Plain {
    pub fn sample() -> Self {
        Self {
            name: "Ada".into(),
            age: 36,
            score: 9.5,
            active: true,
            tags: vec!["math".into(), "engines".into()],
            nickname: None,
        }
    }
}

impl Mapped for Plain {
    fn descriptor() -> ClassDescriptor {
        ClassDescriptor::new("Plain").field("nickname", FieldDescriptor::new().nullable(true))
    }

    fn fields() -> Vec<FieldInfo> {
        vec![
            FieldInfo::string("name"),
            FieldInfo::integer("age"),
            FieldInfo::float("score"),
            FieldInfo::bool("active"),
            FieldInfo::list("tags"),
            FieldInfo::string("nickname"),
        ]
    }

    fn read_field(&self, field: &str) -> Result<FieldValue<'_>> {
        match field {
            "name" => FieldValue::of(&self.name),
            "age" => FieldValue::of(&self.age),
            "score" => FieldValue::of(&self.score),
            "active" => FieldValue::of(&self.active),
            "tags" => FieldValue::of(&self.tags),
            "nickname" => FieldValue::of(&self.nickname),
            other => Err(unknown("Plain", other)),
        }
    }

    fn construct(mut fields: DecodedFields) -> Result<Self> {
        Ok(Self {
            name: fields.value("name")?,
            age: fields.value("age")?,
            score: fields.value("score")?,
            active: fields.value("active")?,
            tags: fields.value("tags")?,
            nickname: fields.optional("nickname")?,
        })
    }
}

// ── Account: naming, ignore, processor, defaults ─────────────────

pub const DEFAULT_LOGIN_COUNT: u32 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub user_name: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub created_at_millis: u64,
    pub login_count: u32,
    pub nickname: String,
    pub session_token: Option<String>,
}

impl Account {
    pub fn sample() -> Self {
        Self {
            user_name: "grace".into(),
            email: Some("grace@example.com".into()),
            password_hash: "$argon2id$...".into(),
            created_at_millis: 1_700_000_000_000,
            login_count: 7,
            nickname: "amazing".into(),
            session_token: Some("tok-1".into()),
        }
    }
}

impl Mapped for Account {
    fn descriptor() -> ClassDescriptor {
        ClassDescriptor::new("Account")
            .naming(NamingConvention::SnakeCase)
            .ignore("passwordHash")
            .field("email", FieldDescriptor::new().nullable(true))
            .field(
                "createdAt",
                FieldDescriptor::new().key("created").processor(FnProcessor::new(
                    |millis: u64| format!("{}s", millis / 1000),
                    |text: String| {
                        text.strip_suffix('s')
                            .and_then(|secs| secs.parse::<u64>().ok())
                            .map(|secs| secs * 1000)
                            .ok_or_else(|| ProcessorError::new(format!("bad timestamp '{text}'")))
                    },
                )),
            )
            .field("loginCount", FieldDescriptor::new().from_constructor())
            .field("nickname", FieldDescriptor::new().default_value("anonymous"))
            .field("sessionToken", FieldDescriptor::new().nullable(true).skip_decode())
    }

    fn fields() -> Vec<FieldInfo> {
        vec![
            FieldInfo::string("userName"),
            FieldInfo::string("email"),
            FieldInfo::string("passwordHash"),
            FieldInfo::integer("createdAt"),
            FieldInfo::integer("loginCount"),
            FieldInfo::string("nickname"),
            FieldInfo::string("sessionToken"),
        ]
    }

    fn read_field(&self, field: &str) -> Result<FieldValue<'_>> {
        match field {
            "userName" => FieldValue::of(&self.user_name),
            "email" => FieldValue::of(&self.email),
            "passwordHash" => FieldValue::of(&self.password_hash),
            "createdAt" => FieldValue::of(&self.created_at_millis),
            "loginCount" => FieldValue::of(&self.login_count),
            "nickname" => FieldValue::of(&self.nickname),
            "sessionToken" => FieldValue::of(&self.session_token),
            other => Err(unknown("Account", other)),
        }
    }

    fn construct(mut fields: DecodedFields) -> Result<Self> {
        let login_count = if fields.is_deferred("loginCount") {
            DEFAULT_LOGIN_COUNT
        } else {
            fields.value("loginCount")?
        };
        Ok(Self {
            user_name: fields.value("userName")?,
            email: fields.optional("email")?,
            password_hash: fields.or_default("passwordHash")?,
            created_at_millis: fields.value("createdAt")?,
            login_count,
            nickname: fields.value("nickname")?,
            session_token: fields.optional("sessionToken")?,
        })
    }
}

// ── Person / Address: nested objects ─────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub street: String,
    pub postal_code: Option<String>,
}

impl Mapped for Address {
    fn descriptor() -> ClassDescriptor {
        ClassDescriptor::new("Address")
            .naming(NamingConvention::KebabCase)
            .nullable_by_default(true)
            .field("street", FieldDescriptor::new().nullable(false))
    }

    fn fields() -> Vec<FieldInfo> {
        vec![FieldInfo::string("street"), FieldInfo::string("postalCode")]
    }

    fn read_field(&self, field: &str) -> Result<FieldValue<'_>> {
        match field {
            "street" => FieldValue::of(&self.street),
            "postalCode" => FieldValue::of(&self.postal_code),
            other => Err(unknown("Address", other)),
        }
    }

    fn construct(mut fields: DecodedFields) -> Result<Self> {
        Ok(Self {
            street: fields.value("street")?,
            postal_code: fields.optional("postalCode")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub home: Address,
    pub work: Option<Address>,
}

impl Person {
    pub fn sample() -> Self {
        Self {
            name: "Linus".into(),
            home: Address {
                street: "1 Main St".into(),
                postal_code: Some("00100".into()),
            },
            work: None,
        }
    }
}

impl Mapped for Person {
    fn descriptor() -> ClassDescriptor {
        ClassDescriptor::new("Person")
            .nested_serializer("address")
            .field("work", FieldDescriptor::new().nullable(true))
    }

    fn fields() -> Vec<FieldInfo> {
        vec![
            FieldInfo::string("name"),
            FieldInfo::object("home", "Address"),
            FieldInfo::object("work", "Address"),
        ]
    }

    fn read_field(&self, field: &str) -> Result<FieldValue<'_>> {
        match field {
            "name" => FieldValue::of(&self.name),
            "home" => Ok(FieldValue::object(&self.home)),
            "work" => Ok(FieldValue::optional_object(self.work.as_ref())),
            other => Err(unknown("Person", other)),
        }
    }

    fn construct(mut fields: DecodedFields) -> Result<Self> {
        Ok(Self {
            name: fields.value("name")?,
            home: fields.object("home")?,
            work: fields.optional_object("work")?,
        })
    }
}

// ── Broken descriptors ───────────────────────────────────────────

/// Two fields aliased to the same encode key.
#[derive(Debug, PartialEq)]
pub struct Colliding {
    pub id: u64,
    pub legacy_id: u64,
}

impl Mapped for Colliding {
    fn descriptor() -> ClassDescriptor {
        ClassDescriptor::new("Colliding")
            .field("legacyId", FieldDescriptor::new().encode_key("id"))
    }

    fn fields() -> Vec<FieldInfo> {
        vec![FieldInfo::integer("id"), FieldInfo::integer("legacyId")]
    }

    fn read_field(&self, field: &str) -> Result<FieldValue<'_>> {
        match field {
            "id" => FieldValue::of(&self.id),
            "legacyId" => FieldValue::of(&self.legacy_id),
            other => Err(unknown("Colliding", other)),
        }
    }

    fn construct(mut fields: DecodedFields) -> Result<Self> {
        Ok(Self {
            id: fields.value("id")?,
            legacy_id: fields.value("legacyId")?,
        })
    }
}

/// A field asking for both a default value and a constructor default.
#[derive(Debug, PartialEq)]
pub struct Ambiguous {
    pub level: u8,
}

impl Mapped for Ambiguous {
    fn descriptor() -> ClassDescriptor {
        ClassDescriptor::new("Ambiguous").field(
            "level",
            FieldDescriptor::new().default_value(3).from_constructor(),
        )
    }

    fn fields() -> Vec<FieldInfo> {
        vec![FieldInfo::integer("level")]
    }

    fn read_field(&self, field: &str) -> Result<FieldValue<'_>> {
        match field {
            "level" => FieldValue::of(&self.level),
            other => Err(unknown("Ambiguous", other)),
        }
    }

    fn construct(mut fields: DecodedFields) -> Result<Self> {
        Ok(Self {
            level: fields.value("level")?,
        })
    }
}
