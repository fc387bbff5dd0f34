//! Encode/decode orchestration for fieldmap.
//!
//! Given a type that exposes its fields through [`Mapped`], the engine
//! resolves the type's descriptors once (see [`ConfigCache`]) and then turns
//! instances into [`KeyedData`](fieldmap_types::KeyedData) and back:
//!
//! - [`Mapper`]: the entry point; owns the nested-serializer registry and cache
//! - [`encode_with`] / [`decode_values`]: the orchestrator, usable without a cache
//! - [`SerializerRegistry`] / [`NestedSerializer`]: recursion into nested objects
//! - [`DecodedFields`]: per-field values handed to the type's constructor
//!
//! ```
//! use fieldmap_engine::{DecodedFields, FieldValue, Mapped, Mapper};
//! use fieldmap_model::{ClassDescriptor, FieldDescriptor};
//! use fieldmap_types::{FieldInfo, MapError, NamingConvention, Result};
//!
//! #[derive(Debug, PartialEq)]
//! struct Account {
//!     display_name: String,
//!     login_count: u32,
//! }
//!
//! impl Mapped for Account {
//!     fn descriptor() -> ClassDescriptor {
//!         ClassDescriptor::new("Account")
//!             .naming(NamingConvention::KebabCase)
//!             .field("loginCount", FieldDescriptor::new().default_value(0))
//!     }
//!
//!     fn fields() -> Vec<FieldInfo> {
//!         vec![FieldInfo::string("displayName"), FieldInfo::integer("loginCount")]
//!     }
//!
//!     fn read_field(&self, field: &str) -> Result<FieldValue<'_>> {
//!         match field {
//!             "displayName" => FieldValue::of(&self.display_name),
//!             "loginCount" => FieldValue::of(&self.login_count),
//!             other => Err(MapError::configuration("Account", format!("no field '{other}'"))),
//!         }
//!     }
//!
//!     fn construct(mut fields: DecodedFields) -> Result<Self> {
//!         Ok(Self {
//!             display_name: fields.value("displayName")?,
//!             login_count: fields.value("loginCount")?,
//!         })
//!     }
//! }
//!
//! let mapper = Mapper::new();
//! let account = Account { display_name: "ada".into(), login_count: 3 };
//! let data = mapper.encode(&account)?;
//! assert_eq!(data["display-name"], "ada");
//! assert_eq!(mapper.decode::<Account>(&data)?, account);
//! # Ok::<(), MapError>(())
//! ```

mod cache;
mod decode;
mod encode;
mod mapped;
mod mapper;
mod registry;

pub use cache::ConfigCache;
pub use decode::decode_values;
pub use encode::encode_with;
pub use mapped::{DecodedFields, FieldValue, Mapped, Slot};
pub use mapper::Mapper;
pub use registry::{MappedSerializer, NestedSerializer, SerializerRegistry};
