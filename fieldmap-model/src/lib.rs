//! Descriptor model and field resolution for fieldmap.
//!
//! Defines the declarative configuration a serializable class carries and the
//! pure function that merges it into one behaviour per field:
//! - [`ClassDescriptor`]: class-wide policy plus per-field overrides
//! - [`FieldDescriptor`]: optional per-field override record
//! - [`Processor`]: typed, bidirectional value transform attached to a field
//! - [`resolve`]: produces a [`ResolvedClass`] of [`EffectiveFieldConfig`]s
//! - [`DescriptorFile`]: loads a class descriptor from TOML
//!
//! Resolution is referentially transparent: identical inputs always yield an
//! identical table, so callers may cache it for the life of the descriptor.

mod descriptor;
mod file;
mod processor;
mod resolve;

pub use descriptor::{ClassDescriptor, FieldDescriptor};
pub use file::{DescriptorFile, FieldEntry};
pub use processor::{
    FnProcessor, Processor, ProcessorError, ProcessorRef, ProcessorRegistry, ValueProcessor,
};
pub use resolve::{EffectiveFieldConfig, ResolvedClass, resolve};
