//! Bidirectional value transforms ("processors") attached to fields.
//!
//! Authors implement the typed [`Processor`] trait. The engine only sees
//! [`ValueProcessor`], which every `Processor` gets for free and which moves
//! values through `serde_json::Value` on both sides.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A processor rejected a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ProcessorError(pub String);

impl ProcessorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A pair of pure functions converting between a field's native type and
/// its serial form.
///
/// Implementations must be stateless; one instance is shared by every
/// resolution and every thread. A well-formed processor satisfies
/// `decode(encode(v)) == Ok(v)`.
pub trait Processor: Send + Sync + 'static {
    type Native: Serialize + DeserializeOwned;
    type Serial: Serialize + DeserializeOwned;

    fn encode(&self, value: Self::Native) -> Self::Serial;

    fn decode(&self, serial: Self::Serial) -> Result<Self::Native, ProcessorError>;
}

/// Type-erased processor operating on dynamic values.
pub trait ValueProcessor: Send + Sync {
    fn encode_value(&self, value: Value) -> Result<Value, ProcessorError>;

    fn decode_value(&self, value: Value) -> Result<Value, ProcessorError>;
}

impl<P: Processor> ValueProcessor for P {
    fn encode_value(&self, value: Value) -> Result<Value, ProcessorError> {
        let native: P::Native = serde_json::from_value(value)
            .map_err(|e| ProcessorError::new(format!("invalid native value: {e}")))?;
        serde_json::to_value(self.encode(native))
            .map_err(|e| ProcessorError::new(format!("unserializable serial value: {e}")))
    }

    fn decode_value(&self, value: Value) -> Result<Value, ProcessorError> {
        let serial: P::Serial = serde_json::from_value(value)
            .map_err(|e| ProcessorError::new(format!("invalid serial value: {e}")))?;
        let native = self.decode(serial)?;
        serde_json::to_value(native)
            .map_err(|e| ProcessorError::new(format!("unserializable native value: {e}")))
    }
}

/// Shared handle to a processor, as stored in descriptors and resolved
/// configs. Equality is identity: two handles are equal when they share the
/// same processor instance.
#[derive(Clone)]
pub struct ProcessorRef {
    name: Arc<str>,
    inner: Arc<dyn ValueProcessor>,
}

impl ProcessorRef {
    pub fn new<P: Processor>(processor: P) -> Self {
        Self {
            name: Arc::from(std::any::type_name::<P>()),
            inner: Arc::new(processor),
        }
    }

    /// Wraps a hand-written [`ValueProcessor`] under an explicit name.
    pub fn from_value_processor(name: &str, processor: Arc<dyn ValueProcessor>) -> Self {
        Self {
            name: Arc::from(name),
            inner: processor,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn encode(&self, value: Value) -> Result<Value, ProcessorError> {
        self.inner.encode_value(value)
    }

    pub fn decode(&self, value: Value) -> Result<Value, ProcessorError> {
        self.inner.decode_value(value)
    }
}

impl fmt::Debug for ProcessorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ProcessorRef").field(&self.name).finish()
    }
}

impl PartialEq for ProcessorRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// A processor built from a pair of closures.
///
/// ```
/// use fieldmap_model::{FnProcessor, ProcessorError};
///
/// let cents = FnProcessor::new(
///     |dollars: f64| (dollars * 100.0).round() as i64,
///     |cents: i64| Ok::<_, ProcessorError>(cents as f64 / 100.0),
/// );
/// # let _ = cents;
/// ```
pub struct FnProcessor<N, S, E, D> {
    encode: E,
    decode: D,
    _marker: PhantomData<fn(N) -> S>,
}

impl<N, S, E, D> FnProcessor<N, S, E, D>
where
    E: Fn(N) -> S,
    D: Fn(S) -> Result<N, ProcessorError>,
{
    pub fn new(encode: E, decode: D) -> Self {
        Self {
            encode,
            decode,
            _marker: PhantomData,
        }
    }
}

impl<N, S, E, D> Processor for FnProcessor<N, S, E, D>
where
    N: Serialize + DeserializeOwned + 'static,
    S: Serialize + DeserializeOwned + 'static,
    E: Fn(N) -> S + Send + Sync + 'static,
    D: Fn(S) -> Result<N, ProcessorError> + Send + Sync + 'static,
{
    type Native = N;
    type Serial = S;

    fn encode(&self, value: N) -> S {
        (self.encode)(value)
    }

    fn decode(&self, serial: S) -> Result<N, ProcessorError> {
        (self.decode)(serial)
    }
}

/// Named processors, for descriptors authored as data (see
/// [`DescriptorFile`](crate::DescriptorFile)).
#[derive(Debug, Clone, Default)]
pub struct ProcessorRegistry {
    processors: HashMap<String, ProcessorRef>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `processor` under `name`, replacing any previous entry.
    pub fn register<P: Processor>(&mut self, name: impl Into<String>, processor: P) -> &mut Self {
        self.processors
            .insert(name.into(), ProcessorRef::new(processor));
        self
    }

    pub fn register_ref(&mut self, name: impl Into<String>, processor: ProcessorRef) -> &mut Self {
        self.processors.insert(name.into(), processor);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ProcessorRef> {
        self.processors.get(name)
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}
