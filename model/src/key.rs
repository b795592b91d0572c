//! FILENAME: model/src/key.rs
//! PURPOSE: Column identifiers.
//! CONTEXT: A column is addressed either by a plain string id or by a named
//! property reference that extracts a field from a record. Cell definitions
//! use the same key type to attach themselves to a column.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::value::Value;

/// Function extracting a value from a record.
pub type Accessor<T> = Arc<dyn Fn(&T) -> Option<Value> + Send + Sync>;

fn accessor_fn<T, F>(accessor: F) -> Accessor<T>
where
    F: Fn(&T) -> Option<Value> + Send + Sync + 'static,
{
    Arc::new(accessor)
}

/// A named accessor into records of type `T`.
pub struct PropertyRef<T> {
    name: String,
    accessor: Accessor<T>,
}

impl<T: 'static> PropertyRef<T> {
    /// Creates a reference whose accessor always yields a value.
    pub fn new<V, F>(name: impl Into<String>, accessor: F) -> Self
    where
        V: Into<Value>,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        PropertyRef {
            name: name.into(),
            accessor: accessor_fn(move |record| Some(accessor(record).into())),
        }
    }

    /// Creates a reference whose accessor may yield nothing.
    pub fn optional<F>(name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> Option<Value> + Send + Sync + 'static,
    {
        PropertyRef {
            name: name.into(),
            accessor: accessor_fn(accessor),
        }
    }
}

impl<T> PropertyRef<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, record: &T) -> Option<Value> {
        (self.accessor)(record)
    }
}

impl<T> Clone for PropertyRef<T> {
    fn clone(&self) -> Self {
        PropertyRef {
            name: self.name.clone(),
            accessor: Arc::clone(&self.accessor),
        }
    }
}

/// Unique identifier of a column within a table.
///
/// Equality and hashing only look at the key name, so a cell definition can
/// address a property column with `ColumnKey::id("name")`.
pub enum ColumnKey<T> {
    Id(String),
    Property(PropertyRef<T>),
}

impl<T: 'static> ColumnKey<T> {
    pub fn property<V, F>(name: impl Into<String>, accessor: F) -> Self
    where
        V: Into<Value>,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        ColumnKey::Property(PropertyRef::new(name, accessor))
    }
}

impl<T> ColumnKey<T> {
    pub fn id(name: impl Into<String>) -> Self {
        ColumnKey::Id(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            ColumnKey::Id(id) => id,
            ColumnKey::Property(property) => property.name(),
        }
    }

    pub fn property_ref(&self) -> Option<&PropertyRef<T>> {
        match self {
            ColumnKey::Id(_) => None,
            ColumnKey::Property(property) => Some(property),
        }
    }

    /// Applies the property reference (if any) to a record.
    pub fn extract(&self, record: &T) -> Option<Value> {
        self.property_ref().and_then(|property| property.get(record))
    }
}

impl<T> Clone for ColumnKey<T> {
    fn clone(&self) -> Self {
        match self {
            ColumnKey::Id(id) => ColumnKey::Id(id.clone()),
            ColumnKey::Property(property) => ColumnKey::Property(property.clone()),
        }
    }
}

impl<T> PartialEq for ColumnKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl<T> Eq for ColumnKey<T> {}

impl<T> Hash for ColumnKey<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl<T> fmt::Debug for ColumnKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKey::Id(id) => write!(f, "Id({})", id),
            ColumnKey::Property(property) => write!(f, "Property({})", property.name()),
        }
    }
}

impl<T> fmt::Display for ColumnKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<T> From<&str> for ColumnKey<T> {
    fn from(value: &str) -> Self {
        ColumnKey::id(value)
    }
}
