//! Entity trait and field descriptors.

use northwind_codec::{CodecResult, Value};
use std::fmt;

/// Trait for types that can be stored through a Northwind group.
///
/// Implementors declare their persisted fields once; that list drives
/// document encoding, index naming, the unique-index pre-check and the
/// field-wise encryption pass. Decoding starts from `Self::default()` and
/// sets every field present in the stored document.
///
/// # Example
///
/// ```rust
/// use northwind_core::{field, Entity, Field};
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Product {
///     id: i64,
///     name: String,
/// }
///
/// impl Entity for Product {
///     fn fields() -> Vec<Field<Self>> {
///         vec![field!(Product, id => "Id"), field!(Product, name => "Name")]
///     }
/// }
///
/// assert_eq!(Product::field("Name").unwrap().name(), "Name");
/// ```
pub trait Entity: Default + Clone + Send + Sync + 'static {
    /// Returns every persisted field, in declaration order.
    fn fields() -> Vec<Field<Self>>;

    /// Looks up a declared field by its logical name.
    fn field(name: &str) -> Option<Field<Self>> {
        Self::fields().into_iter().find(|f| f.name() == name)
    }
}

/// A declared entity field: a logical name plus an accessor/mutator pair.
///
/// The name is the field's logical name. Its physical name in the store is
/// the same unless the group remaps it (see
/// [`crate::GroupBuilder::with_custom_key_field_name`]).
pub struct Field<T> {
    name: &'static str,
    get: fn(&T) -> Value,
    set: fn(&mut T, Value) -> CodecResult<()>,
}

impl<T> Field<T> {
    /// Creates a field descriptor.
    pub const fn new(
        name: &'static str,
        get: fn(&T) -> Value,
        set: fn(&mut T, Value) -> CodecResult<()>,
    ) -> Self {
        Self { name, get, set }
    }

    /// Logical field name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Reads the field from an entity.
    pub fn get(&self, entity: &T) -> Value {
        (self.get)(entity)
    }

    /// Writes a value into the field.
    ///
    /// # Errors
    ///
    /// Returns a codec error if the value has the wrong kind for the field.
    pub fn set(&self, entity: &mut T, value: Value) -> CodecResult<()> {
        (self.set)(entity, value)
    }
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Field<T> {}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field").field("name", &self.name).finish()
    }
}

impl<T> PartialEq for Field<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Declares a [`Field`] for a struct member whose type converts to and from
/// [`Value`].
///
/// `field!(Product, name => "Name")` reads `product.name` through
/// `Value::from` and writes it back through [`northwind_codec::FromValue`].
#[macro_export]
macro_rules! field {
    ($ty:ty, $member:ident => $name:expr) => {
        $crate::Field::<$ty>::new(
            $name,
            |entity: &$ty| $crate::Value::from(::std::clone::Clone::clone(&entity.$member)),
            |entity: &mut $ty, value: $crate::Value| {
                entity.$member = $crate::FromValue::from_value(value)?;
                ::std::result::Result::Ok(())
            },
        )
    };
}
