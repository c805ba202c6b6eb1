//! Maps protocol primitive types to Kotlin type names.
//!
//! # Type Mapping Table
//!
//! | Protocol type | Kotlin type | Notes |
//! |---------------|-------------|-------|
//! | `string` | `String` | |
//! | `boolean` | `Boolean` | |
//! | `integer` | `Int` | |
//! | `number` | `Double` | |
//! | `any` | `Any` | |
//! | `object` | `String` | Declared field; objects are carried as raw JSON text |
//! | `object` | `Any` | Array element |
//! | `array` | container | Handled by the resolver, container name from the naming convention |

use crate::schema::PrimitiveType;

/// Where a primitive appears. Only `object` depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// A declared type, property, parameter, or return value.
    Field,
    /// The element type of an array.
    Item,
}

/// Map a scalar primitive to its Kotlin type name.
///
/// Returns `None` for `array`; the caller builds the container from the
/// element type.
pub fn kotlin_scalar(primitive: PrimitiveType, position: Position) -> Option<&'static str> {
    let name = match primitive {
        PrimitiveType::String => "String",
        PrimitiveType::Boolean => "Boolean",
        PrimitiveType::Integer => "Int",
        PrimitiveType::Number => "Double",
        PrimitiveType::Any => "Any",

        // Objects are not modeled structurally. A field keeps the raw JSON
        // as text; an array element is left dynamic.
        PrimitiveType::Object => match position {
            Position::Field => "String",
            Position::Item => "Any",
        },

        PrimitiveType::Array => return None,
    };
    Some(name)
}
