//! Type resolution: schema descriptors to Kotlin type names.
//!
//! Resolution is a pure function of the descriptor, the base namespace and
//! the naming convention. The domain being generated only matters for
//! diagnostics, and is carried explicitly in a [`GenerationContext`].

use crate::convention::NamingConvention;
use crate::error::{Error, Result};
use crate::schema::{PrimitiveType, RefItem, TypeDescriptor};
use crate::type_map::{Position, kotlin_scalar};

/// Scope of a resolution call: the target base namespace and, while a domain
/// is being generated, that domain's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationContext<'a> {
    pub base_namespace: &'a str,
    pub domain: Option<&'a str>,
}

impl<'a> GenerationContext<'a> {
    pub fn new(base_namespace: &'a str) -> Self {
        Self {
            base_namespace,
            domain: None,
        }
    }

    /// Same namespace, scoped to `domain`.
    pub fn for_domain(self, domain: &'a str) -> Self {
        Self {
            domain: Some(domain),
            ..self
        }
    }

    /// Domain name for diagnostics; `"<protocol>"` outside of any domain.
    pub fn domain_name(&self) -> &'a str {
        self.domain.unwrap_or("<protocol>")
    }
}

/// Resolves descriptors to Kotlin type names under one naming convention.
#[derive(Clone, Copy)]
pub struct TypeResolver<'a> {
    ctx: GenerationContext<'a>,
    convention: &'a dyn NamingConvention,
}

impl<'a> TypeResolver<'a> {
    pub fn new(ctx: GenerationContext<'a>, convention: &'a dyn NamingConvention) -> Self {
        Self { ctx, convention }
    }

    pub fn context(&self) -> GenerationContext<'a> {
        self.ctx
    }

    pub fn convention(&self) -> &'a dyn NamingConvention {
        self.convention
    }

    /// The same resolver scoped to another domain.
    pub fn for_domain(&self, domain: &'a str) -> Self {
        Self {
            ctx: self.ctx.for_domain(domain),
            convention: self.convention,
        }
    }

    /// Resolve a declared type, property, parameter, or return value.
    ///
    /// References win over type tags. Arrays resolve their element type
    /// recursively. A descriptor with no tag and no reference, an unknown
    /// tag, or an array without `items` is an [`Error::UnknownDescriptor`].
    pub fn resolve_type<D: TypeDescriptor + ?Sized>(&self, descriptor: &D) -> Result<String> {
        self.resolve(descriptor, Position::Field, descriptor.label())
    }

    /// Resolve the element type of an array.
    pub fn resolve_array_item_type(&self, items: &RefItem) -> Result<String> {
        self.resolve(items, Position::Item, items.label())
    }

    /// Turn a `$ref` into a Kotlin type name.
    ///
    /// - `"NodeId"` → `"NodeId"` (same package)
    /// - `"DOM.NodeId"` → `"{base}.domain.dom.NodeId"`
    pub fn sanitize_reference(&self, reference: &str) -> String {
        match reference.split_once('.') {
            None => reference.to_string(),
            Some((domain, type_id)) => {
                self.convention
                    .qualify(self.ctx.base_namespace, domain, type_id)
            }
        }
    }

    /// Short import hint (`"dom.NodeId"`) for a cross-domain reference on the
    /// descriptor or, for arrays, on its items. `None` for local references
    /// and primitives.
    pub fn reference_import<D: TypeDescriptor + ?Sized>(&self, descriptor: &D) -> Option<String> {
        let reference = descriptor
            .items()
            .and_then(|items| items.reference())
            .or_else(|| descriptor.reference())?;
        let (domain, type_id) = reference.split_once('.')?;
        Some(format!("{}.{type_id}", domain.to_lowercase()))
    }

    fn resolve<D: TypeDescriptor + ?Sized>(
        &self,
        descriptor: &D,
        position: Position,
        field: &str,
    ) -> Result<String> {
        if let Some(reference) = descriptor.reference() {
            return Ok(self.sanitize_reference(reference));
        }

        let Some(tag) = descriptor.type_tag() else {
            return Err(self.unknown(field, "<none>"));
        };
        let primitive: PrimitiveType = tag.parse().map_err(|()| self.unknown(field, tag))?;

        match primitive {
            PrimitiveType::Array => {
                let items = descriptor
                    .items()
                    .ok_or_else(|| self.unknown(&format!("{field} (missing items)"), tag))?;
                let element = self.resolve(items, Position::Item, field)?;
                Ok(self.convention.container_of(&element))
            }
            PrimitiveType::String
            | PrimitiveType::Boolean
            | PrimitiveType::Integer
            | PrimitiveType::Number
            | PrimitiveType::Any
            | PrimitiveType::Object => kotlin_scalar(primitive, position)
                .map(str::to_string)
                .ok_or_else(|| self.unknown(field, tag)),
        }
    }

    fn unknown(&self, field: &str, tag: &str) -> Error {
        Error::UnknownDescriptor {
            domain: self.ctx.domain_name().to_string(),
            field: field.to_string(),
            tag: tag.to_string(),
        }
    }
}
