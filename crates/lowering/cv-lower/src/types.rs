//! Mapping from source type names to IR types

use crate::error::{LowerError, LowerResult};
use cv_ir::IrType;
use cv_syntax::TypeRef;
use rustc_hash::FxHashMap;

/// Resolves [`TypeRef`]s against a fixed table of known types
#[derive(Debug, Clone)]
pub struct TypeResolver {
    known: FxHashMap<&'static str, IrType>,
}

impl Default for TypeResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeResolver {
    /// Resolver knowing `int` and `void`
    #[must_use]
    pub fn new() -> Self {
        let mut known = FxHashMap::default();
        known.insert("int", IrType::I32);
        known.insert("void", IrType::Void);
        Self { known }
    }

    /// Resolves a type in return position, where `void` is allowed
    ///
    /// # Errors
    ///
    /// Returns `LowerError::UnknownType` for unregistered names.
    pub fn resolve(&self, ty: &TypeRef) -> LowerResult<IrType> {
        self.known
            .get(ty.name.as_str())
            .copied()
            .ok_or_else(|| LowerError::UnknownType {
                name: ty.name.clone(),
                span: ty.span,
            })
    }

    /// Resolves the type of a parameter or variable named `binding`
    ///
    /// # Errors
    ///
    /// Returns `LowerError::UnknownType` for unregistered names and
    /// `LowerError::VoidBinding` for `void`.
    pub fn resolve_value(&self, binding: &str, ty: &TypeRef) -> LowerResult<IrType> {
        match self.resolve(ty)? {
            IrType::Void => Err(LowerError::VoidBinding {
                name: binding.to_string(),
                span: ty.span,
            }),
            resolved => Ok(resolved),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cv_syntax::make::ty_ref;

    #[test]
    fn test_known_types() {
        let types = TypeResolver::new();
        assert_eq!(types.resolve(&ty_ref("int")), Ok(IrType::I32));
        assert_eq!(types.resolve(&ty_ref("void")), Ok(IrType::Void));
    }

    #[test]
    fn test_unknown_type() {
        let types = TypeResolver::new();
        assert!(matches!(
            types.resolve(&ty_ref("float")),
            Err(LowerError::UnknownType { name, .. }) if name == "float"
        ));
    }

    #[test]
    fn test_void_binding_rejected() {
        let types = TypeResolver::new();
        assert!(matches!(
            types.resolve_value("x", &ty_ref("void")),
            Err(LowerError::VoidBinding { name, .. }) if name == "x"
        ));
        assert_eq!(types.resolve_value("x", &ty_ref("int")), Ok(IrType::I32));
    }
}
