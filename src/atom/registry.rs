//! Atom lookup by field type

use std::collections::HashMap;

use super::kinds::{
    BoolAtom, DateAtom, DateTimeAtom, DurationAtom, MoneyAtom, NumberAtom, QuantityAtom,
    TextAtom, TimeAtom, UrlAtom,
};
use super::FieldAtom;
use crate::model::FieldType;

/// Table of atoms keyed by field type tag.
///
/// Lookups for an unregistered type fall back to the text atom.
#[derive(Debug)]
pub struct AtomRegistry {
    atoms: HashMap<FieldType, Box<dyn FieldAtom>>,
    fallback: TextAtom,
}

impl Default for AtomRegistry {
    fn default() -> Self {
        Self::with_defaults("USD")
    }
}

impl AtomRegistry {
    /// Registry with no atoms; every lookup returns the text atom
    pub fn empty() -> Self {
        Self {
            atoms: HashMap::new(),
            fallback: TextAtom,
        }
    }

    /// One built-in atom per field type
    pub fn with_defaults(currency: &str) -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(TextAtom));
        registry.register(Box::new(BoolAtom));
        registry.register(Box::new(NumberAtom));
        registry.register(Box::new(DateAtom));
        registry.register(Box::new(TimeAtom));
        registry.register(Box::new(DateTimeAtom));
        registry.register(Box::new(UrlAtom));
        registry.register(Box::new(MoneyAtom::new(currency)));
        registry.register(Box::new(QuantityAtom::default()));
        registry.register(Box::new(DurationAtom));
        registry
    }

    /// Register an atom under its own field type, returning the one replaced
    pub fn register(&mut self, atom: Box<dyn FieldAtom>) -> Option<Box<dyn FieldAtom>> {
        self.atoms.insert(atom.field_type(), atom)
    }

    pub fn get(&self, field_type: FieldType) -> &dyn FieldAtom {
        match self.atoms.get(&field_type) {
            Some(atom) => atom.as_ref(),
            None => {
                tracing::trace!(%field_type, "no atom registered, using text");
                &self.fallback
            }
        }
    }

    /// The text atom used for unregistered types
    pub fn fallback(&self) -> &dyn FieldAtom {
        &self.fallback
    }

    pub fn contains(&self, field_type: FieldType) -> bool {
        self.atoms.contains_key(&field_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldValue, Money};

    #[test]
    fn test_defaults_cover_every_type() {
        let registry = AtomRegistry::default();
        for ty in FieldType::ALL {
            assert!(registry.contains(ty), "missing atom for {}", ty);
            assert_eq!(registry.get(ty).field_type(), ty);
        }
    }

    #[test]
    fn test_missing_type_falls_back_to_text() {
        let registry = AtomRegistry::empty();
        let atom = registry.get(FieldType::Money);
        assert_eq!(atom.field_type(), FieldType::Text);
        assert_eq!(atom.parse("12"), Ok(FieldValue::text("12")));
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = AtomRegistry::with_defaults("USD");
        let old = registry.register(Box::new(MoneyAtom::new("NOK")));
        assert!(old.is_some());
        assert_eq!(
            registry.get(FieldType::Money).parse("10"),
            Ok(FieldValue::Money(Money::new(1000, "NOK")))
        );
    }
}
