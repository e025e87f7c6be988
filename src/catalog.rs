//! Attribute catalog: attributes (optionally grouped under a parent
//! category), attribute options, and the derived placeholder tokens rule
//! expressions use to reference them.
//!
//! Attributes live in a flat arena indexed by [`AttributeId`]; the
//! self-referential category relationship is a parent reference by id. A
//! parent must already exist when a child is inserted, so the category
//! tree cannot acquire a cycle.

use std::collections::HashMap;

use crate::error::StoreError;

/// Arena index of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeId(pub(crate) u32);

/// Arena index of an attribute option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionId(pub(crate) u32);

/// A material attribute definition, possibly itself a category (no parent).
#[derive(Debug, Clone)]
pub struct Attribute {
    pub id: AttributeId,
    pub name: String,
    /// Unique uppercase/underscore token derived from the name.
    pub placeholder: String,
    pub category: Option<AttributeId>,
}

/// A choice an attribute value may take.
#[derive(Debug, Clone)]
pub struct AttributeOption {
    pub id: OptionId,
    pub name: String,
    pub placeholder: String,
    /// Attributes this option may be chosen for.
    pub valid_for: Vec<AttributeId>,
}

/// Derive the placeholder token: alphanumerics upper-cased, spaces to
/// underscores, everything else dropped. "Other Cellulosics" becomes
/// "OTHER_CELLULOSICS", "Viscose/Lyocell" becomes "VISCOSELYOCELL".
pub fn make_placeholder(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_uppercase());
        } else if ch == ' ' {
            out.push('_');
        }
    }
    out
}

#[derive(Debug, Default)]
pub struct Catalog {
    attributes: Vec<Attribute>,
    options: Vec<AttributeOption>,
    attribute_names: HashMap<String, AttributeId>,
    attribute_placeholders: HashMap<String, AttributeId>,
    option_names: HashMap<String, OptionId>,
    option_placeholders: HashMap<String, OptionId>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute. Name and derived placeholder must be unique;
    /// the parent category (if any) must already exist.
    pub fn add_attribute(
        &mut self,
        name: &str,
        category: Option<AttributeId>,
    ) -> Result<AttributeId, StoreError> {
        if let Some(parent) = category {
            self.attribute(parent)?;
        }
        if self.attribute_names.contains_key(name) {
            return Err(StoreError::DuplicateAttribute(name.to_string()));
        }
        let placeholder = make_placeholder(name);
        if self.attribute_placeholders.contains_key(&placeholder) {
            return Err(StoreError::DuplicatePlaceholder(placeholder));
        }
        let id = AttributeId(self.attributes.len() as u32);
        self.attribute_names.insert(name.to_string(), id);
        self.attribute_placeholders.insert(placeholder.clone(), id);
        self.attributes.push(Attribute {
            id,
            name: name.to_string(),
            placeholder,
            category,
        });
        Ok(id)
    }

    /// Fetch an option by name, creating it when absent. Options are
    /// shared: "Unspecified" is one option valid for several attributes.
    pub fn ensure_option(&mut self, name: &str) -> Result<OptionId, StoreError> {
        if let Some(id) = self.option_names.get(name) {
            return Ok(*id);
        }
        let placeholder = make_placeholder(name);
        if self.option_placeholders.contains_key(&placeholder) {
            return Err(StoreError::DuplicatePlaceholder(placeholder));
        }
        let id = OptionId(self.options.len() as u32);
        self.option_names.insert(name.to_string(), id);
        self.option_placeholders.insert(placeholder.clone(), id);
        self.options.push(AttributeOption {
            id,
            name: name.to_string(),
            placeholder,
            valid_for: Vec::new(),
        });
        Ok(id)
    }

    /// Mark an option as a valid choice for an attribute.
    pub fn option_valid_for(
        &mut self,
        option: OptionId,
        attribute: AttributeId,
    ) -> Result<(), StoreError> {
        self.attribute(attribute)?;
        let entry = self
            .options
            .get_mut(option.0 as usize)
            .ok_or_else(|| StoreError::NotFound(format!("option id {}", option.0)))?;
        if !entry.valid_for.contains(&attribute) {
            entry.valid_for.push(attribute);
        }
        Ok(())
    }

    pub fn attribute(&self, id: AttributeId) -> Result<&Attribute, StoreError> {
        self.attributes
            .get(id.0 as usize)
            .ok_or_else(|| StoreError::NotFound(format!("attribute id {}", id.0)))
    }

    pub fn option(&self, id: OptionId) -> Result<&AttributeOption, StoreError> {
        self.options
            .get(id.0 as usize)
            .ok_or_else(|| StoreError::NotFound(format!("option id {}", id.0)))
    }

    pub fn attribute_by_name(&self, name: &str) -> Option<&Attribute> {
        self.attribute_names
            .get(name)
            .and_then(|id| self.attributes.get(id.0 as usize))
    }

    pub fn attribute_by_placeholder(&self, placeholder: &str) -> Option<&Attribute> {
        self.attribute_placeholders
            .get(placeholder)
            .and_then(|id| self.attributes.get(id.0 as usize))
    }

    pub fn option_by_name(&self, name: &str) -> Option<&AttributeOption> {
        self.option_names
            .get(name)
            .and_then(|id| self.options.get(id.0 as usize))
    }

    pub fn option_by_placeholder(&self, placeholder: &str) -> Option<&AttributeOption> {
        self.option_placeholders
            .get(placeholder)
            .and_then(|id| self.options.get(id.0 as usize))
    }

    pub fn is_valid_choice(&self, option: OptionId, attribute: AttributeId) -> bool {
        self.options
            .get(option.0 as usize)
            .map(|o| o.valid_for.contains(&attribute))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_derivation() {
        assert_eq!(make_placeholder("Other Cellulosics"), "OTHER_CELLULOSICS");
        assert_eq!(make_placeholder("Viscose/Lyocell"), "VISCOSELYOCELL");
        assert_eq!(make_placeholder("Light/Dark"), "LIGHTDARK");
        assert_eq!(make_placeholder("Top Dyed"), "TOP_DYED");
        assert_eq!(make_placeholder("Acrylic "), "ACRYLIC_");
    }

    #[test]
    fn category_tree_by_parent_reference() {
        let mut catalog = Catalog::new();
        let composition = catalog.add_attribute("Composition", None).unwrap();
        let cotton = catalog.add_attribute("Cotton", Some(composition)).unwrap();
        assert_eq!(catalog.attribute(cotton).unwrap().category, Some(composition));
        assert_eq!(catalog.attribute(composition).unwrap().category, None);
        // A parent must already exist.
        let err = catalog.add_attribute("Orphan", Some(AttributeId(99))).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn duplicate_names_and_placeholders_rejected() {
        let mut catalog = Catalog::new();
        catalog.add_attribute("Cotton", None).unwrap();
        assert_eq!(
            catalog.add_attribute("Cotton", None).unwrap_err(),
            StoreError::DuplicateAttribute("Cotton".into())
        );
        // Distinct names can still collide on the derived placeholder.
        assert_eq!(
            catalog.add_attribute("C-otton", None).unwrap_err(),
            StoreError::DuplicatePlaceholder("COTTON".into())
        );
    }

    #[test]
    fn options_are_shared_by_name() {
        let mut catalog = Catalog::new();
        let shade = catalog.add_attribute("Light/Dark", None).unwrap();
        let method = catalog.add_attribute("Dye Method", None).unwrap();
        let first = catalog.ensure_option("Unspecified").unwrap();
        let second = catalog.ensure_option("Unspecified").unwrap();
        assert_eq!(first, second);
        catalog.option_valid_for(first, shade).unwrap();
        catalog.option_valid_for(first, method).unwrap();
        catalog.option_valid_for(first, method).unwrap();
        assert_eq!(catalog.option(first).unwrap().valid_for.len(), 2);
        assert!(catalog.is_valid_choice(first, shade));
    }

    #[test]
    fn placeholder_lookups() {
        let mut catalog = Catalog::new();
        let id = catalog.add_attribute("Dye Stuff", None).unwrap();
        assert_eq!(
            catalog.attribute_by_placeholder("DYE_STUFF").map(|a| a.id),
            Some(id)
        );
        assert!(catalog.attribute_by_placeholder("DYESTUFF").is_none());
        let opt = catalog.ensure_option("Top Dyed").unwrap();
        assert_eq!(
            catalog.option_by_placeholder("TOP_DYED").map(|o| o.id),
            Some(opt)
        );
    }
}
