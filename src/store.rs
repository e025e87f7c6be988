//! Materials and their attribute entries.
//!
//! Each entry links one material to one attribute and carries either a
//! percentage (0-100 fixed point) or a validated option choice. The typed
//! [`AttributeValue`] enum makes "exactly one representation per entry"
//! structural; an entry may be declared before it has a value, matching
//! how catalogs are seeded in practice.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use quality_core::{AttributeInfo, MaterialView, Value};

use crate::catalog::{AttributeId, Catalog, OptionId};
use crate::error::StoreError;

/// Arena index of a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub(crate) u32);

#[derive(Debug, Clone)]
pub struct Material {
    pub id: MaterialId,
    pub name: String,
}

/// Declared value kind of an entry, serialized with the wire codes the
/// listing surface uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueKind {
    #[serde(rename = "p")]
    Percentage,
    #[serde(rename = "c")]
    Choice,
}

impl ValueKind {
    pub fn label(&self) -> &'static str {
        match self {
            ValueKind::Percentage => "percentage",
            ValueKind::Choice => "choice",
        }
    }
}

/// The value side of an entry. `None` means declared but not yet valued.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeValue {
    Percentage(Option<Decimal>),
    Choice(Option<OptionId>),
}

impl AttributeValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            AttributeValue::Percentage(_) => ValueKind::Percentage,
            AttributeValue::Choice(_) => ValueKind::Choice,
        }
    }
}

/// One material/attribute link.
#[derive(Debug, Clone)]
pub struct MaterialAttribute {
    pub material: MaterialId,
    pub attribute: AttributeId,
    pub value: AttributeValue,
}

impl MaterialAttribute {
    /// The value rule expressions see: the fraction value/100 for
    /// percentages, the option name for choices, nothing when unset.
    pub fn resolved(&self, catalog: &Catalog) -> Option<Value> {
        match self.value {
            AttributeValue::Percentage(Some(p)) => {
                Some(Value::Number(p / Decimal::ONE_HUNDRED))
            }
            AttributeValue::Choice(Some(option)) => catalog
                .option(option)
                .ok()
                .map(|o| Value::Text(o.name.clone())),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct MaterialStore {
    materials: Vec<Material>,
    entries: Vec<MaterialAttribute>,
    entry_index: HashMap<(MaterialId, AttributeId), usize>,
}

impl MaterialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_material(&mut self, name: &str) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        self.materials.push(Material {
            id,
            name: name.to_string(),
        });
        id
    }

    pub fn material(&self, id: MaterialId) -> Result<&Material, StoreError> {
        self.materials
            .get(id.0 as usize)
            .ok_or_else(|| StoreError::NotFound(format!("material id {}", id.0)))
    }

    /// Declare an entry for (material, attribute) with the given kind.
    /// One entry per pair.
    pub fn declare(
        &mut self,
        catalog: &Catalog,
        material: MaterialId,
        attribute: AttributeId,
        kind: ValueKind,
    ) -> Result<(), StoreError> {
        let attribute_name = catalog.attribute(attribute)?.name.clone();
        let material_name = self.material(material)?.name.clone();
        if self.entry_index.contains_key(&(material, attribute)) {
            return Err(StoreError::DuplicateEntry {
                attribute: attribute_name,
                material: material_name,
            });
        }
        let value = match kind {
            ValueKind::Percentage => AttributeValue::Percentage(None),
            ValueKind::Choice => AttributeValue::Choice(None),
        };
        self.entry_index
            .insert((material, attribute), self.entries.len());
        self.entries.push(MaterialAttribute {
            material,
            attribute,
            value,
        });
        Ok(())
    }

    /// Set a percentage value on a declared percentage-kind entry.
    pub fn set_percentage(
        &mut self,
        catalog: &Catalog,
        material: MaterialId,
        attribute: AttributeId,
        percentage: Decimal,
    ) -> Result<(), StoreError> {
        if percentage < Decimal::ZERO || percentage > Decimal::ONE_HUNDRED {
            return Err(StoreError::PercentageOutOfRange(percentage));
        }
        let entry = self.entry_mut(catalog, material, attribute)?;
        match entry.value {
            AttributeValue::Percentage(_) => {
                entry.value = AttributeValue::Percentage(Some(percentage));
                Ok(())
            }
            AttributeValue::Choice(_) => Err(StoreError::WrongValueKind {
                attribute: catalog.attribute(attribute)?.name.clone(),
                expected: ValueKind::Percentage.label(),
                actual: ValueKind::Choice.label(),
            }),
        }
    }

    /// Set an option choice on a declared choice-kind entry. The option
    /// must be valid for the attribute.
    pub fn set_choice(
        &mut self,
        catalog: &Catalog,
        material: MaterialId,
        attribute: AttributeId,
        option: OptionId,
    ) -> Result<(), StoreError> {
        if !catalog.is_valid_choice(option, attribute) {
            return Err(StoreError::InvalidChoice {
                option: catalog.option(option)?.name.clone(),
                attribute: catalog.attribute(attribute)?.name.clone(),
            });
        }
        let entry = self.entry_mut(catalog, material, attribute)?;
        match entry.value {
            AttributeValue::Choice(_) => {
                entry.value = AttributeValue::Choice(Some(option));
                Ok(())
            }
            AttributeValue::Percentage(_) => Err(StoreError::WrongValueKind {
                attribute: catalog.attribute(attribute)?.name.clone(),
                expected: ValueKind::Choice.label(),
                actual: ValueKind::Percentage.label(),
            }),
        }
    }

    fn entry_mut(
        &mut self,
        catalog: &Catalog,
        material: MaterialId,
        attribute: AttributeId,
    ) -> Result<&mut MaterialAttribute, StoreError> {
        let index = *self
            .entry_index
            .get(&(material, attribute))
            .ok_or_else(|| {
                StoreError::NotFound(format!(
                    "no entry for attribute {:?} on this material",
                    catalog
                        .attribute(attribute)
                        .map(|a| a.name.clone())
                        .unwrap_or_else(|_| format!("id {}", attribute.0))
                ))
            })?;
        Ok(&mut self.entries[index])
    }

    /// This material's entries, in declaration order.
    pub fn entries(&self, material: MaterialId) -> impl Iterator<Item = &MaterialAttribute> {
        self.entries.iter().filter(move |e| e.material == material)
    }

    pub fn attributes_count(&self, material: MaterialId) -> usize {
        self.entries(material).count()
    }

    /// Point-in-time view of one material, for the rule engine.
    pub fn snapshot<'a>(
        &'a self,
        catalog: &'a Catalog,
        material: MaterialId,
    ) -> MaterialSnapshot<'a> {
        MaterialSnapshot {
            catalog,
            store: self,
            material,
        }
    }
}

/// [`MaterialView`] implementation over the catalog and store, scoped to
/// one material. All lookups are by placeholder, read-only.
pub struct MaterialSnapshot<'a> {
    catalog: &'a Catalog,
    store: &'a MaterialStore,
    material: MaterialId,
}

impl MaterialView for MaterialSnapshot<'_> {
    fn attribute_by_placeholder(&self, placeholder: &str) -> Option<AttributeInfo> {
        self.catalog
            .attribute_by_placeholder(placeholder)
            .map(|a| AttributeInfo {
                top_level: a.category.is_none(),
            })
    }

    fn entry_value(&self, attribute_placeholder: &str) -> Option<Value> {
        let attribute = self.catalog.attribute_by_placeholder(attribute_placeholder)?;
        let index = self
            .store
            .entry_index
            .get(&(self.material, attribute.id))?;
        self.store.entries[*index].resolved(self.catalog)
    }

    fn entry_value_by_option(&self, option_placeholder: &str) -> Option<Value> {
        let option = self.catalog.option_by_placeholder(option_placeholder)?;
        self.store
            .entries(self.material)
            .find(|e| matches!(e.value, AttributeValue::Choice(Some(chosen)) if chosen == option.id))
            .and_then(|e| e.resolved(self.catalog))
    }

    fn percentage_sum(&self) -> Decimal {
        self.store
            .entries(self.material)
            .filter_map(|e| match e.value {
                AttributeValue::Percentage(Some(p)) => Some(p / Decimal::ONE_HUNDRED),
                _ => None,
            })
            .sum()
    }
}
