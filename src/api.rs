//! Read-only listing surface.
//!
//! The DTO layer a serialization/routing stack would sit on top of:
//! recyclers with nested qualities (including the verdict and the readable
//! condition), and a material's attribute entries. Routing, pagination and
//! response envelopes are out of scope.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value as Json;

use crate::catalog::Catalog;
use crate::error::StoreError;
use crate::recycler::RecyclerRegistry;
use crate::store::{AttributeValue, MaterialId, MaterialStore, ValueKind};

#[derive(Debug, Clone, Serialize)]
pub struct CategoryListing {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttributeListing {
    pub id: u32,
    pub name: String,
    pub placeholder: String,
    pub category: Option<CategoryListing>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionListing {
    pub id: u32,
    pub name: String,
    pub placeholder: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MaterialAttributeListing {
    pub attribute: AttributeListing,
    pub value_type: ValueKind,
    pub choice: Option<OptionListing>,
    pub percentage: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MaterialListing {
    pub id: u32,
    pub name: String,
    pub attributes_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct QualityListing {
    pub id: u32,
    pub title: String,
    pub min_count: i64,
    pub material: MaterialListing,
    /// Readable forms of the operations, joined with " and ".
    pub condition: String,
    pub operations: Json,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecyclerListing {
    pub id: u32,
    pub name: String,
    pub qualities: Vec<QualityListing>,
}

/// Every recycler with its qualities, each judged against its material.
pub fn list_recyclers(
    catalog: &Catalog,
    store: &MaterialStore,
    registry: &RecyclerRegistry,
) -> Result<Vec<RecyclerListing>, StoreError> {
    registry
        .recyclers()
        .iter()
        .map(|recycler| {
            let qualities = registry
                .qualities_of(recycler.id)
                .map(|quality| {
                    let material = store.material(quality.material)?;
                    Ok(QualityListing {
                        id: quality.id.0,
                        title: quality.title.clone(),
                        min_count: quality.min_count,
                        material: MaterialListing {
                            id: material.id.0,
                            name: material.name.clone(),
                            attributes_count: store.attributes_count(quality.material),
                        },
                        condition: quality.conditions(catalog, store)?.join(" and "),
                        operations: quality.operations.clone(),
                        passed: quality.judge(catalog, store)?,
                    })
                })
                .collect::<Result<Vec<_>, StoreError>>()?;
            Ok(RecyclerListing {
                id: recycler.id.0,
                name: recycler.name.clone(),
                qualities,
            })
        })
        .collect()
}

/// A material's attribute entries, with nested attribute and option data.
pub fn list_material_attributes(
    catalog: &Catalog,
    store: &MaterialStore,
    material: MaterialId,
) -> Result<Vec<MaterialAttributeListing>, StoreError> {
    store.material(material)?;
    store
        .entries(material)
        .map(|entry| {
            let attribute = catalog.attribute(entry.attribute)?;
            let category = match attribute.category {
                Some(id) => {
                    let parent = catalog.attribute(id)?;
                    Some(CategoryListing {
                        id: parent.id.0,
                        name: parent.name.clone(),
                    })
                }
                None => None,
            };
            let choice = match entry.value {
                AttributeValue::Choice(Some(option)) => {
                    let option = catalog.option(option)?;
                    Some(OptionListing {
                        id: option.id.0,
                        name: option.name.clone(),
                        placeholder: option.placeholder.clone(),
                    })
                }
                _ => None,
            };
            let percentage = match entry.value {
                AttributeValue::Percentage(p) => p,
                AttributeValue::Choice(_) => None,
            };
            Ok(MaterialAttributeListing {
                attribute: AttributeListing {
                    id: attribute.id.0,
                    name: attribute.name.clone(),
                    placeholder: attribute.placeholder.clone(),
                    category,
                },
                value_type: entry.value.kind(),
                choice,
                percentage,
            })
        })
        .collect()
}
