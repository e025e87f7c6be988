//! Sample textile data.
//!
//! The bundled catalog used by the demo binary and the integration tests:
//! four categories, their attributes and options, and one material with a
//! 70/30 polyester/cotton composition. Fixture loading lives outside the
//! engine; quality-core never sees it.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{json, Value as Json};

use crate::catalog::{AttributeId, Catalog, OptionId};
use crate::error::StoreError;
use crate::store::{MaterialId, MaterialStore, ValueKind};

const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Composition",
        &[
            "Cotton",
            "Polyester",
            "Wool",
            "Cashmere",
            "Viscose/Lyocell",
            "Nylon",
            "Polyamide",
            "Acrylic",
            "Elastane",
            "Silk",
            "Down",
            "Leather",
            "Other Cellulosics",
            "Others",
        ],
    ),
    ("Fabric Construction", &["Type"]),
    ("Colour Shade", &["Light/Dark"]),
    ("Dyes", &["Dye Method", "Dye Stuff"]),
];

/// Options keyed by attribute name, falling back to the category name when
/// an attribute has no list of its own.
const OPTIONS: &[(&str, &[&str])] = &[
    (
        "Fabric Construction",
        &["Yarns", "Thread", "Woven", "Knitted", "Nonwoven", "Any"],
    ),
    ("Colour Shade", &["Light", "Dark", "Mixed", "Unspecified"]),
    (
        "Dye Method",
        &[
            "Undyed",
            "Unspecified",
            "Direct Dyed",
            "Top Dyed",
            "Yarn Dyed",
            "Dope Dyed",
            "Piece Dyed",
        ],
    ),
    (
        "Dye Stuff",
        &[
            "Reactive Dyes",
            "Synthetic Pigments",
            "Natural Pigments",
            "Pastes",
        ],
    ),
];

/// A fully seeded catalog/store pair plus the sample material.
#[derive(Debug)]
pub struct SampleData {
    pub catalog: Catalog,
    pub store: MaterialStore,
    pub material: MaterialId,
}

impl SampleData {
    pub fn attribute_id(&self, name: &str) -> Result<AttributeId, StoreError> {
        self.catalog
            .attribute_by_name(name)
            .map(|a| a.id)
            .ok_or_else(|| StoreError::NotFound(format!("attribute {:?}", name)))
    }

    pub fn option_id(&self, name: &str) -> Result<OptionId, StoreError> {
        self.catalog
            .option_by_name(name)
            .map(|o| o.id)
            .ok_or_else(|| StoreError::NotFound(format!("option {:?}", name)))
    }
}

/// Build the textile sample: every category and attribute, the option sets,
/// one material with all entries declared (Composition children as
/// percentages, everything else as choices), and the 70/30 seed values.
pub fn textile_sample() -> Result<SampleData, StoreError> {
    let mut catalog = Catalog::new();
    let mut store = MaterialStore::new();
    let material = store.add_material("Material 1");

    for &(category_name, children) in CATEGORIES {
        let category = catalog.add_attribute(category_name, None)?;
        for &child_name in children {
            let attribute = catalog.add_attribute(child_name, Some(category))?;
            for &option_name in options_for(child_name, category_name) {
                let option = catalog.ensure_option(option_name)?;
                catalog.option_valid_for(option, attribute)?;
            }
            let kind = if category_name == "Composition" {
                ValueKind::Percentage
            } else {
                ValueKind::Choice
            };
            store.declare(&catalog, material, attribute, kind)?;
        }
    }

    let mut sample = SampleData {
        catalog,
        store,
        material,
    };
    let polyester = sample.attribute_id("Polyester")?;
    let cotton = sample.attribute_id("Cotton")?;
    sample
        .store
        .set_percentage(&sample.catalog, material, polyester, dec("70.00"))?;
    sample
        .store
        .set_percentage(&sample.catalog, material, cotton, dec("30.00"))?;
    Ok(sample)
}

/// The operations the sample recycler's "Quality Best" carries.
pub fn sample_operations() -> Json {
    json!([
        {
            "operator": "and",
            "operands": [
                4,
                {"operator": "*", "operands": [8, 8, 8]},
                "ATTR_POLYESTER"
            ]
        }
    ])
}

fn options_for(attribute: &str, category: &str) -> &'static [&'static str] {
    lookup(attribute).or_else(|| lookup(category)).unwrap_or(&[])
}

fn lookup(key: &str) -> Option<&'static [&'static str]> {
    OPTIONS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, options)| *options)
}

fn dec(s: &str) -> Decimal {
    // Fixture literals only; malformed ones would be a bug in this file.
    Decimal::from_str(s).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quality_core::MaterialView;

    #[test]
    fn sample_has_eighteen_entries() {
        let sample = textile_sample().unwrap();
        assert_eq!(sample.store.attributes_count(sample.material), 18);
    }

    #[test]
    fn composition_children_are_percentages() {
        let sample = textile_sample().unwrap();
        let snapshot = sample.store.snapshot(&sample.catalog, sample.material);
        assert_eq!(
            snapshot.entry_value("POLYESTER"),
            Some(quality_core::Value::Number(dec("0.7")))
        );
        assert_eq!(snapshot.percentage_sum(), Decimal::ONE);
    }

    #[test]
    fn shared_options_span_attributes() {
        let sample = textile_sample().unwrap();
        let unspecified = sample.option_id("Unspecified").unwrap();
        let shade = sample.attribute_id("Light/Dark").unwrap();
        let method = sample.attribute_id("Dye Method").unwrap();
        assert!(sample.catalog.is_valid_choice(unspecified, shade));
        assert!(sample.catalog.is_valid_choice(unspecified, method));
    }

    #[test]
    fn type_attribute_inherits_category_options() {
        let sample = textile_sample().unwrap();
        let woven = sample.option_id("Woven").unwrap();
        let fabric_type = sample.attribute_id("Type").unwrap();
        assert!(sample.catalog.is_valid_choice(woven, fabric_type));
    }
}
