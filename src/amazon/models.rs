//! Data models for bestseller products and their detail-page attributes.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A bestseller entry: listing fields plus whatever the detail page exposed.
///
/// `title`, `price` and `url` always exist (possibly empty). Every other field
/// is `None` until enrichment finds it. When serialized, absent fields are
/// written as empty strings so exporters always see the full key set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product title from the listing card
    #[serde(default)]
    pub title: String,
    /// Display price from the listing card, e.g. "R$ 99,90"
    #[serde(default)]
    pub price: String,
    /// Absolute detail-page URL
    #[serde(default)]
    pub url: String,
    /// Installment/payment text from the detail page
    #[serde(default, serialize_with = "blank_if_none", deserialize_with = "none_if_blank")]
    pub payment_conditions: Option<String>,
    /// Attributes read from the detail-page spec table
    #[serde(flatten)]
    pub specs: ProductSpecs,
}

impl Product {
    /// Creates a base listing record.
    pub fn new(
        title: impl Into<String>,
        price: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self { title: title.into(), price: price.into(), url: url.into(), ..Self::default() }
    }

    /// Returns true if enrichment has merged detail-page data into this record.
    pub fn is_enriched(&self) -> bool {
        self.payment_conditions.is_some()
    }

    /// Merges detail-page data without touching the listing fields.
    ///
    /// Payment conditions always become present (empty when the page had none);
    /// spec fields are only set for the labels that were actually found.
    pub fn merge_details(&mut self, details: ProductDetails) {
        self.payment_conditions = Some(details.payment_conditions.unwrap_or_default());
        self.specs.merge(details.specs);
    }
}

/// The attribute a spec-table row maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecField {
    Brand,
    Color,
    Material,
    Capacity,
    Dimensions,
    SpecialFeatures,
}

impl SpecField {
    /// Returns all spec fields in export order.
    pub fn all() -> &'static [SpecField] {
        &[
            SpecField::Brand,
            SpecField::Color,
            SpecField::Material,
            SpecField::Capacity,
            SpecField::Dimensions,
            SpecField::SpecialFeatures,
        ]
    }

    /// Returns the serialized key for this field.
    pub fn key(&self) -> &'static str {
        match self {
            SpecField::Brand => "brand",
            SpecField::Color => "color",
            SpecField::Material => "material",
            SpecField::Capacity => "capacity",
            SpecField::Dimensions => "dimensions",
            SpecField::SpecialFeatures => "specialFeatures",
        }
    }
}

impl fmt::Display for SpecField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Optional attributes read from a detail-page spec table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSpecs {
    #[serde(default, serialize_with = "blank_if_none", deserialize_with = "none_if_blank")]
    pub brand: Option<String>,
    #[serde(default, serialize_with = "blank_if_none", deserialize_with = "none_if_blank")]
    pub color: Option<String>,
    #[serde(default, serialize_with = "blank_if_none", deserialize_with = "none_if_blank")]
    pub material: Option<String>,
    #[serde(default, serialize_with = "blank_if_none", deserialize_with = "none_if_blank")]
    pub capacity: Option<String>,
    #[serde(default, serialize_with = "blank_if_none", deserialize_with = "none_if_blank")]
    pub dimensions: Option<String>,
    #[serde(default, serialize_with = "blank_if_none", deserialize_with = "none_if_blank")]
    pub special_features: Option<String>,
}

impl ProductSpecs {
    fn slot(&mut self, field: SpecField) -> &mut Option<String> {
        match field {
            SpecField::Brand => &mut self.brand,
            SpecField::Color => &mut self.color,
            SpecField::Material => &mut self.material,
            SpecField::Capacity => &mut self.capacity,
            SpecField::Dimensions => &mut self.dimensions,
            SpecField::SpecialFeatures => &mut self.special_features,
        }
    }

    /// Returns the value for a field, if present.
    pub fn get(&self, field: SpecField) -> Option<&str> {
        let value = match field {
            SpecField::Brand => &self.brand,
            SpecField::Color => &self.color,
            SpecField::Material => &self.material,
            SpecField::Capacity => &self.capacity,
            SpecField::Dimensions => &self.dimensions,
            SpecField::SpecialFeatures => &self.special_features,
        };
        value.as_deref()
    }

    /// Sets a field, overwriting any previous value.
    pub fn set(&mut self, field: SpecField, value: impl Into<String>) {
        *self.slot(field) = Some(value.into());
    }

    /// Copies every present field of `other` over this one.
    pub fn merge(&mut self, mut other: ProductSpecs) {
        for &field in SpecField::all() {
            if let Some(value) = other.slot(field).take() {
                *self.slot(field) = Some(value);
            }
        }
    }

    /// Returns the number of fields present.
    pub fn len(&self) -> usize {
        SpecField::all().iter().filter(|f| self.get(**f).is_some()).count()
    }

    /// Returns true if no field is present.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything a detail page contributed to a product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDetails {
    pub payment_conditions: Option<String>,
    pub specs: ProductSpecs,
}

fn blank_if_none<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or(""))
}

fn none_if_blank<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty()))
}
