//! Amazon regional domains, price formatting and localized page labels.

use crate::amazon::models::SpecField;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported Amazon storefronts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Br,
    Us,
    Uk,
    Ca,
    Au,
    In,
    Mx,
    Es,
    De,
    Fr,
    It,
}

const PT_LABELS: &[(&str, SpecField)] = &[
    ("Marca", SpecField::Brand),
    ("Cor", SpecField::Color),
    ("Material", SpecField::Material),
    ("Capacidade", SpecField::Capacity),
    ("Dimensões do produto", SpecField::Dimensions),
    ("Características especiais", SpecField::SpecialFeatures),
];

const EN_LABELS: &[(&str, SpecField)] = &[
    ("Brand", SpecField::Brand),
    ("Color", SpecField::Color),
    ("Colour", SpecField::Color),
    ("Material", SpecField::Material),
    ("Capacity", SpecField::Capacity),
    ("Product Dimensions", SpecField::Dimensions),
    ("Special Feature", SpecField::SpecialFeatures),
];

const ES_LABELS: &[(&str, SpecField)] = &[
    ("Marca", SpecField::Brand),
    ("Color", SpecField::Color),
    ("Material", SpecField::Material),
    ("Capacidad", SpecField::Capacity),
    ("Dimensiones del producto", SpecField::Dimensions),
    ("Características especiales", SpecField::SpecialFeatures),
];

const DE_LABELS: &[(&str, SpecField)] = &[
    ("Marke", SpecField::Brand),
    ("Farbe", SpecField::Color),
    ("Material", SpecField::Material),
    ("Fassungsvermögen", SpecField::Capacity),
    ("Kapazität", SpecField::Capacity),
    ("Produktabmessungen", SpecField::Dimensions),
    ("Besondere Merkmale", SpecField::SpecialFeatures),
];

const FR_LABELS: &[(&str, SpecField)] = &[
    ("Marque", SpecField::Brand),
    ("Couleur", SpecField::Color),
    ("Matériau", SpecField::Material),
    ("Capacité", SpecField::Capacity),
    ("Dimensions du produit", SpecField::Dimensions),
    ("Caractéristiques spéciales", SpecField::SpecialFeatures),
];

const IT_LABELS: &[(&str, SpecField)] = &[
    ("Marca", SpecField::Brand),
    ("Colore", SpecField::Color),
    ("Materiale", SpecField::Material),
    ("Capacità", SpecField::Capacity),
    ("Dimensioni prodotto", SpecField::Dimensions),
    ("Caratteristiche speciali", SpecField::SpecialFeatures),
];

impl Region {
    /// Returns the Amazon domain for this region.
    pub fn domain(&self) -> &'static str {
        match self {
            Region::Br => "amazon.com.br",
            Region::Us => "amazon.com",
            Region::Uk => "amazon.co.uk",
            Region::Ca => "amazon.ca",
            Region::Au => "amazon.com.au",
            Region::In => "amazon.in",
            Region::Mx => "amazon.com.mx",
            Region::Es => "amazon.es",
            Region::De => "amazon.de",
            Region::Fr => "amazon.fr",
            Region::It => "amazon.it",
        }
    }

    /// Returns the base URL (origin) for this region.
    pub fn base_url(&self) -> String {
        format!("https://www.{}", self.domain())
    }

    /// Returns the bestsellers landing page for this region.
    pub fn bestsellers_url(&self) -> String {
        format!("{}/bestsellers", self.base_url())
    }

    /// Returns the currency symbol used when a listing price omits one.
    pub fn currency_symbol(&self) -> &'static str {
        match self {
            Region::Br => "R$",
            Region::Us | Region::Ca | Region::Au | Region::Mx => "$",
            Region::Uk => "£",
            Region::In => "₹",
            Region::Es | Region::De | Region::Fr | Region::It => "€",
        }
    }

    /// Returns whether this region uses comma as decimal separator.
    pub fn uses_comma_decimal(&self) -> bool {
        matches!(self, Region::Br | Region::Es | Region::De | Region::Fr | Region::It)
    }

    /// Returns the decimal separator used when composing prices.
    pub fn decimal_separator(&self) -> char {
        if self.uses_comma_decimal() {
            ','
        } else {
            '.'
        }
    }

    /// Returns the Accept-Language header value for this region.
    pub fn accept_language(&self) -> &'static str {
        match self {
            Region::Us | Region::Ca | Region::Au => "en-US,en;q=0.9",
            Region::Uk => "en-GB,en;q=0.9",
            Region::In => "en-IN,en;q=0.9,hi;q=0.8",
            Region::Br => "pt-BR,pt;q=0.9,en;q=0.8",
            Region::Es | Region::Mx => "es-ES,es;q=0.9,en;q=0.8",
            Region::De => "de-DE,de;q=0.9,en;q=0.8",
            Region::Fr => "fr-FR,fr;q=0.9,en;q=0.8",
            Region::It => "it-IT,it;q=0.9,en;q=0.8",
        }
    }

    /// Returns the heading text that introduces the main bestseller grid.
    pub fn bestsellers_heading(&self) -> &'static str {
        match self {
            Region::Br => "Mais vendidos",
            Region::Us | Region::Uk | Region::Ca | Region::Au | Region::In => "Best Sellers",
            Region::Mx | Region::Es => "Los más vendidos",
            Region::De | Region::It => "Bestseller",
            Region::Fr => "Meilleures ventes",
        }
    }

    /// Returns the spec-table label terms, checked in order against each row label.
    pub fn spec_labels(&self) -> &'static [(&'static str, SpecField)] {
        match self {
            Region::Br => PT_LABELS,
            Region::Us | Region::Uk | Region::Ca | Region::Au | Region::In => EN_LABELS,
            Region::Mx | Region::Es => ES_LABELS,
            Region::De => DE_LABELS,
            Region::Fr => FR_LABELS,
            Region::It => IT_LABELS,
        }
    }

    /// Returns all supported regions.
    pub fn all() -> &'static [Region] {
        &[
            Region::Br,
            Region::Us,
            Region::Uk,
            Region::Ca,
            Region::Au,
            Region::In,
            Region::Mx,
            Region::Es,
            Region::De,
            Region::Fr,
            Region::It,
        ]
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Region::Br => "br",
            Region::Us => "us",
            Region::Uk => "uk",
            Region::Ca => "ca",
            Region::Au => "au",
            Region::In => "in",
            Region::Mx => "mx",
            Region::Es => "es",
            Region::De => "de",
            Region::Fr => "fr",
            Region::It => "it",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for Region {
    type Err = RegionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "br" | "brazil" => Ok(Region::Br),
            "us" | "usa" | "united states" => Ok(Region::Us),
            "uk" | "gb" | "united kingdom" => Ok(Region::Uk),
            "ca" | "canada" => Ok(Region::Ca),
            "au" | "australia" => Ok(Region::Au),
            "in" | "india" => Ok(Region::In),
            "mx" | "mexico" => Ok(Region::Mx),
            "es" | "spain" => Ok(Region::Es),
            "de" | "germany" => Ok(Region::De),
            "fr" | "france" => Ok(Region::Fr),
            "it" | "italy" => Ok(Region::It),
            _ => Err(RegionParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegionParseError(String);

impl fmt::Display for RegionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown region '{}'. Valid regions: br, us, uk, ca, au, in, mx, es, de, fr, it",
            self.0
        )
    }
}

impl std::error::Error for RegionParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_parsing() {
        assert_eq!(Region::from_str("br").unwrap(), Region::Br);
        assert_eq!(Region::from_str("brazil").unwrap(), Region::Br);
        assert_eq!(Region::from_str("us").unwrap(), Region::Us);
        assert_eq!(Region::from_str("united states").unwrap(), Region::Us);
        assert_eq!(Region::from_str("gb").unwrap(), Region::Uk);
        assert_eq!(Region::from_str("mexico").unwrap(), Region::Mx);
        assert_eq!(Region::from_str("germany").unwrap(), Region::De);

        // Case insensitive
        assert_eq!(Region::from_str("BR").unwrap(), Region::Br);
        assert_eq!(Region::from_str("France").unwrap(), Region::Fr);

        assert!(Region::from_str("jp").is_err());
        assert!(Region::from_str("").is_err());
    }

    #[test]
    fn test_region_display_roundtrip() {
        for region in Region::all() {
            let parsed: Region = region.to_string().parse().unwrap();
            assert_eq!(parsed, *region);
        }
    }

    #[test]
    fn test_region_urls() {
        assert_eq!(Region::Br.base_url(), "https://www.amazon.com.br");
        assert_eq!(Region::Us.base_url(), "https://www.amazon.com");
        assert_eq!(Region::Br.bestsellers_url(), "https://www.amazon.com.br/bestsellers");
        assert_eq!(Region::Uk.bestsellers_url(), "https://www.amazon.co.uk/bestsellers");
    }

    #[test]
    fn test_currency_symbols() {
        assert_eq!(Region::Br.currency_symbol(), "R$");
        assert_eq!(Region::Us.currency_symbol(), "$");
        assert_eq!(Region::Uk.currency_symbol(), "£");
        assert_eq!(Region::De.currency_symbol(), "€");
        assert_eq!(Region::In.currency_symbol(), "₹");
    }

    #[test]
    fn test_decimal_separator() {
        assert_eq!(Region::Br.decimal_separator(), ',');
        assert_eq!(Region::Fr.decimal_separator(), ',');
        assert_eq!(Region::Us.decimal_separator(), '.');
        assert_eq!(Region::Mx.decimal_separator(), '.');
    }

    #[test]
    fn test_accept_language() {
        assert!(Region::Br.accept_language().contains("pt-BR"));
        assert!(Region::Us.accept_language().contains("en-US"));
        assert!(Region::Mx.accept_language().contains("es-ES"));
    }

    #[test]
    fn test_every_region_labels_all_fields() {
        for region in Region::all() {
            let labels = region.spec_labels();
            for field in SpecField::all() {
                assert!(
                    labels.iter().any(|(_, f)| f == field),
                    "region {} has no label for {}",
                    region,
                    field
                );
            }
        }
    }

    #[test]
    fn test_portuguese_labels_order() {
        let terms: Vec<_> = Region::Br.spec_labels().iter().map(|(t, _)| *t).collect();
        assert_eq!(
            terms,
            vec![
                "Marca",
                "Cor",
                "Material",
                "Capacidade",
                "Dimensões do produto",
                "Características especiais"
            ]
        );
    }

    #[test]
    fn test_region_default() {
        assert_eq!(Region::default(), Region::Br);
    }

    #[test]
    fn test_region_parse_error_display() {
        let err = Region::from_str("xyz").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("xyz"));
        assert!(msg.contains("Valid regions"));
    }

    #[test]
    fn test_region_serde() {
        let json = serde_json::to_string(&Region::Br).unwrap();
        assert_eq!(json, "\"br\"");

        let parsed: Region = serde_json::from_str("\"uk\"").unwrap();
        assert_eq!(parsed, Region::Uk);
    }
}
