//! Product detail page extraction: payment conditions and the spec table.

use crate::amazon::listing::normalize_text;
use crate::amazon::models::{ProductDetails, ProductSpecs, SpecField};
use crate::amazon::regions::Region;
use crate::amazon::selectors::detail;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};

/// Reads payment conditions and labelled attributes from a detail page.
#[derive(Debug, Clone)]
pub struct DetailExtractor {
    labels: Vec<(String, SpecField)>,
}

impl DetailExtractor {
    /// Creates an extractor with explicit label terms, checked in order.
    pub fn new<S: AsRef<str>>(labels: &[(S, SpecField)]) -> Self {
        Self { labels: labels.iter().map(|(term, field)| (term.as_ref().to_string(), *field)).collect() }
    }

    /// Creates an extractor using the region's localized label terms.
    pub fn for_region(region: Region) -> Self {
        Self::new(region.spec_labels())
    }

    /// Extracts everything the page exposes. Missing pieces are simply absent.
    pub fn extract(&self, html: &str) -> ProductDetails {
        let document = Html::parse_document(html);

        let details = ProductDetails {
            payment_conditions: payment_conditions(&document),
            specs: self.spec_table(&document),
        };

        debug!(
            "Detail page: payment conditions {}, {} spec fields",
            if details.payment_conditions.is_some() { "found" } else { "missing" },
            details.specs.len()
        );

        details
    }

    /// Maps a row label to a field by substring containment.
    pub fn classify(&self, label: &str) -> Option<SpecField> {
        self.labels.iter().find(|(term, _)| label.contains(term.as_str())).map(|(_, field)| *field)
    }

    fn spec_table(&self, document: &Html) -> ProductSpecs {
        let mut specs = ProductSpecs::default();

        for row in document.select(&detail::SPEC_ROW) {
            let (Some(label), Some(value)) =
                (cell_text(row, &detail::SPEC_LABEL), cell_text(row, &detail::SPEC_VALUE))
            else {
                continue;
            };

            match self.classify(&label) {
                Some(field) => {
                    trace!("Spec row '{}' -> {}", label, field);
                    specs.set(field, value);
                }
                None => trace!("Ignoring spec row '{}'", label),
            }
        }

        specs
    }
}

fn payment_conditions(document: &Html) -> Option<String> {
    document
        .select(&detail::PAYMENT_CONDITIONS)
        .next()
        .map(|e| normalize_text(&e.text().collect::<String>()))
        .filter(|text| !text.is_empty())
}

/// Cell text without bidi marks or surrounding whitespace; `None` when blank.
fn cell_text(row: ElementRef, selector: &Selector) -> Option<String> {
    let raw: String = row.select(selector).next()?.text().collect();
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '\u{200e}' | '\u{200f}')).collect();
    let text = normalize_text(&cleaned);
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: &str, value: &str) -> String {
        format!(
            r#"<tr class="a-spacing-small">
                <td class="a-span3"><span class="a-size-base a-text-bold">{}</span></td>
                <td class="a-span9"><span class="a-size-base po-break-word">{}</span></td>
            </tr>"#,
            label, value
        )
    }

    fn detail_page(payment: Option<&str>, rows: &[String]) -> String {
        let payment = payment
            .map(|p| format!(r#"<span id="best-offer-string-cc" class="best-offer-name">{}</span>"#, p))
            .unwrap_or_default();
        format!(
            r#"<html><body><div id="dp">{}<table>{}</table></div></body></html>"#,
            payment,
            rows.concat()
        )
    }

    #[test]
    fn test_classify_portuguese_labels() {
        let extractor = DetailExtractor::for_region(Region::Br);
        assert_eq!(extractor.classify("Marca"), Some(SpecField::Brand));
        assert_eq!(extractor.classify("Cor do produto"), Some(SpecField::Color));
        assert_eq!(extractor.classify("Material"), Some(SpecField::Material));
        assert_eq!(extractor.classify("Capacidade"), Some(SpecField::Capacity));
        assert_eq!(extractor.classify("Dimensões do produto"), Some(SpecField::Dimensions));
        assert_eq!(
            extractor.classify("Características especiais"),
            Some(SpecField::SpecialFeatures)
        );
        assert_eq!(extractor.classify("Voltagem"), None);
        assert_eq!(extractor.classify("cor"), None);
    }

    #[test]
    fn test_classify_custom_labels() {
        let extractor = DetailExtractor::new(&[("Hersteller", SpecField::Brand)]);
        assert_eq!(extractor.classify("Hersteller"), Some(SpecField::Brand));
        assert_eq!(extractor.classify("Marca"), None);
    }

    #[test]
    fn test_extract_full_page() {
        let html = detail_page(
            Some("  em até 10x de R$ 9,99\n sem juros "),
            &[
                row("Marca", "Mondial"),
                row("Cor do produto", "Preto"),
                row("Material", "Aço inoxidável"),
                row("Capacidade", "1,7 litros"),
                row("Dimensões do produto", "20 x 15 x 25 cm"),
                row("Características especiais", "Desligamento automático"),
            ],
        );

        let details = DetailExtractor::for_region(Region::Br).extract(&html);
        assert_eq!(details.payment_conditions.as_deref(), Some("em até 10x de R$ 9,99 sem juros"));
        assert_eq!(details.specs.brand.as_deref(), Some("Mondial"));
        assert_eq!(details.specs.color.as_deref(), Some("Preto"));
        assert_eq!(details.specs.material.as_deref(), Some("Aço inoxidável"));
        assert_eq!(details.specs.capacity.as_deref(), Some("1,7 litros"));
        assert_eq!(details.specs.dimensions.as_deref(), Some("20 x 15 x 25 cm"));
        assert_eq!(details.specs.special_features.as_deref(), Some("Desligamento automático"));
    }

    #[test]
    fn test_unrecognized_label_does_not_affect_others() {
        let html = detail_page(
            None,
            &[row("Voltagem", "110V"), row("Cor", "Branco"), row("Peso", "1 kg")],
        );

        let details = DetailExtractor::for_region(Region::Br).extract(&html);
        assert!(details.payment_conditions.is_none());
        assert_eq!(details.specs.len(), 1);
        assert_eq!(details.specs.color.as_deref(), Some("Branco"));
    }

    #[test]
    fn test_last_row_wins() {
        let html = detail_page(None, &[row("Cor", "Preto"), row("Cor principal", "Vermelho")]);
        let details = DetailExtractor::for_region(Region::Br).extract(&html);
        assert_eq!(details.specs.color.as_deref(), Some("Vermelho"));
    }

    #[test]
    fn test_rows_missing_a_cell_are_skipped() {
        let html = detail_page(
            None,
            &[
                row("Marca", "   "),
                r#"<tr class="a-spacing-small"><td class="a-span3"><span class="a-size-base a-text-bold">Material</span></td></tr>"#.to_string(),
                row("Capacidade", "500 ml"),
            ],
        );

        let details = DetailExtractor::for_region(Region::Br).extract(&html);
        assert!(details.specs.brand.is_none());
        assert!(details.specs.material.is_none());
        assert_eq!(details.specs.capacity.as_deref(), Some("500 ml"));
    }

    #[test]
    fn test_technical_details_table() {
        let html = r#"<html><body><table class="prodDetTable">
            <tr><th class="prodDetSectionEntry"> Marca </th><td class="prodDetAttrValue">&#x200e;Electrolux</td></tr>
            <tr><th class="prodDetSectionEntry">Número do modelo</th><td class="prodDetAttrValue">X1</td></tr>
        </table></body></html>"#;

        let details = DetailExtractor::for_region(Region::Br).extract(html);
        assert_eq!(details.specs.brand.as_deref(), Some("Electrolux"));
        assert_eq!(details.specs.len(), 1);
    }

    #[test]
    fn test_empty_page() {
        let details = DetailExtractor::for_region(Region::Br).extract("<html></html>");
        assert_eq!(details, ProductDetails::default());
    }

    #[test]
    fn test_blank_payment_is_absent() {
        let html = detail_page(Some("   "), &[]);
        let details = DetailExtractor::for_region(Region::Br).extract(&html);
        assert!(details.payment_conditions.is_none());
    }

    #[test]
    fn test_payment_whitespace_collapsed() {
        let html = detail_page(Some("\n  em até 12x\n   de R$&nbsp;&nbsp;25,00 \t sem juros  "), &[]);
        let details = DetailExtractor::for_region(Region::Br).extract(&html);
        assert_eq!(details.payment_conditions.as_deref(), Some("em até 12x de R$ 25,00 sem juros"));
    }

    #[test]
    fn test_english_labels() {
        let html = detail_page(
            None,
            &[row("Brand", "Hamilton Beach"), row("Product Dimensions", "8 x 6 x 10 in")],
        );
        let details = DetailExtractor::for_region(Region::Us).extract(&html);
        assert_eq!(details.specs.brand.as_deref(), Some("Hamilton Beach"));
        assert_eq!(details.specs.dimensions.as_deref(), Some("8 x 6 x 10 in"));
    }
}
