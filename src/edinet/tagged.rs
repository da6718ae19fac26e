use roxmltree::Document;

use super::error::AttemptError;
use super::metrics::{AliasTable, Metric, MetricSet, MetricValue};

fn pure_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Resolve the canonical metrics from an XBRL instance document.
///
/// Malformed markup fails the whole call. Per metric, aliases are tried in
/// order against element local names; an element's text is accepted only
/// when it is a pure decimal-digit string. Values carrying separators,
/// currency marks or signs are rejected rather than coerced, which pushes
/// the lookup on to the next alias.
pub fn extract_metrics(text: &str, aliases: &AliasTable) -> Result<MetricSet, AttemptError> {
    let tree = Document::parse(text)?;

    let mut metrics = MetricSet::not_available();
    for metric in Metric::ALL {
        'alias: for alias in aliases.aliases(metric) {
            let value = tree
                .descendants()
                .filter(|n| n.is_element() && n.tag_name().name() == alias.as_str())
                .find_map(|n| {
                    let content = n.text().unwrap_or("").trim();
                    if pure_digits(content) {
                        content.parse::<i64>().ok()
                    } else {
                        None
                    }
                });
            if let Some(v) = value {
                log::debug!("{} matched element {}", metric, alias);
                metrics.set(metric, MetricValue::Amount(v));
                break 'alias;
            }
        }
    }
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(xml: &str) -> Result<MetricSet, AttemptError> {
        extract_metrics(xml, &AliasTable::default())
    }

    #[test]
    fn resolves_element_values() {
        let xml = "<report><NetSales>1000000</NetSales>\
                   <OperatingIncome>500</OperatingIncome></report>";
        let metrics = extract(xml).unwrap();
        assert_eq!(metrics.net_sales, MetricValue::Amount(1000000));
        assert_eq!(metrics.operating_income, MetricValue::Amount(500));
        assert_eq!(metrics.ordinary_income, MetricValue::NotAvailable);
        assert_eq!(metrics.net_income, MetricValue::NotAvailable);
    }

    #[test]
    fn separators_units_and_signs_are_rejected() {
        let xml = "<report>\
                   <NetSales>1,234</NetSales>\
                   <OperatingIncome>¥500</OperatingIncome>\
                   <OrdinaryIncome>-300</OrdinaryIncome>\
                   <NetIncome></NetIncome>\
                   </report>";
        let metrics = extract(xml).unwrap();
        assert_eq!(metrics.net_sales, MetricValue::NotAvailable);
        assert_eq!(metrics.operating_income, MetricValue::NotAvailable);
        assert_eq!(metrics.ordinary_income, MetricValue::NotAvailable);
        assert_eq!(metrics.net_income, MetricValue::NotAvailable);
    }

    #[test]
    fn rejected_value_falls_through_to_next_alias() {
        let xml = "<report>\
                   <NetIncome>1,234</NetIncome>\
                   <ProfitAttributableToOwnersOfParent>900</ProfitAttributableToOwnersOfParent>\
                   </report>";
        let metrics = extract(xml).unwrap();
        assert_eq!(metrics.net_income, MetricValue::Amount(900));
    }

    #[test]
    fn earlier_alias_wins_when_both_match() {
        let xml = "<report>\
                   <ProfitAttributableToOwnersOfParent>900</ProfitAttributableToOwnersOfParent>\
                   <NetIncome>800</NetIncome>\
                   </report>";
        let metrics = extract(xml).unwrap();
        assert_eq!(metrics.net_income, MetricValue::Amount(800));
    }

    #[test]
    fn namespaced_elements_match_on_local_name() {
        let xml = r#"<x:report xmlns:x="http://example.com/taxonomy">
                     <x:NetSales>777</x:NetSales></x:report>"#;
        let metrics = extract(xml).unwrap();
        assert_eq!(metrics.net_sales, MetricValue::Amount(777));
    }

    #[test]
    fn malformed_markup_is_a_whole_document_failure() {
        let err = extract("<report><NetSales>100</report>").unwrap_err();
        assert!(matches!(err, AttemptError::MalformedTaggedDocument(_)));
    }
}
