use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// The four financial figures every extraction resolves, whatever the
/// filer's own vocabulary looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Metric {
    NetSales,
    OperatingIncome,
    OrdinaryIncome,
    NetIncome,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::NetSales,
        Metric::OperatingIncome,
        Metric::OrdinaryIncome,
        Metric::NetIncome,
    ];

    /// Label used by EDINET filings and the CLI output.
    pub fn japanese_label(self) -> &'static str {
        match self {
            Metric::NetSales => "売上高",
            Metric::OperatingIncome => "営業利益",
            Metric::OrdinaryIncome => "経常利益",
            Metric::NetIncome => "純利益",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::NetSales => "NetSales",
            Metric::OperatingIncome => "OperatingIncome",
            Metric::OrdinaryIncome => "OrdinaryIncome",
            Metric::NetIncome => "NetIncome",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MetricValue {
    Amount(i64),
    NotAvailable,
}

impl MetricValue {
    pub fn is_available(&self) -> bool {
        matches!(self, MetricValue::Amount(_))
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Amount(v) => write!(f, "{}", v),
            MetricValue::NotAvailable => write!(f, "N/A"),
        }
    }
}

/// Resolved values for all four canonical metrics. Holding one field per
/// metric (rather than a map) makes a partial result unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricSet {
    pub net_sales: MetricValue,
    pub operating_income: MetricValue,
    pub ordinary_income: MetricValue,
    pub net_income: MetricValue,
}

impl MetricSet {
    pub fn not_available() -> Self {
        MetricSet {
            net_sales: MetricValue::NotAvailable,
            operating_income: MetricValue::NotAvailable,
            ordinary_income: MetricValue::NotAvailable,
            net_income: MetricValue::NotAvailable,
        }
    }

    pub fn get(&self, metric: Metric) -> &MetricValue {
        match metric {
            Metric::NetSales => &self.net_sales,
            Metric::OperatingIncome => &self.operating_income,
            Metric::OrdinaryIncome => &self.ordinary_income,
            Metric::NetIncome => &self.net_income,
        }
    }

    pub fn set(&mut self, metric: Metric, value: MetricValue) {
        match metric {
            Metric::NetSales => self.net_sales = value,
            Metric::OperatingIncome => self.operating_income = value,
            Metric::OrdinaryIncome => self.ordinary_income = value,
            Metric::NetIncome => self.net_income = value,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, &MetricValue)> + '_ {
        Metric::ALL.iter().map(move |&m| (m, self.get(m)))
    }
}

/// Ordered alias lists per canonical metric. Aliases are tried in order and
/// the first one producing a match wins, so consolidated/specific names must
/// precede generic ones. Filing vocabularies shift between fiscal years;
/// callers with period-specific taxonomies can swap lists in.
#[derive(Debug, Clone)]
pub struct AliasTable {
    aliases: HashMap<Metric, Vec<String>>,
}

impl AliasTable {
    pub fn aliases(&self, metric: Metric) -> &[String] {
        self.aliases.get(&metric).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set_aliases(&mut self, metric: Metric, aliases: Vec<String>) {
        self.aliases.insert(metric, aliases);
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        let mut aliases = HashMap::new();
        aliases.insert(
            Metric::NetSales,
            vec!["NetSales".to_string(), "SalesRevenue".to_string()],
        );
        aliases.insert(Metric::OperatingIncome, vec!["OperatingIncome".to_string()]);
        aliases.insert(Metric::OrdinaryIncome, vec!["OrdinaryIncome".to_string()]);
        aliases.insert(
            Metric::NetIncome,
            vec![
                "NetIncome".to_string(),
                "ProfitAttributableToOwnersOfParent".to_string(),
            ],
        );
        AliasTable { aliases }
    }
}
