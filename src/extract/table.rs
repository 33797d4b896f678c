//! Key/value condition table embedded in every listing

use scraper::{ElementRef, Selector};

use super::element_text;

/// Ordered (key-label, value-label) pairs read from one listing's table
///
/// Keys and values are paired positionally: the Nth key cell goes with the
/// Nth value cell. Surplus cells on either side are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValueTable {
    rows: Vec<(String, String)>,
}

impl KeyValueTable {
    /// Builds a table from already-read pairs
    pub fn from_rows<K, V>(rows: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Reads the key and value cells below `table`
    pub fn from_element(table: ElementRef<'_>, key: &Selector, value: &Selector) -> Self {
        let keys = table.select(key).map(element_text);
        let values = table.select(value).map(element_text);
        Self {
            rows: keys.zip(values).collect(),
        }
    }

    /// Returns the value of the first row whose key equals `label` exactly
    pub fn lookup(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(key, _)| key == label)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
