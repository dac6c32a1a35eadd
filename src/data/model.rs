use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CellValue – a single cell in a metadata column
// ---------------------------------------------------------------------------

/// A dynamically-typed metadata cell.
/// Using `BTreeMap` / `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

/// Guess the type of a raw CSV cell: int → float → bool → string.
pub fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// AdRecord – one row of the joined table
// ---------------------------------------------------------------------------

/// A single ad (one CSV row joined with its uploaded image).
#[derive(Debug, Clone)]
pub struct AdRecord {
    /// Raw `ad_id` text from the CSV; unique key within a dataset.
    pub ad_id: String,
    /// Resolved location of `{ad_id}.png` in the session upload store.
    pub image_path: PathBuf,
    /// Remaining metadata columns: column_name → value.
    pub fields: BTreeMap<String, CellValue>,
}

impl AdRecord {
    /// Value of a metadata column, if the CSV had it.
    pub fn field(&self, column: &str) -> Option<&CellValue> {
        self.fields.get(column)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete joined table
// ---------------------------------------------------------------------------

/// The joined dataset with pre-computed column indices.
///
/// Rebuilt from scratch on every upload event; never mutated in place.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All ads (rows), in CSV order.
    pub ads: Vec<AdRecord>,
    /// Ordered list of metadata column names (excludes `ad_id`).
    pub column_names: Vec<String>,
    /// For each metadata column the sorted set of unique values.
    pub unique_values: BTreeMap<String, BTreeSet<CellValue>>,
}

impl Dataset {
    /// Build column indices from the joined rows.
    pub fn from_ads(ads: Vec<AdRecord>) -> Self {
        let mut column_names_set: BTreeSet<String> = BTreeSet::new();
        let mut unique_values: BTreeMap<String, BTreeSet<CellValue>> = BTreeMap::new();

        for ad in &ads {
            for (col, val) in &ad.fields {
                column_names_set.insert(col.clone());
                unique_values
                    .entry(col.clone())
                    .or_default()
                    .insert(val.clone());
            }
        }
        let column_names: Vec<String> = column_names_set.into_iter().collect();
        Dataset {
            ads,
            column_names,
            unique_values,
        }
    }

    /// Number of ads.
    pub fn len(&self) -> usize {
        self.ads.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.ads.is_empty()
    }

    /// Look up an ad by its id.
    pub fn ad(&self, ad_id: &str) -> Option<&AdRecord> {
        self.ads.iter().find(|a| a.ad_id == ad_id)
    }

    /// Sorted distinct brand names (`pagename` column), for presentation.
    pub fn brands(&self) -> Vec<String> {
        self.unique_values
            .get(super::PAGENAME_COLUMN)
            .map(|vals| vals.iter().map(|v| v.to_string()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_type_guessing() {
        assert_eq!(guess_cell_type("42"), CellValue::Integer(42));
        assert_eq!(guess_cell_type("1.5"), CellValue::Float(1.5));
        assert_eq!(guess_cell_type("true"), CellValue::Bool(true));
        assert_eq!(guess_cell_type("Nike"), CellValue::String("Nike".into()));
        assert_eq!(guess_cell_type(""), CellValue::Null);
    }

    #[test]
    fn brands_are_sorted_and_distinct() {
        let mk = |id: &str, brand: &str| AdRecord {
            ad_id: id.to_string(),
            image_path: PathBuf::from(format!("{id}.png")),
            fields: BTreeMap::from([(
                "pagename".to_string(),
                CellValue::String(brand.to_string()),
            )]),
        };
        let ds = Dataset::from_ads(vec![mk("1", "Puma"), mk("2", "Adidas"), mk("3", "Puma")]);
        assert_eq!(ds.brands(), vec!["Adidas".to_string(), "Puma".to_string()]);
    }
}
