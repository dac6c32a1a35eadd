use std::collections::BTreeMap;

use super::error::ViewError;
use super::model::{AdRecord, CellValue, Dataset};
use super::{ATTRIBUTE_COLUMNS, CLUSTER_COLUMN, PAGENAME_COLUMN};

/// Upper bound on the cluster-peer strip: the first 6 matches in row order.
pub const MAX_CLUSTER_PEERS: usize = 6;

// ---------------------------------------------------------------------------
// Distribution table (pivot of counts by brand × cluster)
// ---------------------------------------------------------------------------

/// One brand row of the distribution table; `counts` is parallel to
/// [`DistributionTable::clusters`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionRow {
    pub brand: String,
    pub counts: Vec<usize>,
    pub total: usize,
}

/// Cross-tabulation of ad counts per (brand, cluster), with a trailing
/// "Total" column, sorted by total descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionTable {
    /// Distinct cluster values, ascending; one count column each.
    pub clusters: Vec<CellValue>,
    pub rows: Vec<DistributionRow>,
}

impl DistributionTable {
    /// Header labels: `Cluster {id}` per cluster column, then `Total`.
    pub fn column_labels(&self) -> Vec<String> {
        self.clusters
            .iter()
            .map(|c| format!("Cluster {c}"))
            .chain(std::iter::once("Total".to_string()))
            .collect()
    }
}

/// Count ads per (brand, cluster) pair. Cells with no ads are 0, never
/// absent. Rows are sorted by total descending; the sort is stable, so
/// ties keep first-appearance order (tie order is otherwise unspecified).
pub fn cluster_distribution(dataset: &Dataset) -> Result<DistributionTable, ViewError> {
    for column in [PAGENAME_COLUMN, CLUSTER_COLUMN] {
        if !dataset.unique_values.contains_key(column) {
            return Err(ViewError::schema(column));
        }
    }

    let clusters: Vec<CellValue> = dataset.unique_values[CLUSTER_COLUMN]
        .iter()
        .cloned()
        .collect();
    let cluster_index: BTreeMap<&CellValue, usize> =
        clusters.iter().enumerate().map(|(i, c)| (c, i)).collect();

    // Brand rows in first-appearance order, counts zero-filled.
    let mut rows: Vec<DistributionRow> = Vec::new();
    let mut row_index: BTreeMap<String, usize> = BTreeMap::new();

    for ad in &dataset.ads {
        let brand = ad
            .field(PAGENAME_COLUMN)
            .unwrap_or(&CellValue::Null)
            .to_string();
        let idx = match row_index.get(&brand).copied() {
            Some(i) => i,
            None => {
                row_index.insert(brand.clone(), rows.len());
                rows.push(DistributionRow {
                    brand,
                    counts: vec![0; clusters.len()],
                    total: 0,
                });
                rows.len() - 1
            }
        };
        let row = &mut rows[idx];
        if let Some(cluster) = ad.field(CLUSTER_COLUMN) {
            if let Some(&col) = cluster_index.get(cluster) {
                row.counts[col] += 1;
                row.total += 1;
            }
        }
    }

    rows.sort_by(|a, b| b.total.cmp(&a.total));

    Ok(DistributionTable { clusters, rows })
}

// ---------------------------------------------------------------------------
// Brand view
// ---------------------------------------------------------------------------

/// All ads of one brand, in dataset row order. Display-layer truncation
/// ("first 4") stays in the UI; callers can `.take(n)` on top.
pub fn brand_rows<'a>(dataset: &'a Dataset, brand: &str) -> Vec<&'a AdRecord> {
    dataset
        .ads
        .iter()
        .filter(|ad| {
            ad.field(PAGENAME_COLUMN)
                .is_some_and(|v| v.to_string() == brand)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Cluster peers
// ---------------------------------------------------------------------------

/// Up to [`MAX_CLUSTER_PEERS`] other ads sharing the selected ad's
/// cluster, in dataset row order, never including the selected ad itself.
pub fn cluster_peers<'a>(
    dataset: &'a Dataset,
    selected: &AdRecord,
) -> Result<Vec<&'a AdRecord>, ViewError> {
    if !dataset.unique_values.contains_key(CLUSTER_COLUMN) {
        return Err(ViewError::schema(CLUSTER_COLUMN));
    }
    let Some(cluster) = selected.field(CLUSTER_COLUMN) else {
        return Ok(Vec::new());
    };

    Ok(dataset
        .ads
        .iter()
        .filter(|ad| ad.ad_id != selected.ad_id && ad.field(CLUSTER_COLUMN) == Some(cluster))
        .take(MAX_CLUSTER_PEERS)
        .collect())
}

// ---------------------------------------------------------------------------
// Attribute lookup
// ---------------------------------------------------------------------------

/// The fixed attribute table for one selected ad, in display order.
///
/// Missing attributes are collected and reported all at once, not
/// fail-fast on the first.
pub fn attribute_rows(ad: &AdRecord) -> Result<Vec<(&'static str, CellValue)>, ViewError> {
    let missing: Vec<String> = ATTRIBUTE_COLUMNS
        .iter()
        .filter(|col| ad.field(col).is_none())
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ViewError::MissingAttributes { missing });
    }

    Ok(ATTRIBUTE_COLUMNS
        .iter()
        .map(|&col| (col, ad.field(col).cloned().unwrap_or(CellValue::Null)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn ad(id: &str, brand: &str, cluster: i64) -> AdRecord {
        AdRecord {
            ad_id: id.to_string(),
            image_path: PathBuf::from(format!("{id}.png")),
            fields: BTreeMap::from([
                (
                    PAGENAME_COLUMN.to_string(),
                    CellValue::String(brand.to_string()),
                ),
                (CLUSTER_COLUMN.to_string(), CellValue::Integer(cluster)),
            ]),
        }
    }

    fn sample() -> Dataset {
        Dataset::from_ads(vec![ad("1", "A", 0), ad("2", "A", 0), ad("3", "B", 1)])
    }

    #[test]
    fn distribution_counts_and_labels() {
        let ds = sample();
        let table = cluster_distribution(&ds).unwrap();

        assert_eq!(
            table.column_labels(),
            vec!["Cluster 0", "Cluster 1", "Total"]
        );
        assert_eq!(table.rows.len(), 2);
        // Brand A first (total 2), zero-filled cell for cluster 1.
        assert_eq!(table.rows[0].brand, "A");
        assert_eq!(table.rows[0].counts, vec![2, 0]);
        assert_eq!(table.rows[0].total, 2);
        assert_eq!(table.rows[1].brand, "B");
        assert_eq!(table.rows[1].counts, vec![0, 1]);
        assert_eq!(table.rows[1].total, 1);
    }

    #[test]
    fn distribution_totals_are_consistent() {
        let ds = Dataset::from_ads(vec![
            ad("1", "A", 0),
            ad("2", "A", 2),
            ad("3", "B", 1),
            ad("4", "C", 1),
            ad("5", "C", 2),
            ad("6", "C", 2),
        ]);
        let table = cluster_distribution(&ds).unwrap();

        let mut grand_total = 0;
        for row in &table.rows {
            assert_eq!(row.counts.iter().sum::<usize>(), row.total);
            grand_total += row.total;
        }
        assert_eq!(grand_total, ds.len());

        // Sorted by total descending.
        for pair in table.rows.windows(2) {
            assert!(pair[0].total >= pair[1].total);
        }
    }

    #[test]
    fn distribution_requires_brand_and_cluster_columns() {
        let no_cluster = Dataset::from_ads(vec![AdRecord {
            ad_id: "1".into(),
            image_path: PathBuf::from("1.png"),
            fields: BTreeMap::from([(
                PAGENAME_COLUMN.to_string(),
                CellValue::String("A".into()),
            )]),
        }]);
        assert_eq!(
            cluster_distribution(&no_cluster).unwrap_err(),
            ViewError::schema(CLUSTER_COLUMN)
        );
    }

    #[test]
    fn brand_rows_returns_all_matches_in_order() {
        let ds = sample();
        let rows = brand_rows(&ds, "A");
        let ids: Vec<&str> = rows.iter().map(|r| r.ad_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert!(brand_rows(&ds, "Nope").is_empty());
    }

    #[test]
    fn cluster_peers_excludes_self() {
        let ds = sample();
        let selected = ds.ad("1").unwrap();
        let peers = cluster_peers(&ds, selected).unwrap();
        let ids: Vec<&str> = peers.iter().map(|r| r.ad_id.as_str()).collect();
        assert_eq!(ids, vec!["2"]);
    }

    #[test]
    fn cluster_peers_is_bounded() {
        let ads: Vec<AdRecord> = (0..10).map(|i| ad(&i.to_string(), "A", 5)).collect();
        let ds = Dataset::from_ads(ads);
        let selected = ds.ad("0").unwrap();
        let peers = cluster_peers(&ds, selected).unwrap();

        assert_eq!(peers.len(), MAX_CLUSTER_PEERS);
        assert!(peers.iter().all(|p| p.ad_id != "0"));
        // Natural row order, first matches win.
        assert_eq!(peers[0].ad_id, "1");
    }

    #[test]
    fn cluster_peers_needs_cluster_column() {
        let ds = Dataset::from_ads(vec![AdRecord {
            ad_id: "1".into(),
            image_path: PathBuf::from("1.png"),
            fields: BTreeMap::new(),
        }]);
        let selected = ds.ad("1").unwrap();
        assert_eq!(
            cluster_peers(&ds, selected).unwrap_err(),
            ViewError::schema(CLUSTER_COLUMN)
        );
    }

    #[test]
    fn attribute_rows_are_fixed_and_ordered() {
        let mut record = ad("1", "A", 3);
        record
            .fields
            .insert("tier".to_string(), CellValue::String("gold".into()));
        record.fields.insert(
            "dominant_background_colour".to_string(),
            CellValue::String("red".into()),
        );
        record
            .fields
            .insert("logo_present".to_string(), CellValue::Bool(true));

        let rows = attribute_rows(&record).unwrap();
        let names: Vec<&str> = rows.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "pagename",
                "dominant_background_colour",
                "logo_present",
                "cluster",
                "tier"
            ]
        );
        assert_eq!(rows[2].1, CellValue::Bool(true));
    }

    #[test]
    fn attribute_lookup_reports_all_missing_at_once() {
        let record = ad("1", "A", 3);
        let err = attribute_rows(&record).unwrap_err();
        match err {
            ViewError::MissingAttributes { missing } => {
                assert_eq!(
                    missing,
                    vec![
                        "dominant_background_colour".to_string(),
                        "logo_present".to_string(),
                        "tier".to_string()
                    ]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
