//! Merging per-source tables into the combined corpus table.
//!
//! Concatenation preserves source order, then insertion order within each
//! source. Rewriting `sample_id` to the global `UNIFIED_NNNNNN` scheme is
//! the only mutation ever applied to a previously written record.

use crate::metadata::{DiseaseLabel, Source, SourceTable, UnifiedMetadataRecord};
use tracing::info;

/// The merged corpus table, terminal artifact of the pipeline.
#[derive(Debug, Clone)]
pub struct CombinedTable {
    /// All records, globally re-identified.
    pub records: Vec<UnifiedMetadataRecord>,
}

/// Aggregate counts over a combined table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    /// Total record count.
    pub total: usize,
    /// Record count per source, in pipeline order.
    pub per_source: Vec<(Source, usize)>,
    /// Record count per disease label, in vocabulary order, zero counts
    /// omitted.
    pub per_disease: Vec<(DiseaseLabel, usize)>,
    /// Record count per severity level among COPD-labeled records,
    /// ascending by level.
    pub copd_severity: Vec<(i32, usize)>,
}

/// Globally unique id for the record at `index` in the combined table.
pub fn unified_id(index: usize) -> String {
    format!("UNIFIED_{index:06}")
}

/// Concatenate source tables and rewrite sample ids to the global scheme.
pub fn merge(tables: &[SourceTable]) -> CombinedTable {
    let mut records: Vec<UnifiedMetadataRecord> = tables
        .iter()
        .flat_map(|table| table.records.iter().cloned())
        .collect();

    for (index, record) in records.iter_mut().enumerate() {
        record.sample_id = unified_id(index);
    }

    CombinedTable { records }
}

impl CombinedTable {
    /// Compute aggregate statistics over the table.
    pub fn summary(&self) -> MergeSummary {
        let per_source = Source::ALL
            .iter()
            .map(|&source| {
                let count = self
                    .records
                    .iter()
                    .filter(|r| r.source_dataset == source)
                    .count();
                (source, count)
            })
            .collect();

        let per_disease = DiseaseLabel::ALL
            .iter()
            .filter_map(|&label| {
                let count = self
                    .records
                    .iter()
                    .filter(|r| r.disease_label == label)
                    .count();
                (count > 0).then_some((label, count))
            })
            .collect();

        let mut severity_counts = std::collections::BTreeMap::new();
        for record in &self.records {
            if record.disease_label == DiseaseLabel::Copd {
                *severity_counts.entry(record.severity_level).or_insert(0) += 1;
            }
        }

        MergeSummary {
            total: self.records.len(),
            per_source,
            per_disease,
            copd_severity: severity_counts.into_iter().collect(),
        }
    }
}

impl MergeSummary {
    /// Log the summary in a human-readable form.
    pub fn log(&self) {
        info!("total samples: {}", self.total);
        for (source, count) in &self.per_source {
            info!("  {source}: {count}");
        }
        info!("disease distribution:");
        for (label, count) in &self.per_disease {
            info!("  {label}: {count}");
        }
        if !self.copd_severity.is_empty() {
            info!("COPD severity distribution:");
            for (level, count) in &self.copd_severity {
                info!("  level {level}: {count}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(source: Source, id: u32, label: DiseaseLabel, severity: i32) -> UnifiedMetadataRecord {
        UnifiedMetadataRecord {
            sample_id: source.sample_id(id),
            patient_id: format!("{}_{id}", source.name()),
            source_dataset: source,
            filepath: format!("audio/{}", source.audio_filename(id)),
            disease_label: label,
            age: -1,
            sex: "Other".to_string(),
            chest_location: "Unknown".to_string(),
            recording_device: "Unknown".to_string(),
            severity_level: severity,
            original_label: label.as_str().to_string(),
        }
    }

    fn table(source: Source, rows: usize) -> SourceTable {
        let mut table = SourceTable::new(source);
        for i in 0..rows {
            #[allow(clippy::cast_possible_truncation)]
            table
                .records
                .push(record(source, i as u32 + 1, DiseaseLabel::Normal, -1));
        }
        table
    }

    #[test]
    fn test_merge_rewrites_ids_contiguously() {
        let tables = [
            table(Source::Icbhi, 3),
            table(Source::Kaggle, 2),
            table(Source::RespTr, 4),
        ];
        let combined = merge(&tables);

        assert_eq!(combined.records.len(), 9);
        for (i, record) in combined.records.iter().enumerate() {
            assert_eq!(record.sample_id, format!("UNIFIED_{i:06}"));
        }
        assert_eq!(combined.records[0].sample_id, "UNIFIED_000000");
        assert_eq!(combined.records[8].sample_id, "UNIFIED_000008");
    }

    #[test]
    fn test_merge_preserves_source_then_insertion_order() {
        let tables = [
            table(Source::Icbhi, 2),
            table(Source::Kaggle, 1),
            table(Source::RespTr, 1),
        ];
        let combined = merge(&tables);

        let sources: Vec<Source> = combined.records.iter().map(|r| r.source_dataset).collect();
        assert_eq!(
            sources,
            [Source::Icbhi, Source::Icbhi, Source::Kaggle, Source::RespTr]
        );
        // Within-source order intact: patient ids still ascending
        assert_eq!(combined.records[0].patient_id, "ICBHI_1");
        assert_eq!(combined.records[1].patient_id, "ICBHI_2");
    }

    #[test]
    fn test_merge_only_mutates_sample_id() {
        let tables = [table(Source::Icbhi, 1)];
        let original = tables[0].records[0].clone();
        let combined = merge(&tables);

        let merged = &combined.records[0];
        assert_ne!(merged.sample_id, original.sample_id);
        assert_eq!(merged.patient_id, original.patient_id);
        assert_eq!(merged.filepath, original.filepath);
        assert_eq!(merged.disease_label, original.disease_label);
        assert_eq!(merged.original_label, original.original_label);
    }

    #[test]
    fn test_merge_empty_tables() {
        let combined = merge(&[
            SourceTable::new(Source::Icbhi),
            SourceTable::new(Source::Kaggle),
        ]);
        assert!(combined.records.is_empty());
        assert_eq!(combined.summary().total, 0);
    }

    #[test]
    fn test_summary_counts() {
        let mut icbhi = SourceTable::new(Source::Icbhi);
        icbhi
            .records
            .push(record(Source::Icbhi, 1, DiseaseLabel::Copd, 2));
        icbhi
            .records
            .push(record(Source::Icbhi, 2, DiseaseLabel::Normal, -1));

        let mut resp_tr = SourceTable::new(Source::RespTr);
        resp_tr
            .records
            .push(record(Source::RespTr, 1, DiseaseLabel::Copd, 2));
        resp_tr
            .records
            .push(record(Source::RespTr, 2, DiseaseLabel::Copd, 4));
        resp_tr
            .records
            .push(record(Source::RespTr, 3, DiseaseLabel::Other, -1));

        let summary = merge(&[icbhi, resp_tr]).summary();

        assert_eq!(summary.total, 5);
        assert_eq!(
            summary.per_source,
            vec![(Source::Icbhi, 2), (Source::Kaggle, 0), (Source::RespTr, 3)]
        );
        assert_eq!(
            summary.per_disease,
            vec![
                (DiseaseLabel::Copd, 3),
                (DiseaseLabel::Normal, 1),
                (DiseaseLabel::Other, 1),
            ]
        );
        assert_eq!(summary.copd_severity, vec![(2, 2), (4, 1)]);
    }

    #[test]
    fn test_unified_id_zero_padding() {
        assert_eq!(unified_id(0), "UNIFIED_000000");
        assert_eq!(unified_id(42), "UNIFIED_000042");
        assert_eq!(unified_id(1_000_000), "UNIFIED_1000000");
    }
}
