//! Chunked parallel search over the violations export.
//!
//! The export is too large to hold in memory, so it streams through in
//! fixed-size chunks: a blocking task reads the next chunk while worker tasks
//! filter the previous ones. Task permits bound how many chunks are in flight
//! at once. Gathering in submission order keeps hits in file order, and fee
//! enrichment joins once after the gather.

use crate::decoder::ChunkedRows;
use crate::error::SummaristError;
use crate::fees::FeeTable;
use crate::metrics::ROWS_PROCESSED;
use crate::models::MatchRecord;
use crate::resource_manager::ResourceManager;
use crate::schema::Violation;

use rayon::prelude::*;
use std::path::Path;
use tracing::{event, Level};

/// Return every violation recorded against `plate_number`, in file order,
/// enriched with fine amounts.
pub async fn run(
    file: &Path,
    plate_number: &str,
    chunk_size: usize,
    fees: &FeeTable,
    rm: &ResourceManager,
) -> Result<Vec<MatchRecord>, SummaristError> {
    let path = file.to_path_buf();
    let mut reader =
        tokio::task::spawn_blocking(move || ChunkedRows::open(&path, chunk_size)).await??;

    let mut handles = Vec::new();
    loop {
        // The permit covers the read as well as the filter, so at most
        // task_limit chunks are resident.
        let permit = rm.task().await?;
        let (returned, chunk) = tokio::task::spawn_blocking(move || {
            let mut reader = reader;
            let chunk = reader.next_chunk();
            (reader, chunk)
        })
        .await?;
        reader = returned;
        let chunk = match chunk? {
            Some(chunk) => chunk,
            None => break,
        };
        ROWS_PROCESSED
            .with_label_values(&["violations"])
            .inc_by(chunk.len() as u64);
        let plate = plate_number.to_string();
        handles.push(tokio_rayon::spawn(move || {
            let _permit = permit;
            chunk
                .into_par_iter()
                .filter(|violation| violation.plate_id == plate)
                .collect::<Vec<Violation>>()
        }));
    }

    // Awaiting in submission order keeps hits in file order.
    let mut matches = Vec::new();
    for handle in handles {
        matches.extend(handle.await);
    }
    event!(Level::DEBUG, hits = matches.len(), "plate search complete");

    Ok(matches
        .into_iter()
        .map(|violation| {
            let fee = fees.lookup(&violation.violation_code);
            MatchRecord::new(violation, fee)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    use std::path::PathBuf;

    fn search_fixture(rows: &[String]) -> (tempfile::TempDir, PathBuf, FeeTable) {
        let dir = tempfile::tempdir().unwrap();
        let mut contents = test_utils::VIOLATIONS_CSV_HEADER.to_string();
        for row in rows {
            contents.push_str(row);
        }
        let violations = test_utils::write_file(dir.path(), "violations.csv", &contents);
        let codes = test_utils::write_file(
            dir.path(),
            "codes.csv",
            &test_utils::violation_codes_csv(),
        );
        let fees = FeeTable::load(&codes).unwrap();
        (dir, violations, fees)
    }

    #[tokio::test]
    async fn finds_every_match_in_file_order() {
        let mut rows = Vec::new();
        for i in 0..10 {
            let plate = if i % 4 == 1 { "GXA1234" } else { "OTHER99" };
            rows.push(test_utils::violation_line(&format!("10000{i}"), plate, "21"));
        }
        let (_dir, violations, fees) = search_fixture(&rows);
        let rm = ResourceManager::new(Some(2));

        // The chunking must never change what is found or its order.
        for chunk_size in [1, 3, 4, 100] {
            let matches = run(&violations, "GXA1234", chunk_size, &fees, &rm)
                .await
                .unwrap();

            let summons: Vec<&str> = matches
                .iter()
                .map(|record| record.summons_number.as_str())
                .collect();
            assert_eq!(summons, ["100001", "100005", "100009"], "chunk_size {chunk_size}");
        }
    }

    #[tokio::test]
    async fn enriches_hits_with_fees() {
        let rows = vec![
            test_utils::violation_line("100000", "GXA1234", "21"),
            test_utils::violation_line("100001", "GXA1234", "86"),
        ];
        let (_dir, violations, fees) = search_fixture(&rows);
        let rm = ResourceManager::new(None);

        let matches = run(&violations, "GXA1234", 2_000_000, &fees, &rm)
            .await
            .unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].manhattan_fee, 65.0);
        assert_eq!(matches[0].other_areas_fee, 45.0);
        // Code 86 is absent from the reference table.
        assert_eq!(matches[1].manhattan_fee, 0.0);
        assert_eq!(matches[1].other_areas_fee, 0.0);
    }

    #[tokio::test]
    async fn plate_match_is_exact() {
        let rows = vec![
            test_utils::violation_line("100000", "GXA1234", "21"),
            test_utils::violation_line("100001", "gxa1234", "21"),
            test_utils::violation_line("100002", "GXA123", "21"),
        ];
        let (_dir, violations, fees) = search_fixture(&rows);
        let rm = ResourceManager::new(None);

        let matches = run(&violations, "GXA1234", 2, &fees, &rm).await.unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].summons_number, "100000");
    }

    #[tokio::test]
    async fn no_matches_is_an_empty_list() {
        let rows = vec![test_utils::violation_line("100000", "OTHER99", "21")];
        let (_dir, violations, fees) = search_fixture(&rows);
        let rm = ResourceManager::new(None);

        let matches = run(&violations, "GXA1234", 2, &fees, &rm).await.unwrap();

        assert!(matches.is_empty());
    }
}
