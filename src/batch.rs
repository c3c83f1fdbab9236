//! Batch orchestration over date partitions.
//!
//! Each partition in the requested range is reduced by its own task on the
//! rayon pool, bounded by the resource manager's task permits. Results gather
//! into a map keyed by partition name, and the first failure fails the whole
//! batch.

use crate::decoder;
use crate::error::SummaristError;
use crate::locator;
use crate::metrics::ROWS_PROCESSED;
use crate::models::PartitionSummary;
use crate::reducer::{self, ReducePolicy, Summary};
use crate::resource_manager::ResourceManager;
use crate::schema::AIR_QUALITY_HEADERS;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::sync::OwnedSemaphorePermit;
use tracing::{event, Level};

/// Reduce every partition with a date token in `[start_date, end_date]`.
///
/// `Ok(None)` means no partition matched the range.
pub async fn run(
    data_dir: &Path,
    start_date: &str,
    end_date: &str,
    policy: ReducePolicy,
    rm: &ResourceManager,
) -> Result<Option<BTreeMap<String, PartitionSummary>>, SummaristError> {
    let partitions = locator::locate_range(data_dir, start_date, end_date)?;
    if partitions.is_empty() {
        return Ok(None);
    }

    let mut handles = Vec::with_capacity(partitions.len());
    for (name, files) in partitions {
        // Waiting for the permit here bounds how many partitions are in
        // flight at once.
        let permit = rm.task().await?;
        handles.push(tokio::spawn(reduce_partition(name, files, policy, permit)));
    }

    let mut summaries = BTreeMap::new();
    for handle in handles {
        let (name, summary) = handle.await??;
        summaries.insert(name, summary);
    }
    Ok(Some(summaries))
}

/// Count the files and rows recorded for a single date.
///
/// Rows are decoded with the same column check as a reduction, so a malformed
/// file fails the inspection. `Ok(None)` means no folder matched the date.
pub async fn inspect(
    data_dir: &Path,
    date: &str,
    rm: &ResourceManager,
) -> Result<Option<(usize, usize)>, SummaristError> {
    let files = locator::locate_exact(data_dir, date)?;
    if files.is_empty() {
        return Ok(None);
    }
    let _permit = rm.task().await?;
    let file_count = files.len();
    let row_count = tokio_rayon::spawn(move || -> Result<usize, SummaristError> {
        let mut rows = 0;
        for file in &files {
            rows += decoder::read_rows(file, AIR_QUALITY_HEADERS.len())?.len();
        }
        Ok(rows)
    })
    .await?;
    Ok(Some((file_count, row_count)))
}

async fn reduce_partition(
    name: String,
    files: Vec<PathBuf>,
    policy: ReducePolicy,
    _permit: Option<OwnedSemaphorePermit>,
) -> Result<(String, PartitionSummary), SummaristError> {
    let (summary, time_taken) =
        tokio_rayon::spawn(move || -> Result<(Summary, f64), SummaristError> {
            let timer = Instant::now();
            let mut rows = Vec::new();
            for file in &files {
                rows.extend(decoder::read_rows(file, AIR_QUALITY_HEADERS.len())?);
            }
            ROWS_PROCESSED
                .with_label_values(&["fires"])
                .inc_by(rows.len() as u64);
            let summary = reducer::reduce(rows, policy);
            Ok((summary, timer.elapsed().as_secs_f64()))
        })
        .await?;
    event!(Level::DEBUG, partition = %name, time_taken, "partition reduced");
    Ok((name, PartitionSummary::new(time_taken, summary)))
}
