//! Partition reduction.
//!
//! A partition reduces to a running numeric aggregate plus frequency tables
//! over the categorical columns. Reduction is a fold/merge pair: shards are
//! folded independently on worker threads and the shard summaries merged, and
//! merging is commutative, so shard boundaries never change the result.

use crate::schema::Reading;

use csv::StringRecord;
use hashbrown::HashMap;
use rayon::prelude::*;

/// How rows with a missing numeric value are treated.
#[derive(Clone, Copy, Debug)]
pub struct ReducePolicy {
    /// Count rows whose numeric value is missing in the frequency tables.
    /// When false those rows contribute to no table at all.
    pub count_missing_in_frequency: bool,
}

impl Default for ReducePolicy {
    fn default() -> Self {
        Self {
            count_missing_in_frequency: true,
        }
    }
}

/// Running aggregate over one partition.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summary {
    sum: f64,
    count: u64,
    pub parameter: HashMap<String, u64>,
    pub site_name: HashMap<String, u64>,
    pub site_agency: HashMap<String, u64>,
}

impl Summary {
    /// Fold one reading into the aggregate.
    fn observe(&mut self, reading: Reading, policy: ReducePolicy) {
        match reading.aqi {
            Some(aqi) => {
                self.sum += aqi;
                self.count += 1;
            }
            None if !policy.count_missing_in_frequency => return,
            None => {}
        }
        Self::tally(&mut self.parameter, reading.parameter);
        Self::tally(&mut self.site_name, reading.site_name);
        Self::tally(&mut self.site_agency, reading.site_agency);
    }

    fn tally(table: &mut HashMap<String, u64>, value: String) {
        *table.entry(value).or_insert(0) += 1;
    }

    /// Combine two aggregates. Commutative.
    pub fn merge(mut self, other: Summary) -> Summary {
        self.sum += other.sum;
        self.count += other.count;
        for (table, additions) in [
            (&mut self.parameter, other.parameter),
            (&mut self.site_name, other.site_name),
            (&mut self.site_agency, other.site_agency),
        ] {
            for (value, count) in additions {
                *table.entry(value).or_insert(0) += count;
            }
        }
        self
    }

    /// Mean of the numeric column, `0.0` for a partition with no valid
    /// values.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    /// Number of rows that contributed to the mean.
    pub fn count(&self) -> u64 {
        self.count
    }
}

/// Fold rows into a [Summary] sequentially.
pub fn fold_rows(rows: &[StringRecord], policy: ReducePolicy) -> Summary {
    let mut summary = Summary::default();
    for row in rows {
        summary.observe(Reading::from_record(row), policy);
    }
    summary
}

/// Reduce a whole partition's rows across the rayon pool.
pub fn reduce(rows: Vec<StringRecord>, policy: ReducePolicy) -> Summary {
    rows.into_par_iter()
        .fold(Summary::default, |mut summary, row| {
            summary.observe(Reading::from_record(&row), policy);
            summary
        })
        .reduce(Summary::default, Summary::merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::UNKNOWN_CATEGORY;

    fn record(aqi: &str, parameter: &str, site_name: &str, site_agency: &str) -> StringRecord {
        StringRecord::from(vec![
            "40.1",
            "-105.0",
            "2020-01-01T00:00",
            parameter,
            "12.0",
            "UG/M3",
            "12.0",
            aqi,
            "1",
            site_name,
            site_agency,
            "840MMFS10101",
            "840MMFS10101",
        ])
    }

    fn sample_rows() -> Vec<StringRecord> {
        let mut rows = Vec::new();
        for i in 0..100 {
            let aqi = format!("{}", i % 10);
            let site = format!("Site {}", i % 3);
            rows.push(record(&aqi, "PM2.5", &site, "USFS"));
        }
        rows.push(record("-999", "OZONE", "", "USFS"));
        rows.push(record("n/a", "OZONE", "Boulder", ""));
        rows
    }

    #[test]
    fn sentinel_and_unparseable_values_are_excluded_from_the_mean() {
        let rows = vec![
            record("54", "PM2.5", "Boulder", "USFS"),
            record("-999", "PM2.5", "Boulder", "USFS"),
            record("n/a", "PM2.5", "Boulder", "USFS"),
            record("46", "PM2.5", "Boulder", "USFS"),
        ];

        let summary = fold_rows(&rows, ReducePolicy::default());

        assert_eq!(summary.count(), 2);
        assert_eq!(summary.mean(), 50.0);
        // Excluded rows still count in the frequency tables.
        assert_eq!(summary.parameter["PM2.5"], 4);
    }

    #[test]
    fn partition_with_no_valid_values_has_zero_mean() {
        let rows = vec![record("-999", "PM2.5", "Boulder", "USFS")];

        let summary = fold_rows(&rows, ReducePolicy::default());

        assert_eq!(summary.count(), 0);
        assert_eq!(summary.mean(), 0.0);
    }

    #[test]
    fn rows_with_missing_numerics_count_in_frequency_tables_by_default() {
        let rows = vec![
            record("-999", "OZONE", "", "USFS"),
            record("46", "PM2.5", "Boulder", "USFS"),
        ];

        let summary = fold_rows(&rows, ReducePolicy::default());

        assert_eq!(summary.parameter["OZONE"], 1);
        assert_eq!(summary.site_name[UNKNOWN_CATEGORY], 1);
        assert_eq!(summary.site_name["Boulder"], 1);
    }

    #[test]
    fn rows_with_missing_numerics_can_be_excluded_from_frequency_tables() {
        let rows = vec![
            record("-999", "OZONE", "Boulder", "USFS"),
            record("46", "PM2.5", "Boulder", "USFS"),
        ];
        let policy = ReducePolicy {
            count_missing_in_frequency: false,
        };

        let summary = fold_rows(&rows, policy);

        assert!(!summary.parameter.contains_key("OZONE"));
        assert_eq!(summary.site_name["Boulder"], 1);
        assert_eq!(summary.site_agency["USFS"], 1);
        // The policy never changes the mean.
        assert_eq!(summary.mean(), 46.0);
    }

    #[test]
    fn merge_is_commutative() {
        let rows = sample_rows();
        let (left, right) = rows.split_at(40);
        let a = fold_rows(left, ReducePolicy::default());
        let b = fold_rows(right, ReducePolicy::default());

        assert_eq!(a.clone().merge(b.clone()), b.merge(a));
    }

    #[test]
    fn shard_boundaries_do_not_change_the_result() {
        let rows = sample_rows();
        let whole = fold_rows(&rows, ReducePolicy::default());

        for shard_size in [1, 3, 7, rows.len()] {
            let sharded = rows
                .chunks(shard_size)
                .map(|shard| fold_rows(shard, ReducePolicy::default()))
                .fold(Summary::default(), Summary::merge);
            assert_eq!(sharded, whole);
        }
    }

    #[test]
    fn parallel_reduce_matches_sequential_fold() {
        let rows = sample_rows();
        let sequential = fold_rows(&rows, ReducePolicy::default());

        let parallel = reduce(rows, ReducePolicy::default());

        assert_eq!(parallel, sequential);
    }
}
