//! Record table: the best scores, kept in a JSON file between runs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::types::{RecordStandings, RECORD_TABLE_LEN};

/// Best scores, highest first, always [`RECORD_TABLE_LEN`] entries long
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTable {
    entries: Vec<u64>,
}

impl Default for RecordTable {
    fn default() -> Self {
        Self {
            entries: vec![0; RECORD_TABLE_LEN],
        }
    }
}

impl RecordTable {
    /// Build a table from arbitrary scores: sorted, then padded or cut to length.
    pub fn from_scores(mut scores: Vec<u64>) -> Self {
        scores.sort_unstable_by(|a, b| b.cmp(a));
        scores.resize(RECORD_TABLE_LEN, 0);
        Self { entries: scores }
    }

    pub fn entries(&self) -> &[u64] {
        &self.entries
    }

    /// Row a score would take: below every entry that is at least as high.
    fn rank(&self, score: u64) -> Option<usize> {
        let rank = self.entries.iter().take_while(|&&entry| entry >= score).count();
        (rank < RECORD_TABLE_LEN).then_some(rank)
    }

    /// The table as it would look if the running game ended now.
    pub fn standings(&self, live_score: u64) -> RecordStandings {
        let mut entries = self.entries.clone();
        let live = self.rank(live_score);
        if let Some(rank) = live {
            entries.insert(rank, live_score);
            entries.truncate(RECORD_TABLE_LEN);
        }
        RecordStandings { entries, live }
    }

    /// Fold a finished game in. Returns its row if it made the table.
    pub fn commit(&mut self, score: u64) -> Option<usize> {
        let rank = self.rank(score)?;
        self.entries.insert(rank, score);
        self.entries.truncate(RECORD_TABLE_LEN);
        Some(rank)
    }
}

/// A record table bound to the file it was loaded from
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    table: RecordTable,
}

impl RecordStore {
    /// Load the table at `path`.
    ///
    /// A missing file gives an empty table. So does an unreadable or malformed
    /// one, after a warning; the file is replaced on the next save.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let table = match Self::read(&path) {
            Ok(Some(table)) => table,
            Ok(None) => RecordTable::default(),
            Err(err) => {
                warn!("ignoring record table {}: {:#}", path.display(), err);
                RecordTable::default()
            }
        };
        Self { path, table }
    }

    fn read(path: &Path) -> Result<Option<RecordTable>> {
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let table: RecordTable =
            serde_json::from_str(&json).context("record table is not valid JSON")?;
        Ok(Some(RecordTable::from_scores(table.entries)))
    }

    pub fn standings(&self, live_score: u64) -> RecordStandings {
        self.table.standings(live_score)
    }

    pub fn commit(&mut self, score: u64) -> Option<usize> {
        let rank = self.table.commit(score);
        if let Some(rank) = rank {
            info!("score {} entered the record table at #{}", score, rank + 1);
        }
        rank
    }

    /// Write the table back, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(&self.table)?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(scores: &[u64]) -> RecordTable {
        RecordTable::from_scores(scores.to_vec())
    }

    #[test]
    fn from_scores_sorts_and_pads() {
        let t = table(&[5, 40, 12]);
        assert_eq!(t.entries(), &[40, 12, 5, 0, 0, 0, 0, 0]);

        let t = table(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(t.entries(), &[10, 9, 8, 7, 6, 5, 4, 3]);
    }

    #[test]
    fn live_score_goes_below_equal_entries() {
        let t = table(&[50, 30, 30, 10]);
        let standings = t.standings(30);
        assert_eq!(standings.live, Some(3));
        assert_eq!(standings.entries, vec![50, 30, 30, 30, 10, 0, 0, 0]);
    }

    #[test]
    fn zero_score_does_not_enter_a_full_zero_table() {
        let t = RecordTable::default();
        let standings = t.standings(0);
        assert_eq!(standings.live, None);
        assert_eq!(standings.entries, vec![0; RECORD_TABLE_LEN]);
    }

    #[test]
    fn commit_drops_the_lowest_entry() {
        let mut t = table(&[80, 70, 60, 50, 40, 30, 20, 10]);
        assert_eq!(t.commit(55), Some(3));
        assert_eq!(t.entries(), &[80, 70, 60, 55, 50, 40, 30, 20]);
        assert_eq!(t.commit(5), None);
    }
}
