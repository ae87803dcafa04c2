//! Append and query operations over the JSON Lines log

use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::entry::{AuditFilter, AuditLogEntry, AuditStats, LogPage};
use crate::error::Result;

/// Append-only audit log backed by one JSON Lines file.
///
/// Appends are serialized through a mutex and written as a single call,
/// so concurrent writers never interleave partial lines. Queries re-read
/// the file and may lag an in-flight append.
pub struct AuditLogService {
    log_path: PathBuf,
    write_lock: Mutex<()>,
}

impl AuditLogService {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Append one entry as one line.
    pub async fn append(&self, entry: &AuditLogEntry) -> Result<()> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(
            "Audit: {} on {} by {} (success={})",
            entry.action,
            entry.resource_id,
            entry.actor,
            entry.success
        );
        Ok(())
    }

    /// Filtered, paginated query, newest first. `page` is 1-indexed and
    /// `total` counts all matches before pagination. Callers are expected
    /// to clamp `page_size` at their own boundary.
    pub async fn get_logs(
        &self,
        filter: &AuditFilter,
        page: usize,
        page_size: usize,
    ) -> Result<LogPage> {
        let mut entries: Vec<AuditLogEntry> = self
            .read_all()
            .await?
            .into_iter()
            .filter(|entry| filter.matches(entry))
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let total = entries.len();
        let page = page.max(1);
        let start = (page - 1).saturating_mul(page_size);
        let entries: Vec<AuditLogEntry> =
            entries.into_iter().skip(start).take(page_size).collect();

        Ok(LogPage {
            entries,
            total,
            page,
            page_size,
        })
    }

    /// The newest `limit` entries.
    pub async fn get_recent(&self, limit: usize) -> Result<Vec<AuditLogEntry>> {
        Ok(self
            .get_logs(&AuditFilter::default(), 1, limit)
            .await?
            .entries)
    }

    /// Full-scan frequency tables.
    pub async fn get_stats(&self) -> Result<AuditStats> {
        let mut stats = AuditStats::default();
        for entry in self.read_all().await? {
            stats.total += 1;
            if entry.success {
                stats.successful += 1;
            } else {
                stats.failed += 1;
            }
            *stats
                .counts_by_provider
                .entry(entry.provider.clone())
                .or_default() += 1;
            *stats.counts_by_action.entry(entry.action).or_default() += 1;
        }
        Ok(stats)
    }

    // Malformed lines are skipped with a warning; the rest of the log is
    // still useful.
    async fn read_all(&self) -> Result<Vec<AuditLogEntry>> {
        let text = match fs::read_to_string(&self.log_path).await {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut entries = Vec::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<AuditLogEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    tracing::warn!("Skipping malformed audit line {}: {}", number + 1, err);
                }
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn service_in(dir: &tempfile::TempDir) -> AuditLogService {
        AuditLogService::new(dir.path().join("audit.jsonl"))
    }

    async fn seed(service: &AuditLogService, count: usize) {
        // Spread timestamps so descending order is observable.
        for i in 0..count {
            let mut entry = AuditLogEntry::new(
                format!("user-{}", i % 3),
                if i % 2 == 0 { "start" } else { "stop" },
                format!("aws-{i}"),
                if i % 2 == 0 { "aws" } else { "gcp" },
                i % 4 != 0,
            );
            entry.timestamp = Utc::now() - Duration::seconds((count - i) as i64);
            service.append(&entry).await.unwrap();
        }
    }

    #[tokio::test]
    async fn append_then_query_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(&dir);

        let entry = AuditLogEntry::new("alice", "create_infrastructure", "infra-1", "azure", true);
        service.append(&entry).await.unwrap();

        let recent = service.get_recent(10).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].actor, "alice");
        assert_eq!(recent[0].provider, "azure");
    }

    #[tokio::test]
    async fn missing_log_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(&dir);

        let page = service.get_logs(&AuditFilter::default(), 1, 10).await.unwrap();
        assert_eq!(page.total, 0);
        assert!(page.entries.is_empty());
        assert_eq!(service.get_stats().await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn query_filters_sort_and_count_before_pagination() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(&dir);
        seed(&service, 10).await;

        let filter = AuditFilter {
            provider: Some("aws".to_string()),
            ..Default::default()
        };
        let page = service.get_logs(&filter, 1, 3).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.entries.len(), 3);
        assert!(page
            .entries
            .windows(2)
            .all(|pair| pair[0].timestamp >= pair[1].timestamp));
    }

    #[tokio::test]
    async fn pages_reconstruct_the_filtered_set_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(&dir);
        seed(&service, 10).await;

        let mut seen = Vec::new();
        for page in 1..=4 {
            let result = service
                .get_logs(&AuditFilter::default(), page, 3)
                .await
                .unwrap();
            assert_eq!(result.total, 10);
            seen.extend(result.entries.into_iter().map(|e| e.resource_id));
        }
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 10);
    }

    #[tokio::test]
    async fn malformed_lines_are_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(&dir);
        seed(&service, 3).await;

        let mut raw = tokio::fs::read_to_string(service.path()).await.unwrap();
        raw.push_str("{this is not json}\n");
        tokio::fs::write(service.path(), raw).await.unwrap();

        let stats = service.get_stats().await.unwrap();
        assert_eq!(stats.total, 3);
    }

    #[tokio::test]
    async fn stats_tally_outcomes_providers_and_actions() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(&dir);
        seed(&service, 8).await;

        let stats = service.get_stats().await.unwrap();
        assert_eq!(stats.total, 8);
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.successful, 6);
        assert_eq!(stats.counts_by_provider["aws"], 4);
        assert_eq!(stats.counts_by_provider["gcp"], 4);
        assert_eq!(stats.counts_by_action["start"], 4);
        assert_eq!(stats.counts_by_action["stop"], 4);
    }

    #[tokio::test]
    async fn recent_returns_the_newest_entries_first() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(&dir);
        seed(&service, 6).await;

        let recent = service.get_recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        // seed() gives the highest index the newest timestamp
        assert_eq!(recent[0].resource_id, "aws-5");
        assert_eq!(recent[1].resource_id, "aws-4");
    }
}
