//! Result store for the most recent analysis
//!
//! One slot, replaced whole on every successful analysis. Readers clone the
//! `Arc` out under a read lock, so a reader holds either the previous report
//! or the new one and never a mix of both.

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{AnalysisReport, Clause, RiskBucket};
use tokio::sync::RwLock;

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Replace the stored report. Concurrent puts are last-write-wins.
    async fn put(&self, report: AnalysisReport);

    /// The current report, or `None` before the first successful analysis.
    async fn snapshot(&self) -> Option<Arc<AnalysisReport>>;

    async fn summary(&self) -> Option<String> {
        self.snapshot().await.map(|r| r.summary.clone())
    }

    async fn clauses(&self) -> Option<Vec<Clause>> {
        self.snapshot().await.map(|r| r.clauses.clone())
    }

    async fn risk_buckets(&self) -> Option<Vec<RiskBucket>> {
        self.snapshot().await.map(|r| r.risk_buckets.clone())
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    slot: RwLock<Option<Arc<AnalysisReport>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalysisStore for InMemoryStore {
    async fn put(&self, report: AnalysisReport) {
        let report = Arc::new(report);
        *self.slot.write().await = Some(report);
    }

    async fn snapshot(&self) -> Option<Arc<AnalysisReport>> {
        self.slot.read().await.clone()
    }
}
