// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Restore session: one episode, one registry, one cancellation token.
//
// Owns the page registry and wires it to the orchestrator, the export queue
// and the observer. Hosts drive the whole pipeline through this type and tear
// it down when the page goes away.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use pagewerk_bridge::traits::{DownloadSink, PageObserver, PageSource};
use pagewerk_core::config::SessionConfig;
use pagewerk_core::error::Result;
use pagewerk_core::types::{BatchReport, ExportOutcome, ExportReport, PageRecord, SessionId};
use pagewerk_image::TileDescrambler;

use crate::cancel::CancellationToken;
use crate::export::ExportQueue;
use crate::extract::PageExtractor;
use crate::orchestrator::RestorationOrchestrator;
use crate::registry::{PageRegistry, PageSnapshot, StatusCounts};

/// A live restore session.
pub struct Session<S, K, O> {
    id: SessionId,
    started_at: DateTime<Utc>,
    config: SessionConfig,
    registry: PageRegistry,
    orchestrator: RestorationOrchestrator<S>,
    exporter: ExportQueue<K>,
    observer: O,
    cancel: CancellationToken,
}

impl<S, K, O> Session<S, K, O>
where
    S: PageSource,
    K: DownloadSink,
    O: PageObserver,
{
    /// Start a session over `records` with the standard descrambler.
    pub fn start(
        records: Vec<PageRecord>,
        source: S,
        sink: K,
        observer: O,
        config: SessionConfig,
    ) -> Result<Self> {
        let descrambler = Arc::new(TileDescrambler::standard()?);
        Self::with_descrambler(records, descrambler, source, sink, observer, config)
    }

    /// Start a session from a viewer page or bare episode JSON.
    pub fn from_episode(
        input: &str,
        source: S,
        sink: K,
        observer: O,
        config: SessionConfig,
    ) -> Result<Self> {
        let records = PageExtractor::new(&config.page_url_pattern)?.extract_any(input)?;
        Self::start(records, source, sink, observer, config)
    }

    /// Start a session with a custom descrambler (other page-size tables).
    pub fn with_descrambler(
        records: Vec<PageRecord>,
        descrambler: Arc<TileDescrambler>,
        source: S,
        sink: K,
        observer: O,
        config: SessionConfig,
    ) -> Result<Self> {
        let registry = PageRegistry::from_records(records)?;
        let cancel = CancellationToken::new();
        let orchestrator =
            RestorationOrchestrator::new(source, descrambler, cancel.clone(), &config);
        let exporter = ExportQueue::new(sink, cancel.clone(), &config);
        let id = SessionId::new();

        info!(session = %id, pages = registry.len(), "session started");
        Ok(Self {
            id,
            started_at: Utc::now(),
            config,
            registry,
            orchestrator,
            exporter,
            observer,
            cancel,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn registry(&self) -> &PageRegistry {
        &self.registry
    }

    pub fn snapshot(&self) -> Vec<PageSnapshot> {
        self.registry.snapshot()
    }

    pub fn counts(&self) -> StatusCounts {
        self.registry.counts()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn sink(&self) -> &K {
        self.exporter.sink()
    }

    /// Token clone for signal handlers and other tasks.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_torn_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    // -- Restoration ---------------------------------------------------------

    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn restore_page(&mut self, index: u32) -> Result<()> {
        self.orchestrator
            .restore_page(&mut self.registry, &self.observer, index)
            .await
    }

    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn restore_all(&mut self) -> Result<BatchReport> {
        self.orchestrator
            .restore_all(&mut self.registry, &self.observer)
            .await
    }

    // -- Export --------------------------------------------------------------

    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn export_page(&self, index: u32) -> Result<ExportOutcome> {
        self.exporter
            .export_page(&self.registry, &self.observer, index)
            .await
    }

    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn export_all(&self) -> Result<ExportReport> {
        self.exporter
            .export_all(&self.registry, &self.observer)
            .await
    }

    // -- Lifecycle -----------------------------------------------------------

    /// Clear the liveness flag and drop every page. Idempotent.
    pub fn teardown(&mut self) {
        self.cancel.cancel();
        self.registry.teardown();
        info!(session = %self.id, "session torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagewerk_core::error::PagewerkError;
    use pagewerk_core::types::PageStatus;

    use crate::testing::{MemorySink, MemorySource, RecordingObserver, records, small_descrambler};

    type TestSession = Session<MemorySource, MemorySink, RecordingObserver>;

    fn fast_config() -> SessionConfig {
        SessionConfig {
            restore_pacing_ms: 0,
            export_pacing_ms: 0,
            ..Default::default()
        }
    }

    fn session(pages: u32, broken: &[u32]) -> TestSession {
        Session::with_descrambler(
            records(pages),
            small_descrambler(),
            MemorySource::with_pages(pages, broken),
            MemorySink::default(),
            RecordingObserver::default(),
            fast_config(),
        )
        .expect("session")
    }

    #[tokio::test]
    async fn restore_then_export_end_to_end() {
        let mut session = session(5, &[3]);

        let batch = session.restore_all().await.expect("restore");
        assert_eq!((batch.succeeded, batch.failed), (4, 1));

        let report = session.export_all().await.expect("export");
        assert_eq!(report.delivered(), 4);
        assert_eq!(
            session.sink().delivered_names(),
            vec!["1.jpg", "2.jpg", "4.jpg", "5.jpg"]
        );
        assert_eq!(session.counts().failed, 1);
    }

    #[tokio::test]
    async fn export_before_restore_is_rejected() {
        let session = session(2, &[]);
        assert!(matches!(
            session.export_all().await,
            Err(PagewerkError::NoRestoredPages)
        ));
    }

    #[tokio::test]
    async fn teardown_stops_further_work() {
        let mut session = session(3, &[]);
        session.restore_page(1).await.expect("restore");
        session.teardown();

        assert!(session.is_torn_down());
        assert!(session.registry().is_empty());
        assert!(matches!(
            session.restore_page(2).await,
            Err(PagewerkError::Cancelled)
        ));
        let report = session.restore_all().await.expect("batch");
        assert_eq!(report.attempted, 0);
        assert!(matches!(
            session.export_all().await,
            Err(PagewerkError::Cancelled)
        ));
    }

    #[tokio::test]
    async fn snapshot_does_not_expose_bytes() {
        let mut session = session(2, &[]);
        session.restore_page(2).await.expect("restore");
        let snapshot = session.snapshot();
        assert_eq!(snapshot[0].status, PageStatus::Pending);
        assert_eq!(snapshot[1].status, PageStatus::Restored);
        assert!(snapshot[1].restored_len.is_some_and(|len| len > 0));
    }

    #[test]
    fn session_from_episode_json() {
        let before = Utc::now();
        let json = r#"{"readableProduct":{"pageStructure":{"pages":[
            {"type":"main","src":"https://cdn.example.com/public/page/1.png"},
            {"type":"main","src":"https://cdn.example.com/public/page/2.png"}
        ]}}}"#;
        let session: TestSession = Session::from_episode(
            json,
            MemorySource::default(),
            MemorySink::default(),
            RecordingObserver::default(),
            fast_config(),
        )
        .expect("session");
        assert_eq!(session.registry().len(), 2);
        assert!(!session.is_torn_down());
        assert!(session.started_at() >= before);
    }

    #[test]
    fn empty_episode_never_starts() {
        let json = r#"{"readableProduct":{"pageStructure":{"pages":[]}}}"#;
        let result: Result<TestSession> = Session::from_episode(
            json,
            MemorySource::default(),
            MemorySink::default(),
            RecordingObserver::default(),
            fast_config(),
        );
        assert!(matches!(result, Err(PagewerkError::DataExtraction(_))));
    }
}
