//! IngestLogUseCase: parse → freshness check → classify → post, one line at
//! a time.
//!
//! # Delivery guarantees (for beginners)
//!
//! Lines are handled strictly in the order they are read and each post
//! completes (or times out) before the next line is read, so chat shows
//! events in log order.  Delivery is at-most-once: a failed or slow post is
//! logged and the line is dropped.  Nothing is retried or queued, and the
//! log producer is never slowed down beyond one post timeout per line.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use mc_bridge_core::{parse_log_line_on, Category, Classifier};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, error, info, warn};

use crate::domain::FreshnessWindow;
use crate::infrastructure::PostError;

// ── Seams ─────────────────────────────────────────────────────────────────────

/// Delivers one message to the chat channel.
#[async_trait]
pub trait ChatPoster: Send + Sync {
    async fn post(&self, text: &str) -> Result<(), PostError>;
}

/// Source of "now" for timestamp completion and the freshness check.
pub trait Clock: Send + Sync {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;
}

/// The machine's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock stopped at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// What happened to one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Posted(Category),
    PostFailed(Category),
    /// Classified as [`Category::None`].
    Ignored,
    Stale,
    Unparsable,
}

/// Running totals over a whole input stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub lines: u64,
    pub posted: u64,
    pub failed: u64,
    pub ignored: u64,
    pub stale: u64,
    pub unparsable: u64,
}

impl IngestStats {
    fn record(&mut self, outcome: LineOutcome) {
        self.lines += 1;
        match outcome {
            LineOutcome::Posted(_) => self.posted += 1,
            LineOutcome::PostFailed(_) => self.failed += 1,
            LineOutcome::Ignored => self.ignored += 1,
            LineOutcome::Stale => self.stale += 1,
            LineOutcome::Unparsable => self.unparsable += 1,
        }
    }
}

// ── Use case ──────────────────────────────────────────────────────────────────

/// Sequential log ingester.
pub struct IngestLogUseCase<P: ChatPoster + ?Sized, C: Clock + ?Sized = SystemClock> {
    poster: Arc<P>,
    clock: Arc<C>,
    classifier: Classifier,
    freshness: FreshnessWindow,
    post_timeout: Duration,
}

impl<P: ChatPoster + ?Sized, C: Clock + ?Sized> IngestLogUseCase<P, C> {
    pub fn new(
        poster: Arc<P>,
        clock: Arc<C>,
        classifier: Classifier,
        freshness: FreshnessWindow,
        post_timeout: Duration,
    ) -> Self {
        Self {
            poster,
            clock,
            classifier,
            freshness,
            post_timeout,
        }
    }

    /// Handles one raw line (without its trailing newline).
    pub async fn process_line(&self, line: &str) -> LineOutcome {
        let now = self.clock.now();

        let msg = match parse_log_line_on(line, now.date()) {
            Ok(msg) => msg,
            Err(e) => {
                warn!(%line, error = %e, "skipping unparsable line");
                return LineOutcome::Unparsable;
            }
        };

        if let Err(e) = self.freshness.check(msg.timestamp, now) {
            warn!(%line, error = %e, "skipping message too far into past/future");
            return LineOutcome::Stale;
        }

        let category = self.classifier.classify(&msg.message);
        if !category.is_forwardable() {
            debug!(message = %msg.message, "not forwarding unclassified message");
            return LineOutcome::Ignored;
        }

        let result = match tokio::time::timeout(self.post_timeout, self.poster.post(&msg.message)).await {
            Ok(result) => result,
            Err(_) => Err(PostError::TimedOut(self.post_timeout)),
        };
        match result {
            Ok(()) => {
                debug!(
                    ?category,
                    rule = ?self.classifier.matching_rule(category, &msg.message),
                    message = %msg.message,
                    "posted message"
                );
                LineOutcome::Posted(category)
            }
            Err(e) => {
                error!(?category, error = %e, "error posting to chat");
                LineOutcome::PostFailed(category)
            }
        }
    }

    /// Processes `reader` to the end.
    ///
    /// # Errors
    ///
    /// Returns the reader's I/O error; processing stops at that point.
    pub async fn run<R>(&self, reader: R) -> std::io::Result<IngestStats>
    where
        R: AsyncBufRead + Unpin,
    {
        self.run_until(reader, std::future::pending()).await
    }

    /// Processes `reader` until it ends or `shutdown` resolves.  A line that
    /// is already being handled when `shutdown` fires is finished first.
    ///
    /// Invalid UTF-8 is replaced rather than treated as an error.
    ///
    /// # Errors
    ///
    /// Returns the reader's I/O error; processing stops at that point.
    pub async fn run_until<R, F>(&self, mut reader: R, shutdown: F) -> std::io::Result<IngestStats>
    where
        R: AsyncBufRead + Unpin,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut stats = IngestStats::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let read = tokio::select! {
                _ = &mut shutdown => {
                    info!("shutdown requested, stopping ingest");
                    break;
                }
                read = reader.read_until(b'\n', &mut buf) => read?,
            };
            if read == 0 {
                break;
            }

            let raw = String::from_utf8_lossy(&buf);
            let line = raw.strip_suffix('\n').unwrap_or(&raw);
            stats.record(self.process_line(line).await);
        }

        info!(
            lines = stats.lines,
            posted = stats.posted,
            failed = stats.failed,
            "ingest finished"
        );
        Ok(stats)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
