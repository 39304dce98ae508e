//! Usage analytics dashboard state

use chrono::{DateTime, Utc};

use ragchat_api::{AnalyticsBackend, ChatBackend};
use ragchat_types::{AnalyticsSummary, ChatSession, SessionId, RECENT_SESSIONS_LIMIT};

const ANALYTICS_ERROR: &str = "Unable to load analytics.";

/// One row of the dashboard's recent-sessions list
#[derive(Debug, Clone, PartialEq)]
pub struct RecentSession {
    pub session_id: SessionId,
    pub title: String,
    pub created_at: Option<DateTime<Utc>>,
    pub message_count: usize,
}

impl From<&ChatSession> for RecentSession {
    fn from(session: &ChatSession) -> Self {
        Self {
            session_id: session.session_id,
            title: session.title.clone(),
            created_at: session.created_at,
            message_count: session.messages.len(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    summary: Option<AnalyticsSummary>,
    recent_sessions: Vec<RecentSession>,
    loading: bool,
    error: Option<String>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            summary: None,
            recent_sessions: Vec::new(),
            loading: true,
            error: None,
        }
    }

    pub fn summary(&self) -> Option<&AnalyticsSummary> {
        self.summary.as_ref()
    }

    pub fn recent_sessions(&self) -> &[RecentSession] {
        &self.recent_sessions
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetch the summary and the recent sessions concurrently. Only a summary
    /// failure is reported; a history failure just leaves the list empty.
    pub async fn load<B>(&mut self, backend: &B)
    where
        B: AnalyticsBackend + ChatBackend,
    {
        self.loading = true;
        self.error = None;

        let (summary, history) = tokio::join!(backend.analytics_summary(), backend.history());

        match summary {
            Ok(summary) => self.summary = Some(summary),
            Err(e) => {
                tracing::warn!(error = %e, "analytics load failed");
                self.error = Some(ANALYTICS_ERROR.to_string());
            }
        }

        match history {
            Ok(sessions) => {
                self.recent_sessions = sessions
                    .iter()
                    .take(RECENT_SESSIONS_LIMIT)
                    .map(RecentSession::from)
                    .collect();
            }
            Err(e) => tracing::debug!(error = %e, "recent sessions unavailable"),
        }

        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{server_error, session, FakeBackend};
    use ragchat_types::{Totals, UsageStats};

    fn summary() -> AnalyticsSummary {
        AnalyticsSummary {
            usage: UsageStats {
                total_calls: 12,
                average_latency_ms: 431.7,
            },
            totals: Totals {
                sessions: 6,
                assistant_messages: 12,
                documents: 2,
            },
            last_7_days: [("2024-03-01".to_string(), 4)].into_iter().collect(),
        }
    }

    #[tokio::test]
    async fn test_load_caps_recent_sessions() {
        let backend = FakeBackend::new();
        backend.push_analytics(Ok(summary()));
        backend.push_history(Ok((1..=7).map(|i| session(i, &format!("s{}", i), 1)).collect()));

        let mut dashboard = Dashboard::new();
        assert!(dashboard.is_loading());
        dashboard.load(&backend).await;

        assert!(!dashboard.is_loading());
        assert_eq!(dashboard.error(), None);
        assert_eq!(dashboard.summary(), Some(&summary()));
        assert_eq!(dashboard.recent_sessions().len(), 5);
        assert_eq!(dashboard.recent_sessions()[0].title, "s1");
        assert_eq!(dashboard.recent_sessions()[0].message_count, 2);
    }

    #[tokio::test]
    async fn test_summary_failure_sets_error() {
        let backend = FakeBackend::new();
        backend.push_analytics(Err(server_error(500, Some("boom"))));
        backend.push_history(Ok(vec![session(1, "only", 0)]));

        let mut dashboard = Dashboard::new();
        dashboard.load(&backend).await;
        assert_eq!(dashboard.error(), Some("Unable to load analytics."));
        assert!(dashboard.summary().is_none());
        assert!(!dashboard.is_loading());
    }

    #[tokio::test]
    async fn test_history_failure_is_ignored() {
        let backend = FakeBackend::new();
        backend.push_analytics(Ok(summary()));
        backend.push_history(Err(server_error(500, None)));

        let mut dashboard = Dashboard::new();
        dashboard.load(&backend).await;
        assert_eq!(dashboard.error(), None);
        assert!(dashboard.recent_sessions().is_empty());
    }
}
