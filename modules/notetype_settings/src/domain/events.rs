//! Domain events for notetype settings
//!
//! Events are emitted after a batch has been persisted:
//! - Settings applied to a notetype
//! - Notetype upgraded to the newest authored version
//! - Generated copies merged back into their family

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Domain event types for notetypes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum NotetypeEvent {
    /// Settings were written to a notetype
    SettingsApplied(SettingsAppliedEvent),
    /// Notetype templates were replaced by the newest version
    NotetypeUpgraded(NotetypeUpgradedEvent),
    /// Copies of a family were merged into the family
    CopiesConverted(CopiesConvertedEvent),
}

/// Event data for applied settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsAppliedEvent {
    /// Notetype ID in the collection
    pub notetype_id: i64,
    /// Notetype name
    pub notetype: String,
    /// Number of settings that could not be applied
    pub failures: usize,
    /// Timestamp of the event
    pub timestamp: DateTime<Utc>,
}

/// Event data for an upgrade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotetypeUpgradedEvent {
    /// Notetype ID in the collection
    pub notetype_id: i64,
    /// Notetype name
    pub notetype: String,
    /// Version before the upgrade
    pub from_version: Option<String>,
    /// Version after the upgrade
    pub to_version: Option<String>,
    /// Timestamp of the event
    pub timestamp: DateTime<Utc>,
}

/// Event data for merged copies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopiesConvertedEvent {
    /// Family the copies were merged into
    pub family: String,
    /// Names of the removed copies
    pub removed: Vec<String>,
    /// Number of notes moved to the family
    pub notes_moved: usize,
    /// Timestamp of the event
    pub timestamp: DateTime<Utc>,
}

/// Event publisher trait for publishing domain events
#[async_trait::async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a notetype event
    async fn publish(&self, event: NotetypeEvent) -> anyhow::Result<()>;
}

/// No-op event publisher for testing or when events are disabled
pub struct NoOpEventPublisher;

#[async_trait::async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _event: NotetypeEvent) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Publisher that writes events to the log
pub struct TracingEventPublisher;

#[async_trait::async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish(&self, event: NotetypeEvent) -> anyhow::Result<()> {
        let payload = serde_json::to_string(&event)?;
        tracing::info!(event = %payload, "Notetype event");
        Ok(())
    }
}

impl NotetypeEvent {
    /// Create a new SettingsApplied event
    pub fn settings_applied(notetype_id: i64, notetype: &str, failures: usize) -> Self {
        NotetypeEvent::SettingsApplied(SettingsAppliedEvent {
            notetype_id,
            notetype: notetype.to_string(),
            failures,
            timestamp: Utc::now(),
        })
    }

    /// Create a new NotetypeUpgraded event
    pub fn upgraded(
        notetype_id: i64,
        notetype: &str,
        from_version: Option<String>,
        to_version: Option<String>,
    ) -> Self {
        NotetypeEvent::NotetypeUpgraded(NotetypeUpgradedEvent {
            notetype_id,
            notetype: notetype.to_string(),
            from_version,
            to_version,
            timestamp: Utc::now(),
        })
    }

    /// Create a new CopiesConverted event
    pub fn copies_converted(family: &str, removed: Vec<String>, notes_moved: usize) -> Self {
        NotetypeEvent::CopiesConverted(CopiesConvertedEvent {
            family: family.to_string(),
            removed,
            notes_moved,
            timestamp: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upgraded_event_creation() {
        let event = NotetypeEvent::upgraded(7, "Cloze-abcde", Some("1".into()), Some("2".into()));

        match event {
            NotetypeEvent::NotetypeUpgraded(e) => {
                assert_eq!(e.notetype_id, 7);
                assert_eq!(e.notetype, "Cloze-abcde");
                assert_eq!(e.from_version.as_deref(), Some("1"));
                assert_eq!(e.to_version.as_deref(), Some("2"));
            }
            _ => panic!("Expected NotetypeUpgraded event"),
        }
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = NotetypeEvent::copies_converted("Cloze", vec!["Cloze-abcde".into()], 3);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event_type"], "copies_converted");
        assert_eq!(json["family"], "Cloze");
        assert_eq!(json["notes_moved"], 3);
    }

    #[tokio::test]
    async fn test_publishers() {
        let event = NotetypeEvent::settings_applied(1, "Cloze", 0);

        assert!(NoOpEventPublisher.publish(event.clone()).await.is_ok());
        assert!(TracingEventPublisher.publish(event).await.is_ok());
    }
}
