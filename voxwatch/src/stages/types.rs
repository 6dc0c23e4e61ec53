//! Stage definitions.

use std::fmt;

/// Processing stages in their fixed display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageId {
    Upload,
    Trigger,
    Transcribing,
    Analyzing,
    Completed,
}

impl StageId {
    /// Every stage, in order.
    pub const ALL: [StageId; 5] = [
        StageId::Upload,
        StageId::Trigger,
        StageId::Transcribing,
        StageId::Analyzing,
        StageId::Completed,
    ];

    /// Position in [`StageId::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Self::Upload => 0,
            Self::Trigger => 1,
            Self::Transcribing => 2,
            Self::Analyzing => 3,
            Self::Completed => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Trigger => "trigger",
            Self::Transcribing => "transcribing",
            Self::Analyzing => "analyzing",
            Self::Completed => "completed",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Upload => "Uploading file",
            Self::Trigger => "Starting processing",
            Self::Transcribing => "Transcribing audio",
            Self::Analyzing => "Analyzing content",
            Self::Completed => "Completed",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Upload => "⬆️",
            Self::Trigger => "🚀",
            Self::Transcribing => "🎤",
            Self::Analyzing => "🤖",
            Self::Completed => "✅",
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a single stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StageStatus {
    #[default]
    Pending,
    Active,
    Completed,
    Error,
}

impl StageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stage and its current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub id: StageId,
    pub title: &'static str,
    pub icon: &'static str,
    pub status: StageStatus,
    /// Last message attached by a transition or error
    pub detail: Option<String>,
}

impl Stage {
    pub fn new(id: StageId) -> Self {
        Self {
            id,
            title: id.title(),
            icon: id.icon(),
            status: StageStatus::Pending,
            detail: None,
        }
    }
}

/// Fresh stage list, all pending.
pub fn default_stages() -> Vec<Stage> {
    StageId::ALL.iter().copied().map(Stage::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_matches_index() {
        for (i, id) in StageId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
        assert!(StageId::Upload < StageId::Completed);
    }

    #[test]
    fn test_default_stages_pending() {
        let stages = default_stages();
        assert_eq!(stages.len(), 5);
        assert!(stages.iter().all(|s| s.status == StageStatus::Pending));
        assert!(stages.iter().all(|s| s.detail.is_none()));
        assert_eq!(stages[2].title, "Transcribing audio");
        assert_eq!(stages[4].icon, "✅");
    }
}
