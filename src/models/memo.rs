// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Memo model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// A memo as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Memo {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: i64,
    /// Owning user (identity service user ID)
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// None until the first update
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request body for creating a memo.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewMemo {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Title must be between 1 and 200 characters"
    ))]
    pub title: String,

    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: String,
}

/// Request body for a partial update; absent or null fields are untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MemoPatch {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Title must be between 1 and 200 characters"
    ))]
    #[serde(default)]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Content cannot be empty"))]
    #[serde(default)]
    pub content: Option<String>,
}

impl Memo {
    /// Apply a partial update and stamp the modification time.
    ///
    /// `updated_at` always moves strictly forward past both `created_at` and
    /// any previous update, even if the clock has not.
    pub fn apply(&mut self, patch: MemoPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }

        let last = self.updated_at.unwrap_or(self.created_at);
        self.updated_at = Some(crate::time_utils::strictly_after(last, now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memo() -> Memo {
        Memo {
            id: 1,
            user_id: 10,
            title: "T".to_string(),
            content: "C".to_string(),
            created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            updated_at: None,
        }
    }

    #[test]
    fn test_new_memo_validation() {
        let valid = NewMemo {
            title: "Valid".to_string(),
            content: "body".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty_title = NewMemo {
            title: String::new(),
            content: "body".to_string(),
        };
        assert!(empty_title.validate().is_err());

        let empty_content = NewMemo {
            title: "Valid".to_string(),
            content: String::new(),
        };
        assert!(empty_content.validate().is_err());
    }

    #[test]
    fn test_title_length_counts_characters() {
        let max = NewMemo {
            title: "가".repeat(200),
            content: "body".to_string(),
        };
        assert!(max.validate().is_ok());

        let too_long = NewMemo {
            title: "a".repeat(201),
            content: "body".to_string(),
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_patch_validation_skips_absent_fields() {
        assert!(MemoPatch::default().validate().is_ok());

        let empty_content = MemoPatch {
            title: None,
            content: Some(String::new()),
        };
        assert!(empty_content.validate().is_err());
    }

    #[test]
    fn test_apply_partial_update() {
        let mut memo = memo();
        let now = memo.created_at + chrono::Duration::seconds(5);

        memo.apply(
            MemoPatch {
                title: None,
                content: Some("C2".to_string()),
            },
            now,
        );

        assert_eq!(memo.title, "T");
        assert_eq!(memo.content, "C2");
        assert_eq!(memo.updated_at, Some(now));
    }

    #[test]
    fn test_apply_with_stale_clock_still_moves_forward() {
        let mut memo = memo();
        let stale = memo.created_at - chrono::Duration::seconds(1);

        memo.apply(MemoPatch::default(), stale);
        let first = memo.updated_at.unwrap();
        assert!(first > memo.created_at);

        memo.apply(MemoPatch::default(), stale);
        assert!(memo.updated_at.unwrap() > first);
    }

    #[test]
    fn test_patch_null_fields_deserialize_as_absent() {
        let patch: MemoPatch = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert!(patch.title.is_none());
        assert!(patch.content.is_none());
    }
}
