//! Data models for knowledge items

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::scheduler::next_review_date;

/// A single fact the user wants to retain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeItem {
    pub id: Uuid,
    /// Trimmed, never empty
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub last_reviewed_at: DateTime<Utc>,
    /// Number of completed reviews
    pub review_count: u32,
    /// When the item is next due for review
    pub next_review_date: DateTime<Utc>,
}

impl KnowledgeItem {
    /// Build a fresh, never-reviewed item created at `now`.
    ///
    /// The first review is scheduled in `now`'s time zone.
    pub fn new<Tz: TimeZone>(title: String, now: &DateTime<Tz>) -> Self {
        let created_at = now.with_timezone(&Utc);
        Self {
            id: Uuid::new_v4(),
            title,
            created_at,
            last_reviewed_at: created_at,
            review_count: 0,
            next_review_date: next_review_date(0, now).with_timezone(&Utc),
        }
    }

    /// Check whether the item falls due within `[start, end)`
    pub fn is_due_between(&self, start: &DateTime<Utc>, end: &DateTime<Utc>) -> bool {
        *start <= self.next_review_date && self.next_review_date < *end
    }

    /// Whole days from `now` until the next review (negative when overdue)
    pub fn days_until_review(&self, now: &DateTime<Utc>) -> i64 {
        (self.next_review_date - *now).num_days()
    }
}

/// Request body for creating an item
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItemRequest {
    #[serde(default)]
    pub title: Option<String>,
}

/// Trim a title and reject it if nothing is left
pub fn normalize_title(title: &str) -> Option<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_item_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 5, 4, 8, 0, 0).unwrap();
        let item = KnowledgeItem::new("Borrow checker".to_string(), &now);

        assert_eq!(item.review_count, 0);
        assert_eq!(item.created_at, now);
        assert_eq!(item.last_reviewed_at, now);
        assert_eq!(item.next_review_date, now + Duration::days(1));
        assert_eq!(item.days_until_review(&now), 1);
    }

    #[test]
    fn test_serializes_camel_case() {
        let now = Utc.with_ymd_and_hms(2024, 5, 4, 8, 0, 0).unwrap();
        let item = KnowledgeItem::new("Lifetimes".to_string(), &now);
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["title"], "Lifetimes");
        assert_eq!(json["reviewCount"], 0);
        assert!(json.get("nextReviewDate").is_some());
        assert!(json.get("lastReviewedAt").is_some());
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title(""), None);
        assert_eq!(normalize_title("   \t\n"), None);
        assert_eq!(normalize_title("  X  "), Some("X".to_string()));
    }

    #[test]
    fn test_is_due_between_is_half_open() {
        let now = Utc.with_ymd_and_hms(2024, 5, 4, 8, 0, 0).unwrap();
        let item = KnowledgeItem::new("Traits".to_string(), &now);
        let due = item.next_review_date;

        assert!(item.is_due_between(&due, &(due + Duration::seconds(1))));
        assert!(!item.is_due_between(&(due - Duration::hours(1)), &due));
    }
}
