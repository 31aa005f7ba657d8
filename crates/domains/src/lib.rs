//! clutch-takes/crates/domains/src/lib.rs
//!
//! The central domain models, port definitions, and error types for
//! Clutch Takes.

pub mod models;
pub mod traits;
pub mod error;

// Re-exporting for easier access in other crates
pub use models::*;
pub use traits::*;
pub use error::*;

#[cfg(test)]
mod tests {
    use super::models::*;
    use uuid::Uuid;

    #[test]
    fn test_take_creation_v7() {
        let id = Uuid::now_v7();
        let take = Take {
            id,
            text: "Pineapple belongs on pizza".to_string(),
            votes: Votes::default(),
            comments: Vec::new(),
            created_at: chrono::Utc::now(),
            is_flagged: false,
            flag_reason: String::new(),
        };
        assert_eq!(take.id, id);
        assert_eq!(take.votes.yes, 0);
        assert_eq!(take.votes.no, 0);
        assert!(take.comments.is_empty());
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!(SortKey::parse("newest"), SortKey::Newest);
        assert_eq!(SortKey::parse("most_discussed"), SortKey::MostDiscussed);
        // Anything we don't recognize leaves the feed order untouched.
        assert_eq!(SortKey::parse("trending"), SortKey::Unsorted);
        assert_eq!(SortKey::parse(""), SortKey::Unsorted);
    }

    #[test]
    fn test_vote_choice_field_names() {
        assert_eq!(VoteChoice::Yes.as_str(), "yes");
        assert_eq!(VoteChoice::No.as_str(), "no");
    }
}
