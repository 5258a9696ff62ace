//! # domains
//!
//! The central domain models and port definitions for Rango.

pub mod error;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use ports::*;

#[cfg(test)]
mod tests {
    use super::models::*;
    use uuid::Uuid;

    #[test]
    fn test_page_creation() {
        let id = Uuid::new_v4();
        let page = Page {
            id,
            category_id: Uuid::new_v4(),
            title: "Official Python Tutorial".to_string(),
            url: "http://docs.python.org/3/tutorial/".to_string(),
            views: 0,
        };
        assert_eq!(page.id, id);
        assert_eq!(page.views, 0);
    }

    #[test]
    fn test_session_data_defaults_to_anonymous() {
        let session = SessionData::default();
        assert!(session.account.is_none());
        assert!(session.visits.is_none());
        assert!(session.last_visit.is_none());
    }
}
