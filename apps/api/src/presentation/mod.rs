//! Presentation layer. Builds what the dashboard shows: the credit banner plus the
//! last-known-good lead feed per user.

pub mod credit_alert;
pub mod dashboard;
pub mod feed;
pub mod feed_cache;
pub mod handlers;
