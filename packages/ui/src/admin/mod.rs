//! Admin pages and components for the expense portal.

mod activity_feed;
mod bell;
pub(crate) mod guard;
mod reject_dialog;
mod review_actions;

pub mod pages;

pub use activity_feed::ActivityFeed;
pub use bell::NotificationBell;
pub use reject_dialog::RejectDialog;
pub use review_actions::ReviewActions;
