//! Admin page components.

mod receipt_detail_page;
mod request_detail_page;
mod requests_page;
mod review_queue_page;

pub use receipt_detail_page::AdminReceiptDetailPage;
pub use request_detail_page::AdminRequestDetailPage;
pub use requests_page::AdminRequestsPage;
pub use review_queue_page::AdminReviewQueuePage;
