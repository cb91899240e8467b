pub mod capture;
pub mod listing;

pub use capture::{capture_page, capture_panel, capture_unconfigured};
pub use listing::{hover_card, listing_page, listing_unconfigured, sidebar};
