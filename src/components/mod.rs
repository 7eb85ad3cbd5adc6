pub mod error_notice;
pub mod history_panel;
pub mod image_upload;
pub mod prediction_card;
pub mod sidebar;
pub mod status_badge;
