pub mod crop_form;
pub mod dashboard;
pub mod kpi_card;
pub mod margin_indicator;
pub mod toast;
pub mod trend_badge;
pub mod upload_placeholder;
