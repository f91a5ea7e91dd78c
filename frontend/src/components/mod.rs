pub mod category_panel;
pub mod dashboard;
pub mod filter_bar;
pub mod login_form;
pub mod profile;
pub mod transaction_chart;
pub mod transaction_form;
pub mod transaction_table;
