//! Analytics pages: spending by category over a date range and spending by
//! calendar month, each shown as a bar chart and a table.

mod category_page;
mod charts;
mod month_page;

pub use category_page::get_category_analytics_page;
pub use month_page::get_monthly_analytics_page;
