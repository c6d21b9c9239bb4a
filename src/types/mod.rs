pub mod date_window;
pub mod rows;
pub mod unit_group;
pub mod weekday;
