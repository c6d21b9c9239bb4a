pub mod daily_outlook;
pub mod transform;
