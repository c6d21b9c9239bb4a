pub mod csv_writer;
pub mod error;
