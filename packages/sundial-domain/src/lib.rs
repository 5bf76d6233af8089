pub mod currency;
pub mod dataset;
pub mod field;
