pub mod catalog;
pub mod cli;
pub mod model;
pub mod quotes;
pub mod scan;
