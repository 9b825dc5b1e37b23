pub mod data_type;
pub mod kinds;
pub mod utils;
