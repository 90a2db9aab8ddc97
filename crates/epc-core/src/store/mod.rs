pub mod catalogue;
pub mod context;
pub mod database;
pub mod schema;
pub mod vin;
