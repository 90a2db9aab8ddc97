pub mod format;
pub mod group;
pub mod guards;
pub mod markdown;
pub mod media;
pub mod part;
pub mod resolve;
pub mod vin;
