pub mod describe;
pub mod objects;
pub mod query;
pub mod versions;
