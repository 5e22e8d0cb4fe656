pub mod dump;
pub mod recv;
pub mod schema;
pub mod serve;
