pub mod db;
pub mod error;
pub mod migrate;
pub mod normalize;
pub mod visitor;
