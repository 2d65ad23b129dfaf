mod db;
pub mod kv;

pub use db::*;
