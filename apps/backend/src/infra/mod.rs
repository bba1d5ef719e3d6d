//! Infrastructure: database bootstrap, error translation, in-process stores
//! and state assembly.

pub mod db;
pub mod db_errors;
pub mod memory;
pub mod state;
