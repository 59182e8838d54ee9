//! Quiz domain: questions shown to participants and the submissions they
//! leave behind.

pub mod participants;
pub mod questions;
pub(crate) mod storage;
pub mod types;
