// src/handlers/mod.rs

pub mod answers;
pub mod docs;
pub mod questions;
pub mod scores;
