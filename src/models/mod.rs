// src/models/mod.rs

pub mod answer;
pub mod question;
pub mod response;
pub mod score;
