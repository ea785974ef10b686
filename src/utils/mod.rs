// src/utils/mod.rs

pub mod math;
