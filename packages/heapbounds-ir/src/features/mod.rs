//! Features - vertical slices
//!
//! Each feature follows the hexagonal layout
//! `domain / ports / infrastructure / application`.

pub mod bounds_analysis;
