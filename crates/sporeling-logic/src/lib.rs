//! Pure game rules for Sporeling.
//!
//! This crate holds every rule that can be expressed without an ECS world or
//! a random number generator. Functions take plain data and return results,
//! so each rule is unit-testable on its own and the engine stays a thin
//! scheduler around them.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`class`] | Closed set of actor classes and their stat table |
//! | [`damage`] | Shield/armor damage pipeline and healing |
//! | [`economy`] | Currencies, upgrade cost curves, atomic purchases |
//! | [`geometry`] | `Vec2`, bounding circles, arena rectangle |
//! | [`interaction`] | Eat / fight / ignore table for class pairs |
//! | [`movement`] | Input steering, wandering, obstacle and wall collision |
//! | [`win`] | Notable-kill counter and one-shot victory |

pub mod class;
pub mod damage;
pub mod economy;
pub mod geometry;
pub mod interaction;
pub mod movement;
pub mod win;
