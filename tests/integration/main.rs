//! End-to-end tests: DSL source through analysis, evaluation, builder
//! registration and artifact export.

mod dungeon;
mod goblin;
mod sessions;
