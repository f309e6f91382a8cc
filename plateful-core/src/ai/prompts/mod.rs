//! Prompt templates and output contracts for vision extraction.

pub mod extract_recipe;
