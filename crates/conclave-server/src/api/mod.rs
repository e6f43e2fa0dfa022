// ABOUTME: API module aggregating the JSON handlers for routing and generation.
// ABOUTME: Each sub-module owns one endpoint's request and response shapes.

pub mod generate;
pub mod plan;
