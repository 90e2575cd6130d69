//! The library code for the `almanac` static site generator. The pipeline is
//! a linear batch transform over a CSV of daily data entries:
//!
//! 1. Parsing the CSV into ordered row records ([`crate::row`])
//! 2. Rendering one HTML document per row ([`crate::render`])
//! 3. Hash-gating the writes against prior run state ([`crate::state`])
//! 4. Writing the sitemap ([`crate::sitemap`])
//!
//! [`crate::build`] stitches the steps together. Row order is significant
//! throughout: previous/next links between posts and the sitemap's root
//! entry are derived from positions in the CSV, never from parsing or
//! sorting the date values.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod render;
pub mod row;
pub mod sitemap;
pub mod state;
