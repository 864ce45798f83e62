//! Integration tests for Bilingual-Harvest
//!
//! These tests use wiremock to stand in for the target site and run the
//! pipeline end-to-end, from sitemap to output file.

mod harvest_tests;
