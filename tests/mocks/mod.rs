#![allow(dead_code)]

pub mod extractor;
pub mod metadata;
pub mod summarizer;
