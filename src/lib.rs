// src/lib.rs

//! sitepush: static site deployer for S3 + CloudFront

pub mod cdn;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
