#![doc = include_str!("../README.md")]

pub mod arff;
pub mod cli;
pub mod conversion;
pub mod map;
pub mod ped;
pub mod transcode;

pub use conversion::{ConversionConfig, ConversionSummary, DatasetPaths, convert_dataset};
