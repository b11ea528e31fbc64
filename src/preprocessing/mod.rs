/// Модуль предобработки данных

pub mod normalization;
pub mod split;

pub use normalization::DataNormalizer;
pub use split::{train_test_split, TrainTestSplit};
