//! Concrete narrative-generation backends

mod openai;

pub use openai::{OpenAiConfig, OpenAiGenerator};
