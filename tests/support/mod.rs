#![allow(dead_code)]

pub mod vintner_env;
pub mod wine_csv;
