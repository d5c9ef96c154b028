pub mod builder;
pub mod desugar;
pub mod error_codes;
pub mod ir;
pub mod literal;
pub mod operators;
pub mod render;
pub mod tokens;
pub mod transform;
pub mod visitor;
