pub mod compile;
pub mod diag;
pub mod emit;
pub mod mapping;
pub mod model;
pub mod order;
pub mod requirements;
pub mod schema;
pub mod wasm;
