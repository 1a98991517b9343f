//! Core types for the Luxury Market catalog.

pub mod product;
pub mod universe;

pub use product::{CategoryInfo, NewProduct, Product, ProductPatch};
pub use universe::{Universe, UniverseParseError};
