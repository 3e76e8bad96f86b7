#![doc = include_str!("../README.md")]
#![no_std]
#![deny(future_incompatible)]
#![deny(rust_2018_idioms)]
#![deny(rust_2024_compatibility)]
#![allow(edition_2024_expr_fragment_specifier)]

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

pub mod error;
pub mod tag;
pub mod variant;
pub mod visit;

pub use self::{
    error::BadVariantAccess,
    variant::{AltType, Variant},
    visit::{Visit, Visitor, visit, visit_index},
};
