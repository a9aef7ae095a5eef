//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

pub mod color;
pub mod symbol;
pub mod toml_converter;

pub use self::symbol::{
    default_symbol, resolve_style, ResolvedStyle, StyleContext, Symbol,
};

#[cfg(test)]
mod symbol_test;
#[cfg(test)]
mod toml_converter_test;
