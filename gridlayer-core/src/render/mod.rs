//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

pub mod cache;
pub mod cull;
pub mod gpu;
pub mod labels;
pub mod path;
pub mod renderer;
pub mod shaders;
mod source;

pub use self::renderer::{CanvasGridRenderer, FrameSummary, GlGridRenderer, GridFrame};
pub use self::source::GridSource;

#[cfg(test)]
mod test_view;
