// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod filter;
pub mod ids;
pub mod locator;
pub mod model;
pub mod navigation;
pub mod snapshot;
pub mod state;

pub use filter::*;
pub use ids::*;
pub use locator::*;
pub use model::*;
pub use navigation::*;
pub use snapshot::*;
pub use state::*;
