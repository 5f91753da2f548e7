// Player data pipeline: upstream fetch, record normalization, filtered views.

pub mod fetch;
pub mod filter;
pub mod normalize;
