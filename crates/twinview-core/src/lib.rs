pub mod annotation;
pub mod config;
pub mod consts;
pub mod discovery;
pub mod error;
pub mod export;
pub mod geometry;
pub mod io;
pub mod pair;
pub mod render;
pub mod scroll;
pub mod session;
pub mod snapshot;
pub mod transform;
pub mod viewport;
pub mod workspace;
