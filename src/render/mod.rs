pub mod renderer;

pub use renderer::{LatestFrame, Renderer};
