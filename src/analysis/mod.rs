pub mod spectral;

pub use spectral::*;
