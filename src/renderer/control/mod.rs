//! Camera controls

mod orbit;

pub use orbit::OrbitControl;
