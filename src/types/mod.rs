pub mod alert;
pub mod analysis;
pub mod bar;
pub mod correlation;
pub mod registry;

pub use alert::*;
pub use analysis::*;
pub use bar::*;
pub use correlation::*;
pub use registry::*;
