pub mod driver;
pub mod report;
pub mod workload;

pub use driver::Sim;
pub use report::format_g;
pub use workload::{Draw, Workload};
