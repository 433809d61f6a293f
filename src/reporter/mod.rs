pub mod html;
pub mod model;
pub mod report;
pub mod serialize;

pub use model::{Status, TestCase, TestStep};
pub use report::{Summary, TestReport};
