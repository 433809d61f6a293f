pub mod error;
pub mod timeunit;

#[macro_export]
macro_rules! stamp {
    () => {
        chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
    };
}
