pub mod cargo_env {
    pub const CARGO_PKG_NAME: &'static str = env!("CARGO_PKG_NAME");
}

pub mod common {
    pub const DEFAULT_WEBDRIVER_URL: &'static str = "http://localhost:9515";
    pub const DEFAULT_REPORT_DIR: &'static str = "reports";
    pub const EXECUTION_DIR_PREFIX: &'static str = "Test_Execution_";
    pub const SCREENSHOTS_DIR: &'static str = "screenshots";
}
