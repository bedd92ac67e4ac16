pub const CONFIG_FILE: &str = "latchkey.json";

pub mod env {
    pub const ENV_PREFIX: &str = "LATCHKEY";
    pub const ENV_SEPARATOR: &str = "__";
}

pub mod defaults {
    pub const DEVICE_NAME: &str = "default-device";
    pub const CACHE_ENABLED: bool = true;
    pub const SKIP_CHECKUP: bool = false;
    pub const STORE_SECRET: bool = false;
    pub const LOG_FILTER: &str = "info";
}
