pub mod device_checkup;

pub use device_checkup::{DeviceCheckup, DeviceCheckupFactory};
