pub mod device_adapter;

pub use device_adapter::{DeviceDirective, DeviceLink, DeviceSpeechAdapter, Utterance};
