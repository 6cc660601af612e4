pub mod hardware;
pub mod memory;
pub mod settings;

pub use hardware::ram_hardware_description;
pub use memory::{MemorySampler, MemorySnapshot};
pub use settings::{Settings, SettingsStore, WindowPosition};
