pub mod constants;
pub mod device;
pub mod error;
pub mod flags;
pub mod frame;
pub mod measurement;
pub mod mode;
pub mod normalize;
pub mod reader;
pub mod serial;


// Re-export the main types for easy access
pub use device::Ut61e;
pub use error::DmmError;
pub use frame::{Frame, is_frame_valid};
pub use measurement::{DecimalPoint, Measurement, Reading, StatusFlags};
pub use mode::{MeasurementMode, RangeInfo};
pub use reader::{FrameReader, StreamTransport, Transport};
pub use serial::{SerialConfig, SerialTransport};
