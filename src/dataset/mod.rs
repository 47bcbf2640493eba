// Dataset module
// Window planning, example production, and the NDAT binary container codec

pub mod builder;
pub mod header;
pub mod plan;
pub mod reader;
pub mod writer;

pub use builder::ExampleBuilder;
pub use header::{ElementFormat, NdatHeader, HEADER_SIZE, NDAT_MAGIC};
pub use plan::WindowPlan;
pub use reader::{read_ndat, ElementArray, TrainingData};
pub use writer::write_ndat;
