pub mod document;
pub mod writer;

pub use document::ControlDocument;
pub use writer::ControlWriter;
