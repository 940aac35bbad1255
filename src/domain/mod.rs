pub mod item;
pub mod manifest;
pub mod source;

pub use item::{BodyFields, ItemKey, ProcessedItem, RawItem};
pub use manifest::{Manifest, ManifestBuilder, ManifestEntry};
pub use source::{Source, SourceDocument, Validators};
