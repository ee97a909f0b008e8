mod count;
mod document;
mod duration;
mod variant;

pub use count::{CountValue, PackagesCount};
pub use document::{GeneratorSection, LoadDocument, RunSection, TargetSection};
pub use duration::{parse_duration, DurationParseError, DurationValue};
pub use variant::{UnknownVariant, Variant};
