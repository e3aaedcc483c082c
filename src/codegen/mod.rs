//! C++ resource translation unit generation

pub mod checksums;
pub mod cli;
pub mod defaults;
pub mod emitter;
pub mod encoder;
pub mod enumerate;
pub mod escape;
pub mod manifest;
pub mod reader;

pub use emitter::{OutputWriter, Scaffolding, emit_translation_unit, render_to_string};
pub use encoder::{EncodingStrategy, encode_contents, select_strategy};
pub use enumerate::{Enumeration, InputEnumerator, InputFile, enumerate_inputs};
pub use escape::{EscapeContext, escape_byte, unescape};
pub use manifest::{ManifestDocument, ManifestEntry, ManifestRow};
pub use reader::{EmbeddedResource, GeneratedSource};
