pub mod constraint;
pub mod convert;
pub mod document;
pub mod error;
pub mod exit_code;
pub mod format;
pub mod handler;
pub mod instructions;
pub mod registry;
pub mod template;
pub mod value;
pub mod verify;

pub use crate::convert::Converter;
pub use crate::document::{Document, load_variables, merge_mappings};
pub use crate::error::{ConvertError, Error};
pub use crate::exit_code::ExitCode;
pub use crate::handler::{Call, Handler, HandlerKey};
pub use crate::registry::Registry;
pub use crate::template::{DEFAULT_TEMPLATE_NAME, Renderer, render_source};
pub use crate::value::{Mapping, Shape, Value};
pub use crate::verify::{Verification, verify_dockerfile};
