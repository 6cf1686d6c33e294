pub mod error;
pub mod gemini;
pub mod image_part;
pub mod schema;
pub mod util;

pub use error::{AiError, Result};
pub use gemini::Gemini;
pub use image_part::{prepare_image, InlineImage};
pub use schema::json_schema;
pub use util::{extract_json_payload, extract_json_payload_to_last_fence, truncate_chars};
