pub mod category;
pub mod draft;
pub mod error;
pub mod palette;
pub mod validation;

pub use category::{Category, CreateCategory};
pub use draft::{Draft, DraftField};
pub use error::TallyError;
pub use palette::Palette;
pub use validation::{validate, ValidationResult};
