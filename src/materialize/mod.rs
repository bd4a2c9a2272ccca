//! Materializing the generated layout inside the host.
//!
//! The layout under `src/app/.gah` and the `src/assets` folder are owned by
//! gah and rebuilt from scratch on every install.

pub mod assets;
pub mod links;

pub use assets::copy_facade_assets;
pub use links::{clean_layout, link_modules, remove_layout, LinkError};
