pub mod animation;
pub mod ar;
pub mod bounds;
pub mod constants;
pub mod easing;
pub mod error;
pub mod fade;
pub mod flythrough;
pub mod form;
pub mod loader;
pub mod model;
pub mod orbit;
pub mod particles;
pub mod path;
pub mod rig;
pub mod settings;
pub mod timing;
pub mod tween;
pub mod typewriter;
pub mod viewer;

pub use animation::*;
pub use ar::*;
pub use bounds::*;
pub use error::*;
pub use fade::*;
pub use flythrough::*;
pub use form::*;
pub use loader::*;
pub use model::*;
pub use orbit::*;
pub use particles::*;
pub use path::*;
pub use rig::*;
pub use settings::*;
pub use timing::*;
pub use tween::*;
pub use typewriter::*;
pub use viewer::*;
