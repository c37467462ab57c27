pub mod camera;
pub mod config;
pub mod constants;
pub mod error;
pub mod falling;
pub mod focus;
pub mod frame;
pub mod gesture;
pub mod layout;
pub mod motion;
pub mod object;
pub mod photo;
pub mod scene;

pub use camera::*;
pub use config::*;
pub use error::*;
pub use falling::*;
pub use focus::*;
pub use frame::*;
pub use gesture::*;
pub use motion::*;
pub use object::*;
pub use photo::*;
pub use scene::*;
