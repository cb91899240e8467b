pub mod filter;
pub mod format;
pub mod geo;
pub mod property;

pub use geo::{Bounds, LatLng, ScreenPoint, Viewport};
pub use property::{NewProperty, PropertyRecord};
