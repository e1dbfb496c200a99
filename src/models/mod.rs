pub mod coordinates;
pub mod route;

pub use coordinates::GeoPoint;
pub use route::{Route, RouteVariants, TransportProfile};
