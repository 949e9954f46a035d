// File I/O - page dumps in, population CSV in/out, GeoJSON in/out

pub mod csv;
pub mod error;
pub mod geojson;
pub mod pages;

pub use crate::csv::{read_population, write_population};
pub use crate::error::IoError;
pub use crate::geojson::{read_units, write_units, GeometryConfig};
pub use crate::pages::read_pages;
