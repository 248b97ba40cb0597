//! Platform-agnostic core - shared between the GUI, the WASM entry and the CLI
//!
//! Nothing in here touches a window, a GPU or the network.

pub mod attributes;
pub mod clock;
pub mod config;
pub mod data;
pub mod layer;
pub mod parser;
pub mod picking;
pub mod projection;
pub mod shading;
pub mod surface;
pub mod viewport;

pub use attributes::SizeModel;
pub use clock::{ClockConfig, VirtualClock};
pub use config::{ConfigError, DatasetConfig, SweepConfig};
pub use data::{Event, PointSet, RenderPoint};
pub use layer::{DrawItem, PointLayer};
pub use parser::{parse_records, ParseResult};
pub use picking::{HoverState, PointerInput, Tooltip, TooltipController};
pub use shading::{FadeShading, PointShading, Rgba, ShaderProgram, ShadingUniforms};
pub use surface::{ingest, Frame, LoadSummary, MapSurface};
pub use viewport::{Camera, ViewConfig, Viewport};
