pub mod leveled;
pub mod text;

pub use leveled::{Connector, Engine, Layout, NodeBox};
pub use text::{TextMeasure, TextMeasurer};
