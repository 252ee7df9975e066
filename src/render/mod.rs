//! Report generation: colorized DOT graphs and annotated HTML sources.
//!
//! Both views share one discrete color ramp so a block in the graph
//! view and its source lines are shaded consistently.

pub mod color;
pub mod colorize;
pub mod decor;
pub mod dot;
pub mod html;
pub mod source;

// Re-export main types and functions
pub use color::{Palette, Rgb, BLACK, WHITE};
pub use colorize::{ColorizerRegistry, SyntaxColorizer};
pub use decor::{ColorDecorator, Decorator, PlainDecorator};
pub use dot::write_cfgs;
pub use html::write_sources;
pub use source::SourceManager;
