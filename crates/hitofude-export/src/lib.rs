//! hitofude-export: Pure format serializers (sans-IO)
//!
//! Converts solved stroke paths into output formats. Currently supports
//! SVG. Future formats: G-code, HPGL.

pub mod svg;

pub use svg::{SvgMetadata, build_path_data, to_svg};
