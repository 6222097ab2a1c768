//! WGSL sources and the shaders composed from them
//!
//! Scene shaders share `common.wgsl` (bindings, vertex input, palette). The
//! blob shader is the lit template with the noise fragments injected.

use super::shader_composer::{InsertionPoint, ShaderComposer, ShaderError, ShaderTemplate};

pub const COMMON: &str = include_str!("../shaders/common.wgsl");
pub const CELL: &str = include_str!("../shaders/cell.wgsl");
pub const LIT: &str = include_str!("../shaders/lit.wgsl");
pub const LINES: &str = include_str!("../shaders/lines.wgsl");

pub const BLOB_VERTEX_PRELUDE: &str = include_str!("../shaders/blob/vertex_prelude.wgsl");
pub const BLOB_VERTEX_POSITION: &str = include_str!("../shaders/blob/vertex_position.wgsl");
pub const BLOB_FRAGMENT_PRELUDE: &str = include_str!("../shaders/blob/fragment_prelude.wgsl");
pub const BLOB_FRAGMENT_COLOR: &str = include_str!("../shaders/blob/fragment_color.wgsl");

pub const FULLSCREEN: &str = include_str!("../shaders/fullscreen.wgsl");
pub const BLOOM_BINDINGS: &str = include_str!("../shaders/bloom_bindings.wgsl");
pub const BLOOM_BRIGHT: &str = include_str!("../shaders/bloom_bright.wgsl");
pub const BLOOM_BLUR: &str = include_str!("../shaders/bloom_blur.wgsl");
pub const COMPOSITE: &str = include_str!("../shaders/composite.wgsl");

/// Noise-displaced, colour-cycling variant of the lit material
pub fn blob_shader() -> Result<String, ShaderError> {
    let template = ShaderTemplate::parse("lit", LIT)?;
    ShaderComposer::new(&template)
        .with_prelude(COMMON)
        .inject(InsertionPoint::VertexPrelude, BLOB_VERTEX_PRELUDE)
        .inject(InsertionPoint::VertexPosition, BLOB_VERTEX_POSITION)
        .inject(InsertionPoint::FragmentPrelude, BLOB_FRAGMENT_PRELUDE)
        .inject(InsertionPoint::FragmentColor, BLOB_FRAGMENT_COLOR)
        .compose()
}

/// Name and full source of every shader the renderer loads
pub fn all_shaders() -> Result<Vec<(&'static str, String)>, ShaderError> {
    Ok(vec![
        ("cell", format!("{COMMON}\n{CELL}")),
        ("blob", blob_shader()?),
        ("lines", format!("{COMMON}\n{LINES}")),
        ("bloom_bright", format!("{FULLSCREEN}\n{BLOOM_BINDINGS}\n{BLOOM_BRIGHT}")),
        ("bloom_blur", format!("{FULLSCREEN}\n{BLOOM_BINDINGS}\n{BLOOM_BLUR}")),
        ("composite", format!("{FULLSCREEN}\n{COMPOSITE}")),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_fragments_are_at_their_points() {
        let source = blob_shader().unwrap();

        let snoise = source.find("fn snoise").unwrap();
        let vs_main = source.find("fn vs_main").unwrap();
        let transformed = source.find("var transformed").unwrap();
        let displacement = source.find("let displacement").unwrap();
        let world = source.find("let world").unwrap();
        let blob_colour = source.find("fn blob_colour").unwrap();
        let fs_main = source.find("fn fs_main").unwrap();
        let diffuse = source.find("var diffuse_color").unwrap();
        let tint = source.find("diffuse_color *= blob_colour").unwrap();
        let lighting = source.find("let irradiance").unwrap();

        assert!(snoise < vs_main);
        assert!(transformed < displacement && displacement < world);
        assert!(vs_main < blob_colour && blob_colour < fs_main);
        assert!(diffuse < tint && tint < lighting);
        assert!(!source.contains("// @insert"));
    }

    #[test]
    fn test_every_shader_has_entry_points() {
        for (name, source) in all_shaders().unwrap() {
            assert!(source.contains("fn vs_main"), "{name} has no vertex stage");
            assert!(source.contains("fn fs_main"), "{name} has no fragment stage");
        }
    }
}
