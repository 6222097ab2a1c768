//! Composition of WGSL sources from a base template and named fragments
//!
//! A template marks where fragments may go with marker lines of the form
//! `// @insert <point>`. A [`ShaderComposer`] collects fragments per
//! [`InsertionPoint`] and splices them in place of the markers, so the base
//! material never has to be searched and rewritten as text.

use std::collections::HashMap;
use thiserror::Error;

const MARKER: &str = "// @insert ";

/// Named places in a template where fragments are spliced in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertionPoint {
    /// Module scope before the vertex entry point
    VertexPrelude,
    /// Inside `vs_main`, after `transformed` is initialised from the input position
    VertexPosition,
    /// Module scope before the fragment entry point
    FragmentPrelude,
    /// Inside `fs_main`, after `diffuse_color` is initialised from the object colour
    FragmentColor,
}

impl InsertionPoint {
    pub const ALL: [InsertionPoint; 4] = [
        InsertionPoint::VertexPrelude,
        InsertionPoint::VertexPosition,
        InsertionPoint::FragmentPrelude,
        InsertionPoint::FragmentColor,
    ];

    pub fn marker_name(self) -> &'static str {
        match self {
            InsertionPoint::VertexPrelude => "vertex_prelude",
            InsertionPoint::VertexPosition => "vertex_position",
            InsertionPoint::FragmentPrelude => "fragment_prelude",
            InsertionPoint::FragmentColor => "fragment_color",
        }
    }

    fn from_marker_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|point| point.marker_name() == name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShaderError {
    #[error("line {line}: unknown insertion point '{name}'")]
    UnknownInsertionPoint { line: usize, name: String },
    #[error("insertion point '{0}' is marked more than once")]
    DuplicateInsertionPoint(&'static str),
    #[error("template '{template}' has no insertion point '{point}'")]
    MissingInsertionPoint {
        template: String,
        point: &'static str,
    },
}

#[derive(Debug, Clone)]
enum Segment {
    Text(String),
    Insert(InsertionPoint),
}

/// A parsed template: literal text interleaved with insertion points
#[derive(Debug, Clone)]
pub struct ShaderTemplate {
    name: String,
    segments: Vec<Segment>,
}

impl ShaderTemplate {
    pub fn parse(name: &str, source: &str) -> Result<Self, ShaderError> {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut seen = Vec::new();

        for (index, line) in source.lines().enumerate() {
            let Some(marker) = line.trim().strip_prefix(MARKER) else {
                text.push_str(line);
                text.push('\n');
                continue;
            };

            let marker = marker.trim();
            let point = InsertionPoint::from_marker_name(marker).ok_or_else(|| {
                ShaderError::UnknownInsertionPoint {
                    line: index + 1,
                    name: marker.to_string(),
                }
            })?;
            if seen.contains(&point) {
                return Err(ShaderError::DuplicateInsertionPoint(point.marker_name()));
            }
            seen.push(point);

            if !text.is_empty() {
                segments.push(Segment::Text(std::mem::take(&mut text)));
            }
            segments.push(Segment::Insert(point));
        }
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Ok(Self {
            name: name.to_string(),
            segments,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_insertion_point(&self, point: InsertionPoint) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Insert(p) if *p == point))
    }
}

/// Builds one shader from a prelude, a template and injected fragments
pub struct ShaderComposer<'a> {
    template: &'a ShaderTemplate,
    preludes: Vec<&'a str>,
    fragments: HashMap<InsertionPoint, Vec<&'a str>>,
}

impl<'a> ShaderComposer<'a> {
    pub fn new(template: &'a ShaderTemplate) -> Self {
        Self {
            template,
            preludes: Vec::new(),
            fragments: HashMap::new(),
        }
    }

    /// Source placed verbatim before the template, e.g. shared bindings
    pub fn with_prelude(mut self, source: &'a str) -> Self {
        self.preludes.push(source);
        self
    }

    /// Adds a fragment at `point`; several fragments keep their order
    pub fn inject(mut self, point: InsertionPoint, source: &'a str) -> Self {
        self.fragments.entry(point).or_default().push(source);
        self
    }

    pub fn compose(&self) -> Result<String, ShaderError> {
        if let Some(point) = self
            .fragments
            .keys()
            .find(|point| !self.template.has_insertion_point(**point))
        {
            return Err(ShaderError::MissingInsertionPoint {
                template: self.template.name.clone(),
                point: point.marker_name(),
            });
        }

        let mut output = String::new();
        for prelude in &self.preludes {
            push_block(&mut output, prelude);
        }

        for segment in &self.template.segments {
            match segment {
                Segment::Text(text) => output.push_str(text),
                Segment::Insert(point) => {
                    for fragment in self.fragments.get(point).into_iter().flatten() {
                        push_block(&mut output, fragment);
                    }
                }
            }
        }

        Ok(output)
    }
}

fn push_block(output: &mut String, block: &str) {
    output.push_str(block);
    if !block.ends_with('\n') {
        output.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "\
// @insert vertex_prelude
fn vs_main() {
    var transformed = position;
    // @insert vertex_position
}
// @insert fragment_prelude
fn fs_main() {
    var diffuse_color = color;
    // @insert fragment_color
}
";

    #[test]
    fn test_fragments_land_at_their_markers() {
        let template = ShaderTemplate::parse("lit", TEMPLATE).unwrap();
        let source = ShaderComposer::new(&template)
            .with_prelude("struct Globals {};")
            .inject(InsertionPoint::VertexPosition, "    transformed *= 2.0;")
            .inject(InsertionPoint::FragmentColor, "    diffuse_color *= tint;")
            .compose()
            .unwrap();

        assert!(source.starts_with("struct Globals {};\n"));
        let position = source.find("transformed *= 2.0").unwrap();
        assert!(position > source.find("var transformed").unwrap());
        assert!(position < source.find("fn fs_main").unwrap());
        assert!(source.find("diffuse_color *= tint").unwrap() > source.find("var diffuse_color").unwrap());
        assert!(!source.contains(MARKER));
    }

    #[test]
    fn test_multiple_fragments_keep_order() {
        let template = ShaderTemplate::parse("lit", TEMPLATE).unwrap();
        let source = ShaderComposer::new(&template)
            .inject(InsertionPoint::VertexPrelude, "fn a() {}")
            .inject(InsertionPoint::VertexPrelude, "fn b() {}")
            .compose()
            .unwrap();

        assert!(source.find("fn a()").unwrap() < source.find("fn b()").unwrap());
        assert!(source.find("fn b()").unwrap() < source.find("fn vs_main").unwrap());
    }

    #[test]
    fn test_unknown_marker_is_rejected() {
        let error = ShaderTemplate::parse("bad", "// @insert lighting\n").unwrap_err();
        assert_eq!(
            error,
            ShaderError::UnknownInsertionPoint {
                line: 1,
                name: "lighting".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_marker_is_rejected() {
        let source = "// @insert fragment_color\n// @insert fragment_color\n";
        assert_eq!(
            ShaderTemplate::parse("bad", source).unwrap_err(),
            ShaderError::DuplicateInsertionPoint("fragment_color")
        );
    }

    #[test]
    fn test_injection_into_missing_point_fails() {
        let template = ShaderTemplate::parse("plain", "fn fs_main() {}\n").unwrap();
        let error = ShaderComposer::new(&template)
            .inject(InsertionPoint::FragmentColor, "x")
            .compose()
            .unwrap_err();
        assert_eq!(
            error,
            ShaderError::MissingInsertionPoint {
                template: "plain".to_string(),
                point: "fragment_color"
            }
        );
    }
}
