use std::path::{Path, PathBuf};
use usvg::{Options, Transform, Tree};

use crate::error::{Result, ViewerError};
use crate::jvg::{self, JvgDocument};
use crate::view_transform::DocRect;

pub enum DocumentContent {
    Svg {
        tree: Tree,
        /// Undoes the viewBox-to-size mapping usvg bakes into the tree, so a
        /// region in viewBox units can be handed to resvg.
        size_to_view_box: Transform,
    },
    Jvg(JvgDocument),
}

pub struct Document {
    pub content: DocumentContent,
    pub path: PathBuf,
    /// Intrinsic viewbox: the jvg `viewBox` directive, or the SVG `viewBox`
    /// (its `width`/`height` size when the attribute is absent).
    pub default_box: DocRect,
    pub file_size: u64,
}

impl Document {
    /// Load `path` as jvg when its extension is `jvg`, otherwise as SVG.
    pub fn load(path: &Path) -> Result<Self> {
        let raw_data = std::fs::read(path)?;
        let file_size = raw_data.len() as u64;

        let (content, default_box) = if is_jvg_path(path) {
            let text = String::from_utf8(raw_data)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            let parsed = jvg::parse(&text);
            log::info!(
                "Parsed {}: {} primitives, {} diagnostics",
                path.display(),
                parsed.primitives.len(),
                parsed.diagnostics.len()
            );
            let default_box = parsed.default_box;
            (DocumentContent::Jvg(parsed), default_box)
        } else {
            let (tree, default_box, size_to_view_box) = load_svg(path, &raw_data)?;
            let content = DocumentContent::Svg {
                tree,
                size_to_view_box,
            };
            (content, default_box)
        };

        Ok(Document {
            content,
            path: path.to_path_buf(),
            default_box,
            file_size,
        })
    }

    /// Re-read the source file. The current content is only replaced once the
    /// new content parsed successfully.
    pub fn reload(&mut self) -> Result<()> {
        let fresh = Self::load(&self.path)?;
        *self = fresh;
        Ok(())
    }

    pub fn filename(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
    }

    pub fn diagnostics(&self) -> &[String] {
        match &self.content {
            DocumentContent::Jvg(doc) => &doc.diagnostics,
            DocumentContent::Svg { .. } => &[],
        }
    }

    pub fn file_size_display(&self) -> String {
        if self.file_size < 1024 {
            format!("{} B", self.file_size)
        } else if self.file_size < 1024 * 1024 {
            format!("{:.1} KB", self.file_size as f64 / 1024.0)
        } else {
            format!("{:.1} MB", self.file_size as f64 / (1024.0 * 1024.0))
        }
    }
}

fn load_svg(path: &Path, raw_data: &[u8]) -> Result<(Tree, DocRect, Transform)> {
    let svg_error = |e: usvg::Error| ViewerError::Svg(e.to_string());

    let decoded;
    let data = if raw_data.starts_with(&[0x1f, 0x8b]) {
        decoded = usvg::decompress_svgz(raw_data).map_err(svg_error)?;
        &decoded[..]
    } else {
        raw_data
    };
    let text = std::str::from_utf8(data).map_err(|_| svg_error(usvg::Error::NotAnUtf8Str))?;

    let xml_options = usvg::roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let xml = usvg::roxmltree::Document::parse_with_options(text, xml_options)
        .map_err(|e| svg_error(usvg::Error::ParsingFailed(e)))?;

    let options = Options {
        resources_dir: path.parent().map(Path::to_path_buf),
        ..Options::default()
    };
    let tree = Tree::from_xmltree(&xml, &options).map_err(svg_error)?;

    let size = tree.size();
    let size_box = DocRect::new(0.0, 0.0, size.width() as f64, size.height() as f64);
    let Some(view_box) = xml
        .root_element()
        .attribute("viewBox")
        .and_then(parse_view_box)
    else {
        return Ok((tree, size_box, Transform::identity()));
    };
    if same_box(view_box, size_box) {
        return Ok((tree, view_box, Transform::identity()));
    }

    // usvg wraps the content in one group carrying the viewBox transform
    let root_group = tree.root().children().first().and_then(|node| match node {
        usvg::Node::Group(group) => group.transform().invert(),
        _ => None,
    });
    match root_group {
        Some(size_to_view_box) => Ok((tree, view_box, size_to_view_box)),
        None => {
            log::warn!(
                "{}: no viewBox transform found, using the document size",
                path.display()
            );
            Ok((tree, size_box, Transform::identity()))
        }
    }
}

/// Parse `min-x min-y width height`, separated by whitespace and/or commas.
/// Non-positive sizes disable the viewBox, as in SVG.
fn parse_view_box(value: &str) -> Option<DocRect> {
    let numbers: Vec<f64> = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| token.parse().ok())
        .collect::<Option<_>>()?;
    let &[x, y, width, height] = numbers.as_slice() else {
        return None;
    };
    (width > 0.0 && height > 0.0).then(|| DocRect::new(x, y, width, height))
}

fn same_box(a: DocRect, b: DocRect) -> bool {
    let close = |p: f64, q: f64| (p - q).abs() <= 1e-4 * p.abs().max(q.abs()).max(1.0);
    close(a.x, b.x) && close(a.y, b.y) && close(a.width, b.width) && close(a.height, b.height)
}

pub fn is_jvg_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("jvg"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("assets")
            .join("test_fixtures")
            .join(name)
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("svg-viewer-doc-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_load_svg_uses_view_box() {
        let doc = Document::load(&fixture_path("centered_viewbox.svg")).unwrap();
        assert_eq!(doc.default_box, DocRect::new(-50.0, -50.0, 100.0, 100.0));
    }

    #[test]
    fn test_parse_view_box() {
        assert_eq!(
            parse_view_box("-50 -50 100 100"),
            Some(DocRect::new(-50.0, -50.0, 100.0, 100.0))
        );
        assert_eq!(
            parse_view_box(" 0,0, 10 , 20 "),
            Some(DocRect::new(0.0, 0.0, 10.0, 20.0))
        );
        assert_eq!(parse_view_box("0 0 10"), None);
        assert_eq!(parse_view_box("0 0 -10 10"), None);
        assert_eq!(parse_view_box("0 0 a 10"), None);
    }

    #[test]
    fn test_load_svg() {
        let doc = Document::load(&fixture_path("simple_rect.svg")).unwrap();
        assert!(matches!(doc.content, DocumentContent::Svg { .. }));
        assert_eq!(doc.default_box, DocRect::new(0.0, 0.0, 200.0, 150.0));
        assert_eq!(doc.filename(), "simple_rect.svg");
        assert!(doc.diagnostics().is_empty());
        assert!(doc.file_size > 0);
    }

    #[test]
    fn test_load_jvg() {
        let doc = Document::load(&fixture_path("shapes.jvg")).unwrap();
        let DocumentContent::Jvg(ref parsed) = doc.content else {
            panic!("expected jvg content");
        };
        assert_eq!(parsed.primitives.len(), 4);
        assert_eq!(doc.default_box, DocRect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(doc.diagnostics().len(), 2);
    }

    #[test]
    fn test_load_malformed_svg_fails() {
        let result = Document::load(&fixture_path("malformed.svg"));
        assert!(matches!(result, Err(ViewerError::Svg(_))));
    }

    #[test]
    fn test_load_nonexistent_fails() {
        let result = Document::load(&fixture_path("does_not_exist.jvg"));
        assert!(matches!(result, Err(ViewerError::Io(_))));
    }

    #[test]
    fn test_is_jvg_path() {
        assert!(is_jvg_path(Path::new("a/b.jvg")));
        assert!(is_jvg_path(Path::new("B.JVG")));
        assert!(!is_jvg_path(Path::new("b.svg")));
        assert!(!is_jvg_path(Path::new("jvg")));
    }

    #[test]
    fn test_reload_picks_up_changes() {
        let path = temp_path("reload.jvg");
        std::fs::write(&path, "jvg 1 0\npoint 0 0\n").unwrap();
        let mut doc = Document::load(&path).unwrap();
        assert_eq!(doc.default_box, DocRect::UNIT);

        std::fs::write(&path, "jvg 1 0\nviewBox 0 0 10 10\npoint 0 0\npoint 1 1\n").unwrap();
        doc.reload().unwrap();
        assert_eq!(doc.default_box, DocRect::new(0.0, 0.0, 10.0, 10.0));
        let DocumentContent::Jvg(ref parsed) = doc.content else {
            panic!("expected jvg content");
        };
        assert_eq!(parsed.primitives.len(), 2);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_failed_reload_keeps_content() {
        let path = temp_path("vanishing.jvg");
        std::fs::write(&path, "jvg 1 0\nviewBox 0 0 4 4\n").unwrap();
        let mut doc = Document::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(doc.reload().is_err());
        assert_eq!(doc.default_box, DocRect::new(0.0, 0.0, 4.0, 4.0));
    }

    #[test]
    fn test_file_size_display_bytes() {
        let doc = Document::load(&fixture_path("shapes.jvg")).unwrap();
        assert!(doc.file_size_display().ends_with(" B"));
    }
}
