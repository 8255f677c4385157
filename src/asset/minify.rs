//! CSS/JS minification.
//!
//! Uses oxc for JavaScript and lightningcss for CSS. A parse failure
//! keeps the original bytes (logged at debug level) rather than failing
//! the asset; the `.min` rename still happens so the public path stays
//! deterministic.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use crate::context::BuildContext;
use crate::error::{AssetError, Result};

use super::{Asset, route};

/// Minify JavaScript source code.
pub fn minify_js(source: &str) -> Option<String> {
    let allocator = Allocator::default();
    let source_type = SourceType::mjs();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if !ret.errors.is_empty() {
        return None;
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Some(code)
}

/// Minify CSS source code.
pub fn minify_css(source: &str) -> Option<String> {
    let stylesheet = StyleSheet::parse(source, ParserOptions::default()).ok()?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .ok()?;
    Some(result.code)
}

impl Asset {
    /// Minify CSS/JS content and insert `.min` before the extension.
    ///
    /// No-op when the record is already minified, the path already
    /// carries a `.min.` marker, or a sourcemap is being preserved in a
    /// debug build. Sass sources are compiled first; anything that is
    /// not CSS or JS after that attempt is a `RuntimeError`.
    pub fn minify(mut self, ctx: &BuildContext) -> Result<Self> {
        if self.minified || self.missing {
            return Ok(self);
        }
        // A preserved sourcemap would be invalidated by minification.
        if ctx.config.debug && ctx.config.assets.compile.sourcemap {
            return Ok(self);
        }
        if self.filename.contains(".min.") || self.path.contains(".min.") {
            self.minified = true;
            return Ok(self);
        }

        if matches!(self.ext.as_str(), "scss" | "sass") {
            self = self.compile(ctx)?;
        }
        if !matches!(self.ext.as_str(), "css" | "js") {
            return Err(AssetError::UnsupportedMinifyExtension {
                path: self.path.clone(),
                ext: self.ext.clone(),
            });
        }

        self.tags.push("minified".into());
        let key = self.cache_key(ctx);
        if let Some((meta, content)) = ctx.cache.get::<Self>(&key)? {
            crate::debug!("cache"; "minify hit for {}", self.path);
            self.adopt(meta, content);
            return Ok(self);
        }

        let source = String::from_utf8_lossy(&self.content).into_owned();
        let minified = match self.ext.as_str() {
            "css" => minify_css(&source),
            _ => minify_js(&source),
        };
        match minified {
            Some(code) => self.content = code.into_bytes(),
            None => {
                crate::debug!("assets"; "minification failed for {}, keeping original content", self.path);
            }
        }

        self.path = route::insert_min(&self.path);
        self.filename = route::insert_min(&self.filename);
        self.size = self.content.len() as u64;
        self.minified = true;

        self.store(ctx, &key)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::testutil::{site, tiny_png, write};
    use crate::asset::AssetOptions;

    #[test]
    fn test_minify_css_content() {
        let (dir, ctx) = site("");
        write(dir.path(), "assets/style.css", b"body {  color : red ; }");

        let asset = Asset::new(&ctx, &["style.css"], &AssetOptions::default())
            .unwrap()
            .minify(&ctx)
            .unwrap();

        assert!(asset.minified);
        assert_eq!(asset.path, "/style.min.css");
        assert!(asset.content.len() < b"body {  color : red ; }".len());
        assert_eq!(asset.size, asset.content.len() as u64);
    }

    #[test]
    fn test_minify_js_content() {
        let (dir, ctx) = site("");
        write(
            dir.path(),
            "assets/app.js",
            b"const answer = 40 + 2;\nconsole.log(answer);\n",
        );

        let asset = Asset::new(&ctx, &["app.js"], &AssetOptions::default())
            .unwrap()
            .minify(&ctx)
            .unwrap();

        assert!(asset.minified);
        assert_eq!(asset.path, "/app.min.js");
        assert!(!asset.content.is_empty());
    }

    #[test]
    fn test_minify_is_idempotent() {
        let (dir, ctx) = site("");
        write(dir.path(), "assets/style.css", b"a { b: c; }");

        let once = Asset::new(&ctx, &["style.css"], &AssetOptions::default())
            .unwrap()
            .minify(&ctx)
            .unwrap();
        let twice = once.clone().minify(&ctx).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_premin_path_is_noop() {
        let (dir, ctx) = site("");
        write(dir.path(), "assets/vendor.min.css", b"a{b:c}");

        let asset = Asset::new(&ctx, &["vendor.min.css"], &AssetOptions::default())
            .unwrap()
            .minify(&ctx)
            .unwrap();

        assert!(asset.minified);
        assert_eq!(asset.path, "/vendor.min.css");
        assert_eq!(asset.content, b"a{b:c}");
    }

    #[test]
    fn test_minify_unsupported_extension_fails() {
        let (dir, ctx) = site("");
        write(dir.path(), "assets/dot.png", &tiny_png());

        let result = Asset::new(&ctx, &["dot.png"], &AssetOptions::default())
            .unwrap()
            .minify(&ctx);
        assert!(matches!(
            result,
            Err(AssetError::UnsupportedMinifyExtension { .. })
        ));
    }

    #[test]
    fn test_minify_skipped_when_sourcemap_preserved() {
        let (dir, ctx) = site("debug = true\n[assets.compile]\nsourcemap = true");
        write(dir.path(), "assets/style.css", b"body {  color : red ; }");

        let asset = Asset::new(&ctx, &["style.css"], &AssetOptions::default())
            .unwrap()
            .minify(&ctx)
            .unwrap();

        assert!(!asset.minified);
        assert_eq!(asset.path, "/style.css");
        assert_eq!(asset.content, b"body {  color : red ; }");
    }

    #[test]
    fn test_minify_invalid_css_keeps_original() {
        let (dir, ctx) = site("");
        write(dir.path(), "assets/broken.css", b"this is not { css");

        let asset = Asset::new(&ctx, &["broken.css"], &AssetOptions::default())
            .unwrap()
            .minify(&ctx)
            .unwrap();

        assert!(asset.minified);
        assert_eq!(asset.path, "/broken.min.css");
        assert_eq!(asset.content, b"this is not { css");
    }
}
