//! Sass compilation orchestration.
//!
//! The compiler itself is a capability backend
//! ([`crate::backend::StylesheetCompiler`]); this module computes import
//! search directories, validates the configured output style, and rewires
//! the record (`ext`/`media`/`subtype`/`path`/`size`) around the
//! compiled output.

use std::path::PathBuf;

use crate::backend::CompileOptions;
use crate::context::BuildContext;
use crate::error::{AssetError, Result};
use crate::utils::mime::MediaClass;

use super::{Asset, route};

impl Asset {
    /// Compile Sass source to CSS. No-op for non-Sass extensions.
    ///
    /// # Errors
    ///
    /// `ConfigError` if the configured output style is not one of the
    /// enumerated values; `CompilerUnavailable` if no backend is plugged
    /// in; `Backend` if the compilation itself fails.
    pub fn compile(mut self, ctx: &BuildContext) -> Result<Self> {
        if self.compiled || self.missing {
            return Ok(self);
        }
        if !matches!(self.ext.as_str(), "scss" | "sass") {
            return Ok(self);
        }

        let style = ctx.config.assets.compile.output_style()?;
        let compiler = ctx
            .compiler
            .as_deref()
            .ok_or_else(|| AssetError::CompilerUnavailable(self.path.clone()))?;

        self.tags.push("compiled".into());
        let key = self.cache_key(ctx);
        if let Some((meta, content)) = ctx.cache.get::<Self>(&key)? {
            crate::debug!("cache"; "compile hit for {}", self.path);
            self.adopt(meta, content);
            return Ok(self);
        }

        let sourcemap = ctx.config.debug && ctx.config.assets.compile.sourcemap;
        let import_dirs = import_dirs(ctx, &self, sourcemap);
        let source = String::from_utf8_lossy(&self.content).into_owned();
        let options = CompileOptions {
            import_dirs: &import_dirs,
            style,
            variables: &ctx.config.assets.compile.variables,
            sourcemap,
        };
        let css = compiler
            .compile(&source, &options)
            .map_err(|e| AssetError::Backend {
                op: "compile",
                error: e,
            })?;

        self.content = css.into_bytes();
        self.ext = "css".into();
        self.media = MediaClass::Text;
        self.subtype = "text/css".into();
        self.path = route::swap_extension(&self.path, "css");
        self.filename = route::swap_extension(&self.filename, "css");
        self.size = self.content.len() as u64;
        self.compiled = true;

        self.store(ctx, &key)?;
        Ok(self)
    }
}

/// Import search directories: the source file's parent, then every
/// project/theme asset and static root plus the configured
/// sub-directories of each. In debug+sourcemap mode the roots are
/// re-based under the output tree so emitted source maps reference
/// public paths.
fn import_dirs(ctx: &BuildContext, asset: &Asset, sourcemap: bool) -> Vec<PathBuf> {
    let config = &ctx.config;
    let mut dirs = Vec::new();
    if let Some(parent) = asset.file.parent() {
        dirs.push(parent.to_path_buf());
    }
    for root in config.search_roots() {
        for sub in &config.assets.compile.import {
            dirs.push(root.join(sub));
        }
        dirs.push(root);
    }

    if sourcemap {
        let output = config.output_dir();
        dirs = dirs
            .into_iter()
            .map(|dir| {
                dir.strip_prefix(config.root())
                    .map(|rel| output.join(rel))
                    .unwrap_or(dir)
            })
            .collect();
    }
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::testutil::{site, write};
    use crate::asset::{Asset, AssetOptions};
    use crate::backend::{OutputStyle, StylesheetCompiler};
    use crate::error::ConfigError;

    /// Test backend: records the options it saw and returns canned CSS.
    struct FakeCompiler;

    impl StylesheetCompiler for FakeCompiler {
        fn compile(
            &self,
            source: &str,
            options: &CompileOptions<'_>,
        ) -> anyhow::Result<String> {
            assert!(!options.import_dirs.is_empty());
            let body = source.trim().trim_start_matches('$');
            match options.style {
                OutputStyle::Expanded => Ok(format!("/* expanded */\n{body}\n")),
                OutputStyle::Compressed => Ok(body.replace(' ', "")),
            }
        }
    }

    #[test]
    fn test_compile_rewrites_record() {
        let (dir, ctx) = site("");
        let ctx = ctx.with_compiler(Box::new(FakeCompiler));
        write(dir.path(), "assets/css/main.scss", b"a { b: c; }");

        let asset = Asset::new(&ctx, &["css/main.scss"], &AssetOptions::default())
            .unwrap()
            .compile(&ctx)
            .unwrap();

        assert!(asset.compiled);
        assert_eq!(asset.ext, "css");
        assert_eq!(asset.subtype, "text/css");
        assert_eq!(asset.path, "/css/main.css");
        assert_eq!(asset.filename, "main.css");
        assert_eq!(asset.content, b"/* expanded */\na { b: c; }\n");
        assert_eq!(asset.size, asset.content.len() as u64);
        // Source bytes stay untouched.
        assert_eq!(asset.content_source(), b"a { b: c; }");
    }

    #[test]
    fn test_compile_is_idempotent() {
        let (dir, ctx) = site("");
        let ctx = ctx.with_compiler(Box::new(FakeCompiler));
        write(dir.path(), "assets/main.scss", b"a { b: c; }");

        let once = Asset::new(&ctx, &["main.scss"], &AssetOptions::default())
            .unwrap()
            .compile(&ctx)
            .unwrap();
        let twice = once.clone().compile(&ctx).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_compile_noop_for_plain_css() {
        let (dir, ctx) = site("");
        write(dir.path(), "assets/plain.css", b"a{}");

        let asset = Asset::new(&ctx, &["plain.css"], &AssetOptions::default())
            .unwrap()
            .compile(&ctx)
            .unwrap();
        assert!(!asset.compiled);
        assert_eq!(asset.content, b"a{}");
    }

    #[test]
    fn test_compile_invalid_style_is_config_error() {
        let (dir, ctx) = site("");
        let mut ctx = ctx.with_compiler(Box::new(FakeCompiler));
        ctx.config.assets.compile.style = "tight".into();
        write(dir.path(), "assets/main.scss", b"a { b: c; }");

        let result = Asset::new(&ctx, &["main.scss"], &AssetOptions::default())
            .unwrap()
            .compile(&ctx);
        assert!(matches!(
            result,
            Err(crate::AssetError::Config(ConfigError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_compile_without_backend_fails() {
        let (dir, ctx) = site("");
        write(dir.path(), "assets/main.scss", b"a { b: c; }");

        let result = Asset::new(&ctx, &["main.scss"], &AssetOptions::default())
            .unwrap()
            .compile(&ctx);
        assert!(matches!(
            result,
            Err(crate::AssetError::CompilerUnavailable(_))
        ));
    }

    #[test]
    fn test_import_dirs_order_and_subdirs() {
        let (dir, ctx) = site("themes = [\"alpha\"]");
        let ctx = ctx.with_compiler(Box::new(FakeCompiler));
        write(dir.path(), "assets/css/main.scss", b"a { b: c; }");

        let asset = Asset::new(&ctx, &["css/main.scss"], &AssetOptions::default()).unwrap();
        let dirs = import_dirs(&ctx, &asset, false);

        // Source parent first, then roots with their configured subdirs.
        assert_eq!(dirs[0], asset.file.parent().unwrap());
        assert!(dirs.contains(&ctx.config.assets_dir()));
        assert!(dirs.contains(&ctx.config.assets_dir().join("sass")));
        assert!(
            dirs.contains(&ctx.config.theme_dir("alpha").join("assets").join("scss"))
        );
    }

    #[test]
    fn test_import_dirs_rebased_for_sourcemaps() {
        let (dir, ctx) = site("debug = true\n[assets.compile]\nsourcemap = true");
        let ctx = ctx.with_compiler(Box::new(FakeCompiler));
        write(dir.path(), "assets/main.scss", b"a { b: c; }");

        let asset = Asset::new(&ctx, &["main.scss"], &AssetOptions::default()).unwrap();
        let dirs = import_dirs(&ctx, &asset, true);
        let output = ctx.config.output_dir();
        assert!(dirs.iter().all(|d| d.starts_with(&output)));
    }
}
