//! Content-hash fingerprinting of public paths.

use crate::context::BuildContext;
use crate::error::Result;
use crate::utils::hash;

use super::{Asset, route};

impl Asset {
    /// Insert a content digest into the public path
    /// (`styles.css` → `styles.<md5>.css`).
    ///
    /// The digest always covers `content_source`, so the fingerprint is
    /// identical whether it is taken before or after compile/minify: a
    /// stable fingerprint regardless of optimization settings.
    pub fn fingerprint(mut self, ctx: &BuildContext) -> Result<Self> {
        if self.fingerprinted || self.missing {
            return Ok(self);
        }

        self.tags.push("fingerprinted".into());
        let key = self.cache_key(ctx);
        if let Some((meta, content)) = ctx.cache.get::<Self>(&key)? {
            crate::debug!("cache"; "fingerprint hit for {}", self.path);
            self.adopt(meta, content);
            return Ok(self);
        }

        let digest = hash::md5_hex(&self.content_source);
        self.path = route::insert_fingerprint(&self.path, &digest);
        self.fingerprinted = true;

        self.store(ctx, &key)?;
        Ok(self)
    }
}
