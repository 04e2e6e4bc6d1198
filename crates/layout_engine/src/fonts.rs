//! Font pair resolution for runs

use doc_model::{FontPair, TextEncoding};
use text_engine::{FontId, FontRegistry, Script};

/// Resolved primary and fallback fonts of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunFonts {
    pub primary: FontId,
    pub fallback: FontId,
}

impl RunFonts {
    pub fn resolve(registry: &mut FontRegistry, fonts: &FontPair, encoding: TextEncoding) -> Self {
        Self {
            primary: registry.resolve(&fonts.primary, encoding),
            fallback: registry.resolve(&fonts.fallback, encoding),
        }
    }

    /// Narrow text uses the primary font, wide text the fallback
    pub fn for_script(&self, script: Script) -> FontId {
        match script {
            Script::Narrow => self.primary,
            Script::Wide => self.fallback,
        }
    }
}
