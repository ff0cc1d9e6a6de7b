//! Safety tiers used to narrow a Gelbooru search
//! # Post Rating
//! Gelbooru classifies every post into one of 4 ratings, ordered here from least to most
//! restrictive:
//! * `Explicit`: Posts that are explicitly pornographic or have other sensitive content such as gore, etc.
//! * `Questionable`: Posts with nudity or strongly suggestive elements.
//! * `Sensitive`: Mildly suggestive posts, swimsuits and the like.
//! * `General`: Posts that don't involve anything suggestive. Usually normal fanart.
//!
//! A search asks for a *minimum* safety level and then walks every tier from that level up to
//! `General`.
use std::fmt::Display;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rating {
    Explicit = 0,
    Questionable = 1,
    /// Default minimum. Gelbooru has very few `General` posts, so searches start one tier lower.
    #[default]
    Sensitive = 2,
    General = 3,
}

impl Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Rating {
    pub const MAX_LEVEL: u8 = 3;

    /// Name of the rating as used inside the `rating:` search term.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::Questionable => "questionable",
            Self::Sensitive => "sensitive",
            Self::General => "general",
        }
    }

    /// Maps any integer into a tier, clamping it into `0..=3` first.
    pub fn from_level(level: i64) -> Self {
        match level.clamp(0, Self::MAX_LEVEL as i64) {
            0 => Self::Explicit,
            1 => Self::Questionable,
            2 => Self::Sensitive,
            _ => Self::General,
        }
    }

    /// The next safer tier, `None` past `General`.
    pub const fn safer(self) -> Option<Self> {
        match self {
            Self::Explicit => Some(Self::Questionable),
            Self::Questionable => Some(Self::Sensitive),
            Self::Sensitive => Some(Self::General),
            Self::General => None,
        }
    }
}
