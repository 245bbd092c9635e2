//! Import Aliases
//!
//! Every imported module in a generated file is referenced through a short
//! alias. Aliases live in a per-file [`AliasTable`]; within one table they
//! are unique, identifier-safe, and never reassigned once claimed.
//!
//! Candidates, in order of preference:
//! 1. last path segment (`github.com/x/common` -> `common`)
//! 2. last two segments (`x_common`)
//! 3. all segments minus low-information ones (`v2`, `api`, `pkg`, ...)
//! 4. the whole path flattened and truncated
//!
//! A taken candidate is retried with `_1`, `_2`, ... up to a bound before
//! moving on. If everything is taken, a hash of the module path is used,
//! suffixed until unique.
//!
//! Go keywords are never handed out, since an alias is emitted as a package
//! qualifier in Go source.

use std::collections::{BTreeMap, HashSet};

use regex::Regex;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::AliasConfig;
use crate::error::Result;

// =============================================================================
// Alias Table
// =============================================================================

/// module path -> alias, scoped to one generated file
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    aliases: BTreeMap<String, String>,
    taken: HashSet<String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table where `reserved` can never be claimed.
    pub fn with_reserved<I, S>(reserved: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            aliases: BTreeMap::new(),
            taken: reserved.into_iter().map(Into::into).collect(),
        }
    }

    pub fn get(&self, module_path: &str) -> Option<&str> {
        self.aliases.get(module_path).map(String::as_str)
    }

    pub fn is_taken(&self, alias: &str) -> bool {
        self.taken.contains(alias)
    }

    /// Number of assigned aliases (reserved names excluded)
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Claim `alias` for `module_path` if it is free.
    fn try_claim(&mut self, module_path: &str, alias: &str) -> bool {
        if self.taken.contains(alias) {
            return false;
        }
        self.taken.insert(alias.to_string());
        self.aliases.insert(module_path.to_string(), alias.to_string());
        true
    }
}

// =============================================================================
// Alias Assigner
// =============================================================================

/// Go keywords; none of these can qualify an identifier.
pub const GO_KEYWORDS: [&str; 25] = [
    "break", "case", "chan", "const", "continue", "default", "defer", "else",
    "fallthrough", "for", "func", "go", "goto", "if", "import", "interface",
    "map", "package", "range", "return", "select", "struct", "switch", "type",
    "var",
];

/// Which candidate produced an alias
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasStrategy {
    LastSegment,
    LastTwoSegments,
    Filtered,
    Flattened,
    Hashed,
}

/// Assigns aliases under the bounds from [`AliasConfig`].
#[derive(Debug, Clone)]
pub struct AliasAssigner {
    stoplist: Option<Regex>,
    max_length: usize,
    max_suffix_attempts: usize,
    hash_width: usize,
    reserved: Vec<String>,
}

impl AliasAssigner {
    pub fn new(config: &AliasConfig) -> Result<Self> {
        let alternatives = config
            .stoplist
            .iter()
            .map(|pattern| format!("(?:{pattern})"))
            .collect::<Vec<_>>()
            .join("|");
        let stoplist = if alternatives.is_empty() {
            None
        } else {
            Some(Regex::new(&format!("^(?i:{alternatives})$"))?)
        };

        Ok(Self {
            stoplist,
            max_length: config.max_length.max(1),
            max_suffix_attempts: config.max_suffix_attempts,
            hash_width: config.hash_width.clamp(4, 64),
            reserved: config.reserved.clone(),
        })
    }

    /// An empty table seeded with Go keywords and the configured reserved names.
    pub fn new_table(&self) -> AliasTable {
        AliasTable::with_reserved(
            GO_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .chain(self.reserved.iter().cloned()),
        )
    }

    /// The alias for `module_path` in `table`, claiming one if needed.
    pub fn assign(&self, table: &mut AliasTable, module_path: &str) -> String {
        if let Some(existing) = table.get(module_path) {
            return existing.to_string();
        }

        for (strategy, candidate) in self.candidates(module_path) {
            if table.try_claim(module_path, &candidate) {
                debug!(module_path, alias = %candidate, ?strategy, "claimed alias");
                return candidate;
            }
            for n in 1..=self.max_suffix_attempts {
                let suffixed = format!("{candidate}_{n}");
                if table.try_claim(module_path, &suffixed) {
                    debug!(module_path, alias = %suffixed, ?strategy, "claimed suffixed alias");
                    return suffixed;
                }
            }
        }

        let hashed = self.hashed(module_path);
        if table.try_claim(module_path, &hashed) {
            debug!(module_path, alias = %hashed, strategy = ?AliasStrategy::Hashed, "claimed alias");
            return hashed;
        }
        let mut n = 1usize;
        loop {
            let suffixed = format!("{hashed}_{n}");
            if table.try_claim(module_path, &suffixed) {
                debug!(module_path, alias = %suffixed, strategy = ?AliasStrategy::Hashed, "claimed suffixed alias");
                return suffixed;
            }
            n += 1;
        }
    }

    /// Sanitized candidates in preference order, without repeats.
    pub fn candidates(&self, module_path: &str) -> Vec<(AliasStrategy, String)> {
        let segments: Vec<&str> = module_path.split('/').filter(|s| !s.is_empty()).collect();
        let mut raw: Vec<(AliasStrategy, String)> = Vec::with_capacity(4);

        if let Some(last) = segments.last() {
            raw.push((AliasStrategy::LastSegment, last.to_string()));
        }
        if segments.len() >= 2 {
            let tail = &segments[segments.len() - 2..];
            raw.push((AliasStrategy::LastTwoSegments, tail.join("_")));
        }
        let meaningful: Vec<&str> = segments
            .iter()
            .copied()
            .filter(|s| !self.stoplist.as_ref().is_some_and(|re| re.is_match(s)))
            .collect();
        if !meaningful.is_empty() {
            raw.push((AliasStrategy::Filtered, meaningful.join("_")));
        }
        let mut flattened = sanitize(module_path);
        flattened.truncate(self.max_length);
        raw.push((AliasStrategy::Flattened, flattened));

        let mut seen = HashSet::new();
        raw.into_iter()
            .map(|(strategy, candidate)| (strategy, sanitize(&candidate)))
            .filter(|(_, candidate)| candidate.chars().any(|c| c.is_ascii_alphanumeric()))
            .filter(|(_, candidate)| seen.insert(candidate.clone()))
            .collect()
    }

    /// Fixed-width identifier derived from the module path contents.
    fn hashed(&self, module_path: &str) -> String {
        let digest = format!("{:x}", Sha256::digest(module_path.as_bytes()));
        format!("m{}", &digest[..self.hash_width])
    }
}

/// Replace anything outside `[A-Za-z0-9_]` with `_` and make sure the
/// result starts with a letter or underscore.
pub fn sanitize(candidate: &str) -> String {
    let mut out: String = candidate
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if !out.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        out.insert(0, '_');
    }
    out
}

pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
