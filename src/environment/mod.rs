//! Environment features and deployment variants
//!
//! Feature support is probed once at startup and handed to the resolver as
//! configuration; the resolver never re-probes per call.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::value::{PropertyKey, Symbol};

/// String key holding the iteration capability where symbols are unavailable.
pub const LEGACY_ITERATOR_KEY: &str = "@@iterator";

/// Disables symbol-keyed capabilities when set.
pub const NO_SYMBOLS_VAR: &str = "GET_ITERATOR_NO_SYMBOLS";

/// Disables big-integer primitives when set.
pub const NO_BIGINT_VAR: &str = "GET_ITERATOR_NO_BIGINT";

/// Selects the deployment variant (`node` for native).
pub const VARIANT_VAR: &str = "TEST_VARIANT";

/// Runtime feature support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    /// Symbol-keyed iteration capabilities are supported
    pub iteration_capability: bool,

    /// Big-integer primitives exist
    pub big_int: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            iteration_capability: true,
            big_int: true,
        }
    }
}

impl Features {
    /// An environment predating symbols and big integers.
    pub fn legacy() -> Self {
        Self {
            iteration_capability: false,
            big_int: false,
        }
    }

    /// Probe the process environment. A feature is off when its variable is
    /// set to anything other than `0` or the empty string.
    pub fn detect() -> Self {
        let features = Self::from_flags(
            std::env::var(NO_SYMBOLS_VAR).ok().as_deref(),
            std::env::var(NO_BIGINT_VAR).ok().as_deref(),
        );
        debug!(
            iteration_capability = features.iteration_capability,
            big_int = features.big_int,
            "detected environment features"
        );
        features
    }

    /// Features from the raw values of the disabling variables.
    pub fn from_flags(no_symbols: Option<&str>, no_bigint: Option<&str>) -> Self {
        Self {
            iteration_capability: !flag_set(no_symbols),
            big_int: !flag_set(no_bigint),
        }
    }

    /// Property key the capability lives under.
    pub fn capability_key(&self) -> PropertyKey {
        if self.iteration_capability {
            PropertyKey::Symbol(Symbol::iterator())
        } else {
            PropertyKey::from(LEGACY_ITERATOR_KEY)
        }
    }
}

fn flag_set(value: Option<&str>) -> bool {
    value.map_or(false, |value| !value.is_empty() && value != "0")
}

/// Deployment variant. Both must behave identically wherever symbols exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// Generic build honouring every feature flag
    #[default]
    Standard,
    /// Build specialised for runtimes with built-in symbol support
    Native,
}

/// Unrecognised variant name.
#[derive(Debug, Error)]
#[error("unknown variant '{0}' (expected 'standard' or 'native')")]
pub struct UnknownVariant(String);

impl FromStr for Variant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(Variant::Standard),
            "native" | "node" => Ok(Variant::Native),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Variant::Standard => "standard",
            Variant::Native => "native",
        })
    }
}

impl Variant {
    /// Read `TEST_VARIANT`; unset or unrecognised means standard.
    pub fn from_env() -> Self {
        Self::from_name(std::env::var(VARIANT_VAR).ok().as_deref())
    }

    /// Variant named by `name`, falling back to standard.
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(str::parse::<Variant>) {
            Some(Ok(variant)) => variant,
            Some(Err(err)) => {
                debug!(%err, "falling back to the standard variant");
                Variant::Standard
            }
            None => Variant::Standard,
        }
    }
}

/// Everything the resolver needs to know about its environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolverConfig {
    /// Probed feature support
    pub features: Features,

    /// Deployment variant
    pub variant: Variant,
}

impl ResolverConfig {
    /// Probe features and variant from the process environment.
    pub fn from_env() -> Self {
        Self {
            features: Features::detect(),
            variant: Variant::from_env(),
        }
    }

    /// Replace the feature set.
    pub fn with_features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    /// Replace the variant.
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Features after applying the variant: the native variant assumes
    /// symbol support whatever the probe said.
    pub fn effective_features(&self) -> Features {
        match self.variant {
            Variant::Standard => self.features,
            Variant::Native => Features {
                iteration_capability: true,
                ..self.features
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_key() {
        assert_eq!(
            Features::default().capability_key(),
            PropertyKey::Symbol(Symbol::iterator())
        );
        assert_eq!(
            Features::legacy().capability_key(),
            PropertyKey::from(LEGACY_ITERATOR_KEY)
        );
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!("node".parse::<Variant>().unwrap(), Variant::Native);
        assert_eq!("Standard".parse::<Variant>().unwrap(), Variant::Standard);
        assert!("deno".parse::<Variant>().is_err());
        assert_eq!(Variant::Native.to_string(), "native");
    }

    #[test]
    fn test_flag_values() {
        assert!(!flag_set(None));
        assert!(!flag_set(Some("")));
        assert!(!flag_set(Some("0")));
        assert!(flag_set(Some("1")));
        assert!(flag_set(Some("yes")));
    }

    #[test]
    fn test_features_from_flags() {
        assert_eq!(Features::from_flags(None, None), Features::default());
        assert_eq!(Features::from_flags(Some("0"), Some("")), Features::default());
        assert_eq!(Features::from_flags(Some("1"), Some("1")), Features::legacy());

        let no_symbols = Features::from_flags(Some("1"), None);
        assert!(!no_symbols.iteration_capability);
        assert!(no_symbols.big_int);
    }

    #[test]
    fn test_variant_from_name() {
        assert_eq!(Variant::from_name(None), Variant::Standard);
        assert_eq!(Variant::from_name(Some("node")), Variant::Native);
        assert_eq!(Variant::from_name(Some("native")), Variant::Native);
        assert_eq!(Variant::from_name(Some("standard")), Variant::Standard);
        assert_eq!(Variant::from_name(Some("deno")), Variant::Standard);
        assert_eq!(Variant::from_name(Some("")), Variant::Standard);
    }

    #[test]
    fn test_native_variant_forces_symbols() {
        let config = ResolverConfig::default()
            .with_features(Features::legacy())
            .with_variant(Variant::Native);
        let effective = config.effective_features();
        assert!(effective.iteration_capability);
        assert!(!effective.big_int);

        let standard = config.with_variant(Variant::Standard);
        assert!(!standard.effective_features().iteration_capability);
    }
}
