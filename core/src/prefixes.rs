//! Prefix and base-IRI declarations.
//!
//! Declarations are write-once: binding a prefix or the base again to the
//! same IRI is accepted silently, binding it to a different IRI fails.

use indexmap::IndexMap;
use url::Url;

use crate::error::PrefixError;
use crate::serializer::rls;

/// The base IRI and prefix bindings of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixDeclarations {
    base: Option<String>,
    prefixes: IndexMap<String, String>,
}

/// Returns true if `iri` has a scheme, i.e. parses as an absolute URL.
#[must_use]
pub fn is_absolute(iri: &str) -> bool {
    Url::parse(iri).is_ok()
}

impl PrefixDeclarations {
    /// No base and no prefixes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The declared base IRI.
    #[must_use]
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Declares the base IRI.
    ///
    /// # Errors
    ///
    /// Returns [`PrefixError::InvalidIri`] if `iri` is not absolute and
    /// [`PrefixError::BaseConflict`] if a different base is already set.
    pub fn set_base(&mut self, iri: impl Into<String>) -> Result<(), PrefixError> {
        let iri = iri.into();
        if !is_absolute(&iri) {
            return Err(PrefixError::InvalidIri {
                iri,
                reason: "the base IRI must be absolute".to_owned(),
            });
        }
        match &self.base {
            Some(existing) if *existing != iri => Err(PrefixError::BaseConflict {
                existing: existing.clone(),
                requested: iri,
            }),
            Some(_) => Ok(()),
            None => {
                tracing::trace!(base = %iri, "base IRI declared");
                self.base = Some(iri);
                Ok(())
            }
        }
    }

    /// Binds `prefix` (without the trailing colon) to an IRI. A relative IRI
    /// is resolved against the base first.
    ///
    /// # Errors
    ///
    /// Returns [`PrefixError::PrefixConflict`] if the prefix is bound to a
    /// different IRI, or the error of [`Self::absolutize`].
    pub fn set_prefix(
        &mut self,
        prefix: impl Into<String>,
        iri: impl Into<String>,
    ) -> Result<(), PrefixError> {
        let prefix = prefix.into();
        let iri = self.absolutize(&iri.into())?;
        match self.prefixes.get(&prefix) {
            Some(existing) if *existing != iri => Err(PrefixError::PrefixConflict {
                prefix,
                existing: existing.clone(),
                requested: iri,
            }),
            Some(_) => Ok(()),
            None => {
                tracing::trace!(%prefix, %iri, "prefix declared");
                self.prefixes.insert(prefix, iri);
                Ok(())
            }
        }
    }

    /// The IRI bound to `prefix`.
    #[must_use]
    pub fn prefix(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    /// Expands `prefix:local`.
    ///
    /// # Errors
    ///
    /// Returns [`PrefixError::UndeclaredPrefix`] if `prefix` is unbound.
    pub fn resolve_prefixed_name(&self, prefix: &str, local: &str) -> Result<String, PrefixError> {
        self.prefixes
            .get(prefix)
            .map(|iri| format!("{iri}{local}"))
            .ok_or_else(|| PrefixError::UndeclaredPrefix(prefix.to_owned()))
    }

    /// Resolves an IRI reference against the base (RFC 3986). Absolute IRIs
    /// are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`PrefixError::MissingBase`] for a relative IRI when no base
    /// is declared, and [`PrefixError::InvalidIri`] if resolution fails.
    pub fn absolutize(&self, iri: &str) -> Result<String, PrefixError> {
        if is_absolute(iri) {
            return Ok(iri.to_owned());
        }
        let base = self
            .base
            .as_deref()
            .ok_or_else(|| PrefixError::MissingBase(iri.to_owned()))?;
        Url::parse(base)
            .and_then(|base| base.join(iri))
            .map(String::from)
            .map_err(|e| PrefixError::InvalidIri {
                iri: iri.to_owned(),
                reason: e.to_string(),
            })
    }

    /// Resolves a bare name such as `c` in `p(c)`: the base IRI is used as a
    /// namespace and prepended when declared, otherwise the name is kept.
    #[must_use]
    pub fn resolve_bare_name(&self, name: &str) -> String {
        match &self.base {
            Some(base) => format!("{base}{name}"),
            None => name.to_owned(),
        }
    }

    /// `iri` as `prefix:local` using the longest matching prefix, or `None`.
    /// The base is never used: a bare name only means base + name while the
    /// same base is in effect.
    #[must_use]
    pub fn abbreviate(&self, iri: &str) -> Option<String> {
        self.prefixes
            .iter()
            .filter_map(|(prefix, ns)| {
                iri.strip_prefix(ns.as_str())
                    .filter(|local| rls::is_local_name(local))
                    .map(|local| (prefix, ns.len(), local))
            })
            .max_by_key(|(_, len, _)| *len)
            .map(|(prefix, _, local)| format!("{prefix}:{local}"))
    }

    /// Adds every declaration of `other`.
    ///
    /// # Errors
    ///
    /// Fails on the first base or prefix conflict; declarations merged before
    /// the conflict are kept.
    pub fn merge(&mut self, other: &PrefixDeclarations) -> Result<(), PrefixError> {
        if let Some(base) = &other.base {
            self.set_base(base.clone())?;
        }
        for (prefix, iri) in &other.prefixes {
            self.set_prefix(prefix.clone(), iri.clone())?;
        }
        Ok(())
    }

    /// Prefix bindings in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.prefixes
            .iter()
            .map(|(prefix, iri)| (prefix.as_str(), iri.as_str()))
    }

    /// Returns true if neither a base nor any prefix is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base.is_none() && self.prefixes.is_empty()
    }
}
