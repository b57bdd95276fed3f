//! Choice of library sections to refresh for a job.
//!
//! # Design
//! - Categories match exactly after trimming; case is significant.
//! - TV categories are checked before movie categories.
//! - Automatic targets come first, in catalog order, followed by the custom
//!   identifiers in configured order. Duplicates are kept.
//! - Under `Both`, an unmatched category still refreshes the custom sections.

use plexhook_config::{CategoryMapping, RefreshStrategy};

use crate::error::TargetingError;
use crate::plex::{LibrarySection, SectionKind};

/// Targets decided before the catalog is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPlan {
    auto_kind: Option<SectionKind>,
    custom: Vec<String>,
}

impl TargetPlan {
    /// Plan targets for `category` under `strategy`.
    ///
    /// # Errors
    ///
    /// Returns [`TargetingError::CategoryMismatch`] when the strategy is
    /// `Auto` and the category matches neither list.
    pub fn new(
        strategy: RefreshStrategy,
        category: &str,
        mapping: &CategoryMapping,
    ) -> Result<Self, TargetingError> {
        let auto_kind = if strategy.includes_auto() {
            classify_category(category, mapping)
        } else {
            None
        };
        if strategy == RefreshStrategy::Auto && auto_kind.is_none() {
            return Err(TargetingError::CategoryMismatch {
                category: category.to_string(),
            });
        }
        let custom = if strategy.includes_custom() {
            mapping.custom_sections.clone()
        } else {
            Vec::new()
        };
        Ok(Self { auto_kind, custom })
    }

    /// Whether the section catalog must be fetched.
    #[must_use]
    pub const fn needs_catalog(&self) -> bool {
        self.auto_kind.is_some()
    }

    /// Section kind matched by the job category, if any.
    #[must_use]
    pub const fn auto_kind(&self) -> Option<SectionKind> {
        self.auto_kind
    }

    /// Ordered section identifiers given the server's catalog.
    #[must_use]
    pub fn resolve(&self, catalog: &[LibrarySection]) -> Vec<String> {
        let mut targets: Vec<String> = self.auto_kind.map_or_else(Vec::new, |kind| {
            catalog
                .iter()
                .filter(|section| section.kind == kind)
                .map(|section| section.id.clone())
                .collect()
        });
        targets.extend(self.custom.iter().cloned());
        targets
    }
}

/// Section kind for a job category, TV first.
#[must_use]
pub fn classify_category(category: &str, mapping: &CategoryMapping) -> Option<SectionKind> {
    let category = category.trim();
    if category.is_empty() {
        return None;
    }
    let listed = |entries: &[String]| {
        entries
            .iter()
            .any(|entry| entry.trim() == category)
    };
    if listed(&mapping.tv_categories) {
        Some(SectionKind::Show)
    } else if listed(&mapping.movie_categories) {
        Some(SectionKind::Movie)
    } else {
        None
    }
}

/// Ordered section identifiers to refresh for a job.
///
/// # Errors
///
/// See [`TargetPlan::new`].
pub fn compute_targets(
    strategy: RefreshStrategy,
    category: &str,
    mapping: &CategoryMapping,
    catalog: &[LibrarySection],
) -> Result<Vec<String>, TargetingError> {
    Ok(TargetPlan::new(strategy, category, mapping)?.resolve(catalog))
}
