//! Archival-aware resolution of the current published version per check family.
//!
//! A family is the set of published checks sharing a published prefix. Only
//! families whose working check exists and is not archived are visible to
//! discovery queries; archived families keep their published history but drop
//! out of "latest" listings.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::domain::EligibilityCheck;
use crate::repository::{CheckRepository, DualStateStore};
use crate::service::ServiceError;
use crate::versioning::{compare_versions, MalformedVersionError};

/// Reduce `published` to the highest version of every live family. Families
/// appear in the order their first version was seen; version ties keep the
/// first-seen entry.
pub fn latest_visible_versions(
    working: &[EligibilityCheck],
    published: Vec<EligibilityCheck>,
) -> Result<Vec<EligibilityCheck>, MalformedVersionError> {
    let live_families: HashSet<String> = working
        .iter()
        .filter(|check| !check.is_archived)
        .map(EligibilityCheck::published_prefix)
        .collect();

    let mut latest: Vec<EligibilityCheck> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for check in published {
        let prefix = check.published_prefix();
        if !live_families.contains(&prefix) {
            continue;
        }
        match positions.get(&prefix) {
            Some(&index) => {
                if compare_versions(&check.version, &latest[index].version)? == Ordering::Greater {
                    latest[index] = check;
                }
            }
            None => {
                positions.insert(prefix, latest.len());
                latest.push(check);
            }
        }
    }

    Ok(latest)
}

/// Resolves published custom checks for an owner while honouring archival.
#[derive(Clone)]
pub struct ArchivalResolver {
    checks: CheckRepository,
}

impl ArchivalResolver {
    pub fn new(checks: CheckRepository) -> Self {
        Self { checks }
    }

    pub fn latest_published_checks(
        &self,
        owner_id: &str,
    ) -> Result<Vec<EligibilityCheck>, ServiceError> {
        let working = self.checks.list_working(owner_id)?;
        let published = self.checks.list_published(owner_id)?;
        let latest = latest_visible_versions(&working, published)?;
        debug!(owner_id, families = latest.len(), "resolved latest published checks");
        Ok(latest)
    }

    /// A published check is hidden when it belongs to another owner or when
    /// its working check has been archived.
    pub fn published_custom_check(
        &self,
        owner_id: &str,
        check_id: &str,
    ) -> Result<Option<EligibilityCheck>, ServiceError> {
        let Some(check) = self.checks.get_published(check_id)? else {
            return Ok(None);
        };
        if check.owner_id != owner_id {
            return Ok(None);
        }

        let archived = self
            .checks
            .get_working_metadata_only(&check.working_id())?
            .is_some_and(|working| working.is_archived);
        if archived {
            debug!(owner_id, check_id, "published check hidden by archived working check");
            return Ok(None);
        }

        Ok(Some(check))
    }
}
