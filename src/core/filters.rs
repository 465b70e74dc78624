use crate::models::{BoardRequirement, ProfileSnapshot};

/// Hard pre-filter applied before scoring a board's applicant list
///
/// Inactive profiles never reach the scorer. Gender is the one requirement
/// without a weight slider, so when a board configures it, it acts as a
/// hard gate here rather than a weighted term.
#[inline]
pub fn passes_prefilter(profile: &ProfileSnapshot, requirement: &BoardRequirement) -> bool {
    if !profile.is_active {
        return false;
    }

    if !requirement.genders.is_empty() {
        match &profile.gender {
            Some(gender) if requirement.genders.contains(gender) => {}
            _ => return false,
        }
    }

    true
}
