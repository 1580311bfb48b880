//! Read-only category reference data.
//!
//! Categories tie a document to the roles entitled to be notified about it.
//! The table is static: the pipeline consults it to pick a default category
//! for the uploading role, and the notification dispatcher consults it to
//! resolve the audience.

use crate::roles::RoleCode;

/// A document category with its notification audience.
#[derive(Debug, Clone, Copy)]
pub struct Category {
    /// Stable category code stored on document rows.
    pub code: &'static str,
    /// Human-readable display name.
    pub name: &'static str,
    /// Relative weight used for within-category ranking.
    pub priority_weight: u8,
    /// Roles entitled to a notification when a document lands here.
    pub target_roles: &'static [RoleCode],
}

static CATEGORIES: [Category; 5] = [
    Category {
        code: "INCIDENT",
        name: "Incident Report",
        priority_weight: 5,
        target_roles: &[RoleCode::StationCtrl, RoleCode::Safety, RoleCode::Executive],
    },
    Category {
        code: "SAFETY_BULLETIN",
        name: "Safety Bulletin",
        priority_weight: 4,
        target_roles: &[RoleCode::Safety, RoleCode::StationCtrl],
    },
    Category {
        code: "MAINTENANCE",
        name: "Maintenance Record",
        priority_weight: 3,
        target_roles: &[RoleCode::Maintenance, RoleCode::Operations],
    },
    Category {
        code: "OPERATIONS",
        name: "Operations Notice",
        priority_weight: 2,
        target_roles: &[RoleCode::Operations, RoleCode::StationCtrl],
    },
    Category {
        code: "GENERAL",
        name: "General Document",
        priority_weight: 1,
        target_roles: &[RoleCode::Executive],
    },
];

/// Look up a category by its stable code.
pub fn by_code(code: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|category| category.code == code)
}

/// Default category assigned to uploads from a given role.
pub fn default_for_role(role: RoleCode) -> &'static Category {
    let code = match role {
        RoleCode::StationCtrl => "INCIDENT",
        RoleCode::Safety => "SAFETY_BULLETIN",
        RoleCode::Maintenance => "MAINTENANCE",
        RoleCode::Operations => "OPERATIONS",
        RoleCode::Executive => "GENERAL",
    };
    by_code(code).expect("default category table is complete")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_code_finds_known_categories() {
        assert!(by_code("INCIDENT").is_some());
        assert!(by_code("UNKNOWN").is_none());
    }

    #[test]
    fn every_role_maps_to_a_default_category() {
        for role in RoleCode::ALL {
            let category = default_for_role(role);
            assert!(!category.target_roles.is_empty());
        }
    }

    #[test]
    fn incident_audience_includes_safety() {
        let incident = by_code("INCIDENT").expect("incident category");
        assert!(incident.target_roles.contains(&RoleCode::Safety));
        assert_eq!(incident.priority_weight, 5);
    }
}
