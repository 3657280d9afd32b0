//! Subscription plan tiers and per-resource creation ceilings.
//!
//! Ceilings are enforced at write time by a guarded counter increment inside
//! the insert transaction (see `countersign_db::repositories::UserRepo`), so
//! two concurrent creates cannot both slip under the limit.

use serde::Serialize;

use crate::error::CoreError;

/// Subscription tier attached to every user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Pro,
    Studio,
}

/// Per-resource creation ceilings for a plan tier.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PlanLimits {
    pub templates: i64,
    pub proposals: i64,
    pub contracts: i64,
    pub clients: i64,
    pub boards: i64,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Pro => "pro",
            Plan::Studio => "studio",
        }
    }

    /// Parse a stored plan name. Unknown names are a validation error so a
    /// corrupted row surfaces loudly instead of silently granting ceilings.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "free" => Ok(Plan::Free),
            "pro" => Ok(Plan::Pro),
            "studio" => Ok(Plan::Studio),
            other => Err(CoreError::Validation(format!("Unknown plan '{other}'"))),
        }
    }

    /// The creation ceilings for this tier.
    pub fn limits(&self) -> PlanLimits {
        match self {
            Plan::Free => PlanLimits {
                templates: 3,
                proposals: 5,
                contracts: 3,
                clients: 10,
                boards: 1,
            },
            Plan::Pro => PlanLimits {
                templates: 50,
                proposals: 100,
                contracts: 100,
                clients: 250,
                boards: 10,
            },
            Plan::Studio => PlanLimits {
                templates: 500,
                proposals: 1000,
                contracts: 1000,
                clients: 2500,
                boards: 50,
            },
        }
    }
}

/// Usage counters subject to plan ceilings.
///
/// Maps to a fixed column on the `users` table; keeping this a closed enum
/// is what makes interpolating the column name into SQL safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageCounter {
    Templates,
    Proposals,
    Contracts,
    Clients,
    Boards,
}

impl UsageCounter {
    pub fn column(&self) -> &'static str {
        match self {
            UsageCounter::Templates => "templates_count",
            UsageCounter::Proposals => "proposals_count",
            UsageCounter::Contracts => "contracts_count",
            UsageCounter::Clients => "clients_count",
            UsageCounter::Boards => "boards_count",
        }
    }

    /// Human-readable resource name for limit error messages.
    pub fn resource_name(&self) -> &'static str {
        match self {
            UsageCounter::Templates => "templates",
            UsageCounter::Proposals => "proposals",
            UsageCounter::Contracts => "contracts",
            UsageCounter::Clients => "clients",
            UsageCounter::Boards => "boards",
        }
    }

    /// The ceiling for this counter under the given plan.
    pub fn limit(&self, plan: Plan) -> i64 {
        let limits = plan.limits();
        match self {
            UsageCounter::Templates => limits.templates,
            UsageCounter::Proposals => limits.proposals,
            UsageCounter::Contracts => limits.contracts,
            UsageCounter::Clients => limits.clients,
            UsageCounter::Boards => limits.boards,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips() {
        for plan in [Plan::Free, Plan::Pro, Plan::Studio] {
            assert_eq!(Plan::parse(plan.as_str()).unwrap(), plan);
        }
    }

    #[test]
    fn unknown_plan_rejected() {
        assert!(Plan::parse("enterprise").is_err());
    }

    #[test]
    fn tiers_are_strictly_increasing() {
        let free = Plan::Free.limits();
        let pro = Plan::Pro.limits();
        let studio = Plan::Studio.limits();
        assert!(free.templates < pro.templates && pro.templates < studio.templates);
        assert!(free.proposals < pro.proposals && pro.proposals < studio.proposals);
        assert!(free.contracts < pro.contracts && pro.contracts < studio.contracts);
        assert!(free.clients < pro.clients && pro.clients < studio.clients);
        assert!(free.boards < pro.boards && pro.boards < studio.boards);
    }

    #[test]
    fn counter_limit_matches_plan_table() {
        assert_eq!(UsageCounter::Templates.limit(Plan::Free), 3);
        assert_eq!(UsageCounter::Boards.limit(Plan::Studio), 50);
    }
}
