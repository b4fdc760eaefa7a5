/// The parts of a subscription plan that decide how many venues an owner may run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanTier {
    pub code: String,
    pub name: String,
    pub max_venues: i32,
}

impl PlanTier {
    /// Number of venues an owner on this plan may hold.
    ///
    /// An explicit positive limit wins. Otherwise "pro"/"premium" plans get two
    /// venues and everything else, including having no plan at all, gets one.
    pub fn venue_limit(plan: Option<&PlanTier>) -> u64 {
        let Some(plan) = plan else {
            return 1;
        };

        if plan.max_venues > 0 {
            return plan.max_venues as u64;
        }

        let code = plan.code.to_lowercase();
        let name = plan.name.to_lowercase();
        let is_premium = ["pro", "premium"]
            .iter()
            .any(|tier| code.contains(tier) || name.contains(tier));

        if is_premium { 2 } else { 1 }
    }
}
