//! Curative treatment plans and preventive strategies.

use super::{descending, Budget};
use crate::knowledge::health::{
    prevention_strategies, treatment_products, PreventionCategory, PreventionStrategy, Severity,
    TreatmentCategory, TreatmentProduct,
};
use crate::knowledge::{parse_label, Region};
use serde::Serialize;

const CATEGORIES_PER_PLAN: usize = 2;
const PRODUCTS_PER_CATEGORY: usize = 2;
const STRATEGIES_PER_CATEGORY: usize = 3;
const PRIORITY_ACTIONS_PER_CATEGORY: usize = 2;

fn preferred_categories(budget: Budget) -> [TreatmentCategory; 2] {
    match budget {
        Budget::Limite => [TreatmentCategory::Traditionnel, TreatmentCategory::Biologique],
        Budget::Modere => [TreatmentCategory::Biologique, TreatmentCategory::Chimique],
        Budget::Eleve => [TreatmentCategory::Chimique, TreatmentCategory::Biologique],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FarmingSystem {
    #[serde(rename = "traditionnel")]
    Traditionnel,
    #[serde(rename = "biologique")]
    Biologique,
    #[serde(rename = "intensif")]
    Intensif,
}

impl FarmingSystem {
    /// Unrecognised systems are treated as intensive.
    pub fn parse_or_intensive(raw: &str) -> Self {
        parse_label(
            raw,
            "farming_system",
            &[
                ("traditionnel", FarmingSystem::Traditionnel),
                ("biologique", FarmingSystem::Biologique),
            ],
        )
        .unwrap_or(FarmingSystem::Intensif)
    }

    fn priority_categories(&self) -> [PreventionCategory; 3] {
        match self {
            FarmingSystem::Traditionnel => [
                PreventionCategory::Culturales,
                PreventionCategory::Sanitaires,
                PreventionCategory::Nutritionnelles,
            ],
            FarmingSystem::Biologique => [
                PreventionCategory::Biologiques,
                PreventionCategory::Culturales,
                PreventionCategory::Physiques,
            ],
            FarmingSystem::Intensif => [
                PreventionCategory::Physiques,
                PreventionCategory::Biologiques,
                PreventionCategory::Nutritionnelles,
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleStep {
    pub when: &'static str,
    pub actions: &'static [&'static str],
}

static TREATMENT_SCHEDULE: [ScheduleStep; 4] = [
    ScheduleStep {
        when: "immédiat",
        actions: &["Nettoyage zone affectée", "Application première dose"],
    },
    ScheduleStep {
        when: "7_jours",
        actions: &["Évaluation évolution", "Deuxième application si nécessaire"],
    },
    ScheduleStep {
        when: "14_jours",
        actions: &["Contrôle efficacité", "Troisième application si persistance"],
    },
    ScheduleStep {
        when: "21_jours",
        actions: &["Bilan traitement", "Mesures préventives"],
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreatmentPlan {
    pub diagnosis: String,
    pub crop: String,
    pub severity: Severity,
    pub budget: Budget,
    pub categories: Vec<TreatmentCategory>,
    pub items: Vec<&'static TreatmentProduct>,
    pub schedule: &'static [ScheduleStep],
    pub total_cost: f64,
    pub average_efficacy: f64,
}

/// Category order for a budget, adjusted for severity.
///
/// `critique` puts chemical control first; `faible` sticks to traditional and
/// biological remedies whatever the budget.
fn treatment_categories(severity: Severity, budget: Budget) -> Vec<TreatmentCategory> {
    let mut order: Vec<TreatmentCategory> = match severity {
        Severity::Faible => vec![TreatmentCategory::Traditionnel, TreatmentCategory::Biologique],
        Severity::Critique => {
            let mut order = vec![TreatmentCategory::Chimique];
            order.extend(preferred_categories(budget));
            order
        }
        _ => preferred_categories(budget).to_vec(),
    };
    let mut seen = Vec::with_capacity(order.len());
    order.retain(|c| {
        if seen.contains(c) {
            false
        } else {
            seen.push(*c);
            true
        }
    });
    order.truncate(CATEGORIES_PER_PLAN);
    order
}

fn best_products(category: TreatmentCategory) -> Vec<&'static TreatmentProduct> {
    let mut products: Vec<_> = treatment_products(category).collect();
    products.sort_by(|a, b| descending(a.efficacy, b.efficacy));
    products.truncate(PRODUCTS_PER_CATEGORY);
    products
}

pub fn plan_treatment(diagnosis: &str, crop: &str, severity: Severity, budget: Budget) -> TreatmentPlan {
    let categories = treatment_categories(severity, budget);
    let items: Vec<&'static TreatmentProduct> =
        categories.iter().flat_map(|c| best_products(*c)).collect();

    let total_cost = items.iter().map(|p| p.price).sum();
    let average_efficacy = mean(items.iter().map(|p| p.efficacy));

    TreatmentPlan {
        diagnosis: diagnosis.to_string(),
        crop: crop.to_string(),
        severity,
        budget,
        categories,
        items,
        schedule: &TREATMENT_SCHEDULE,
        total_cost,
        average_efficacy,
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreventionGroup {
    pub category: PreventionCategory,
    pub strategies: Vec<&'static PreventionStrategy>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreventionPlan {
    pub crop: String,
    pub region: Option<Region>,
    pub threats: Vec<String>,
    pub farming_system: FarmingSystem,
    pub groups: Vec<PreventionGroup>,
    pub implementation_cost: f64,
    pub expected_efficacy: f64,
    pub priority_actions: Vec<&'static str>,
}

pub fn plan_prevention(
    crop: &str,
    region: Option<Region>,
    threats: &[String],
    farming_system: FarmingSystem,
) -> PreventionPlan {
    let groups: Vec<PreventionGroup> = farming_system
        .priority_categories()
        .into_iter()
        .map(|category| {
            let mut strategies: Vec<_> = prevention_strategies(category).collect();
            strategies.sort_by(|a, b| descending(a.efficacy, b.efficacy));
            strategies.truncate(STRATEGIES_PER_CATEGORY);
            PreventionGroup { category, strategies }
        })
        .collect();

    let selected = || groups.iter().flat_map(|g| g.strategies.iter());
    let implementation_cost = selected().map(|s| s.cost).sum();
    let expected_efficacy = mean(selected().map(|s| s.efficacy));

    // groups are already sorted by efficacy
    let priority_actions = groups
        .iter()
        .flat_map(|g| g.strategies.iter().take(PRIORITY_ACTIONS_PER_CATEGORY).map(|s| s.name))
        .collect();

    PreventionPlan {
        crop: crop.to_string(),
        region,
        threats: threats.to_vec(),
        farming_system,
        groups,
        implementation_cost,
        expected_efficacy,
        priority_actions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn names(plan: &TreatmentPlan) -> Vec<&'static str> {
        plan.items.iter().map(|p| p.name).collect()
    }

    #[test]
    fn test_limited_budget_uses_traditional_then_biological() {
        let plan = plan_treatment("Pourriture brune", "cacao", Severity::Moderee, Budget::Limite);
        assert_eq!(
            plan.categories,
            vec![TreatmentCategory::Traditionnel, TreatmentCategory::Biologique]
        );
        assert_eq!(
            names(&plan),
            vec!["Extrait ail-piment", "Cendre de bois", "Trichoderma", "Bacillus thuringiensis"]
        );
        assert_eq!(plan.total_cost, 800.0 + 500.0 + 5000.0 + 8000.0);
        assert_relative_eq!(plan.average_efficacy, (55.0 + 45.0 + 70.0 + 65.0) / 4.0);
    }

    #[test]
    fn test_critical_severity_puts_chemical_first() {
        let plan = plan_treatment("Chancre", "cacao", Severity::Critique, Budget::Limite);
        assert_eq!(
            plan.categories,
            vec![TreatmentCategory::Chimique, TreatmentCategory::Traditionnel]
        );
        assert_eq!(plan.items[0].name, "Lambda-cyhalothrine");
    }

    #[test]
    fn test_critical_with_high_budget_deduplicates() {
        let plan = plan_treatment("Chancre", "cacao", Severity::Critique, Budget::Eleve);
        assert_eq!(
            plan.categories,
            vec![TreatmentCategory::Chimique, TreatmentCategory::Biologique]
        );
        assert_eq!(plan.items.len(), 4);
    }

    #[test]
    fn test_low_severity_overrides_budget() {
        let plan = plan_treatment("Charbon", "maïs", Severity::Faible, Budget::Eleve);
        assert_eq!(
            plan.categories,
            vec![TreatmentCategory::Traditionnel, TreatmentCategory::Biologique]
        );
    }

    #[test]
    fn test_schedule_has_four_steps() {
        let plan = plan_treatment("x", "maïs", Severity::Elevee, Budget::Modere);
        let steps: Vec<_> = plan.schedule.iter().map(|s| s.when).collect();
        assert_eq!(steps, vec!["immédiat", "7_jours", "14_jours", "21_jours"]);
    }

    #[test]
    fn test_traditional_prevention_plan() {
        let plan = plan_prevention("cacao", Some(Region::Centre), &[], FarmingSystem::Traditionnel);
        assert_eq!(plan.groups.len(), 3);
        assert!(plan.groups.iter().all(|g| g.strategies.len() == 3));
        assert_eq!(plan.groups[0].category, PreventionCategory::Culturales);
        assert_eq!(
            plan.groups[0].strategies.iter().map(|s| s.name).collect::<Vec<_>>(),
            vec!["Rotation des cultures", "Associations culturales", "Densité optimale"]
        );
        assert_eq!(plan.priority_actions.len(), 6);
        assert_eq!(plan.priority_actions[2], "Quarantaine nouvelles plants");
        // culturales 0+2000+5000, sanitaires 500+3000+2000, nutritionnelles 15000+10000+20000
        assert_eq!(plan.implementation_cost, 57500.0);
    }

    #[test]
    fn test_unknown_farming_system_is_intensive() {
        let system = FarmingSystem::parse_or_intensive("hydroponique");
        assert_eq!(system, FarmingSystem::Intensif);
        let plan = plan_prevention("maïs", None, &["légionnaire".to_string()], system);
        assert_eq!(plan.groups[0].category, PreventionCategory::Physiques);
        assert_eq!(plan.groups[0].strategies[0].name, "Filets anti-insectes");
    }
}
