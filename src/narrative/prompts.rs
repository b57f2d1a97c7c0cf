//! French prompts describing each calculator result.

use crate::calculators::diagnosis::{DiagnosisReport, PestReport};
use crate::calculators::finance::{
    BreakEven, PriceQuote, ProductionCostReport, ProfitabilityReport, RoiSummary, SalesStrategy,
};
use crate::calculators::nutrients::{FertilizerProgramme, NutrientPlan};
use crate::calculators::soil::{AmendmentPlan, SoilRequirementReport};
use crate::calculators::suitability::SuitabilityReport;
use crate::calculators::treatment::{PreventionPlan, TreatmentPlan};
use crate::calculators::water::IrrigationPlan;
use crate::units::format_currency;
use serde::Serialize;
use std::fmt::Write;

/// A result that can be explained to a farmer.
pub trait Narratable: Serialize {
    /// Key figures, one per line.
    fn headline(&self) -> String;

    /// Points the explanation must cover.
    fn asks(&self) -> &'static [&'static str];

    fn narrative_prompt(&self) -> String {
        let mut prompt = self.headline();
        if let Ok(details) = serde_json::to_string(self) {
            let _ = write!(prompt, "\nDonnées détaillées: {details}\n");
        }
        prompt.push_str("\nFournis une analyse incluant:\n");
        for (i, ask) in self.asks().iter().enumerate() {
            let _ = writeln!(prompt, "{}. {}", i + 1, ask);
        }
        prompt.push_str("Réponds en français, de façon concrète, sans modifier les chiffres.");
        prompt
    }
}

/// Serde label of a unit enum, e.g. `"très élevée"`.
fn label<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(other) => other.to_string(),
        Err(_) => String::new(),
    }
}

impl Narratable for DiagnosisReport {
    fn headline(&self) -> String {
        match self.most_likely {
            Some(disease) => format!(
                "Diagnostic phytosanitaire pour {}:\nMaladie la plus probable: {} ({:.0}% de confiance)\nAutres candidats: {}",
                self.crop,
                disease,
                self.confidence,
                self.candidates.iter().skip(1).take(2).map(|c| c.disease).collect::<Vec<_>>().join(", ")
            ),
            None => format!("Diagnostic phytosanitaire pour {}: aucune maladie identifiée.", self.crop),
        }
    }

    fn asks(&self) -> &'static [&'static str] {
        &[
            "Explication du diagnostic",
            "Confirmation sur le terrain",
            "Mesures immédiates",
            "Risques de propagation",
        ]
    }
}

impl Narratable for PestReport {
    fn headline(&self) -> String {
        format!(
            "Identification de ravageur pour {}:\nRavageur le plus probable: {} ({:.0}% de confiance)",
            self.crop,
            self.most_likely.unwrap_or("non identifié"),
            self.confidence
        )
    }

    fn asks(&self) -> &'static [&'static str] {
        &["Cycle de vie du ravageur", "Seuil d'intervention", "Méthodes de lutte adaptées"]
    }
}

impl Narratable for TreatmentPlan {
    fn headline(&self) -> String {
        format!(
            "Plan de traitement pour {} sur {}:\nSévérité: {}\nBudget: {}\nProduits: {}\nCoût total: {}\nEfficacité moyenne: {:.0}%",
            self.diagnosis,
            self.crop,
            label(&self.severity),
            label(&self.budget),
            self.items.iter().map(|p| p.name).collect::<Vec<_>>().join(", "),
            format_currency(self.total_cost),
            self.average_efficacy
        )
    }

    fn asks(&self) -> &'static [&'static str] {
        &[
            "Mode d'application de chaque produit",
            "Précautions de sécurité",
            "Suivi de l'efficacité",
            "Alternatives en cas d'échec",
        ]
    }
}

impl Narratable for PreventionPlan {
    fn headline(&self) -> String {
        format!(
            "Stratégie de prévention pour {} ({}):\nSystème: {}\nActions prioritaires: {}\nCoût: {}\nEfficacité attendue: {:.0}%",
            self.crop,
            self.region.map(|r| r.name()).unwrap_or("toutes régions"),
            label(&self.farming_system),
            self.priority_actions.join(", "),
            format_currency(self.implementation_cost),
            self.expected_efficacy
        )
    }

    fn asks(&self) -> &'static [&'static str] {
        &["Calendrier de mise en œuvre", "Surveillance des menaces", "Adaptation au système de culture"]
    }
}

impl Narratable for SuitabilityReport {
    fn headline(&self) -> String {
        format!(
            "Aptitude des terres pour {}:\nScore: {:.0}%\nClasse: {}\nPotentiel: {}\nAméliorations: {}",
            self.crop,
            self.score_percent,
            label(&self.class),
            label(&self.production_potential),
            self.improvements.iter().map(|i| i.solution).collect::<Vec<_>>().join("; ")
        )
    }

    fn asks(&self) -> &'static [&'static str] {
        &[
            "Interprétation du score",
            "Facteurs limitants",
            "Priorité des aménagements",
            "Cultures alternatives si inapte",
        ]
    }
}

impl Narratable for ProductionCostReport {
    fn headline(&self) -> String {
        format!(
            "Analyse des coûts de production pour {} au Cameroun:\nSuperficie: {} ha\nNiveau d'intrants: {}\nCoût par hectare: {}\nCoût total: {}\nPostes principaux: {}",
            self.crop,
            self.area_ha,
            label(&self.input_level),
            format_currency(self.per_hectare),
            format_currency(self.total),
            self.major_cost_drivers.iter().map(|(name, _)| *name).collect::<Vec<_>>().join(", ")
        )
    }

    fn asks(&self) -> &'static [&'static str] {
        &[
            "Postes de dépense à optimiser",
            "Possibilités de réduction des coûts",
            "Sources de financement",
        ]
    }
}

impl Narratable for ProfitabilityReport {
    fn headline(&self) -> String {
        let break_even = match self.break_even {
            BreakEven::Kg(kg) => format!("{kg:.0} kg"),
            BreakEven::Unreachable => "inatteignable".to_string(),
        };
        format!(
            "Analyse de rentabilité pour {} au Cameroun:\nSuperficie: {} ha\nSystème: {}\nCoûts totaux: {}\nRendement estimé: {:.0} kg\nRevenus bruts: {}\nBénéfice net: {}\nMarge: {:.1}%\nROI: {:.1}%\nSeuil de rentabilité: {}",
            self.crop,
            self.area_ha,
            label(&self.production_system),
            format_currency(self.total_cost),
            self.total_yield_kg,
            format_currency(self.gross_revenue),
            format_currency(self.net_revenue),
            self.profit_margin_percent(),
            self.roi_percent(),
            break_even
        )
    }

    fn asks(&self) -> &'static [&'static str] {
        &[
            "Évaluation de la rentabilité",
            "Risques économiques",
            "Comparaison avec d'autres cultures",
            "Recommandations d'amélioration",
        ]
    }
}

impl Narratable for PriceQuote {
    fn headline(&self) -> String {
        format!(
            "Analyse économique des prix pour {} au Cameroun (mois {}):\nPrix actuel: {} {}/kg\nFourchette: {} - {} {}/kg\nType de marché: {}\nTendance: {}",
            self.crop,
            self.month,
            self.current_price,
            self.currency,
            self.min_price,
            self.max_price,
            self.currency,
            label(&self.market_type),
            label(&self.trend)
        )
    }

    fn asks(&self) -> &'static [&'static str] {
        &[
            "Évaluation du niveau de prix actuel",
            "Facteurs influençant les prix",
            "Prévisions à court terme",
            "Conseils pour optimiser les ventes",
        ]
    }
}

impl Narratable for SalesStrategy {
    fn headline(&self) -> String {
        format!(
            "Stratégie de vente pour {} au Cameroun:\nQuantité: {} kg\nUrgence: {}\nCanal recommandé: {}\nRevenu net estimé: {}",
            self.crop,
            self.quantity_kg,
            label(&self.urgency),
            label(&self.recommended_channel),
            format_currency(self.estimated_best_revenue)
        )
    }

    fn asks(&self) -> &'static [&'static str] {
        &[
            "Timing de vente",
            "Préparation nécessaire (qualité, conditionnement)",
            "Négociation des prix",
            "Diversification des canaux",
        ]
    }
}

impl Narratable for RoiSummary {
    fn headline(&self) -> String {
        let payback = self
            .payback_years
            .map(|y| format!("{y:.1} ans"))
            .unwrap_or_else(|| "jamais".to_string());
        format!(
            "Retour sur investissement:\nRetour total: {}\nROI: {:.1}%\nROI annuel: {:.1}%\nDélai de récupération: {}",
            format_currency(self.total_return),
            self.roi_percent,
            self.annual_roi_percent,
            payback
        )
    }

    fn asks(&self) -> &'static [&'static str] {
        &["Intérêt de l'investissement", "Risques", "Conditions de réussite"]
    }
}

impl Narratable for NutrientPlan {
    fn headline(&self) -> String {
        let mut headline = format!(
            "Besoins en nutriments pour {} (objectif {:.0} kg/ha):\n",
            self.crop, self.target_yield_kg_ha
        );
        for req in &self.requirements {
            let _ = writeln!(headline, "{}: {:.1} kg/ha à apporter", label(&req.nutrient), req.fertilizer_kg);
        }
        headline
    }

    fn asks(&self) -> &'static [&'static str] {
        &["Choix des engrais disponibles localement", "Fractionnement des apports", "Signes de carence à surveiller"]
    }
}

impl Narratable for FertilizerProgramme {
    fn headline(&self) -> String {
        format!(
            "Programme de fertilisation pour {} sur {} ha:\nFertilité du sol: {}\nBudget: {}\nProduits: {}\nCoût total: {}\nCoût par hectare: {}",
            self.crop,
            self.area_ha,
            label(&self.soil_fertility),
            label(&self.budget),
            self.applications.iter().map(|a| a.product).collect::<Vec<_>>().join(", "),
            format_currency(self.total_cost),
            format_currency(self.cost_per_hectare)
        )
    }

    fn asks(&self) -> &'static [&'static str] {
        &["Calendrier d'application", "Techniques d'épandage", "Alternatives organiques"]
    }
}

impl Narratable for SoilRequirementReport {
    fn headline(&self) -> String {
        format!(
            "Exigences pédologiques pour {} en région {}:\nType de sol: {}\npH: {:.1} ({})\nCoût des améliorations: {}\nAptitude globale: {}",
            self.crop,
            self.region,
            self.soil_type,
            self.ph,
            label(&self.ph_status),
            format_currency(self.total_improvement_cost),
            self.overall_suitability
        )
    }

    fn asks(&self) -> &'static [&'static str] {
        &["Interprétation du sol", "Priorité des corrections", "Entretien de la fertilité"]
    }
}

impl Narratable for AmendmentPlan {
    fn headline(&self) -> String {
        format!(
            "Amendements du sol (pH {:.1}, matière organique {:.1}%):\nAmendements: {}\nCoût total par hectare: {}\nObjectifs: pH {:.1}, matière organique {:.1}%",
            self.ph,
            self.organic_matter,
            self.amendments.iter().map(|a| a.amendment.name).collect::<Vec<_>>().join(", "),
            format_currency(self.total_cost),
            self.ph_target,
            self.organic_matter_target
        )
    }

    fn asks(&self) -> &'static [&'static str] {
        &["Mode d'application", "Période idéale", "Effets attendus"]
    }
}

impl Narratable for IrrigationPlan {
    fn headline(&self) -> String {
        format!(
            "Irrigation pour {} en région {} sur {} ha:\nPluviométrie annuelle: {:.0} mm\nDéficit hydrique: {:.0} mm\nIrrigation nécessaire: {}\nSystème: {}\nCoût d'installation: {}",
            self.crop,
            self.region,
            self.area_ha,
            self.annual_rainfall_mm,
            self.deficit_mm,
            if self.irrigation_required { "oui" } else { "non" },
            label(&self.system.kind),
            format_currency(self.installation_cost)
        )
    }

    fn asks(&self) -> &'static [&'static str] {
        &["Gestion de la source d'eau", "Calendrier d'irrigation", "Économie d'eau"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::diagnosis::{diagnose_disease, DiagnosisQuery};
    use crate::calculators::finance::{analyze_profitability, calculate_roi};
    use crate::calculators::suitability::{assess_land_suitability, TerrainRecord};
    use crate::knowledge::inputs::ProductionSystem;

    #[test]
    fn test_prompt_lists_asks_in_order() {
        let prompt = calculate_roi(1_000_000.0, 250_000.0, 5).unwrap().narrative_prompt();

        assert!(prompt.starts_with("Retour sur investissement:"));
        assert!(prompt.contains("Délai de récupération: 4.0 ans"));
        assert!(prompt.contains("1. Intérêt de l'investissement\n2. Risques\n3. Conditions de réussite"));
        assert!(prompt.contains("\"payback_years\":4.0"));
    }

    #[test]
    fn test_profitability_headline_uses_fcfa() {
        let report = analyze_profitability("cacao", 2.0, ProductionSystem::Ameliore).unwrap();
        let headline = report.headline();

        assert!(headline.contains("Analyse de rentabilité pour cacao"));
        assert!(headline.contains("Système: amélioré"));
        assert!(headline.contains("FCFA"));
    }

    #[test]
    fn test_empty_diagnosis_headline() {
        let report = diagnose_disease(&DiagnosisQuery {
            crop: "vanille".to_string(),
            ..Default::default()
        });
        assert!(report.headline().contains("aucune maladie identifiée"));
    }

    #[test]
    fn test_suitability_headline_names_class() {
        let terrain = TerrainRecord {
            ph: Some(6.0),
            ..Default::default()
        };
        let report = assess_land_suitability("maïs", None, &terrain).unwrap();
        assert!(report.headline().contains("Très apte (S1)"));
    }

    #[test]
    fn test_label_reads_serde_name() {
        assert_eq!(label(&ProductionSystem::Traditionnel), "traditionnel");
    }
}
