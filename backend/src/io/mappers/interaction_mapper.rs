use shared::InteractionResponse;

use crate::domain::models::interaction::{
    DrugInteraction, InteractionSeverity as DomainInteractionSeverity,
};

pub struct InteractionMapper;

impl InteractionMapper {
    /// Convert domain InteractionSeverity to shared InteractionSeverity
    pub fn severity_to_dto(domain: DomainInteractionSeverity) -> shared::InteractionSeverity {
        match domain {
            DomainInteractionSeverity::Minor => shared::InteractionSeverity::Minor,
            DomainInteractionSeverity::Moderate => shared::InteractionSeverity::Moderate,
            DomainInteractionSeverity::Major => shared::InteractionSeverity::Major,
            DomainInteractionSeverity::Contraindicated => {
                shared::InteractionSeverity::Contraindicated
            }
        }
    }

    /// Convert a domain interaction to the response DTO
    pub fn to_dto(interaction: DrugInteraction) -> InteractionResponse {
        InteractionResponse {
            id: interaction.id,
            medication_id: interaction.medication_id,
            interacting_drug_name: interaction.interacting_drug_name,
            severity: Self::severity_to_dto(interaction.severity),
            description: interaction.description,
            detected_at: interaction.detected_at.to_rfc3339(),
            is_acknowledged: interaction.is_acknowledged,
        }
    }

    pub fn to_dto_list(interactions: Vec<DrugInteraction>) -> Vec<InteractionResponse> {
        interactions.into_iter().map(Self::to_dto).collect()
    }
}
