use regex::Regex;
use std::sync::OnceLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::entities::pet::{Pet, PetDraft, Roster};
use crate::error::PetError;
use crate::metrics;
use crate::notifications::{NotificationTemplates, Notifier};

fn weight_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d*\.?\d*$").expect("static weight pattern"))
}

/// Checks a pet form and turns it into a profile with a fresh id.
pub fn validate_pet(draft: &PetDraft) -> Result<Pet, PetError> {
    let fields = [
        ("name", &draft.name),
        ("species", &draft.species),
        ("breed", &draft.breed),
        ("gender", &draft.gender),
        ("birthday", &draft.birthday),
        ("weight", &draft.weight),
    ];
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| *field)
        .collect();
    if !missing.is_empty() {
        return Err(PetError::MissingFields(missing));
    }

    let weight = draft.weight.trim();
    let weight_kg = Some(weight)
        .filter(|w| weight_pattern().is_match(w))
        .and_then(|w| w.parse::<f64>().ok())
        .ok_or_else(|| PetError::InvalidWeight(draft.weight.clone()))?;

    Ok(Pet {
        id: Uuid::new_v4().to_string(),
        name: draft.name.trim().to_string(),
        species: draft.species.trim().to_string(),
        breed: draft.breed.trim().to_string(),
        gender: draft.gender.trim().to_string(),
        birthday: draft.birthday.trim().to_string(),
        weight_kg: Some(weight_kg),
    })
}

/// The pet management screen: owns pet profiles and hands out rosters.
pub struct PetDirectory {
    pets: Vec<Pet>,
    notifier: Box<dyn Notifier>,
}

impl PetDirectory {
    pub fn new(pets: Vec<Pet>, notifier: Box<dyn Notifier>) -> Self {
        metrics::set_pet_count(pets.len());
        Self { pets, notifier }
    }

    pub fn add(&mut self, draft: &PetDraft) -> Result<Pet, PetError> {
        match validate_pet(draft) {
            Ok(pet) => {
                info!(pet_id = %pet.id, name = %pet.name, "pet added");
                self.pets.push(pet.clone());
                metrics::set_pet_count(self.pets.len());
                self.notifier.notify(NotificationTemplates::pet_added(&pet.name));
                Ok(pet)
            }
            Err(e) => {
                warn!(error = %e, "pet rejected");
                self.notifier.notify(NotificationTemplates::pet_rejected(&e));
                Err(e)
            }
        }
    }

    /// Removes a pet after confirmation. Records that mention it are left
    /// alone.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.pets.len();
        self.pets.retain(|p| p.id != id);
        let removed = self.pets.len() != before;
        if removed {
            info!(pet_id = id, "pet deleted");
            metrics::set_pet_count(self.pets.len());
            self.notifier.notify(NotificationTemplates::pet_deleted());
        }
        removed
    }

    /// Case-insensitive match on the pet's name.
    pub fn search(&self, term: &str) -> Vec<&Pet> {
        let needle = term.trim().to_lowercase();
        self.pets
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn roster(&self) -> Roster {
        Roster::from_pets(&self.pets)
    }
}
