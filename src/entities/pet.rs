use serde::{Deserialize, Serialize};

/// Full pet profile as kept by the pet management screen.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Pet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub breed: String,
    #[serde(default)]
    pub gender: String,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub birthday: String,
    #[serde(default)]
    pub weight_kg: Option<f64>,
}

impl Pet {
    /// A roster-only pet with no profile details.
    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            species: String::new(),
            breed: String::new(),
            gender: String::new(),
            birthday: String::new(),
            weight_kg: None,
        }
    }
}

/// Unvalidated input from the "Add a New Pet" form. Weight stays text
/// until validation so that malformed input can be reported.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PetDraft {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub gender: String,
    pub birthday: String,
    pub weight: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
}

/// Ordered list of selectable pets handed to the record screens.
///
/// A screen keeps its own copy; edits to the pet directory only reach a
/// screen when it is given a fresh roster.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Roster(Vec<RosterEntry>);

impl Roster {
    pub fn new(entries: Vec<RosterEntry>) -> Self {
        Self(entries)
    }

    /// Max, Bella and Charlie, the pets every fresh install starts with.
    pub fn seed() -> Self {
        Self::from_pets(&seed_pets())
    }

    pub fn from_pets(pets: &[Pet]) -> Self {
        Self(
            pets.iter()
                .map(|p| RosterEntry {
                    id: p.id.clone(),
                    name: p.name.clone(),
                })
                .collect(),
        )
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.0
    }

    pub fn ids(&self) -> Vec<String> {
        self.0.iter().map(|e| e.id.clone()).collect()
    }

    pub fn contains(&self, pet_id: &str) -> bool {
        self.0.iter().any(|e| e.id == pet_id)
    }

    pub fn name_of(&self, pet_id: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.id == pet_id)
            .map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn seed_pets() -> Vec<Pet> {
    vec![
        Pet::named("1", "Max"),
        Pet::named("2", "Bella"),
        Pet::named("3", "Charlie"),
    ]
}
