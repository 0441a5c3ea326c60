use serde::{Deserialize, Serialize};
use std::fmt;

/// Type de bien couvert par les modèles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PropertyType {
    #[serde(rename = "Appartement")]
    Apartment,
    #[serde(rename = "Maison")]
    House,
}

impl PropertyType {
    pub const ALL: [PropertyType; 2] = [PropertyType::Apartment, PropertyType::House];

    /// Libellé canonique du format d'échange
    pub fn as_wire(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "Appartement",
            PropertyType::House => "Maison",
        }
    }

    /// Suffixe utilisé dans les noms de fichiers d'artefacts
    pub fn artifact_suffix(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "appartements",
            PropertyType::House => "maisons",
        }
    }

    /// Correspondance exacte (sensible à la casse) avec le libellé d'échange
    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_wire() == value)
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// Ville disposant de son propre jeu de modèles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum City {
    Lille,
    Bordeaux,
}

impl City {
    pub const ALL: [City; 2] = [City::Lille, City::Bordeaux];

    /// Forme minuscule (routes, répertoires d'artefacts)
    pub fn slug(&self) -> &'static str {
        match self {
            City::Lille => "lille",
            City::Bordeaux => "bordeaux",
        }
    }

    /// Forme capitalisée renvoyée dans `ville_modele`
    pub fn label(&self) -> &'static str {
        match self {
            City::Lille => "Lille",
            City::Bordeaux => "Bordeaux",
        }
    }

    /// Correspondance insensible à la casse
    pub fn from_name(value: &str) -> Option<Self> {
        let lowered = value.to_lowercase();
        Self::ALL.into_iter().find(|c| c.slug() == lowered)
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
