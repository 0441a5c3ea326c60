//! # Feature Validation
//!
//! Contrôle les champs bruts d'une requête avant tout accès aux modèles.
//!
//! ## Ordre des contrôles
//! L'erreur renvoyée est toujours la première rencontrée dans cet ordre:
//! 1. Présence (`surface_bati`, `type_local`, `nombre_lots`)
//! 2. Type (nombres, entiers pour `nombre_pieces` / `nombre_lots`)
//! 3. Signe (aucune valeur négative)
//! 4. Bornes maximales
//! 5. Règle métier: surface bâtie non nulle
//!
//! Les champs optionnels (`surface_terrain`, `nombre_pieces`) absents sont
//! complétés à 0 dans la map avant les contrôles de type.

use serde_json::{Map, Value};

use super::ValidationError;
use crate::domain::fields::{NOMBRE_LOTS, NOMBRE_PIECES, SURFACE_BATI, SURFACE_TERRAIN, TYPE_LOCAL};
use crate::domain::{City, PredictionRequest, PropertyType};

pub const REQUIRED_FEATURES: [&str; 3] = [SURFACE_BATI, TYPE_LOCAL, NOMBRE_LOTS];
pub const OPTIONAL_FEATURES: [&str; 2] = [NOMBRE_PIECES, SURFACE_TERRAIN];

/// Champs numériques dans l'ordre de contrôle
const NUMERIC_FEATURES: [&str; 4] = [SURFACE_BATI, SURFACE_TERRAIN, NOMBRE_LOTS, NOMBRE_PIECES];
const INTEGER_FEATURES: [&str; 2] = [NOMBRE_LOTS, NOMBRE_PIECES];

pub const MAX_VALUES: [(&str, f64); 4] = [
    (SURFACE_BATI, 10_000.0),
    (NOMBRE_PIECES, 50.0),
    (SURFACE_TERRAIN, 10_000.0),
    (NOMBRE_LOTS, 100.0),
];

/// Valider le type de bien (libellés exacts "Appartement" / "Maison")
pub fn validate_property_type(value: &str) -> Result<PropertyType, ValidationError> {
    PropertyType::from_wire(value)
        .ok_or_else(|| ValidationError::InvalidPropertyType(value.to_string()))
}

/// Valider la ville, sans tenir compte de la casse
pub fn validate_city(value: &str) -> Result<City, ValidationError> {
    City::from_name(value).ok_or_else(|| ValidationError::InvalidCity(value.to_string()))
}

/// Vérifier la présence de champs; `null` compte comme absent
pub fn require_fields(fields: &Map<String, Value>, required: &[&str]) -> Result<(), ValidationError> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|name| is_absent(fields, name))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingField(missing.join(", ")))
    }
}

/// Lire un champ texte obligatoire
pub fn string_field<'a>(fields: &'a Map<String, Value>, name: &str) -> Result<&'a str, ValidationError> {
    match fields.get(name) {
        None | Some(Value::Null) => Err(ValidationError::MissingField(name.to_string())),
        Some(Value::String(value)) => Ok(value.as_str()),
        Some(_) => Err(ValidationError::TypeMismatch {
            field: name.to_string(),
            expected: "une chaîne de caractères",
        }),
    }
}

/// Valider l'ensemble des caractéristiques et compléter les valeurs par défaut
pub fn validate_features(fields: &mut Map<String, Value>) -> Result<PredictionRequest, ValidationError> {
    require_fields(fields, &REQUIRED_FEATURES)?;

    for name in OPTIONAL_FEATURES {
        if is_absent(fields, name) {
            fields.insert(name.to_string(), Value::from(0));
        }
    }

    let property_type = validate_property_type(string_field(fields, TYPE_LOCAL)?)?;

    let mut values = [0.0_f64; NUMERIC_FEATURES.len()];
    for (slot, name) in values.iter_mut().zip(NUMERIC_FEATURES) {
        *slot = numeric_field(fields, name)?;
    }
    let [built_area, land_area, lot_count, room_count] = values;

    for (name, value) in NUMERIC_FEATURES.iter().zip(values) {
        if value < 0.0 {
            return Err(ValidationError::NegativeValue(name.to_string()));
        }
    }

    for (name, max) in MAX_VALUES {
        let value = value_of(name, &values);
        if value > max {
            return Err(ValidationError::RangeExceeded {
                field: name.to_string(),
                max,
            });
        }
    }

    if built_area == 0.0 {
        return Err(ValidationError::ZeroBuiltArea);
    }

    Ok(PredictionRequest {
        built_area,
        room_count: room_count as u32,
        property_type,
        land_area,
        lot_count: lot_count as u32,
    })
}

fn is_absent(fields: &Map<String, Value>, name: &str) -> bool {
    matches!(fields.get(name), None | Some(Value::Null))
}

fn numeric_field(fields: &Map<String, Value>, name: &str) -> Result<f64, ValidationError> {
    let value = match fields.get(name) {
        Some(Value::Number(number)) => number.as_f64(),
        _ => None,
    };
    let integer = INTEGER_FEATURES.contains(&name);

    match value {
        Some(v) if v.is_finite() && (!integer || v.fract() == 0.0) => Ok(v),
        _ => Err(ValidationError::TypeMismatch {
            field: name.to_string(),
            expected: if integer { "un nombre entier" } else { "un nombre" },
        }),
    }
}

fn value_of(name: &str, values: &[f64; NUMERIC_FEATURES.len()]) -> f64 {
    NUMERIC_FEATURES
        .iter()
        .position(|n| *n == name)
        .map(|i| values[i])
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn features(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("objet JSON attendu"),
        }
    }

    fn valid() -> Map<String, Value> {
        features(json!({
            "surface_bati": 100,
            "nombre_pieces": 4,
            "type_local": "Appartement",
            "surface_terrain": 0,
            "nombre_lots": 1
        }))
    }

    #[test]
    fn test_validate_features_ok() {
        let mut fields = valid();
        let request = validate_features(&mut fields).unwrap();

        assert_eq!(request.built_area, 100.0);
        assert_eq!(request.room_count, 4);
        assert_eq!(request.property_type, PropertyType::Apartment);
        assert_eq!(request.land_area, 0.0);
        assert_eq!(request.lot_count, 1);
    }

    #[test]
    fn test_optional_fields_are_defaulted_in_place() {
        let mut fields = features(json!({
            "surface_bati": 55.5,
            "type_local": "Maison",
            "nombre_lots": 0,
            "surface_terrain": null
        }));
        let request = validate_features(&mut fields).unwrap();

        assert_eq!(fields[SURFACE_TERRAIN], json!(0));
        assert_eq!(fields[NOMBRE_PIECES], json!(0));
        assert_eq!(request.room_count, 0);
        assert_eq!(request.land_area, 0.0);
    }

    #[test]
    fn test_missing_required_fields_are_all_listed() {
        let mut fields = features(json!({ "nombre_pieces": 4, "type_local": "Appartement" }));
        let err = validate_features(&mut fields).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("surface_bati, nombre_lots".to_string()));
    }

    #[test]
    fn test_type_mismatch() {
        let mut fields = valid();
        fields.insert(SURFACE_TERRAIN.to_string(), json!("beaucoup"));
        let err = validate_features(&mut fields).unwrap_err();
        assert_eq!(err.kind(), "type_mismatch");

        let mut fields = valid();
        fields.insert(NOMBRE_LOTS.to_string(), json!(1.5));
        let err = validate_features(&mut fields).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TypeMismatch {
                field: NOMBRE_LOTS.to_string(),
                expected: "un nombre entier"
            }
        );

        let mut fields = valid();
        fields.insert(NOMBRE_LOTS.to_string(), json!(2.0));
        assert_eq!(validate_features(&mut fields).unwrap().lot_count, 2);
    }

    #[test]
    fn test_negative_values() {
        let mut fields = valid();
        fields.insert(SURFACE_BATI.to_string(), json!(-100));
        let err = validate_features(&mut fields).unwrap_err();
        assert_eq!(err, ValidationError::NegativeValue(SURFACE_BATI.to_string()));
    }

    #[test]
    fn test_zero_built_area() {
        let mut fields = valid();
        fields.insert(SURFACE_BATI.to_string(), json!(0));
        assert_eq!(validate_features(&mut fields).unwrap_err(), ValidationError::ZeroBuiltArea);
    }

    #[test]
    fn test_range_exceeded() {
        let mut fields = valid();
        fields.insert(NOMBRE_PIECES.to_string(), json!(51));
        let err = validate_features(&mut fields).unwrap_err();
        assert_eq!(
            err,
            ValidationError::RangeExceeded {
                field: NOMBRE_PIECES.to_string(),
                max: 50.0
            }
        );

        let mut fields = valid();
        fields.insert(SURFACE_BATI.to_string(), json!(10_000));
        fields.insert(NOMBRE_LOTS.to_string(), json!(100));
        assert!(validate_features(&mut fields).is_ok());
    }

    #[test]
    fn test_first_violation_wins() {
        // Présence avant type
        let mut fields = features(json!({ "surface_bati": "grand", "type_local": "Maison" }));
        assert_eq!(validate_features(&mut fields).unwrap_err().kind(), "missing_field");

        // Type avant signe
        let mut fields = valid();
        fields.insert(SURFACE_BATI.to_string(), json!(-5));
        fields.insert(NOMBRE_LOTS.to_string(), json!("trois"));
        assert_eq!(validate_features(&mut fields).unwrap_err().kind(), "type_mismatch");

        // Signe avant bornes
        let mut fields = valid();
        fields.insert(SURFACE_BATI.to_string(), json!(20_000));
        fields.insert(SURFACE_TERRAIN.to_string(), json!(-1));
        assert_eq!(validate_features(&mut fields).unwrap_err().kind(), "negative_value");

        // Bornes avant la règle métier
        let mut fields = valid();
        fields.insert(SURFACE_BATI.to_string(), json!(0));
        fields.insert(NOMBRE_LOTS.to_string(), json!(500));
        assert_eq!(validate_features(&mut fields).unwrap_err().kind(), "range_exceeded");
    }

    #[test]
    fn test_validate_property_type() {
        assert!(validate_property_type("Appartement").is_ok());
        assert!(validate_property_type("Maison").is_ok());
        assert_eq!(
            validate_property_type("Bureau").unwrap_err(),
            ValidationError::InvalidPropertyType("Bureau".to_string())
        );

        let mut fields = valid();
        fields.insert(TYPE_LOCAL.to_string(), json!("Bureau"));
        assert_eq!(validate_features(&mut fields).unwrap_err().kind(), "invalid_property_type");
    }

    #[test]
    fn test_validate_city() {
        assert_eq!(validate_city("lille").unwrap(), City::Lille);
        assert_eq!(validate_city("Bordeaux").unwrap(), City::Bordeaux);
        assert_eq!(
            validate_city("paris").unwrap_err(),
            ValidationError::InvalidCity("paris".to_string())
        );
    }

    #[test]
    fn test_string_field() {
        let fields = features(json!({ "ville": 42 }));
        assert_eq!(string_field(&fields, "ville").unwrap_err().kind(), "type_mismatch");
        assert_eq!(string_field(&fields, "absent").unwrap_err().kind(), "missing_field");
    }
}
