//! Transport-facing dish model and the mapping to and from the flat form model.

use super::{DishType, FieldErrors, FormDish, FormField};
use serde::Serialize;
use serde_json::Number;
use std::collections::BTreeMap;

/// Server-returned errors keyed by raw wire field name.
pub type WireErrors = BTreeMap<String, Vec<String>>;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WireBase {
    pub name: String,
    pub preparation_time: String,
}

/// Tagged dish payload; the `type` tag always matches the variant fields present.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WireDish {
    Pizza {
        #[serde(flatten)]
        base: WireBase,
        no_of_slices: Number,
        diameter: Number,
    },
    Soup {
        #[serde(flatten)]
        base: WireBase,
        spiciness_scale: Number,
    },
    Sandwich {
        #[serde(flatten)]
        base: WireBase,
        slices_of_bread: Number,
    },
}

impl WireDish {
    pub fn dish_type(&self) -> DishType {
        match self {
            WireDish::Pizza { .. } => DishType::Pizza,
            WireDish::Soup { .. } => DishType::Soup,
            WireDish::Sandwich { .. } => DishType::Sandwich,
        }
    }

    pub fn base(&self) -> &WireBase {
        match self {
            WireDish::Pizza { base, .. }
            | WireDish::Soup { base, .. }
            | WireDish::Sandwich { base, .. } => base,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WireField {
    Name,
    PreparationTime,
    Type,
    NoOfSlices,
    Diameter,
    SpicinessScale,
    SlicesOfBread,
}

impl WireField {
    pub const ALL: [WireField; 7] = [
        WireField::Name,
        WireField::PreparationTime,
        WireField::Type,
        WireField::NoOfSlices,
        WireField::Diameter,
        WireField::SpicinessScale,
        WireField::SlicesOfBread,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WireField::Name => "name",
            WireField::PreparationTime => "preparation_time",
            WireField::Type => "type",
            WireField::NoOfSlices => "no_of_slices",
            WireField::Diameter => "diameter",
            WireField::SpicinessScale => "spiciness_scale",
            WireField::SlicesOfBread => "slices_of_bread",
        }
    }

    pub fn from_wire_name(raw: &str) -> Option<Self> {
        WireField::ALL.into_iter().find(|f| f.as_str() == raw)
    }

    pub fn form_field(&self) -> FormField {
        match self {
            WireField::Name => FormField::Name,
            WireField::PreparationTime => FormField::PreparationTime,
            WireField::Type => FormField::Type,
            WireField::NoOfSlices => FormField::PizzaSlices,
            WireField::Diameter => FormField::PizzaDiameter,
            WireField::SpicinessScale => FormField::SoupSpicinessScale,
            WireField::SlicesOfBread => FormField::BreadSlices,
        }
    }

    /// Wire keys carried by a payload of `dish_type`.
    #[cfg(test)]
    pub fn keys_for(dish_type: DishType) -> Vec<WireField> {
        let mut keys = vec![WireField::Name, WireField::PreparationTime, WireField::Type];
        match dish_type {
            DishType::Pizza => keys.extend([WireField::NoOfSlices, WireField::Diameter]),
            DishType::Soup => keys.push(WireField::SpicinessScale),
            DishType::Sandwich => keys.push(WireField::SlicesOfBread),
        }
        keys
    }
}

impl FormField {
    #[cfg(test)]
    pub fn wire_field(&self) -> WireField {
        match self {
            FormField::Name => WireField::Name,
            FormField::PreparationTime => WireField::PreparationTime,
            FormField::Type => WireField::Type,
            FormField::PizzaSlices => WireField::NoOfSlices,
            FormField::PizzaDiameter => WireField::Diameter,
            FormField::SoupSpicinessScale => WireField::SpicinessScale,
            FormField::BreadSlices => WireField::SlicesOfBread,
        }
    }
}

/// Build the wire payload for the active type. Fields of other variants are dropped.
///
/// Returns `None` when a numeric field of the active variant is empty; callers
/// treat that as "do not submit". Validation rejects such forms first.
pub fn form_to_wire(form: &FormDish) -> Option<WireDish> {
    let base = WireBase {
        name: form.name.clone(),
        preparation_time: form.preparation_time.clone(),
    };
    let dish = match form.dish_type {
        DishType::Pizza => WireDish::Pizza {
            base,
            no_of_slices: form.pizza_slices.clone()?,
            diameter: form.pizza_diameter.clone()?,
        },
        DishType::Soup => WireDish::Soup {
            base,
            spiciness_scale: form.soup_spiciness_scale.clone()?,
        },
        DishType::Sandwich => WireDish::Sandwich {
            base,
            slices_of_bread: form.bread_slices.clone()?,
        },
    };
    Some(dish)
}

/// Translate server error keys to form fields. Message order is preserved and
/// keys outside the correspondence table are skipped.
pub fn wire_errors_to_form_errors(wire: &WireErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    for (key, messages) in wire {
        match WireField::from_wire_name(key) {
            Some(wf) => {
                out.insert(wf.form_field(), messages.clone());
            }
            None => tracing::debug!(key = %key, "dropping server error for unknown field"),
        }
    }
    out
}
