pub mod schema;
pub mod wire;

use serde_json::Number;
use std::collections::BTreeMap;
use std::fmt;

pub const DEFAULT_PIZZA_SLICES: i64 = 6;
pub const DEFAULT_PIZZA_DIAMETER: i64 = 42;
pub const DEFAULT_SOUP_SPICINESS: i64 = 4;
pub const DEFAULT_BREAD_SLICES: i64 = 20;

/// Per-field error messages, keyed by form field.
pub type FieldErrors = BTreeMap<FormField, Vec<String>>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DishType {
    #[default]
    Pizza,
    Soup,
    Sandwich,
}

impl DishType {
    pub const ALL: [DishType; 3] = [DishType::Pizza, DishType::Soup, DishType::Sandwich];

    pub fn as_str(&self) -> &'static str {
        match self {
            DishType::Pizza => "pizza",
            DishType::Soup => "soup",
            DishType::Sandwich => "sandwich",
        }
    }

    /// Exact match against the three known type names.
    pub fn parse(raw: &str) -> Option<Self> {
        DishType::ALL.into_iter().find(|t| t.as_str() == raw)
    }

    pub fn next(self) -> Self {
        match self {
            DishType::Pizza => DishType::Soup,
            DishType::Soup => DishType::Sandwich,
            DishType::Sandwich => DishType::Pizza,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            DishType::Pizza => DishType::Sandwich,
            DishType::Soup => DishType::Pizza,
            DishType::Sandwich => DishType::Soup,
        }
    }
}

impl fmt::Display for DishType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field names of the flat form model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormField {
    Name,
    PreparationTime,
    Type,
    PizzaSlices,
    PizzaDiameter,
    SoupSpicinessScale,
    BreadSlices,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::Name,
        FormField::PreparationTime,
        FormField::Type,
        FormField::PizzaSlices,
        FormField::PizzaDiameter,
        FormField::SoupSpicinessScale,
        FormField::BreadSlices,
    ];

    pub const BASE: [FormField; 3] = [FormField::Name, FormField::PreparationTime, FormField::Type];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::PreparationTime => "preparationTime",
            FormField::Type => "type",
            FormField::PizzaSlices => "pizzaSlices",
            FormField::PizzaDiameter => "pizzaDiameter",
            FormField::SoupSpicinessScale => "soupSpicinessScale",
            FormField::BreadSlices => "breadSlices",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::PreparationTime => "Preparation time",
            FormField::Type => "Type",
            FormField::PizzaSlices => "Number of slices",
            FormField::PizzaDiameter => "Diameter [cm]",
            FormField::SoupSpicinessScale => "Spiciness [1-10]",
            FormField::BreadSlices => "Number of slices",
        }
    }

    /// Fixed text shown before the input.
    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            FormField::Name => Some("My dish is:"),
            _ => None,
        }
    }

    /// Hint shown while the input is empty.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            FormField::Name => Some("tomato soup with rice"),
            FormField::PreparationTime => Some("00:12:00 (hh:mm:ss)"),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.variant().is_some()
    }

    /// The dish type a variant-specific field belongs to; `None` for base fields.
    pub fn variant(&self) -> Option<DishType> {
        match self {
            FormField::Name | FormField::PreparationTime | FormField::Type => None,
            FormField::PizzaSlices | FormField::PizzaDiameter => Some(DishType::Pizza),
            FormField::SoupSpicinessScale => Some(DishType::Soup),
            FormField::BreadSlices => Some(DishType::Sandwich),
        }
    }

    /// Variant-specific fields shown for `dish_type`, in display order.
    pub fn variant_fields(dish_type: DishType) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(|f| f.variant() == Some(dish_type))
            .collect()
    }

    /// Base fields followed by the active variant's fields.
    pub fn visible_fields(dish_type: DishType) -> Vec<FormField> {
        let mut out = FormField::BASE.to_vec();
        out.extend(FormField::variant_fields(dish_type));
        out
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat, UI-facing dish. All variant fields are kept regardless of `dish_type`;
/// `None` in a numeric field means the input is empty.
#[derive(Clone, Debug, PartialEq)]
pub struct FormDish {
    pub name: String,
    pub preparation_time: String,
    pub dish_type: DishType,
    pub pizza_slices: Option<Number>,
    pub pizza_diameter: Option<Number>,
    pub soup_spiciness_scale: Option<Number>,
    pub bread_slices: Option<Number>,
}

impl Default for FormDish {
    fn default() -> Self {
        Self {
            name: String::new(),
            preparation_time: String::new(),
            dish_type: DishType::Pizza,
            pizza_slices: Some(DEFAULT_PIZZA_SLICES.into()),
            pizza_diameter: Some(DEFAULT_PIZZA_DIAMETER.into()),
            soup_spiciness_scale: Some(DEFAULT_SOUP_SPICINESS.into()),
            bread_slices: Some(DEFAULT_BREAD_SLICES.into()),
        }
    }
}

impl FormDish {
    pub fn reset_variant_fields(&mut self) {
        let d = FormDish::default();
        self.pizza_slices = d.pizza_slices;
        self.pizza_diameter = d.pizza_diameter;
        self.soup_spiciness_scale = d.soup_spiciness_scale;
        self.bread_slices = d.bread_slices;
    }

    pub fn number(&self, field: FormField) -> Option<&Number> {
        match field {
            FormField::PizzaSlices => self.pizza_slices.as_ref(),
            FormField::PizzaDiameter => self.pizza_diameter.as_ref(),
            FormField::SoupSpicinessScale => self.soup_spiciness_scale.as_ref(),
            FormField::BreadSlices => self.bread_slices.as_ref(),
            FormField::Name | FormField::PreparationTime | FormField::Type => None,
        }
    }

    pub fn number_slot(&mut self, field: FormField) -> Option<&mut Option<Number>> {
        match field {
            FormField::PizzaSlices => Some(&mut self.pizza_slices),
            FormField::PizzaDiameter => Some(&mut self.pizza_diameter),
            FormField::SoupSpicinessScale => Some(&mut self.soup_spiciness_scale),
            FormField::BreadSlices => Some(&mut self.bread_slices),
            FormField::Name | FormField::PreparationTime | FormField::Type => None,
        }
    }

    /// Current value of `field` as input text.
    pub fn display_value(&self, field: FormField) -> String {
        match field {
            FormField::Name => self.name.clone(),
            FormField::PreparationTime => self.preparation_time.clone(),
            FormField::Type => self.dish_type.as_str().to_string(),
            _ => self
                .number(field)
                .map(|n| n.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Parse numeric input text. Integers stay integers; non-finite values are rejected.
pub fn parse_number(raw: &str) -> Option<Number> {
    let t = raw.trim();
    if let Ok(i) = t.parse::<i64>() {
        return Some(i.into());
    }
    t.parse::<f64>().ok().and_then(Number::from_f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_initial_form() {
        let d = FormDish::default();
        assert_eq!(d.dish_type, DishType::Pizza);
        assert!(d.name.is_empty());
        assert!(d.preparation_time.is_empty());
        assert_eq!(d.display_value(FormField::PizzaSlices), "6");
        assert_eq!(d.display_value(FormField::PizzaDiameter), "42");
        assert_eq!(d.display_value(FormField::SoupSpicinessScale), "4");
        assert_eq!(d.display_value(FormField::BreadSlices), "20");
    }

    #[test]
    fn visible_fields_follow_type() {
        assert_eq!(
            FormField::visible_fields(DishType::Soup),
            vec![
                FormField::Name,
                FormField::PreparationTime,
                FormField::Type,
                FormField::SoupSpicinessScale
            ]
        );
        assert_eq!(
            FormField::variant_fields(DishType::Pizza),
            vec![FormField::PizzaSlices, FormField::PizzaDiameter]
        );
    }

    #[test]
    fn parse_number_keeps_integers_and_rejects_garbage() {
        assert_eq!(parse_number("4").unwrap().as_i64(), Some(4));
        assert_eq!(parse_number(" 30.5 ").unwrap().as_f64(), Some(30.5));
        assert!(parse_number("-").is_none());
        assert!(parse_number("").is_none());
        assert!(parse_number("inf").is_none());
    }

    #[test]
    fn dish_type_parse_is_exact() {
        assert_eq!(DishType::parse("soup"), Some(DishType::Soup));
        assert_eq!(DishType::parse("Soup"), None);
        assert_eq!(DishType::parse("burger"), None);
        assert_eq!(DishType::Sandwich.next(), DishType::Pizza);
        assert_eq!(DishType::Pizza.prev(), DishType::Sandwich);
    }
}
