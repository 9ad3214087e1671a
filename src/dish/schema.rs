//! Client-side validation rules. Every field is checked, whichever type is active.

use super::{DishType, FieldErrors, FormDish, FormField};
use regex::Regex;
use std::sync::OnceLock;

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 50;
pub const SPICINESS_MIN: f64 = 1.0;
pub const SPICINESS_MAX: f64 = 10.0;

pub const MSG_REQUIRED: &str = "Required";
pub const MSG_TOO_SHORT: &str = "Too Short!";
pub const MSG_TOO_LONG: &str = "Too Long!";
pub const MSG_WRONG_FORMAT: &str = "Wrong format";
pub const MSG_TOO_LOW: &str = "Too low value";
pub const MSG_TOO_HIGH: &str = "Too high value";
pub const MSG_NOT_A_NUMBER: &str = "Must be a number";

static PREPARATION_TIME_RE: OnceLock<Regex> = OnceLock::new();

// Unanchored: any digit-pair/colon run inside the input passes.
fn preparation_time_re() -> &'static Regex {
    PREPARATION_TIME_RE.get_or_init(|| Regex::new(r"\d\d:\d\d:\d\d").expect("static regex"))
}

pub fn type_error_message() -> String {
    let names: Vec<&str> = DishType::ALL.iter().map(|t| t.as_str()).collect();
    format!("Must be one of: {}", names.join(", "))
}

/// First failing rule for `field`, if any.
pub fn validate_field(dish: &FormDish, field: FormField) -> Option<String> {
    match field {
        FormField::Name => {
            let len = dish.name.chars().count();
            if len == 0 {
                Some(MSG_REQUIRED.into())
            } else if len < NAME_MIN_LEN {
                Some(MSG_TOO_SHORT.into())
            } else if len > NAME_MAX_LEN {
                Some(MSG_TOO_LONG.into())
            } else {
                None
            }
        }
        FormField::PreparationTime => {
            if dish.preparation_time.is_empty() {
                Some(MSG_REQUIRED.into())
            } else if !preparation_time_re().is_match(&dish.preparation_time) {
                Some(MSG_WRONG_FORMAT.into())
            } else {
                None
            }
        }
        // `DishType` cannot hold an unknown value; bad raw input is reported by the controller.
        FormField::Type => None,
        FormField::SoupSpicinessScale => match dish.number(field).and_then(|n| n.as_f64()) {
            None => Some(MSG_REQUIRED.into()),
            Some(v) if v < SPICINESS_MIN => Some(MSG_TOO_LOW.into()),
            Some(v) if v > SPICINESS_MAX => Some(MSG_TOO_HIGH.into()),
            Some(_) => None,
        },
        FormField::PizzaSlices | FormField::PizzaDiameter | FormField::BreadSlices => {
            match dish.number(field) {
                None => Some(MSG_REQUIRED.into()),
                Some(_) => None,
            }
        }
    }
}

/// Validate the whole form. Fields without errors are absent from the result.
pub fn validate(dish: &FormDish) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for field in FormField::ALL {
        if let Some(msg) = validate_field(dish, field) {
            errors.insert(field, vec![msg]);
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_pizza() -> FormDish {
        FormDish {
            name: "Margherita".into(),
            preparation_time: "00:25:00".into(),
            ..FormDish::default()
        }
    }

    #[test]
    fn defaults_with_name_and_time_pass() {
        assert!(validate(&valid_pizza()).is_empty());
    }

    #[test]
    fn empty_form_requires_name_and_time() {
        let errs = validate(&FormDish::default());
        assert_eq!(errs[&FormField::Name], vec![MSG_REQUIRED.to_string()]);
        assert_eq!(
            errs[&FormField::PreparationTime],
            vec![MSG_REQUIRED.to_string()]
        );
        assert_eq!(errs.len(), 2);
    }

    #[test]
    fn name_length_bounds() {
        let mut d = valid_pizza();
        d.name = "S".into();
        assert_eq!(
            validate_field(&d, FormField::Name).as_deref(),
            Some(MSG_TOO_SHORT)
        );
        d.name = "So".into();
        assert_eq!(validate_field(&d, FormField::Name), None);
        d.name = "x".repeat(50);
        assert_eq!(validate_field(&d, FormField::Name), None);
        d.name = "x".repeat(51);
        assert_eq!(
            validate_field(&d, FormField::Name).as_deref(),
            Some(MSG_TOO_LONG)
        );
    }

    #[test]
    fn preparation_time_checks_shape_only() {
        let mut d = valid_pizza();
        d.preparation_time = "99:99:99".into();
        assert_eq!(validate_field(&d, FormField::PreparationTime), None);
        d.preparation_time = "1:00:00".into();
        assert_eq!(
            validate_field(&d, FormField::PreparationTime).as_deref(),
            Some(MSG_WRONG_FORMAT)
        );
        d.preparation_time = "about 00:10:00".into();
        assert_eq!(validate_field(&d, FormField::PreparationTime), None);
    }

    #[test]
    fn spiciness_range_is_inclusive() {
        let mut d = valid_pizza();
        for (v, expected) in [
            (0, Some(MSG_TOO_LOW)),
            (1, None),
            (10, None),
            (11, Some(MSG_TOO_HIGH)),
        ] {
            d.soup_spiciness_scale = Some(v.into());
            assert_eq!(
                validate_field(&d, FormField::SoupSpicinessScale).as_deref(),
                expected
            );
        }
    }

    #[test]
    fn inactive_variant_fields_still_block() {
        let mut d = valid_pizza();
        assert_eq!(d.dish_type, DishType::Pizza);
        d.bread_slices = None;
        let errs = validate(&d);
        assert_eq!(errs.len(), 1);
        assert_eq!(
            errs[&FormField::BreadSlices],
            vec![MSG_REQUIRED.to_string()]
        );
    }

    #[test]
    fn numeric_fields_have_no_client_range_except_spiciness() {
        let mut d = valid_pizza();
        d.pizza_slices = Some((-3).into());
        d.pizza_diameter = Some(0.into());
        d.bread_slices = Some(100_000.into());
        assert!(validate(&d).is_empty());
    }
}
