use crate::dish::schema::{self, MSG_NOT_A_NUMBER};
use crate::dish::wire::{form_to_wire, wire_errors_to_form_errors, WireDish};
use crate::dish::{parse_number, DishType, FieldErrors, FormDish, FormField};
use crate::services::gateway::SubmitOutcome;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

pub const GENERIC_FAILURE_MESSAGE: &str = "Error occurred. Try again later.";

/// Owns the dish form: values, per-field errors, touched flags and the
/// in-flight submission flag.
#[derive(Clone, Debug, Default)]
pub struct FormController {
    pub values: FormDish,
    pub errors: FieldErrors,
    pub touched: BTreeSet<FormField>,
    pub submitting: bool,
    /// Form-level message for failures not attributable to a field.
    pub api_error: Option<String>,
    // Raw inputs that could not be parsed into the typed value.
    input_errors: BTreeMap<FormField, String>,
    // Text behind each entry of `input_errors`, shown back to the user.
    rejected_inputs: BTreeMap<FormField, String>,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_field_change(&mut self, field: FormField, raw: &str) {
        match field {
            FormField::Name => self.values.name = raw.to_string(),
            FormField::PreparationTime => self.values.preparation_time = raw.to_string(),
            FormField::Type => match DishType::parse(raw) {
                Some(t) => {
                    self.input_errors.remove(&FormField::Type);
                    self.on_type_change(t);
                    return;
                }
                None => {
                    self.input_errors
                        .insert(FormField::Type, schema::type_error_message());
                }
            },
            FormField::PizzaSlices
            | FormField::PizzaDiameter
            | FormField::SoupSpicinessScale
            | FormField::BreadSlices => {
                let parsed = parse_number(raw);
                if parsed.is_none() && !raw.trim().is_empty() {
                    self.input_errors.insert(field, MSG_NOT_A_NUMBER.into());
                    self.rejected_inputs.insert(field, raw.to_string());
                } else {
                    self.input_errors.remove(&field);
                    self.rejected_inputs.remove(&field);
                }
                if let Some(slot) = self.values.number_slot(field) {
                    *slot = parsed;
                }
            }
        }
        self.revalidate();
    }

    pub fn on_field_blur(&mut self, field: FormField) {
        self.touched.insert(field);
    }

    /// Switch type. Every variant field goes back to its default; name and
    /// preparation time are kept.
    pub fn on_type_change(&mut self, new_type: DishType) {
        self.values.reset_variant_fields();
        self.values.dish_type = new_type;
        self.input_errors.retain(|f, _| !f.is_numeric());
        self.rejected_inputs.retain(|f, _| !f.is_numeric());
        self.revalidate();
        debug!(dish_type = %new_type, "dish type changed");
    }

    /// Restore defaults and clear errors and touched state. An in-flight
    /// submission is not aborted.
    pub fn on_reset(&mut self) {
        self.values = FormDish::default();
        self.errors.clear();
        self.touched.clear();
        self.input_errors.clear();
        self.rejected_inputs.clear();
    }

    /// First half of a submit: returns the payload to send, or `None` when the
    /// submit is ignored (already in flight) or blocked by validation.
    pub fn on_submit(&mut self) -> Option<WireDish> {
        if self.submitting {
            debug!("submit ignored: a submission is already in flight");
            return None;
        }
        self.submitting = true;
        self.touched.extend(FormField::ALL);
        self.revalidate();
        if !self.errors.is_empty() {
            debug!(fields = ?self.errors.keys().collect::<Vec<_>>(), "client validation failed");
            self.submitting = false;
            return None;
        }
        let dish = form_to_wire(&self.values);
        if dish.is_none() {
            self.submitting = false;
        }
        dish
    }

    /// Second half of a submit: fold the gateway's answer into the form.
    pub fn on_submit_complete(&mut self, outcome: &SubmitOutcome) {
        self.submitting = false;
        match outcome {
            SubmitOutcome::Success(_) => {
                self.api_error = None;
                info!("dish submitted");
            }
            SubmitOutcome::ValidationFailure(wire_errors) => {
                let form_errors = wire_errors_to_form_errors(wire_errors);
                for (field, messages) in form_errors {
                    if !messages.is_empty() {
                        self.errors.insert(field, messages);
                    }
                }
                info!(fields = self.errors.len(), "server rejected dish");
            }
            SubmitOutcome::GenericFailure => {
                self.errors.clear();
                self.api_error = Some(GENERIC_FAILURE_MESSAGE.into());
            }
        }
    }

    /// What the input for `field` shows: the typed value, or the raw text when
    /// it could not be parsed.
    pub fn input_text(&self, field: FormField) -> String {
        match self.rejected_inputs.get(&field) {
            Some(raw) => raw.clone(),
            None => self.values.display_value(field),
        }
    }

    pub fn is_touched(&self, field: FormField) -> bool {
        self.touched.contains(&field)
    }

    pub fn field_errors(&self, field: FormField) -> &[String] {
        self.errors.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Error to display under `field`: only once the field was touched.
    pub fn visible_error(&self, field: FormField) -> Option<&str> {
        if !self.is_touched(field) {
            return None;
        }
        self.field_errors(field).first().map(String::as_str)
    }

    fn revalidate(&mut self) {
        let mut errors = schema::validate(&self.values);
        for (field, msg) in &self.input_errors {
            errors.insert(*field, vec![msg.clone()]);
        }
        self.errors = errors;
    }
}
