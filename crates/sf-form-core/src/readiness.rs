//! Real-time submit gating: which requirements are still unmet.

pub const READINESS_FIELDS: [&str; 14] = [
    "full-name",
    "email",
    "phone",
    "dob",
    "gender",
    "branch",
    "group",
    "artist",
    "payment-type",
    "address-line1",
    "city",
    "state",
    "postal-code",
    "country-select",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldStatus {
    pub required: bool,
    pub empty: bool,
    /// Result of the browser's constraint validation.
    pub valid: bool,
}

impl FieldStatus {
    fn satisfied(self) -> bool {
        !(self.required && self.empty) && self.valid
    }
}

pub trait ReadinessSource {
    /// `None` when the element is absent.
    fn field(&self, id: &str) -> Option<FieldStatus>;
    fn contact_method_chosen(&self) -> bool;
    /// Whether any payment-method radio is on screen.
    fn payment_method_visible(&self) -> bool;
    fn payment_method_chosen(&self) -> bool;
    fn payment_type(&self) -> String;
}

pub const INSTALLMENT: &str = "Installment";

/// Names of unmet requirements, in a stable order.
pub fn missing_requirements(source: &impl ReadinessSource) -> Vec<String> {
    let mut missing = Vec::new();
    for id in READINESS_FIELDS {
        if let Some(status) = source.field(id) {
            if !status.satisfied() {
                missing.push(id.to_owned());
            }
        }
    }
    if !source.contact_method_chosen() {
        missing.push("contact-method".to_owned());
    }
    if source.payment_method_visible() && !source.payment_method_chosen() {
        missing.push("payment-method".to_owned());
    }
    if source.payment_type() == INSTALLMENT {
        if let Some(plan) = source.field("installment-plan") {
            if plan.empty || !plan.valid {
                missing.push("installment-plan".to_owned());
            }
        }
    }
    missing
}

/// Line shown under the submit button; empty when nothing is missing.
pub fn debug_line(missing: &[String]) -> String {
    if missing.is_empty() {
        String::new()
    } else {
        format!("Cannot submit: missing/invalid → {}", missing.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const OK: FieldStatus = FieldStatus { required: true, empty: false, valid: true };
    const EMPTY: FieldStatus = FieldStatus { required: true, empty: true, valid: false };

    struct Form {
        fields: HashMap<&'static str, FieldStatus>,
        contact: bool,
        method_visible: bool,
        method: bool,
        payment_type: &'static str,
    }

    impl Form {
        fn complete() -> Self {
            let mut fields: HashMap<_, _> = READINESS_FIELDS.iter().map(|id| (*id, OK)).collect();
            fields.insert("installment-plan", EMPTY);
            Self {
                fields,
                contact: true,
                method_visible: true,
                method: true,
                payment_type: "Full Payment",
            }
        }
    }

    impl ReadinessSource for Form {
        fn field(&self, id: &str) -> Option<FieldStatus> {
            self.fields.get(id).copied()
        }
        fn contact_method_chosen(&self) -> bool {
            self.contact
        }
        fn payment_method_visible(&self) -> bool {
            self.method_visible
        }
        fn payment_method_chosen(&self) -> bool {
            self.method
        }
        fn payment_type(&self) -> String {
            self.payment_type.to_owned()
        }
    }

    #[test]
    fn complete_form_is_ready() {
        let form = Form::complete();
        assert!(missing_requirements(&form).is_empty());
        assert_eq!(debug_line(&[]), "");
    }

    #[test]
    fn lists_every_gap_once() {
        let mut form = Form::complete();
        form.fields.insert("email", EMPTY);
        form.contact = false;
        form.method = false;
        let missing = missing_requirements(&form);
        assert_eq!(missing, vec!["email", "contact-method", "payment-method"]);
        assert_eq!(
            debug_line(&missing),
            "Cannot submit: missing/invalid → email, contact-method, payment-method"
        );
    }

    #[test]
    fn optional_empty_field_is_fine_but_invalid_is_not() {
        let mut form = Form::complete();
        form.fields.insert("state", FieldStatus { required: false, empty: true, valid: true });
        assert!(missing_requirements(&form).is_empty());
        form.fields.insert("postal-code", FieldStatus { required: true, empty: false, valid: false });
        assert_eq!(missing_requirements(&form), vec!["postal-code"]);
    }

    #[test]
    fn installment_needs_a_plan() {
        let mut form = Form::complete();
        form.payment_type = INSTALLMENT;
        assert_eq!(missing_requirements(&form), vec!["installment-plan"]);
        form.fields.insert("installment-plan", OK);
        assert!(missing_requirements(&form).is_empty());
    }

    #[test]
    fn hidden_payment_methods_are_not_required() {
        let mut form = Form::complete();
        form.method_visible = false;
        form.method = false;
        assert!(missing_requirements(&form).is_empty());
    }
}
