//! Weighted completion estimate.

/// Fields that count towards progress, in display order.
pub const TRACKED_FIELDS: [&str; 15] = [
    "referral-code",
    "full-name",
    "email",
    "phone",
    "address-line1",
    "city",
    "state",
    "postal-code",
    "country-select",
    "dob",
    "gender",
    "branch",
    "group",
    "artist",
    "payment-type",
];

/// Weight of the implicit "a contact method is chosen" entry.
pub const CONTACT_METHOD_WEIGHT: f64 = 1.0;

pub fn weight_of(id: &str) -> f64 {
    match id {
        "email" | "phone" => 1.2,
        "branch" | "group" | "artist" | "payment-type" => 1.1,
        _ => 1.0,
    }
}

/// Read-only view of the form for progress purposes.
pub trait ProgressSource {
    /// `None` when the element is absent from the page; absent fields neither
    /// count as filled nor add to the total.
    fn is_filled(&self, id: &str) -> Option<bool>;
    fn contact_method_chosen(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Progress(f64);

impl Progress {
    pub fn percent(self) -> f64 {
        self.0
    }

    pub fn rounded(self) -> u32 {
        self.0.round() as u32
    }

    pub fn live_text(self) -> String {
        format!("Form is {}% complete", self.rounded())
    }
}

pub fn estimate(source: &impl ProgressSource) -> Progress {
    let mut total = CONTACT_METHOD_WEIGHT;
    let mut filled = 0.0;

    for id in TRACKED_FIELDS {
        let Some(is_filled) = source.is_filled(id) else {
            continue;
        };
        let weight = weight_of(id);
        total += weight;
        if is_filled {
            filled += weight;
        }
    }
    if source.contact_method_chosen() {
        filled += CONTACT_METHOD_WEIGHT;
    }

    Progress((filled / total * 100.0).clamp(0.0, 100.0))
}
