//! Phone prefix badge and as-you-type formatting.
//!
//! The external formatter is loaded on demand. Until it arrives, or if it
//! never does, the per-country mask formats the input instead.

use sf_form_core::phone::{self, DEFAULT_PHONE_COUNTRY};

use crate::dom::Control;
use crate::state::{App, AppContext};
use crate::validation;
use crate::widgets::AsYouType;

pub struct PhoneState {
    pub country: String,
    pub formatter: Option<AsYouType>,
}

impl Default for PhoneState {
    fn default() -> Self {
        Self {
            country: DEFAULT_PHONE_COUNTRY.to_owned(),
            formatter: None,
        }
    }
}

pub async fn init(app: App) {
    let country = match app.geo.locate().await {
        Ok(location) => location.country().map(|c| c.to_string()),
        Err(err) => {
            tracing::debug!(error = %err, "phone country falls back to default");
            None
        }
    }
    .unwrap_or_else(|| DEFAULT_PHONE_COUNTRY.to_owned());

    let meta = phone::phone_country(&country);
    if let Some(prefix) = &app.els.phone_prefix {
        prefix.set_text_content(Some(&meta.prefix_label()));
    }
    app.phone.borrow_mut().country = country;

    match AsYouType::load(&app.config.phone_module_url).await {
        Ok(formatter) => app.phone.borrow_mut().formatter = Some(formatter),
        Err(err) => tracing::warn!(%err, "phone formatting module unavailable, using mask"),
    }
}

pub fn on_input(app: &AppContext) {
    let Some(input) = &app.els.phone else {
        return;
    };
    let raw = input.value();
    let formatted = {
        let state = app.phone.borrow();
        match &state.formatter {
            Some(formatter) => formatter
                .format(&state.country, &raw)
                .unwrap_or_else(|err| {
                    tracing::debug!(%err, "as-you-type failed, using mask");
                    phone::phone_country(&state.country).format(&raw)
                }),
            None => phone::phone_country(&state.country).format(&raw),
        }
    };
    if formatted != raw {
        input.set_value(&formatted);
    }
    validation::validate(app, &Control::Input(input.clone()));
}
