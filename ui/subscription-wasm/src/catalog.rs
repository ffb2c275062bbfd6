//! Cascading branch → group → artist selects.

use sf_form_core::{audit, catalog};
use wasm_bindgen::JsValue;

use crate::dom;
use crate::progress;
use crate::state::AppContext;

const GROUP_PLACEHOLDER: &str = "Select a Group";
const ARTIST_PLACEHOLDER: &str = "Select an Artist";

pub fn populate_branches(app: &AppContext) -> Result<(), JsValue> {
    let Some(branch) = &app.els.branch else {
        return Ok(());
    };
    dom::append_options(branch, catalog::BRANCHES.iter().map(|b| (b.name, b.name)))
}

pub fn on_branch_change(app: &AppContext) -> Result<(), JsValue> {
    let (Some(branch), Some(group), Some(artist)) =
        (&app.els.branch, &app.els.group, &app.els.artist)
    else {
        return Ok(());
    };
    let selected = branch.value();
    dom::reset_select(group, GROUP_PLACEHOLDER)?;
    dom::reset_select(artist, ARTIST_PLACEHOLDER)?;
    let groups = catalog::groups_for(&selected);
    dom::append_options(group, groups.iter().map(|g| (*g, *g)))?;

    progress::update(app);
    audit::audit("Branch selected", &audit::sanitize(&selected));
    audit::audit("Groups populated", &groups.join(", "));
    Ok(())
}

pub fn on_group_change(app: &AppContext) -> Result<(), JsValue> {
    let (Some(group), Some(artist)) = (&app.els.group, &app.els.artist) else {
        return Ok(());
    };
    dom::reset_select(artist, ARTIST_PLACEHOLDER)?;
    let artists = catalog::artists_for(&group.value());
    dom::append_options(artist, artists.iter().map(|a| (*a, *a)))?;
    progress::update(app);
    Ok(())
}
