use std::rc::Rc;

use async_trait::async_trait;
use seed::{prelude::*, virtual_dom::AtValue, *};
use shared::{
    Place,
    clipboard::{ClipboardBackend, ClipboardContent, CopyMethod, export},
    config::{MapboxConfig, NarratorConfig},
    error::{ClipboardError, GenerateError},
    form::{Field, FormState, FormStatus, GenerationTicket, QueryTicket},
    pipeline::{GenerateOutcome, RouteNarrator},
};
use wasm_bindgen::prelude::{JsValue, wasm_bindgen};

const SUGGESTION_DEBOUNCE_MS: u32 = 300;
const COPIED_INDICATOR_MS: u32 = 2_000;

#[wasm_bindgen(module = "/clipboard.js")]
extern "C" {
    #[wasm_bindgen(js_name = copyRenderedRegion)]
    fn copy_rendered_region(region_id: &str) -> bool;
    #[wasm_bindgen(js_name = writeClipboardText, catch)]
    async fn write_clipboard_text(text: &str) -> Result<JsValue, JsValue>;
    #[wasm_bindgen(js_name = copyViaSyntheticField)]
    fn copy_via_synthetic_field(text: &str) -> bool;
}

/// Build-time configuration, baked in the way the bundle is served.
fn narrator_config() -> NarratorConfig {
    let mut mapbox = MapboxConfig::new(option_env!("MAPBOX_TOKEN").map(str::to_string));
    if let Some(url) = option_env!("MAPBOX_BASE_URL") {
        mapbox = mapbox.with_base_url(url);
    }
    if let Some(country) = option_env!("GEOCODE_COUNTRY") {
        mapbox = mapbox.with_country(Some(country.to_string()));
    }

    let config = NarratorConfig::new(mapbox);
    match option_env!("NARRATIVE_ENDPOINT") {
        Some(endpoint) => config.with_narrative_endpoint(endpoint.trim_end_matches('/')),
        None => config,
    }
}

struct BrowserClipboard;

#[async_trait(?Send)]
impl ClipboardBackend for BrowserClipboard {
    async fn attempt(&self, method: CopyMethod, content: &ClipboardContent) -> bool {
        match method {
            CopyMethod::RichSelection => copy_rendered_region(content.region_id),
            CopyMethod::ClipboardApi => write_clipboard_text(&content.plain).await.is_ok(),
            CopyMethod::SyntheticField => copy_via_synthetic_field(&content.plain),
        }
    }
}

pub struct Model {
    form: FormState,
    narrator: Rc<RouteNarrator>,
    copied: Option<CopyTarget>,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum CopyTarget {
    Narrative,
    Links,
}

pub enum Msg {
    OriginResolved(Option<Place>),
    FieldChanged(Field, String),
    SuggestionDue(Field, QueryTicket),
    SuggestionsFetched(Field, QueryTicket, Vec<Place>),
    SuggestionPicked(Field, Place),
    SelfParkingChanged(String),
    Generate,
    Generated(GenerationTicket, Result<GenerateOutcome, GenerateError>),
    Copy(CopyTarget),
    Copied(CopyTarget, Result<CopyMethod, ClipboardError>),
    ClearCopied(CopyTarget),
    Reset,
}

pub fn init(_: Url, orders: &mut impl Orders<Msg>) -> Model {
    let config = narrator_config();
    let model = Model {
        form: FormState::new(config.default_origin.clone()),
        narrator: Rc::new(RouteNarrator::new(&config)),
        copied: None,
    };
    orders.perform_cmd(resolve_origin(
        Rc::clone(&model.narrator),
        config.default_origin,
    ));
    model
}

pub fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    match msg {
        Msg::OriginResolved(place) => model.form.origin_resolved(place),
        Msg::FieldChanged(field, text) => {
            let ticket = model.form.edit(field, text);
            orders.perform_cmd(cmds::timeout(SUGGESTION_DEBOUNCE_MS, move || {
                Msg::SuggestionDue(field, ticket)
            }));
        }
        Msg::SuggestionDue(field, ticket) => {
            if let Some(query) = model.form.suggestion_query(field, ticket) {
                orders.perform_cmd(fetch_suggestions(
                    Rc::clone(&model.narrator),
                    field,
                    ticket,
                    query,
                ));
            }
        }
        Msg::SuggestionsFetched(field, ticket, places) => {
            if !model.form.suggestions_received(field, ticket, places) {
                web_sys::console::debug_1(
                    &format!("[frontend] dropped stale suggestions for {field:?} #{ticket}").into(),
                );
            }
        }
        Msg::SuggestionPicked(field, place) => model.form.select(field, place),
        Msg::SelfParkingChanged(text) => model.form.edit_self_parking(text),
        Msg::Generate => {
            if let Some((ticket, request)) = model.form.begin_generate() {
                model.copied = None;
                let narrator = Rc::clone(&model.narrator);
                orders.perform_cmd(async move {
                    Msg::Generated(ticket, narrator.generate(&request).await)
                });
            }
        }
        Msg::Generated(ticket, result) => {
            if let Err(err) = &result {
                web_sys::console::error_1(&format!("[frontend] generation failed: {err}").into());
            }
            if !model.form.finish_generate(ticket, result) {
                web_sys::console::debug_1(
                    &format!("[frontend] dropped result of abandoned generation #{ticket}").into(),
                );
            }
        }
        Msg::Copy(target) => {
            if let Some(content) = clipboard_content(&model.form, target) {
                orders.perform_cmd(async move {
                    Msg::Copied(target, export(&BrowserClipboard, &content).await)
                });
            }
        }
        Msg::Copied(target, Ok(method)) => {
            web_sys::console::debug_1(&format!("[frontend] copied {target:?} via {method:?}").into());
            model.copied = Some(target);
            orders.perform_cmd(cmds::timeout(COPIED_INDICATOR_MS, move || {
                Msg::ClearCopied(target)
            }));
        }
        Msg::Copied(_, Err(err)) => model.form.copy_failed(err),
        Msg::ClearCopied(target) => {
            if model.copied == Some(target) {
                model.copied = None;
            }
        }
        Msg::Reset => {
            model.form.reset();
            model.copied = None;
            orders.perform_cmd(resolve_origin(
                Rc::clone(&model.narrator),
                model.form.default_origin().to_string(),
            ));
        }
    }
}

async fn resolve_origin(narrator: Rc<RouteNarrator>, address: String) -> Msg {
    match narrator.resolve(&address).await {
        Ok(place) => Msg::OriginResolved(Some(place)),
        Err(err) => {
            web_sys::console::error_1(
                &format!("[frontend] could not resolve default origin: {err}").into(),
            );
            Msg::OriginResolved(None)
        }
    }
}

async fn fetch_suggestions(
    narrator: Rc<RouteNarrator>,
    field: Field,
    ticket: QueryTicket,
    query: String,
) -> Msg {
    let places = narrator.suggest(&query).await.unwrap_or_else(|err| {
        web_sys::console::error_1(&format!("[frontend] suggestions failed: {err}").into());
        Vec::new()
    });
    Msg::SuggestionsFetched(field, ticket, places)
}

pub fn view(model: &Model) -> Node<Msg> {
    div![
        C!["app-container"],
        h1!["Route Narrator"],
        view_form(model),
        view_result(model),
    ]
}

fn view_form(model: &Model) -> Node<Msg> {
    let form = &model.form;
    div![
        C!["form"],
        view_place_field(form, Field::Origin, "Starting point"),
        view_place_field(form, Field::Destination, "Destination"),
        div![
            C!["input-field"],
            label!["Self-parking (address, coordinates or map link)"],
            input![
                attrs! {
                    At::Value => form.self_parking(),
                    At::AutoComplete => "off",
                    At::SpellCheck => "false",
                },
                input_ev(Ev::Input, Msg::SelfParkingChanged),
            ]
        ],
        button![
            if form.is_generating() { "Generating…" } else { "Generate" },
            ev(Ev::Click, |event| {
                event.prevent_default();
                Msg::Generate
            }),
            attrs! { At::Disabled => bool_attr(form.is_generating()) },
        ],
        button![
            "Reset",
            ev(Ev::Click, |event| {
                event.prevent_default();
                Msg::Reset
            }),
            C!["reset-btn"],
        ],
        status_text(form.status()).map_or_else(|| empty![], |text| p![C!["status"], text]),
        if let Some(error) = form.error() {
            p![C!["error"], error]
        } else {
            empty![]
        }
    ]
}

fn view_place_field(form: &FormState, field: Field, caption: &str) -> Node<Msg> {
    let state = form.field(field);
    let suggestions = state.suggestions().iter().map(|place| {
        let label = place.label.clone();
        let place = place.clone();
        li![
            C!["suggestion"],
            label,
            ev(Ev::MouseDown, move |event| {
                event.prevent_default();
                Msg::SuggestionPicked(field, place)
            }),
        ]
    });

    div![
        C!["input-field"],
        label![caption],
        input![
            attrs! {
                At::Value => state.text(),
                At::AutoComplete => "off",
                At::SpellCheck => "false",
            },
            input_ev(Ev::Input, move |text| Msg::FieldChanged(field, text)),
        ],
        if state.suggestions().is_empty() {
            empty![]
        } else {
            ul![C!["suggestions"], suggestions]
        }
    ]
}

fn view_result(model: &Model) -> Node<Msg> {
    if model.form.outcome().is_none() {
        return empty![];
    }

    div![
        C!["result"],
        model
            .form
            .self_parking_note()
            .map_or_else(|| empty![], |note| p![C!["self-parking-note"], note]),
        view_copy_region(model, CopyTarget::Narrative, "Copy narrative"),
        view_copy_region(model, CopyTarget::Links, "Copy links"),
    ]
}

/// The rendered region is the rich-text serialization itself, so a selection
/// copy carries the same styling and anchors as the clipboard HTML.
fn view_copy_region(model: &Model, target: CopyTarget, caption: &'static str) -> Node<Msg> {
    let Some(content) = clipboard_content(&model.form, target) else {
        return empty![];
    };
    div![
        div![
            attrs! { At::Id => content.region_id },
            C!["copy-region"],
            raw![&content.html],
        ],
        button![
            copy_label(model.copied, target, caption),
            ev(Ev::Click, move |_| Msg::Copy(target)),
        ],
    ]
}

fn clipboard_content(form: &FormState, target: CopyTarget) -> Option<ClipboardContent> {
    match target {
        CopyTarget::Narrative => form.narrative_clipboard(),
        CopyTarget::Links => form.links_clipboard(),
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    App::start("app", init, update, view);
}

fn status_text(status: FormStatus) -> Option<&'static str> {
    match status {
        FormStatus::ResolvingOrigin => Some("Locating the default starting point…"),
        FormStatus::Generating => Some("Fetching directions and writing the narrative…"),
        FormStatus::Idle | FormStatus::ResultReady | FormStatus::Error => None,
    }
}

fn copy_label(copied: Option<CopyTarget>, target: CopyTarget, idle: &'static str) -> &'static str {
    if copied == Some(target) {
        "Copied!"
    } else {
        idle
    }
}

fn bool_attr(value: bool) -> AtValue {
    if value {
        AtValue::Some("true".into())
    } else {
        AtValue::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copied_indicator_only_marks_its_own_button() {
        let copied = Some(CopyTarget::Narrative);
        assert_eq!(
            copy_label(copied, CopyTarget::Narrative, "Copy narrative"),
            "Copied!"
        );
        assert_eq!(copy_label(copied, CopyTarget::Links, "Copy links"), "Copy links");
        assert_eq!(
            copy_label(None, CopyTarget::Narrative, "Copy narrative"),
            "Copy narrative"
        );
    }

    #[test]
    fn status_line_only_shows_while_busy() {
        assert!(status_text(FormStatus::ResolvingOrigin).is_some());
        assert!(status_text(FormStatus::Generating).is_some());
        assert_eq!(status_text(FormStatus::Idle), None);
        assert_eq!(status_text(FormStatus::ResultReady), None);
        assert_eq!(status_text(FormStatus::Error), None);
    }

    #[test]
    fn build_config_defaults_to_local_backend() {
        let config = narrator_config();
        assert_eq!(config.default_origin, shared::config::DEFAULT_ORIGIN_ADDRESS);
        if option_env!("NARRATIVE_ENDPOINT").is_none() {
            assert_eq!(
                config.narrative_endpoint,
                shared::config::DEFAULT_NARRATIVE_ENDPOINT
            );
        }
    }

    #[test]
    fn copy_regions_render_styled_rich_text() {
        use shared::{
            Coordinate,
            clipboard::{LINKS_REGION_ID, NARRATIVE_REGION_ID, RICH_TEXT_STYLE},
        };

        let mut form = FormState::new(shared::config::DEFAULT_ORIGIN_ADDRESS);
        assert!(clipboard_content(&form, CopyTarget::Narrative).is_none());

        let airport = Place::resolved(
            "Orlando International Airport",
            Coordinate {
                lat: 28.4312,
                lon: -81.3081,
            },
        );
        form.origin_resolved(Some(Place::resolved(
            "55 West Church Street",
            Coordinate {
                lat: 28.5413,
                lon: -81.3803,
            },
        )));
        form.select(Field::Destination, airport.clone());
        let (ticket, _) = form.begin_generate().unwrap();
        form.finish_generate(
            ticket,
            Ok(GenerateOutcome {
                prose: "Head east & arrive.".into(),
                maneuvers: vec!["Head east".into()],
                effective_destination: airport,
            }),
        );

        let narrative = clipboard_content(&form, CopyTarget::Narrative).unwrap();
        assert_eq!(narrative.region_id, NARRATIVE_REGION_ID);
        assert!(narrative.html.contains(RICH_TEXT_STYLE));
        assert!(narrative.html.contains("Head east &amp; arrive."));

        let links = clipboard_content(&form, CopyTarget::Links).unwrap();
        assert_eq!(links.region_id, LINKS_REGION_ID);
        assert!(links.html.contains(RICH_TEXT_STYLE));
        assert!(links.html.contains("<a href="));
    }

    #[test]
    fn bool_attr_omits_false() {
        assert!(matches!(bool_attr(false), AtValue::Ignored));
        assert!(matches!(bool_attr(true), AtValue::Some(_)));
    }
}
