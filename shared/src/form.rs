//! State of the route form and every transition the UI can trigger.
//!
//! The frontend owns one [`FormState`] and performs the asynchronous work the
//! transitions ask for; completed work is fed back through the `*_resolved`,
//! `suggestions_received` and `finish_generate` methods. Nothing here touches
//! the network, so a rejected "Generate" is guaranteed to issue no calls.

use crate::{
    Place,
    clipboard::ClipboardContent,
    error::{ClipboardError, GenerateError},
    links::{MapLink, map_links},
    pipeline::{GenerateOutcome, GenerateRequest},
};

pub const SELF_PARKING_PREFIX: &str = "Directions to self-parking:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    ResolvingOrigin,
    Idle,
    Generating,
    ResultReady,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Origin,
    Destination,
}

/// Sequence number attached to a typeahead query.
pub type QueryTicket = u64;

/// Sequence number attached to a generation attempt. Survives [`FormState::reset`].
pub type GenerationTicket = u64;

/// A text input backed by typeahead suggestions. Typing unresolves the field
/// until a suggestion is selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceField {
    text: String,
    selected: Option<Place>,
    suggestions: Vec<Place>,
    latest_ticket: QueryTicket,
}

impl PlaceField {
    fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Default::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn suggestions(&self) -> &[Place] {
        &self.suggestions
    }

    pub fn selected(&self) -> Option<&Place> {
        self.selected.as_ref()
    }

    /// The selected place, or an unresolved place carrying whatever was typed.
    pub fn place(&self) -> Place {
        self.selected
            .clone()
            .unwrap_or_else(|| Place::unresolved(self.text.clone()))
    }

    fn edit(&mut self, text: String) -> QueryTicket {
        self.text = text;
        self.selected = None;
        self.latest_ticket += 1;
        self.latest_ticket
    }

    fn select(&mut self, place: Place) {
        self.text = place.label.clone();
        self.selected = Some(place);
        self.suggestions.clear();
        // Outstanding queries must not reopen the list.
        self.latest_ticket += 1;
    }

    fn is_current(&self, ticket: QueryTicket) -> bool {
        ticket == self.latest_ticket
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    status: FormStatus,
    default_origin: String,
    origin: PlaceField,
    destination: PlaceField,
    self_parking: String,
    outcome: Option<GenerateOutcome>,
    error: Option<String>,
    origin_pending: bool,
    generation: GenerationTicket,
}

impl FormState {
    /// Fresh form waiting for the default origin to be resolved.
    pub fn new(default_origin: impl Into<String>) -> Self {
        let default_origin = default_origin.into();
        Self {
            status: FormStatus::ResolvingOrigin,
            origin: PlaceField::with_text(&default_origin),
            destination: PlaceField::default(),
            self_parking: String::new(),
            outcome: None,
            error: None,
            origin_pending: true,
            generation: 0,
            default_origin,
        }
    }

    pub fn status(&self) -> FormStatus {
        self.status
    }

    pub fn field(&self, field: Field) -> &PlaceField {
        match field {
            Field::Origin => &self.origin,
            Field::Destination => &self.destination,
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut PlaceField {
        match field {
            Field::Origin => &mut self.origin,
            Field::Destination => &mut self.destination,
        }
    }

    pub fn self_parking(&self) -> &str {
        &self.self_parking
    }

    pub fn narrative(&self) -> Option<&str> {
        self.outcome.as_ref().map(|o| o.prose.as_str())
    }

    pub fn outcome(&self) -> Option<&GenerateOutcome> {
        self.outcome.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_generating(&self) -> bool {
        self.status == FormStatus::Generating
    }

    /// Text of the default origin that should now be resolved.
    pub fn default_origin(&self) -> &str {
        &self.default_origin
    }

    /// Clears everything the user entered and starts resolving the default origin again.
    /// A generation still in flight is abandoned.
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self::new(std::mem::take(&mut self.default_origin));
        self.generation = generation;
    }

    /// Whether the default origin lookup has yet to report back.
    pub fn is_origin_pending(&self) -> bool {
        self.origin_pending
    }

    /// Result of resolving the default origin. A failure leaves the label-only origin.
    pub fn origin_resolved(&mut self, place: Option<Place>) {
        if !self.origin_pending {
            return;
        }
        self.origin_pending = false;
        // The user may have started typing while the lookup was in flight.
        if self.origin.selected.is_none() && self.origin.text == self.default_origin {
            if let Some(place) = place.filter(Place::is_resolved) {
                self.origin.select(place);
            }
        }
        if self.status == FormStatus::ResolvingOrigin {
            self.status = FormStatus::Idle;
        }
    }

    /// Records a keystroke and returns the ticket for the debounced suggestion query.
    pub fn edit(&mut self, field: Field, text: String) -> QueryTicket {
        self.clear_error();
        self.field_mut(field).edit(text)
    }

    /// Query text to send once the debounce delay for `ticket` has elapsed, or
    /// `None` when a newer keystroke has superseded it.
    pub fn suggestion_query(&self, field: Field, ticket: QueryTicket) -> Option<String> {
        let field = self.field(field);
        if !field.is_current(ticket) || field.selected.is_some() {
            return None;
        }
        let query = field.text.trim();
        (!query.is_empty()).then(|| query.to_string())
    }

    /// Applies suggestions only if they answer the latest query for the field.
    pub fn suggestions_received(
        &mut self,
        field: Field,
        ticket: QueryTicket,
        suggestions: Vec<Place>,
    ) -> bool {
        let field = self.field_mut(field);
        if !field.is_current(ticket) {
            tracing::debug!("discarding stale suggestions for ticket {ticket}");
            return false;
        }
        field.suggestions = suggestions;
        true
    }

    pub fn select(&mut self, field: Field, place: Place) {
        self.clear_error();
        self.field_mut(field).select(place);
    }

    pub fn edit_self_parking(&mut self, text: String) {
        self.clear_error();
        self.self_parking = text;
    }

    /// Validates the form and enters `Generating`. Returns `None` when the
    /// attempt must not start: already generating, or an endpoint is unresolved
    /// (the validation message is then shown and no call should be made).
    /// The ticket must be handed back to [`FormState::finish_generate`].
    pub fn begin_generate(&mut self) -> Option<(GenerationTicket, GenerateRequest)> {
        if self.is_generating() {
            return None;
        }
        match GenerateRequest::new(
            &self.origin.place(),
            &self.destination.place(),
            &self.self_parking,
        ) {
            Ok(request) => {
                self.generation += 1;
                self.status = FormStatus::Generating;
                self.error = None;
                self.outcome = None;
                Some((self.generation, request))
            }
            Err(err) => {
                self.fail(&GenerateError::from(err));
                None
            }
        }
    }

    /// Applies the result of the attempt identified by `ticket`. Results of
    /// attempts abandoned by a reset are dropped and `false` is returned.
    pub fn finish_generate(
        &mut self,
        ticket: GenerationTicket,
        result: Result<GenerateOutcome, GenerateError>,
    ) -> bool {
        if !self.is_generating() || ticket != self.generation {
            tracing::debug!("discarding result of abandoned generation {ticket}");
            return false;
        }
        match result {
            Ok(outcome) => {
                self.outcome = Some(outcome);
                self.error = None;
                self.status = FormStatus::ResultReady;
            }
            Err(err) => self.fail(&err),
        }
        true
    }

    fn fail(&mut self, err: &GenerateError) {
        self.error = Some(err.to_string());
        self.status = FormStatus::Error;
    }

    fn clear_error(&mut self) {
        self.error = None;
        if self.status == FormStatus::Error {
            self.status = FormStatus::Idle;
        }
    }

    /// Shown next to the destination when the route ends somewhere else.
    pub fn self_parking_note(&self) -> Option<String> {
        let effective = &self.outcome.as_ref()?.effective_destination;
        let destination = self.destination.place();
        let differs = effective.coordinates != destination.coordinates
            || effective.label != destination.label;
        differs.then(|| format!("{SELF_PARKING_PREFIX} {}", effective.label))
    }

    /// Links to where the route ends, or to the chosen destination before any result.
    pub fn map_links(&self) -> Vec<MapLink> {
        match &self.outcome {
            Some(outcome) => map_links(&outcome.effective_destination),
            None => self
                .destination
                .selected
                .as_ref()
                .map(map_links)
                .unwrap_or_default(),
        }
    }

    pub fn narrative_clipboard(&self) -> Option<ClipboardContent> {
        self.narrative().map(ClipboardContent::narrative)
    }

    pub fn links_clipboard(&self) -> Option<ClipboardContent> {
        let links = self.map_links();
        (!links.is_empty()).then(|| ClipboardContent::links(&links))
    }

    /// A copy attempt exhausted every method. The result stays on screen.
    pub fn copy_failed(&mut self, err: ClipboardError) {
        self.error = Some(err.to_string());
    }
}
