// ── Form state synchronizer ──
//
// One `FormSession` per open dialog. It owns the dialog's value set, runs
// the evaluator after every change, applies resets before returning, and
// gates submission so only one submit is ever in flight.
//
//   Editing ──blur/submit──▶ Validating ──▶ Invalid | Ready
//   Ready ──begin_submit──▶ Submitting ──ok──▶ Closed
//                                     └─fail─▶ Editing (server errors merged)

mod lookup;
mod submit;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use indexmap::IndexSet;
use serde::Serialize;
use strum::Display;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::context::SessionContext;
use crate::error::SessionError;
use crate::evaluate::{Evaluation, FieldState};
use crate::model::{ErrorMap, FieldDescriptor, FieldOption, FieldValue, MessageKey, ValueSet, keys};
use crate::resolve::{LookupResult, project};
use crate::schema::{EntitySchema, ResolvedOptions};

pub use lookup::{DEFAULT_DEBOUNCE, LookupTicket};
pub use submit::{SubmitGate, SubmitOutcome, SubmitResolution, SubmitTicket, Submitter};

use lookup::LookupTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FormState {
    Editing,
    Validating,
    Invalid,
    Ready,
    Submitting,
    Closed,
}

/// Shared flag async work checks before touching a dialog. Goes `false`
/// for good once the dialog closes.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn kill(&self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug)]
pub struct FormSession {
    id: Uuid,
    schema: Arc<EntitySchema>,
    context: SessionContext,
    values: ValueSet,
    /// Values as they were when the dialog opened (after settling).
    initial: ValueSet,
    options: ResolvedOptions,
    evaluation: Evaluation,
    /// Local validation result.
    errors: ErrorMap,
    /// Field errors returned by the last rejected submit.
    server_errors: ErrorMap,
    form_error: Option<MessageKey>,
    touched: IndexSet<String>,
    submit_attempted: bool,
    state: FormState,
    submit_generation: u64,
    liveness: Liveness,
    lookups: LookupTracker,
}

impl FormSession {
    /// Open a create dialog seeded from descriptor defaults.
    pub fn create(schema: Arc<EntitySchema>, context: SessionContext) -> Self {
        let values = schema.initial_values();
        Self::open(schema, context, values)
    }

    /// Open an edit dialog seeded from an existing (denormalized) record.
    ///
    /// Record keys the schema doesn't know (ids, timestamps) are carried
    /// through to the submitted snapshot untouched.
    pub fn edit(schema: Arc<EntitySchema>, context: SessionContext, record: &ValueSet) -> Self {
        let mut values = schema.initial_values();
        values.extend(record.clone());
        Self::open(schema, context, values)
    }

    fn open(schema: Arc<EntitySchema>, context: SessionContext, values: ValueSet) -> Self {
        let evaluation = schema.evaluate(&values, &context);
        let mut session = Self {
            id: Uuid::new_v4(),
            schema,
            context,
            initial: values.clone(),
            values,
            options: ResolvedOptions::new(),
            evaluation,
            errors: ErrorMap::new(),
            server_errors: ErrorMap::new(),
            form_error: None,
            touched: IndexSet::new(),
            submit_attempted: false,
            state: FormState::Editing,
            submit_generation: 0,
            liveness: Liveness::new(),
            lookups: LookupTracker::new(),
        };
        session.settle();
        session.initial = session.values.clone();
        session.refresh_errors();
        debug!(
            dialog = %session.id,
            entity = %session.schema.kind(),
            mode = %session.context.mode,
            "dialog opened"
        );
        session
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn schema(&self) -> &Arc<EntitySchema> {
        &self.schema
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn values(&self) -> &ValueSet {
        &self.values
    }

    pub fn value(&self, name: &str) -> &FieldValue {
        self.values.value(name)
    }

    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    pub fn field_state(&self, name: &str) -> Option<FieldState> {
        self.evaluation.state(name)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.evaluation.is_required(name)
    }

    pub fn is_visible(&self, name: &str) -> bool {
        self.evaluation.is_visible(name)
    }

    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.state == FormState::Closed
    }

    /// `true` when any value differs from what the dialog opened with.
    pub fn is_dirty(&self) -> bool {
        self.values != self.initial
    }

    /// Current options of a choice field: resolved lookups when present,
    /// the static list otherwise.
    pub fn options(&self, name: &str) -> &[FieldOption] {
        match self.options.get(name) {
            Some(options) => options,
            None => self
                .schema
                .descriptor(name)
                .map_or(&[], |d| d.options.as_slice()),
        }
    }

    /// Descriptor with its options resolved, ready to render.
    pub fn descriptor(&self, name: &str) -> Option<FieldDescriptor> {
        let mut descriptor = self.schema.descriptor(name)?.clone();
        if let Some(options) = self.options.get(name) {
            descriptor.options.clone_from(options);
        }
        Some(descriptor)
    }

    /// Local and server errors combined. Local errors win for a field.
    pub fn errors(&self) -> ErrorMap {
        let mut merged = self.errors.clone();
        for (field, key) in self.server_errors.iter() {
            if !merged.contains(field) {
                merged.insert(field, key.clone());
            }
        }
        merged
    }

    /// Errors worth showing: touched fields only, or every field once a
    /// submit was attempted.
    pub fn visible_errors(&self) -> ErrorMap {
        let mut errors = self.errors();
        if !self.submit_attempted {
            errors.retain(|field, _| self.touched.contains(field));
        }
        errors
    }

    pub fn form_error(&self) -> Option<&MessageKey> {
        self.form_error.as_ref()
    }

    // ── Editing ─────────────────────────────────────────────────────

    /// Write a field value, then settle the rules.
    ///
    /// Returns the resets applied as a consequence, in application order.
    pub fn set(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<Vec<(String, FieldValue)>, SessionError> {
        self.ensure_editable()?;
        let descriptor = self
            .schema
            .descriptor(name)
            .ok_or_else(|| SessionError::UnknownField {
                field: name.to_owned(),
            })?;
        if !descriptor.kind.carries_value() {
            return Err(SessionError::NotEditable {
                field: name.to_owned(),
            });
        }

        self.values.set(name, value);
        self.touched.insert(name.to_owned());
        self.server_errors.remove(name);
        self.state = FormState::Editing;

        let applied = self.settle();
        self.refresh_errors();
        Ok(applied)
    }

    /// Put a field back to the value it opened with.
    pub fn reset_field(&mut self, name: &str) -> Result<Vec<(String, FieldValue)>, SessionError> {
        let original = self.initial.value(name).clone();
        self.set(name, original)
    }

    /// Mark a field touched and validate. Returns that field's error.
    pub fn blur(&mut self, name: &str) -> Result<Option<MessageKey>, SessionError> {
        self.ensure_editable()?;
        if self.schema.descriptor(name).is_none() {
            return Err(SessionError::UnknownField {
                field: name.to_owned(),
            });
        }
        self.touched.insert(name.to_owned());
        self.validate()?;
        Ok(self.errors().get(name).cloned())
    }

    /// Run the schema over the current values. `true` when valid.
    pub fn validate(&mut self) -> Result<bool, SessionError> {
        self.ensure_editable()?;
        self.state = FormState::Validating;
        self.refresh_errors();
        let valid = self.errors.is_empty();
        self.state = if valid {
            FormState::Ready
        } else {
            FormState::Invalid
        };
        Ok(valid)
    }

    fn ensure_editable(&self) -> Result<(), SessionError> {
        match self.state {
            FormState::Closed => Err(SessionError::Closed),
            FormState::Submitting => Err(SessionError::SubmitInFlight),
            _ => Ok(()),
        }
    }

    fn refresh_errors(&mut self) {
        self.errors = self
            .schema
            .validate_with(&self.values, &self.context, &self.options);
    }

    /// Re-run the evaluator and apply resets until none remain.
    ///
    /// Each pass is single-generation, so a reset that flips another
    /// rule's controller is only seen on the next pass. The loop is
    /// bounded by the descriptor count.
    fn settle(&mut self) -> Vec<(String, FieldValue)> {
        let bound = self.schema.descriptors().len() + 1;
        let mut applied = Vec::new();

        for _ in 0..bound {
            self.evaluation = self.schema.evaluate(&self.values, &self.context);
            if !self.evaluation.has_resets() {
                return applied;
            }
            for (field, value) in &self.evaluation.resets {
                debug!(dialog = %self.id, field = %field, value = %value, "applying reset");
                self.values.set(field.clone(), value.clone());
                applied.push((field.clone(), value.clone()));
            }
        }

        self.evaluation = self.schema.evaluate(&self.values, &self.context);
        if self.evaluation.has_resets() {
            warn!(
                dialog = %self.id,
                entity = %self.schema.kind(),
                pending = self.evaluation.resets.len(),
                "reset cascade did not settle"
            );
        }
        applied
    }

    // ── Submission ──────────────────────────────────────────────────

    /// Validate and, when valid, move to `Submitting`.
    pub fn begin_submit(&mut self) -> Result<SubmitGate, SessionError> {
        self.ensure_editable()?;
        self.submit_attempted = true;
        self.server_errors = ErrorMap::new();
        self.form_error = None;

        if !self.validate()? {
            return Ok(SubmitGate::Invalid(self.errors.clone()));
        }

        self.state = FormState::Submitting;
        self.submit_generation += 1;
        Ok(SubmitGate::Ready(SubmitTicket::new(
            self.submit_generation,
            self.values.clone(),
        )))
    }

    /// Settle an in-flight submit with the backend's answer.
    ///
    /// Field errors naming a descriptor merge into the error map; anything
    /// else becomes the form-level error.
    pub fn finish_submit(&mut self, ticket: SubmitTicket, outcome: SubmitOutcome) -> SubmitResolution {
        if self.state != FormState::Submitting || ticket.generation != self.submit_generation {
            debug!(dialog = %self.id, "discarding stale submit outcome");
            return SubmitResolution::Discarded;
        }

        if outcome.ok {
            info!(dialog = %self.id, entity = %self.schema.kind(), "submit accepted");
            self.shut();
            return SubmitResolution::Accepted(ticket.values().clone());
        }

        let mut unattributed = None;
        for (field, key) in outcome.server_errors {
            if self.schema.descriptor(&field).is_some() {
                self.server_errors.insert(field, key);
            } else {
                unattributed.get_or_insert(key);
            }
        }
        self.form_error = outcome.message.or(unattributed);
        if self.form_error.is_none() && self.server_errors.is_empty() {
            self.form_error = Some(keys::SUBMIT_FAILED);
        }
        self.state = FormState::Editing;

        info!(
            dialog = %self.id,
            entity = %self.schema.kind(),
            field_errors = self.server_errors.len(),
            "submit rejected"
        );
        SubmitResolution::Rejected {
            errors: self.errors(),
            form_error: self.form_error.clone(),
        }
    }

    /// Validate, hand the snapshot to `submitter`, and settle.
    pub async fn submit<S: Submitter>(&mut self, submitter: &S) -> Result<SubmitResolution, SessionError> {
        match self.begin_submit()? {
            SubmitGate::Invalid(errors) => Ok(SubmitResolution::Invalid(errors)),
            SubmitGate::Ready(ticket) => {
                let outcome = submitter
                    .submit(ticket.values().clone(), &self.context)
                    .await;
                Ok(self.finish_submit(ticket, outcome))
            }
        }
    }

    /// Cancel the dialog. Pending lookups and submits are ignored from now on.
    pub fn close(&mut self) {
        if self.state != FormState::Closed {
            debug!(dialog = %self.id, "dialog closed");
            self.shut();
        }
    }

    fn shut(&mut self) {
        self.state = FormState::Closed;
        self.liveness.kill();
        self.lookups.cancel_all();
    }

    // ── Lookups ─────────────────────────────────────────────────────

    /// Start a lookup for a field, superseding any pending one.
    pub fn begin_lookup(&mut self, field: &str, query: &str) -> Result<LookupTicket, SessionError> {
        if self.is_closed() {
            return Err(SessionError::Closed);
        }
        if self.schema.descriptor(field).is_none() {
            return Err(SessionError::UnknownField {
                field: field.to_owned(),
            });
        }
        Ok(self.lookups.begin(field, query))
    }

    /// Apply a lookup's records. Stale or post-close results are dropped
    /// and `false` is returned.
    pub fn apply_lookup(&mut self, ticket: &LookupTicket, lookup: &LookupResult) -> bool {
        if self.is_closed() || !self.lookups.is_current(ticket) {
            debug!(
                dialog = %self.id,
                field = ticket.field(),
                request_id = ticket.request_id(),
                "discarding stale lookup result"
            );
            return false;
        }
        let options = project(lookup, &self.context);
        debug!(field = ticket.field(), options = options.len(), "lookup applied");
        self.options.insert(ticket.field().to_owned(), options);
        self.lookups.complete(ticket);
        self.refresh_errors();
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::future::Future;

    use super::*;
    use crate::context::flags;
    use crate::model::{Constraint, EntityKind, FieldKind, Predicate, when, when_flag};
    use crate::resolve::Projection;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn schema() -> Arc<EntitySchema> {
        let password = when("authType", Predicate::equals(1));
        let radius = when("authType", Predicate::equals(2));
        Arc::new(
            EntitySchema::compile(
                EntityKind::Portal,
                vec![
                    FieldDescriptor::text("name").required(),
                    FieldDescriptor::select("authType")
                        .required()
                        .default_value(1)
                        .option(1, "portal.auth.password")
                        .option(2, "portal.auth.radius"),
                    FieldDescriptor::new("password", FieldKind::Password)
                        .constraint(Constraint::length(4, 32)),
                    FieldDescriptor::select("radiusProfileId"),
                    FieldDescriptor::switch("customTimeout"),
                    FieldDescriptor::number("timeout"),
                    FieldDescriptor::new("note", FieldKind::Text),
                    FieldDescriptor::new("advanced", FieldKind::CategoryHeading),
                ],
                vec![
                    password.require("password"),
                    password.reset("radiusProfileId"),
                    radius.reset("password"),
                    radius.require("radiusProfileId"),
                    when("customTimeout", Predicate::Truthy).require("timeout"),
                    when("customTimeout", Predicate::Falsy).reset_to("timeout", 0),
                    // cascades: zeroing `timeout` resets `note` on the next pass
                    when("timeout", Predicate::equals(0)).reset_to("note", "none"),
                    when_flag(flags::IS_EDIT_MODE, Predicate::Truthy).optional("name"),
                ],
            )
            .unwrap(),
        )
    }

    struct Fixed(SubmitOutcome);

    impl Submitter for Fixed {
        fn submit(
            &self,
            _values: ValueSet,
            _context: &SessionContext,
        ) -> impl Future<Output = SubmitOutcome> + Send {
            let outcome = self.0.clone();
            async move { outcome }
        }
    }

    fn session() -> FormSession {
        FormSession::create(schema(), SessionContext::create())
    }

    #[test]
    fn create_dialog_starts_from_defaults() {
        let s = session();
        assert_eq!(s.state(), FormState::Editing);
        assert_eq!(s.value("authType"), &FieldValue::from(1));
        assert!(s.is_required("password"));
        assert!(!s.is_visible("radiusProfileId"));
        assert!(!s.is_dirty());
        assert!(s.visible_errors().is_empty());
    }

    #[test]
    fn switching_auth_type_resets_before_returning() {
        let mut s = session();
        s.set("password", "hunter22").unwrap();
        let applied = s.set("authType", 2).unwrap();

        assert_eq!(applied, vec![("password".to_string(), FieldValue::from(""))]);
        assert_eq!(s.value("password"), &FieldValue::from(""));
        assert!(!s.is_required("password"));
        assert!(s.is_required("radiusProfileId"));
        assert!(s.is_dirty());
    }

    #[test]
    fn cascading_resets_settle() {
        let mut s = session();
        s.set("customTimeout", true).unwrap();
        s.set("timeout", 30).unwrap();
        s.set("note", "long sessions").unwrap();

        let applied = s.set("customTimeout", false).unwrap();
        let fields: Vec<_> = applied.iter().map(|(f, _)| f.as_str()).collect();
        assert_eq!(fields, vec!["timeout", "note"]);
        assert_eq!(s.value("note"), &FieldValue::from("none"));
        assert!(!s.evaluation().has_resets());
    }

    #[test]
    fn resets_are_idempotent() {
        let mut s = session();
        s.set("authType", 2).unwrap();
        let before = s.values().clone();
        let applied = s.set("authType", 2).unwrap();
        assert!(applied.is_empty());
        assert_eq!(s.values(), &before);
    }

    #[test]
    fn unknown_and_valueless_fields_rejected() {
        let mut s = session();
        assert_eq!(
            s.set("nope", 1).unwrap_err(),
            SessionError::UnknownField { field: "nope".into() }
        );
        assert_eq!(
            s.set("advanced", 1).unwrap_err(),
            SessionError::NotEditable { field: "advanced".into() }
        );
    }

    #[test]
    fn blur_surfaces_only_touched_errors() {
        let mut s = session();
        assert_eq!(s.blur("password").unwrap(), Some(keys::REQUIRED));
        assert_eq!(s.state(), FormState::Invalid);

        let visible = s.visible_errors();
        assert!(visible.contains("password"));
        assert!(!visible.contains("name"));
        assert!(s.errors().contains("name"));
    }

    #[test]
    fn edit_mode_flag_relaxes_name() {
        let record = ValueSet::new().with("id", "p-9").with("authType", 1).with("password", "abcd");
        let mut s = FormSession::edit(schema(), SessionContext::edit(), &record);
        assert!(!s.is_required("name"));
        assert!(s.validate().unwrap());
        assert_eq!(s.state(), FormState::Ready);
        assert_eq!(s.value("id"), &FieldValue::from("p-9"));
        assert!(!s.is_dirty());
    }

    #[test]
    fn invalid_submit_shows_every_error() {
        let mut s = session();
        let SubmitGate::Invalid(errors) = s.begin_submit().unwrap() else {
            panic!("expected invalid");
        };
        assert_eq!(errors.get("name"), Some(&keys::REQUIRED));
        assert_eq!(errors.get("password"), Some(&keys::REQUIRED));
        assert_eq!(s.visible_errors(), errors);
        assert_eq!(s.state(), FormState::Invalid);
    }

    #[test]
    fn submit_blocks_reentry_and_edits() {
        let mut s = session();
        s.set("name", "Lobby").unwrap();
        s.set("password", "hunter22").unwrap();
        let SubmitGate::Ready(ticket) = s.begin_submit().unwrap() else {
            panic!("expected ready");
        };
        assert_eq!(s.state(), FormState::Submitting);
        assert_eq!(s.begin_submit().unwrap_err(), SessionError::SubmitInFlight);
        assert_eq!(s.set("name", "x").unwrap_err(), SessionError::SubmitInFlight);

        let resolution = s.finish_submit(ticket, SubmitOutcome::accepted());
        assert!(resolution.is_accepted());
        assert_eq!(s.state(), FormState::Closed);
        assert_eq!(s.set("name", "x").unwrap_err(), SessionError::Closed);
    }

    #[test]
    fn server_errors_merge_by_field() {
        let mut s = session();
        s.set("name", "Lobby").unwrap();
        s.set("password", "hunter22").unwrap();
        let SubmitGate::Ready(ticket) = s.begin_submit().unwrap() else {
            panic!("expected ready");
        };

        let mut server = IndexMap::new();
        server.insert("name".to_string(), MessageKey::from_static("portal.nameTaken"));
        server.insert("tenant".to_string(), MessageKey::from_static("portal.quota"));
        let resolution = s.finish_submit(ticket, SubmitOutcome::rejected(server));

        let SubmitResolution::Rejected { errors, form_error } = resolution else {
            panic!("expected rejection");
        };
        assert_eq!(errors.get("name"), Some(&MessageKey::from_static("portal.nameTaken")));
        assert_eq!(form_error, Some(MessageKey::from_static("portal.quota")));
        assert_eq!(s.state(), FormState::Editing);

        s.set("name", "Lobby 2").unwrap();
        assert!(!s.errors().contains("name"));
    }

    #[test]
    fn outcome_after_close_is_discarded() {
        let mut s = session();
        s.set("name", "Lobby").unwrap();
        s.set("password", "hunter22").unwrap();
        let liveness = s.liveness();
        let SubmitGate::Ready(ticket) = s.begin_submit().unwrap() else {
            panic!("expected ready");
        };
        s.close();
        assert!(!liveness.is_alive());
        assert_eq!(
            s.finish_submit(ticket, SubmitOutcome::accepted()),
            SubmitResolution::Discarded
        );
    }

    #[tokio::test]
    async fn accepted_values_revalidate_clean() {
        let mut s = session();
        s.set("name", "Lobby").unwrap();
        s.set("authType", 2).unwrap();
        s.set("radiusProfileId", "r1").unwrap();

        let resolution = s.submit(&Fixed(SubmitOutcome::accepted())).await.unwrap();
        let SubmitResolution::Accepted(values) = resolution else {
            panic!("expected acceptance");
        };
        assert!(schema().validate(&values, &SessionContext::create()).is_empty());
    }

    #[tokio::test]
    async fn failed_submit_without_fields_sets_banner() {
        let mut s = session();
        s.set("name", "Lobby").unwrap();
        s.set("password", "hunter22").unwrap();

        let resolution = s.submit(&Fixed(SubmitOutcome::default())).await.unwrap();
        assert!(matches!(resolution, SubmitResolution::Rejected { .. }));
        assert_eq!(s.form_error(), Some(&keys::SUBMIT_FAILED));
        assert_eq!(s.state(), FormState::Editing);
    }

    #[test]
    fn stale_lookup_is_dropped() {
        let mut s = session();
        let lookup = LookupResult::new(
            vec![json!({ "id": "r1", "name": "Corp" }), json!({ "id": "r2", "name": "Guest" })],
            Projection::new("name", "id"),
        );

        let old = s.begin_lookup("radiusProfileId", "c").unwrap();
        let new = s.begin_lookup("radiusProfileId", "co").unwrap();
        assert!(!s.apply_lookup(&old, &lookup));
        assert!(s.options("radiusProfileId").is_empty());

        assert!(s.apply_lookup(&new, &lookup));
        assert_eq!(s.options("radiusProfileId").len(), 2);
        assert_eq!(s.descriptor("radiusProfileId").unwrap().options.len(), 2);
    }

    #[test]
    fn resolved_options_drive_validation() {
        let mut s = session();
        s.set("authType", 2).unwrap();
        s.set("radiusProfileId", "r9").unwrap();
        assert!(!s.errors().contains("radiusProfileId"));

        let ticket = s.begin_lookup("radiusProfileId", "").unwrap();
        s.apply_lookup(
            &ticket,
            &LookupResult::labeled(vec![json!({ "label": "Corp", "value": "r1" })]),
        );
        assert_eq!(s.errors().get("radiusProfileId"), Some(&keys::NOT_AN_OPTION));
    }

    #[test]
    fn lookup_after_close_is_refused() {
        let mut s = session();
        let ticket = s.begin_lookup("radiusProfileId", "").unwrap();
        s.close();
        assert!(ticket.is_cancelled());
        assert!(!s.apply_lookup(&ticket, &LookupResult::empty()));
        assert_eq!(s.begin_lookup("radiusProfileId", "").unwrap_err(), SessionError::Closed);
    }
}
