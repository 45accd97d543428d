//! Pivot from the selected item to the person behind it.

use crate::fetch::{FailureKind, FetchKind, FetchRequest, PivotResult};
use crate::intent::Intent;
use crate::nav::Focus;
use crate::state::App;
use lazyhog_core::{DataError, Record, Resource};
use tracing::{info, warn};

impl App {
    /// Look up the person behind the selected item.
    ///
    /// Items without a correlation key (flags, anonymous events) do nothing.
    pub fn request_pivot(&mut self) -> Vec<Intent> {
        let Some(key) = self
            .list
            .selected()
            .and_then(Record::correlation_key)
            .map(str::to_string)
        else {
            return Vec::new();
        };

        info!(correlation_key = %key, "pivoting to person");
        self.inspector.set_loading(true);
        let ticket = self.fetches.issue(FetchKind::Pivot);
        vec![Intent::Fetch {
            ticket,
            request: FetchRequest::Pivot {
                correlation_key: key,
                related_limit: self.config.related_limit,
            },
        }]
    }

    /// Apply a finished pivot in one step: resource, list, inspector and
    /// focus all change together or not at all.
    pub(crate) fn apply_pivot(&mut self, result: Result<PivotResult, DataError>) {
        self.inspector.set_loading(false);
        let pivot = match result {
            Ok(pivot) => pivot,
            Err(e) => {
                warn!(error = %e, "pivot failed");
                let kind = FailureKind::classify(&e);
                let message = match kind {
                    FailureKind::NotFound => "No person found for this item".to_string(),
                    _ => format!("Pivot failed: {e}"),
                };
                self.notify(kind.level(), message);
                return;
            }
        };

        self.debouncer.cancel();
        self.fetches.invalidate(FetchKind::List(Resource::Persons));
        self.fetches.invalidate(FetchKind::Detail);

        if let Some((kind, e)) = pivot.partial_failure() {
            warn!(person = %pivot.person.identity(), error = %e, "related events unavailable");
            self.notify(
                kind.level(),
                format!("Person loaded, recent events unavailable: {e}"),
            );
        }

        let record = Record::Person(pivot.person);
        let id = record.id();
        let payload = record.payload();
        self.list.replace_with_single(Resource::Persons, record);
        self.selector_cursor = Resource::Persons.index();
        self.inspector.set_selection(&id, payload);
        self.inspector.set_related(pivot.related);
        self.focus = Focus::Inspector;
    }
}
