//! # Ownership Rules
//!
//! Pure rules linking an update to the creation event it claims to extend.
//!
//! Every lookup is scoped by the update's author, so a foreign update never
//! finds a matching row. Events handed back by remote relays are re-checked
//! here because a relay may ignore parts of the filter: an event with the
//! right id but another author is reported as `Unauthorized` instead of
//! folding into "not found".

use shared_types::{Event, Filter, Kind};

use super::entities::{CreationTarget, ReferenceTag};
use super::errors::LookupError;

/// How a remotely returned event relates to the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Candidate {
    /// Right kind, id and author.
    Owned,
    /// Right kind and id, different author.
    ForeignOwner,
    /// Anything else.
    Unrelated,
}

/// Extract the channel reference: the first `"e"` tag.
///
/// A tag without a value yields an empty id, a tag without a third element
/// an empty hint.
pub fn extract_reference(event: &Event) -> Option<ReferenceTag> {
    event.first_event_reference().map(|tag| ReferenceTag {
        referenced_event_id: tag.value().unwrap_or_default().to_string(),
        relay_hint: tag.relay_hint().unwrap_or_default().to_string(),
    })
}

/// Filter selecting the target's creation event: `{kind=40, author, id}`.
pub fn creation_filter(target: &CreationTarget) -> Filter {
    Filter::new()
        .kind(Kind::CHANNEL_CREATION)
        .author(target.author.clone())
        .id(target.event_id.clone())
}

/// Classify a remotely returned event against the target.
pub fn classify(event: &Event, target: &CreationTarget) -> Candidate {
    if event.kind != Kind::CHANNEL_CREATION || event.id != target.event_id {
        return Candidate::Unrelated;
    }
    if event.pubkey == target.author {
        Candidate::Owned
    } else {
        Candidate::ForeignOwner
    }
}

/// Accept the answer of a hinted relay.
///
/// The relay must return exactly one event, and that event must be the
/// target's creation event.
pub fn select_single(
    mut events: Vec<Event>,
    target: &CreationTarget,
) -> Result<Event, LookupError> {
    match events.len() {
        0 => Err(LookupError::not_found()),
        1 => {
            let event = events.remove(0);
            match classify(&event, target) {
                Candidate::Owned => Ok(event),
                Candidate::ForeignOwner => Err(LookupError::Unauthorized {
                    kind: Kind::CHANNEL_CREATION,
                }),
                Candidate::Unrelated => Err(LookupError::not_found()),
            }
        }
        count => Err(LookupError::Ambiguous {
            kind: Kind::CHANNEL_CREATION,
            count,
        }),
    }
}

/// Pick the target's creation event out of a pool relay's answer.
///
/// Returns the owned event if present; otherwise whether a foreign-owned
/// event with the target id was seen.
pub fn select_owned(events: Vec<Event>, target: &CreationTarget) -> Result<Event, Candidate> {
    let mut seen = Candidate::Unrelated;
    for event in events {
        match classify(&event, target) {
            Candidate::Owned => return Ok(event),
            Candidate::ForeignOwner => seen = Candidate::ForeignOwner,
            Candidate::Unrelated => {}
        }
    }
    Err(seen)
}
