use actix_web::HttpRequest;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::DomainError;
use crate::models::person::Person;
use crate::schema::persons;

/// Header carrying the acting staff identity.
///
/// This is the seam where the external auth layer injects the authenticated
/// caller; the core never reads ambient state, every operation receives the
/// resolved `Person` as a value.
pub const STAFF_ID_HEADER: &str = "X-Staff-Id";

pub fn staff_id_from_request(req: &HttpRequest) -> Result<Uuid, DomainError> {
    let raw = req
        .headers()
        .get(STAFF_ID_HEADER)
        .ok_or_else(|| DomainError::Validation(format!("missing {} header", STAFF_ID_HEADER)))?
        .to_str()
        .map_err(|_| DomainError::Validation(format!("malformed {} header", STAFF_ID_HEADER)))?;

    Uuid::parse_str(raw)
        .map_err(|_| DomainError::Validation(format!("{} must be a UUID", STAFF_ID_HEADER)))
}

/// Resolve a staff id to its person row. An id that does not resolve is a
/// caller we do not know, not a missing resource.
pub fn load_person(conn: &mut PgConnection, id: Uuid) -> Result<Person, DomainError> {
    persons::table
        .filter(persons::id.eq(id))
        .select(Person::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| DomainError::PermissionDenied("unknown staff identity".to_string()))
}

/// Resolve a referenced staff id (e.g. an issuance assignee) or fail
/// validation.
pub fn load_referenced_person(conn: &mut PgConnection, id: Uuid) -> Result<Person, DomainError> {
    persons::table
        .filter(persons::id.eq(id))
        .select(Person::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| {
            DomainError::Validation(format!("person {} does not exist", id))
        })
}
