use actix_web::{web, HttpRequest, HttpResponse};
use diesel::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::{BarcodeStatus, DomainError};
use crate::errors::AppError;
use crate::identity::{load_person, load_referenced_person, staff_id_from_request};
use crate::models::barcode::{Barcode, NewBarcode};
use crate::models::person::Person;
use crate::schema::{barcodes, persons};

/// Width of a printable code; range-mode numbers are zero-padded to this so
/// scanner input is uniform across both issuance modes.
const CODE_WIDTH: usize = 12;

/// Upper bound on a single issuance batch.
const MAX_BATCH: i64 = 1000;

/// Largest range number that still fits in `CODE_WIDTH` digits.
const MAX_RANGE_CODE: i64 = 999_999_999_999;

// ── Request / response DTOs ──────────────────────────────────────────────────

/// Either `count` (random-token mode) or `lowerbound`/`upperbound`
/// (sequential zero-padded mode, inclusive) must be supplied, not both.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IssueBarcodesRequest {
    pub count: Option<i64>,
    pub lowerbound: Option<i64>,
    pub upperbound: Option<i64>,
    /// Person the new barcodes are assigned to.
    pub assigned_to: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IssueBarcodesResponse {
    pub issued_codes: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PersonRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BarcodeResponse {
    pub code: String,
    pub status: String,
    pub assigned_to: PersonRef,
    pub assigned_by: PersonRef,
    pub associated_bill: Option<Uuid>,
    pub created_at: String,
    pub assigned_at: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListBarcodesParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Filter by assignee person id.
    pub assigned_to: Option<Uuid>,
    /// Case-insensitive substring match on the code.
    pub search: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListBarcodesResponse {
    pub barcodes: Vec<BarcodeResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Issuance modes ───────────────────────────────────────────────────────────

enum IssueMode {
    Count(i64),
    Range { lower: i64, upper: i64 },
}

impl IssueMode {
    fn from_request(req: &IssueBarcodesRequest) -> Result<Self, DomainError> {
        match (req.count, req.lowerbound, req.upperbound) {
            (Some(count), None, None) => {
                if !(1..=MAX_BATCH).contains(&count) {
                    return Err(DomainError::Validation(format!(
                        "count must be between 1 and {}",
                        MAX_BATCH
                    )));
                }
                Ok(IssueMode::Count(count))
            }
            (None, Some(lower), Some(upper)) => {
                if lower < 0 || upper < lower {
                    return Err(DomainError::Validation(
                        "lowerbound/upperbound must be a non-negative ascending range"
                            .to_string(),
                    ));
                }
                if upper > MAX_RANGE_CODE {
                    return Err(DomainError::Validation(format!(
                        "upperbound must not exceed {}",
                        MAX_RANGE_CODE
                    )));
                }
                let span = upper
                    .checked_sub(lower)
                    .and_then(|d| d.checked_add(1));
                if !matches!(span, Some(n) if n <= MAX_BATCH) {
                    return Err(DomainError::Validation(format!(
                        "range must not exceed {} codes",
                        MAX_BATCH
                    )));
                }
                Ok(IssueMode::Range { lower, upper })
            }
            _ => Err(DomainError::Validation(
                "supply either count or lowerbound/upperbound".to_string(),
            )),
        }
    }
}

/// Generate `count` random 12-digit codes avoiding everything in `existing`.
fn random_codes(count: i64, existing: &HashSet<String>) -> Vec<String> {
    let mut rng = rand::thread_rng();
    let mut new_codes: HashSet<String> = HashSet::new();
    while (new_codes.len() as i64) < count {
        let code = format!("{}", rng.gen_range(100_000_000_000u64..=999_999_999_999u64));
        if !existing.contains(&code) {
            new_codes.insert(code);
        }
    }
    new_codes.into_iter().collect()
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /barcodes
///
/// Admin-only batch issuance. Random mode mints `count` unique codes;
/// range mode walks `lowerbound..=upperbound`, zero-padding each number and
/// silently skipping codes already on file. A range with nothing left to
/// issue is a conflict.
#[utoipa::path(
    post,
    path = "/barcodes",
    request_body = IssueBarcodesRequest,
    responses(
        (status = 201, description = "Barcodes issued", body = IssueBarcodesResponse),
        (status = 400, description = "Validation failure"),
        (status = 403, description = "Caller is not an admin"),
        (status = 409, description = "Entire range already issued"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "barcodes"
)]
pub async fn issue_barcodes(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    body: web::Json<IssueBarcodesRequest>,
) -> Result<HttpResponse, AppError> {
    let staff_id = staff_id_from_request(&req)?;
    let body = body.into_inner();
    let mode = IssueMode::from_request(&body)?;

    let issued = web::block(move || {
        let mut conn = pool.get()?;

        conn.transaction::<Vec<String>, DomainError, _>(|conn| {
            let issuer = load_person(conn, staff_id)?;
            if !issuer.is_admin() {
                return Err(DomainError::PermissionDenied(
                    "You do not have permission to issue barcodes".to_string(),
                ));
            }
            let assignee = load_referenced_person(conn, body.assigned_to)?;

            let new_codes = match mode {
                IssueMode::Count(count) => {
                    let existing: HashSet<String> = barcodes::table
                        .select(barcodes::code)
                        .load::<String>(conn)?
                        .into_iter()
                        .collect();
                    random_codes(count, &existing)
                }
                IssueMode::Range { lower, upper } => {
                    let candidates: Vec<String> = (lower..=upper)
                        .map(|n| format!("{:0width$}", n, width = CODE_WIDTH))
                        .collect();
                    let taken: HashSet<String> = barcodes::table
                        .filter(barcodes::code.eq_any(&candidates))
                        .select(barcodes::code)
                        .load::<String>(conn)?
                        .into_iter()
                        .collect();
                    let fresh: Vec<String> = candidates
                        .into_iter()
                        .filter(|c| !taken.contains(c))
                        .collect();
                    if fresh.is_empty() {
                        return Err(DomainError::NoNewCodes);
                    }
                    fresh
                }
            };

            let rows: Vec<NewBarcode> = new_codes
                .iter()
                .map(|code| NewBarcode {
                    id: Uuid::new_v4(),
                    code: code.clone(),
                    status: BarcodeStatus::Issued.as_str().to_string(),
                    assigned_to: assignee.id,
                    assigned_by: issuer.id,
                })
                .collect();
            diesel::insert_into(barcodes::table)
                .values(&rows)
                .execute(conn)?;

            Ok(new_codes)
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(IssueBarcodesResponse {
        issued_codes: issued,
    }))
}

/// GET /barcodes
///
/// Paginated listing, newest first, with optional assignee filter and code
/// search. Assignee/assigner names are resolved in a second query to avoid
/// a self-joined persons alias.
#[utoipa::path(
    get,
    path = "/barcodes",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
        ("assigned_to" = Option<Uuid>, Query, description = "Filter by assignee person id"),
        ("search" = Option<String>, Query, description = "Substring match on the code"),
    ),
    responses(
        (status = 200, description = "Paginated list of barcodes", body = ListBarcodesResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "barcodes"
)]
pub async fn list_barcodes(
    pool: web::Data<DbPool>,
    query: web::Query<ListBarcodesParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);
    let offset = (page - 1).saturating_mul(limit);

    let result = web::block(move || {
        let mut conn = pool.get()?;

        let mut count_query = barcodes::table.count().into_boxed();
        let mut page_query = barcodes::table
            .select(Barcode::as_select())
            .into_boxed();

        if let Some(assignee) = params.assigned_to {
            count_query = count_query.filter(barcodes::assigned_to.eq(assignee));
            page_query = page_query.filter(barcodes::assigned_to.eq(assignee));
        }
        if let Some(term) = &params.search {
            let pattern = format!("%{}%", term);
            count_query = count_query.filter(barcodes::code.ilike(pattern.clone()));
            page_query = page_query.filter(barcodes::code.ilike(pattern));
        }

        let total: i64 = count_query.get_result(&mut conn)?;

        let rows: Vec<Barcode> = page_query
            .order(barcodes::created_at.desc())
            .limit(limit)
            .offset(offset)
            .load(&mut conn)?;

        // Resolve the people referenced on this page.
        let mut person_ids: Vec<Uuid> = rows
            .iter()
            .flat_map(|b| [b.assigned_to, b.assigned_by])
            .collect();
        person_ids.sort_unstable();
        person_ids.dedup();
        let people: HashMap<Uuid, String> = persons::table
            .filter(persons::id.eq_any(&person_ids))
            .select(Person::as_select())
            .load(&mut conn)?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        let name_of = |id: Uuid| people.get(&id).cloned().unwrap_or_default();
        let items: Vec<BarcodeResponse> = rows
            .into_iter()
            .map(|b| BarcodeResponse {
                assigned_to: PersonRef {
                    id: b.assigned_to,
                    name: name_of(b.assigned_to),
                },
                assigned_by: PersonRef {
                    id: b.assigned_by,
                    name: name_of(b.assigned_by),
                },
                code: b.code,
                status: b.status,
                associated_bill: b.associated_bill,
                created_at: b.created_at.to_rfc3339(),
                assigned_at: b.assigned_at.to_rfc3339(),
            })
            .collect();

        Ok::<_, DomainError>(ListBarcodesResponse {
            barcodes: items,
            total,
            page,
            limit,
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(count: Option<i64>, lower: Option<i64>, upper: Option<i64>) -> IssueBarcodesRequest {
        IssueBarcodesRequest {
            count,
            lowerbound: lower,
            upperbound: upper,
            assigned_to: Uuid::new_v4(),
        }
    }

    #[test]
    fn count_mode_accepts_bounds() {
        assert!(matches!(
            IssueMode::from_request(&req(Some(1), None, None)),
            Ok(IssueMode::Count(1))
        ));
        assert!(IssueMode::from_request(&req(Some(0), None, None)).is_err());
        assert!(IssueMode::from_request(&req(Some(1001), None, None)).is_err());
    }

    #[test]
    fn range_mode_requires_ascending_range() {
        assert!(matches!(
            IssueMode::from_request(&req(None, Some(5), Some(5))),
            Ok(IssueMode::Range { lower: 5, upper: 5 })
        ));
        assert!(IssueMode::from_request(&req(None, Some(10), Some(9))).is_err());
        assert!(IssueMode::from_request(&req(None, Some(-1), Some(9))).is_err());
    }

    #[test]
    fn range_mode_caps_batch_size() {
        assert!(IssueMode::from_request(&req(None, Some(0), Some(999))).is_ok());
        assert!(IssueMode::from_request(&req(None, Some(0), Some(1000))).is_err());
    }

    #[test]
    fn range_mode_rejects_extreme_bounds() {
        // The span computation must not overflow for pathological input.
        assert!(IssueMode::from_request(&req(None, Some(0), Some(i64::MAX))).is_err());
        assert!(IssueMode::from_request(&req(None, Some(1), Some(i64::MAX))).is_err());
    }

    #[test]
    fn range_mode_rejects_codes_wider_than_twelve_digits() {
        assert!(IssueMode::from_request(&req(
            None,
            Some(MAX_RANGE_CODE),
            Some(MAX_RANGE_CODE)
        ))
        .is_ok());
        assert!(IssueMode::from_request(&req(
            None,
            Some(MAX_RANGE_CODE + 1),
            Some(MAX_RANGE_CODE + 1)
        ))
        .is_err());
    }

    #[test]
    fn mixing_modes_is_rejected() {
        assert!(IssueMode::from_request(&req(Some(3), Some(1), Some(5))).is_err());
        assert!(IssueMode::from_request(&req(None, Some(1), None)).is_err());
        assert!(IssueMode::from_request(&req(None, None, None)).is_err());
    }

    #[test]
    fn random_codes_are_unique_twelve_digit_strings() {
        let existing: HashSet<String> = HashSet::new();
        let codes = random_codes(50, &existing);
        assert_eq!(codes.len(), 50);
        for code in &codes {
            assert_eq!(code.len(), 12);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
        let unique: HashSet<&String> = codes.iter().collect();
        assert_eq!(unique.len(), 50);
    }

    #[test]
    fn range_padding_is_twelve_digits() {
        assert_eq!(format!("{:0width$}", 42, width = CODE_WIDTH), "000000000042");
    }
}
