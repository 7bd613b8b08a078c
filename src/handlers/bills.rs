use actix_web::{web, HttpRequest, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::status::barcode_status_for_update;
use crate::domain::{BarcodeStatus, BillStatus, DomainError, Material, Region, VehicleSize};
use crate::errors::AppError;
use crate::identity::{load_person, staff_id_from_request};
use crate::models::barcode::Barcode;
use crate::models::bill::{Bill, BillChangeset, NewBill};
use crate::schema::{barcodes, bills};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBillRequest {
    /// Code of the barcode this bill is created against.
    pub code: String,
    pub customer_name: String,
    /// Decimal amount as a string to avoid floating-point issues, e.g. "12500.00"
    pub amount: String,
    pub issue_location: String,
    pub vehicle_number: String,
    pub material: String,
    pub destination: String,
    pub vehicle_size: String,
    pub region: String,
    pub eta: DateTime<Utc>,
    pub remark: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBillRequest {
    /// Code of the barcode backing the bill; required for any update.
    pub code: Option<String>,
    /// Target status, either "completed" or "cancelled"; required.
    pub status: Option<String>,
    pub customer_name: Option<String>,
    pub amount: Option<String>,
    pub issue_location: Option<String>,
    pub vehicle_number: Option<String>,
    pub material: Option<String>,
    pub destination: Option<String>,
    pub vehicle_size: Option<String>,
    pub region: Option<String>,
    pub eta: Option<DateTime<Utc>>,
    pub remark: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BillResponse {
    pub id: Uuid,
    pub code: String,
    pub customer_name: String,
    pub date_issued: String,
    pub amount: String,
    pub issue_location: String,
    pub issued_by: Uuid,
    pub vehicle_number: String,
    pub material: String,
    pub destination: String,
    pub vehicle_size: String,
    pub region: String,
    pub eta: String,
    pub status: String,
    pub remark: Option<String>,
    pub modified_by: Option<Uuid>,
    pub modified_date: Option<String>,
}

impl From<Bill> for BillResponse {
    fn from(b: Bill) -> Self {
        BillResponse {
            id: b.id,
            code: b.code,
            customer_name: b.customer_name,
            date_issued: b.date_issued.to_rfc3339(),
            amount: b.amount.to_string(),
            issue_location: b.issue_location,
            issued_by: b.issued_by,
            vehicle_number: b.vehicle_number,
            material: b.material,
            destination: b.destination,
            vehicle_size: b.vehicle_size,
            region: b.region,
            eta: b.eta.to_rfc3339(),
            status: b.status,
            remark: b.remark,
            modified_by: b.modified_by,
            modified_date: b.modified_date.map(|d| d.to_rfc3339()),
        }
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListBillsParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Filter by bill status (pending/completed/cancelled).
    pub status: Option<String>,
    /// Case-insensitive substring match on code, customer name or vehicle number.
    pub search: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListBillsResponse {
    pub items: Vec<BillResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Validation helpers ───────────────────────────────────────────────────────

fn parse_amount(raw: &str) -> Result<BigDecimal, DomainError> {
    BigDecimal::from_str(raw)
        .map_err(|e| DomainError::Validation(format!("Invalid amount '{}': {}", raw, e)))
}

/// Validate the enum-backed bill fields, returning their canonical wire values.
fn validate_enum_fields(
    material: &str,
    vehicle_size: &str,
    region: &str,
) -> Result<(Material, VehicleSize, Region), DomainError> {
    Ok((
        Material::parse(material)?,
        VehicleSize::parse(vehicle_size)?,
        Region::parse(region)?,
    ))
}

/// Lock the barcode row for the given code. Every mutation of a barcode/bill
/// pair takes this lock first so concurrent requests on the same code
/// serialize at the row.
fn lock_barcode(conn: &mut PgConnection, code: &str) -> Result<Barcode, DomainError> {
    barcodes::table
        .filter(barcodes::code.eq(code))
        .select(Barcode::as_select())
        .for_update()
        .first(conn)
        .optional()?
        .ok_or(DomainError::BarcodeNotFound)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /bills
///
/// Creates a bill against an `issued` barcode owned by the caller and flips
/// that barcode to `active`. Both writes happen inside a single transaction
/// with the barcode row locked, so a failed precondition leaves no trace.
#[utoipa::path(
    post,
    path = "/bills",
    request_body = CreateBillRequest,
    responses(
        (status = 201, description = "Bill created, barcode activated", body = BillResponse),
        (status = 400, description = "Validation failure"),
        (status = 403, description = "Caller identity unknown"),
        (status = 404, description = "Barcode not found"),
        (status = 409, description = "Barcode not owned by caller or not available"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "bills"
)]
pub async fn create_bill(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    body: web::Json<CreateBillRequest>,
) -> Result<HttpResponse, AppError> {
    let staff_id = staff_id_from_request(&req)?;
    let body = body.into_inner();

    validate_enum_fields(&body.material, &body.vehicle_size, &body.region)?;
    let amount = parse_amount(&body.amount)?;

    let bill = web::block(move || {
        let mut conn = pool.get()?;

        conn.transaction::<Bill, DomainError, _>(|conn| {
            let issuer = load_person(conn, staff_id)?;

            // 1. The barcode must exist, belong to the issuer and still be
            //    in `issued` state.
            let barcode = lock_barcode(conn, &body.code)?;
            if barcode.assigned_to != issuer.id {
                return Err(DomainError::BarcodeNotOwned);
            }
            if BarcodeStatus::parse(&barcode.status)? != BarcodeStatus::Issued {
                return Err(DomainError::BarcodeNotAvailable);
            }

            // 2. Insert the bill as pending.
            let new_bill = NewBill {
                id: Uuid::new_v4(),
                code: body.code.clone(),
                customer_name: body.customer_name.clone(),
                amount,
                issue_location: body.issue_location.clone(),
                issued_by: issuer.id,
                vehicle_number: body.vehicle_number.clone(),
                material: body.material.clone(),
                destination: body.destination.clone(),
                vehicle_size: body.vehicle_size.clone(),
                region: body.region.clone(),
                eta: body.eta,
                status: BillStatus::Pending.as_str().to_string(),
                remark: body.remark.clone(),
            };
            let bill: Bill = diesel::insert_into(bills::table)
                .values(&new_bill)
                .returning(Bill::as_returning())
                .get_result(conn)?;

            // 3. Activate the barcode and link the bill.
            diesel::update(barcodes::table.filter(barcodes::id.eq(barcode.id)))
                .set((
                    barcodes::status.eq(BarcodeStatus::Active.as_str()),
                    barcodes::associated_bill.eq(bill.id),
                    barcodes::updated_at.eq(diesel::dsl::now),
                ))
                .execute(conn)?;

            Ok(bill)
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(BillResponse::from(bill)))
}

/// PATCH /bills/{id}
///
/// Manual status transition of a bill, keeping the linked barcode in
/// lockstep: `completed` marks the barcode `used`, `cancelled` marks it
/// `cancelled`. The barcode row lock is taken before any check so the pair
/// is updated atomically or not at all.
#[utoipa::path(
    patch,
    path = "/bills/{id}",
    params(
        ("id" = Uuid, Path, description = "Bill UUID"),
    ),
    request_body = UpdateBillRequest,
    responses(
        (status = 200, description = "Bill updated, barcode transitioned", body = BillResponse),
        (status = 400, description = "Validation failure"),
        (status = 404, description = "Bill or barcode not found"),
        (status = 409, description = "Barcode not active or invalid target status"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "bills"
)]
pub async fn update_bill(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateBillRequest>,
) -> Result<HttpResponse, AppError> {
    let staff_id = staff_id_from_request(&req)?;
    let bill_id = path.into_inner();
    let body = body.into_inner();

    let code = body
        .code
        .clone()
        .ok_or_else(|| AppError::Validation("code is required".to_string()))?;
    let raw_status = body
        .status
        .clone()
        .ok_or_else(|| AppError::Validation("status is required".to_string()))?;

    // Pure field validation happens before touching the database.
    if let Some(m) = &body.material {
        Material::parse(m)?;
    }
    if let Some(v) = &body.vehicle_size {
        VehicleSize::parse(v)?;
    }
    if let Some(r) = &body.region {
        Region::parse(r)?;
    }
    let amount = body.amount.as_deref().map(parse_amount).transpose()?;

    let bill = web::block(move || {
        let mut conn = pool.get()?;

        conn.transaction::<Bill, DomainError, _>(|conn| {
            let actor = load_person(conn, staff_id)?;

            // 1. Lock the barcode; it must exist and be active.
            let barcode = lock_barcode(conn, &code)?;
            if BarcodeStatus::parse(&barcode.status)? != BarcodeStatus::Active {
                return Err(DomainError::BarcodeNotActive);
            }

            // 2. The bill must exist and be the one the barcode backs.
            let bill: Bill = bills::table
                .filter(bills::id.eq(bill_id))
                .select(Bill::as_select())
                .first(conn)
                .optional()?
                .ok_or(DomainError::BillNotFound)?;
            if bill.code != barcode.code {
                return Err(DomainError::Validation(
                    "code does not match the bill's barcode".to_string(),
                ));
            }

            // 3. Only the two terminal states are valid targets; anything
            //    else is rejected and nothing is written.
            let target =
                BillStatus::parse(&raw_status).map_err(|_| DomainError::InvalidStatus)?;
            let barcode_target = barcode_status_for_update(target)?;

            let changeset = BillChangeset {
                customer_name: body.customer_name,
                amount,
                issue_location: body.issue_location,
                vehicle_number: body.vehicle_number,
                material: body.material,
                destination: body.destination,
                vehicle_size: body.vehicle_size,
                region: body.region,
                eta: body.eta,
                status: Some(target.as_str().to_string()),
                remark: body.remark,
                modified_by: Some(actor.id),
                modified_date: Some(Utc::now()),
            };
            let updated: Bill = diesel::update(bills::table.filter(bills::id.eq(bill.id)))
                .set(&changeset)
                .returning(Bill::as_returning())
                .get_result(conn)?;

            diesel::update(barcodes::table.filter(barcodes::id.eq(barcode.id)))
                .set((
                    barcodes::status.eq(barcode_target.as_str()),
                    barcodes::updated_at.eq(diesel::dsl::now),
                ))
                .execute(conn)?;

            Ok(updated)
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(BillResponse::from(bill)))
}

/// GET /bills/{id}
#[utoipa::path(
    get,
    path = "/bills/{id}",
    params(
        ("id" = Uuid, Path, description = "Bill UUID"),
    ),
    responses(
        (status = 200, description = "Bill found", body = BillResponse),
        (status = 404, description = "Bill not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "bills"
)]
pub async fn get_bill(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let bill_id = path.into_inner();

    let result = web::block(move || {
        let mut conn = pool.get()?;

        let bill = bills::table
            .filter(bills::id.eq(bill_id))
            .select(Bill::as_select())
            .first(&mut conn)
            .optional()?;

        Ok::<_, DomainError>(bill)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    match result {
        Some(bill) => Ok(HttpResponse::Ok().json(BillResponse::from(bill))),
        None => Err(DomainError::BillNotFound.into()),
    }
}

/// GET /bills
///
/// Paginated bill listing, newest first, with optional status filter and
/// case-insensitive search over code, customer name and vehicle number.
#[utoipa::path(
    get,
    path = "/bills",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
        ("status" = Option<String>, Query, description = "Filter by bill status"),
        ("search" = Option<String>, Query, description = "Substring match on code/customer/vehicle"),
    ),
    responses(
        (status = 200, description = "Paginated list of bills", body = ListBillsResponse),
        (status = 400, description = "Unknown status filter"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "bills"
)]
pub async fn list_bills(
    pool: web::Data<DbPool>,
    query: web::Query<ListBillsParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);
    let offset = (page - 1).saturating_mul(limit);

    let status_filter = params
        .status
        .as_deref()
        .map(BillStatus::parse_input)
        .transpose()?
        .map(|s| s.as_str().to_string());
    let search = params.search.clone();

    let result = web::block(move || {
        let mut conn = pool.get()?;

        let mut count_query = bills::table.count().into_boxed();
        let mut page_query = bills::table.select(Bill::as_select()).into_boxed();

        if let Some(status) = &status_filter {
            count_query = count_query.filter(bills::status.eq(status.clone()));
            page_query = page_query.filter(bills::status.eq(status.clone()));
        }
        if let Some(term) = &search {
            let pattern = format!("%{}%", term);
            count_query = count_query.filter(
                bills::code
                    .ilike(pattern.clone())
                    .or(bills::customer_name.ilike(pattern.clone()))
                    .or(bills::vehicle_number.ilike(pattern.clone())),
            );
            page_query = page_query.filter(
                bills::code
                    .ilike(pattern.clone())
                    .or(bills::customer_name.ilike(pattern.clone()))
                    .or(bills::vehicle_number.ilike(pattern)),
            );
        }

        let total: i64 = count_query.get_result(&mut conn)?;

        let rows: Vec<Bill> = page_query
            .order(bills::date_issued.desc())
            .limit(limit)
            .offset(offset)
            .load(&mut conn)?;

        Ok::<_, DomainError>(ListBillsResponse {
            items: rows.into_iter().map(BillResponse::from).collect(),
            total,
            page,
            limit,
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(result))
}
